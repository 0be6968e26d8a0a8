use ethers::types::{H256, U256};
use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure of a belief load. Either both remote values were read and decoded,
/// or one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("rpc request failed: {0}")]
    Network(String),

    #[error("no attestation found for uid {0:?}")]
    NotFound(H256),

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("staker count {0} does not fit in a u64")]
    TypeConversion(U256),

    #[error("invalid contract call {function}: {reason}")]
    InvalidCall { function: String, reason: String },
}

impl FetchError {
    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Neutral text shown to a human in place of the belief.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "The network could not be reached. Try again in a moment.",
            FetchError::NotFound(_) => "This belief does not exist on record.",
            FetchError::Decode { .. } => "This belief could not be read.",
            FetchError::TypeConversion(_) => "The staker count is too large to display.",
            FetchError::InvalidCall { .. } => "This belief could not be loaded.",
        }
    }
}
