use ethers::abi::{Token, Tokenizable};
use ethers::types::{H256, U256};

use crate::error::{FetchError, FetchResult};

/// Attestation record as returned by the registry's `getAttestation`,
/// generated from the EAS ABI
pub use crate::contracts::Attestation;

/// 32-byte attestation identifier
pub type AttestationUid = H256;

impl Attestation {
    /// Build from the decoded outputs of `getAttestation`, a single tuple.
    pub fn from_tokens(tokens: Vec<Token>) -> FetchResult<Self> {
        single(tokens, "attestation")
    }

    pub fn into_tokens(self) -> Vec<Token> {
        vec![self.into_token()]
    }

    /// The registry answers unknown uids with an all-zero record.
    pub fn exists(&self) -> bool {
        self.uid != [0u8; 32]
    }

    pub fn is_revoked(&self) -> bool {
        self.revocation_time != 0
    }
}

/// Detokenize the one output of a contract call
pub(crate) fn single<T: Tokenizable>(tokens: Vec<Token>, what: &'static str) -> FetchResult<T> {
    let mut outputs = tokens.into_iter();
    match (outputs.next(), outputs.next()) {
        (Some(token), None) => T::from_token(token).map_err(|e| FetchError::decode(what, e)),
        (first, second) => Err(FetchError::decode(
            what,
            format!("expected one output, got {:?} then {:?}", first, second),
        )),
    }
}

/// Narrow the staking contract's uint256 into the view model's integer.
pub fn staker_count(value: U256) -> FetchResult<u64> {
    u64::try_from(value).map_err(|_| FetchError::TypeConversion(value))
}

/// What gets rendered for one belief
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefView {
    pub belief: String,
    pub staker_count: u64,
}
