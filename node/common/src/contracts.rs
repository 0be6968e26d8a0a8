use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    abi::{Abi, Function, Token},
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest},
};
use tracing::debug;

use crate::error::{FetchError, FetchResult};

/// Reference deployment on Base Sepolia
pub mod deployment {
    pub const RPC_URL: &str = "https://sepolia.base.org";
    pub const EAS_REGISTRY: &str = "0x4200000000000000000000000000000000000021";
    pub const BELIEF_STAKE: &str = "0xa37c9A89375134374a866EeD3E57EAF2789d9613";
    pub const BELIEF_SCHEMA_UID: &str =
        "0x21f7fcf4af0c022d3e7316b6a5b9a04dcaedac59eaea803251e653abd1db9fd6";
    pub const GENESIS_BELIEF_UID: &str =
        "0x52314b57ebbe83ebe00c02aa3a74df3cf1a55acd682318f7d88777945aa5c1dd";
}

pub const GET_ATTESTATION: &str = "getAttestation";
pub const GET_STAKER_COUNT: &str = "getStakerCount";

// Minimal EAS ABI, getAttestation only
abigen!(
    Eas,
    r#"[
        struct Attestation { bytes32 uid; bytes32 schema; uint64 time; uint64 expirationTime; uint64 revocationTime; bytes32 refUID; address recipient; address attester; bool revocable; bytes data; }
        function getAttestation(bytes32 uid) external view returns (Attestation)
    ]"#
);

abigen!(
    BeliefStake,
    r#"[
        function getStakerCount(bytes32 attestationUID) external view returns (uint256)
    ]"#
);

/// Read-only access to contract state.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Call `function_name` on the contract at `address` and return its
    /// decoded outputs. Never signs or sends a transaction.
    async fn read_contract(
        &self,
        address: Address,
        abi: &Abi,
        function_name: &str,
        args: &[Token],
    ) -> FetchResult<Vec<Token>>;
}

pub(crate) fn lookup<'a>(abi: &'a Abi, function_name: &str) -> FetchResult<&'a Function> {
    abi.function(function_name).map_err(|e| FetchError::InvalidCall {
        function: function_name.to_string(),
        reason: e.to_string(),
    })
}

/// `eth_call` over a JSON-RPC HTTP endpoint
#[derive(Clone)]
pub struct RpcReader {
    provider: Provider<Http>,
}

impl RpcReader {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC URL {}", rpc_url))?;

        Ok(Self { provider })
    }
}

#[async_trait]
impl ContractReader for RpcReader {
    async fn read_contract(
        &self,
        address: Address,
        abi: &Abi,
        function_name: &str,
        args: &[Token],
    ) -> FetchResult<Vec<Token>> {
        let function = lookup(abi, function_name)?;

        let calldata = function
            .encode_input(args)
            .map_err(|e| FetchError::InvalidCall {
                function: function_name.to_string(),
                reason: e.to_string(),
            })?;

        let tx: TypedTransaction = TransactionRequest::new().to(address).data(calldata).into();

        debug!("eth_call {} on {:?}", function_name, address);

        let raw = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        function
            .decode_output(&raw)
            .map_err(|e| FetchError::decode("call result", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::ParamType;

    #[test]
    fn test_generated_abis() {
        let get_attestation = EAS_ABI.function(GET_ATTESTATION).unwrap();
        assert_eq!(get_attestation.inputs[0].kind, ParamType::FixedBytes(32));
        match &get_attestation.outputs[0].kind {
            ParamType::Tuple(fields) => {
                assert_eq!(fields.len(), 10);
                assert_eq!(fields[9], ParamType::Bytes);
            }
            other => panic!("unexpected output {:?}", other),
        }

        let get_count = BELIEFSTAKE_ABI.function(GET_STAKER_COUNT).unwrap();
        assert_eq!(get_count.outputs[0].kind, ParamType::Uint(256));
    }

    #[test]
    fn test_unknown_function_is_invalid_call() {
        let err = lookup(&BELIEFSTAKE_ABI, "stake").unwrap_err();
        assert!(matches!(err, FetchError::InvalidCall { .. }));
    }

    #[test]
    fn test_rpc_reader_rejects_bad_url() {
        assert!(RpcReader::new("not a url").is_err());
        assert!(RpcReader::new(deployment::RPC_URL).is_ok());
    }
}
