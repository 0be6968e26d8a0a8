//! In-memory contract reader for tests
//!
//! Serves fixture outputs keyed by contract, function and arguments, so the
//! belief flow can be exercised without a chain.

use async_trait::async_trait;
use ethers::abi::{Abi, Token, Tokenizable};
use ethers::types::{Address, U256};
use std::sync::{Arc, Mutex};

use crate::contracts::{lookup, ContractReader, GET_ATTESTATION, GET_STAKER_COUNT};
use crate::error::{FetchError, FetchResult};
use crate::types::{Attestation, AttestationUid};

/// Stub reader returning registered fixture data
#[derive(Clone, Default)]
pub struct StubReader {
    state: Arc<Mutex<StubState>>,
}

#[derive(Default)]
struct StubState {
    fixtures: Vec<Fixture>,
    calls: Vec<RecordedCall>,
}

struct Fixture {
    address: Address,
    function: String,
    args: Vec<Token>,
    response: FetchResult<Vec<Token>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub address: Address,
    pub function: String,
    pub args: Vec<Token>,
}

impl StubReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the outputs of one call
    pub fn respond(&self, address: Address, function: &str, args: Vec<Token>, response: FetchResult<Vec<Token>>) {
        let mut state = self.state.lock().unwrap();
        state.fixtures.retain(|f| !(f.address == address && f.function == function && f.args == args));
        state.fixtures.push(Fixture {
            address,
            function: function.to_string(),
            args,
            response,
        });
    }

    /// Serve `attestation` from the registry at `registry` under its own uid
    pub fn with_attestation(self, registry: Address, attestation: Attestation) -> Self {
        let args = vec![uid_token(attestation.uid.into())];
        self.respond(registry, GET_ATTESTATION, args, Ok(attestation.into_tokens()));
        self
    }

    pub fn with_staker_count(self, stake: Address, uid: AttestationUid, count: U256) -> Self {
        self.respond(stake, GET_STAKER_COUNT, vec![uid_token(uid)], Ok(vec![count.into_token()]));
        self
    }

    /// Make every call of `function` on `address` fail with `error`
    pub fn failing(self, address: Address, function: &str, uid: AttestationUid, error: FetchError) -> Self {
        self.respond(address, function, vec![uid_token(uid)], Err(error));
        self
    }

    /// Calls seen so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

fn uid_token(uid: AttestationUid) -> Token {
    uid.into_token()
}

#[async_trait]
impl ContractReader for StubReader {
    async fn read_contract(
        &self,
        address: Address,
        abi: &Abi,
        function_name: &str,
        args: &[Token],
    ) -> FetchResult<Vec<Token>> {
        // same argument checks a real call would hit when encoding
        let function = lookup(abi, function_name)?;
        function.encode_input(args).map_err(|e| FetchError::InvalidCall {
            function: function_name.to_string(),
            reason: e.to_string(),
        })?;

        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            address,
            function: function_name.to_string(),
            args: args.to_vec(),
        });

        state
            .fixtures
            .iter()
            .find(|f| f.address == address && f.function == function_name && f.args == args)
            .map(|f| f.response.clone())
            .unwrap_or_else(|| {
                Err(FetchError::Network(format!(
                    "no fixture for {} on {:?}",
                    function_name, address
                )))
            })
    }
}
