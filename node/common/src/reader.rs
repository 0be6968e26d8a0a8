use anyhow::Result;
use ethers::{
    abi::{Token, Tokenizable},
    types::{Address, H256, U256},
};
use tracing::{info, warn};

use crate::{
    abi::decode_belief,
    config::ReaderConfig,
    contracts::{ContractReader, RpcReader, BELIEFSTAKE_ABI, EAS_ABI, GET_ATTESTATION, GET_STAKER_COUNT},
    error::{FetchError, FetchResult},
    types::{single, staker_count, Attestation, AttestationUid, BeliefView},
};

/// Reads one belief and its staker count from the registry and staking contracts
pub struct BeliefReader<R> {
    client: R,
    registry: Address,
    stake: Address,
    belief_schema: Option<H256>,
}

impl BeliefReader<RpcReader> {
    /// Reader backed by the configured RPC endpoint
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        let client = RpcReader::new(&config.rpc_url)?;
        let reader = Self::new(client, config.registry()?, config.stake()?);

        Ok(reader.with_belief_schema(config.schema()?))
    }
}

impl<R: ContractReader> BeliefReader<R> {
    pub fn new(client: R, registry: Address, stake: Address) -> Self {
        Self {
            client,
            registry,
            stake,
            belief_schema: None,
        }
    }

    /// Warn when an attestation was made under a different schema
    pub fn with_belief_schema(mut self, schema: H256) -> Self {
        self.belief_schema = Some(schema);
        self
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    /// Fetch and decode the belief behind `uid` together with its staker count.
    ///
    /// Both reads are issued concurrently. The first failure fails the whole
    /// load; no partial view is ever produced.
    pub async fn load_belief(&self, uid: AttestationUid) -> FetchResult<BeliefView> {
        info!("Loading belief {:?}", uid);

        let (attestation, count) =
            tokio::try_join!(self.fetch_attestation(uid), self.fetch_staker_count(uid))?;

        let belief = decode_belief(&attestation.data)?;
        let staker_count = staker_count(count)?;

        info!("Belief {:?} has {} stakers", uid, staker_count);

        Ok(BeliefView {
            belief,
            staker_count,
        })
    }

    /// `getAttestation(uid)` on the registry
    pub async fn fetch_attestation(&self, uid: AttestationUid) -> FetchResult<Attestation> {
        let tokens = self
            .client
            .read_contract(self.registry, &EAS_ABI, GET_ATTESTATION, &[uid_arg(uid)])
            .await?;

        let attestation = Attestation::from_tokens(tokens)?;

        if !attestation.exists() {
            return Err(FetchError::NotFound(uid));
        }

        if attestation.is_revoked() {
            warn!(
                "Attestation {:?} was revoked at {}",
                uid, attestation.revocation_time
            );
        }

        if let Some(expected) = self.belief_schema {
            let schema = H256::from(attestation.schema);
            if schema != expected {
                warn!(
                    "Attestation {:?} uses schema {:?}, expected {:?}",
                    uid, schema, expected
                );
            }
        }

        Ok(attestation)
    }

    /// `getStakerCount(uid)` on the staking contract
    pub async fn fetch_staker_count(&self, uid: AttestationUid) -> FetchResult<U256> {
        let tokens = self
            .client
            .read_contract(self.stake, &BELIEFSTAKE_ABI, GET_STAKER_COUNT, &[uid_arg(uid)])
            .await?;

        single(tokens, "staker count")
    }
}

fn uid_arg(uid: AttestationUid) -> Token {
    uid.into_token()
}
