//! Reader configuration
//!
//! Defaults point at the reference deployment. A TOML file may override any
//! subset of the fields; the binary layers CLI flags and environment on top.

use anyhow::{bail, Context, Result};
use ethers::types::{Address, H256};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::contracts::deployment;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// JSON-RPC endpoint to query
    pub rpc_url: String,
    /// Attestation registry contract
    pub registry_address: String,
    /// Staking contract
    pub stake_address: String,
    /// Attestation to display
    pub target_uid: String,
    /// Schema the target attestation is expected to use
    pub belief_schema: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            rpc_url: deployment::RPC_URL.to_string(),
            registry_address: deployment::EAS_REGISTRY.to_string(),
            stake_address: deployment::BELIEF_STAKE.to_string(),
            target_uid: deployment::GENESIS_BELIEF_UID.to_string(),
            belief_schema: deployment::BELIEF_SCHEMA_UID.to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn registry(&self) -> Result<Address> {
        parse_address(&self.registry_address).context("registry_address")
    }

    pub fn stake(&self) -> Result<Address> {
        parse_address(&self.stake_address).context("stake_address")
    }

    pub fn uid(&self) -> Result<H256> {
        parse_bytes32(&self.target_uid).context("target_uid")
    }

    pub fn schema(&self) -> Result<H256> {
        parse_bytes32(&self.belief_schema).context("belief_schema")
    }

    /// Check every field before any network traffic happens
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            bail!("rpc_url must not be empty");
        }
        self.registry()?;
        self.stake()?;
        self.uid()?;
        self.schema()?;
        Ok(())
    }
}

/// Parse a `0x`-prefixed 20-byte hex address
pub fn parse_address(addr: &str) -> Result<Address> {
    if !addr.starts_with("0x") {
        bail!("address must start with 0x");
    }

    Address::from_str(addr).with_context(|| format!("invalid address {}", addr))
}

/// Parse a bytes32 value, `0x` prefix optional
pub fn parse_bytes32(id: &str) -> Result<H256> {
    let bytes = hex::decode(id.strip_prefix("0x").unwrap_or(id))?;

    if bytes.len() != 32 {
        bail!("expected 32 bytes, got {}", bytes.len());
    }

    Ok(H256::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReaderConfig::default();
        config.validate().unwrap();

        assert_eq!(
            format!("{:?}", config.uid().unwrap()),
            deployment::GENESIS_BELIEF_UID
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReaderConfig::from_toml(
            r#"
            rpc_url = "http://localhost:8545"
            target_uid = "0x0000000000000000000000000000000000000000000000000000000000000001"
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.uid().unwrap(), H256::from_low_u64_be(1));
        assert_eq!(config.registry_address, deployment::EAS_REGISTRY);
    }

    #[test]
    fn test_unknown_toml_type_rejected() {
        assert!(ReaderConfig::from_toml("rpc_url = 5").is_err());
    }

    #[test]
    fn test_address_validation() {
        assert!(parse_address(deployment::BELIEF_STAKE).is_ok());
        assert!(parse_address("4200000000000000000000000000000000000021").is_err());
        assert!(parse_address("0x42").is_err());
        assert!(parse_address("0xzz00000000000000000000000000000000000021").is_err());
        assert!(parse_address("0x420000000000000000000000000000000000002100").is_err());

        let err = parse_address("0x42").unwrap_err();
        assert!(format!("{:#}", err).contains("invalid address 0x42"));
    }

    #[test]
    fn test_bytes32_validation() {
        let bare = deployment::GENESIS_BELIEF_UID.trim_start_matches("0x");
        assert_eq!(
            parse_bytes32(bare).unwrap(),
            parse_bytes32(deployment::GENESIS_BELIEF_UID).unwrap()
        );
        assert!(parse_bytes32("0x1234").is_err());
        assert!(parse_bytes32("0xnothex").is_err());
    }

    #[test]
    fn test_validate_reports_bad_field() {
        let config = ReaderConfig {
            stake_address: "0x1".into(),
            ..ReaderConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("stake_address"));
    }
}
