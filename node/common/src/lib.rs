//! Shared pieces of the OnRecord belief reader: contract bindings, payload
//! decoding, configuration and the read-and-decode flow itself.

pub mod abi;
pub mod config;
pub mod contracts;
pub mod error;
pub mod mock;
pub mod reader;
pub mod types;
pub mod view;

pub use config::ReaderConfig;
pub use contracts::{ContractReader, RpcReader};
pub use error::{FetchError, FetchResult};
pub use reader::BeliefReader;
pub use types::{Attestation, BeliefView};
