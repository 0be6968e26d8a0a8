mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use onrecord_common::{BeliefReader, ReaderConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "onrecord")]
#[command(about = "Read an on-chain belief and how many people staked on it")]
struct Args {
    /// TOML file with reader settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, env = "ONRECORD_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Attestation registry address
    #[arg(long, env = "ONRECORD_REGISTRY", global = true)]
    registry: Option<String>,

    /// Staking contract address
    #[arg(long, env = "ONRECORD_STAKE", global = true)]
    stake: Option<String>,

    /// Attestation uid to display
    #[arg(long, env = "ONRECORD_UID", global = true)]
    uid: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the belief once (default)
    Show,
    /// Serve the belief page over HTTP
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

impl Args {
    /// File (or defaults) first, then flags and environment on top
    fn reader_config(&self) -> Result<ReaderConfig> {
        let mut config = match &self.config {
            Some(path) => ReaderConfig::from_file(path)?,
            None => ReaderConfig::default(),
        };

        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(registry) = &self.registry {
            config.registry_address = registry.clone();
        }
        if let Some(stake) = &self.stake {
            config.stake_address = stake.clone();
        }
        if let Some(uid) = &self.uid {
            config.target_uid = uid.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.reader_config()?;

    info!("RPC: {}", config.rpc_url);
    info!("Registry: {}", config.registry_address);
    info!("Stake: {}", config.stake_address);

    let reader = BeliefReader::from_config(&config)?;
    let uid = config.uid()?;

    match args.command.unwrap_or(Command::Show) {
        Command::Show => match reader.load_belief(uid).await {
            Ok(view) => {
                println!("{}", view);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching belief: {}", e);
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        },
        Command::Serve { port } => server::run(server::AppState { reader, uid }, port).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "onrecord",
            "--rpc-url",
            "http://localhost:8545",
            "--uid",
            "0x0000000000000000000000000000000000000000000000000000000000000007",
            "serve",
            "--port",
            "9000",
        ]);

        let config = args.reader_config().unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert!(config.target_uid.ends_with("07"));
        assert_eq!(config.registry_address, ReaderConfig::default().registry_address);
        assert!(matches!(args.command, Some(Command::Serve { port: 9000 })));
    }

    #[test]
    fn test_bad_override_rejected() {
        let args = Args::parse_from(["onrecord", "--stake", "0xnope"]);
        assert!(args.reader_config().is_err());
    }
}
