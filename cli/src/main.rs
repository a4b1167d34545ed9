// Copyright (c) 2026 cellseal contributors. MIT License.
// See LICENSE for details.

//! # cellseal
//!
//! Entry point for the `cellseal` binary. Parses CLI arguments, initializes
//! logging, loads the network's script deployments and runs one subcommand.
//!
//! - `entries`: print the signing entries of a skeleton
//! - `sign`   : sign and seal a skeleton, print the transaction
//! - `tx-hash`: print a skeleton's transaction hash
//! - `args`   : derive lock args from a private key
//! - `version`: print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use cellseal_protocol::config::NetworkConfig;
use cellseal_protocol::signing::{PrivateKeySigner, Secp256k1Blake160SignableScript};
use cellseal_protocol::transaction::TransactionSkeleton;

use cli::{CellsealCli, Commands, Network};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CellsealCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Entries(args) => {
            let network = load_network(cli.config.as_deref(), cli.network)?;
            let skeleton = read_skeleton(&args.skeleton)?;
            let entries = cellseal_protocol::signing::generate_signing_entries(
                &skeleton,
                &network.secp256k1_blake160.template(),
            )
            .context("failed to generate signing entries")?;
            print_json(&entries)
        }
        Commands::Sign(args) => {
            let network = load_network(cli.config.as_deref(), cli.network)?;
            let skeleton = read_skeleton(&args.skeleton.skeleton)?;
            let signer = PrivateKeySigner::from_hex(&args.key.private_key)
                .context("failed to load private key")?;
            tracing::info!(lock_args = %hex::encode(signer.lock_args()), "signer loaded");

            let script = Secp256k1Blake160SignableScript::for_network(&network, signer);
            let tx = script
                .sign_skeleton(skeleton)
                .await
                .context("failed to sign transaction")?;

            match args.output {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&tx)?;
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{}", tx.hash_hex()?);
                    Ok(())
                }
                None => print_json(&tx),
            }
        }
        Commands::TxHash(args) => {
            let skeleton = read_skeleton(&args.skeleton)?;
            let tx_hash = skeleton
                .tx_hash()
                .context("failed to encode transaction")?;
            println!("0x{}", hex::encode(tx_hash));
            Ok(())
        }
        Commands::Args(args) => {
            let signer = PrivateKeySigner::from_hex(&args.private_key)
                .context("failed to load private key")?;
            println!("0x{}", hex::encode(signer.lock_args()));
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Resolves script deployments: the config file when given, otherwise the
/// predefined network.
fn load_network(config: Option<&Path>, network: Network) -> Result<NetworkConfig> {
    let network = match config {
        Some(path) => NetworkConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NetworkConfig::predefined(network.name())?,
    };
    tracing::debug!(
        prefix = %network.prefix,
        code_hash = %hex::encode(network.secp256k1_blake160.code_hash),
        "network loaded"
    );
    Ok(network)
}

/// Reads a skeleton from `path`, or from stdin when `path` is `-`.
fn read_skeleton(path: &Path) -> Result<TransactionSkeleton> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read skeleton from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read skeleton {}", path.display()))?
    };
    parse_skeleton(&json)
}

fn parse_skeleton(json: &str) -> Result<TransactionSkeleton> {
    let skeleton: TransactionSkeleton =
        serde_json::from_str(json).context("invalid skeleton JSON")?;
    tracing::debug!(
        inputs = skeleton.inputs.len(),
        outputs = skeleton.outputs.len(),
        witnesses = skeleton.witnesses.len(),
        "skeleton loaded"
    );
    Ok(skeleton)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_version() {
    println!("cellseal {}", env!("CARGO_PKG_VERSION"));
    println!("protocol crate: cellseal-protocol {}", env!("CARGO_PKG_VERSION"));
    println!(
        "hash: blake2b-256 personalization {:?}",
        String::from_utf8_lossy(cellseal_protocol::config::CKB_HASH_PERSONALIZATION)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_skeleton_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"version": "0x0", "witnesses": ["0x"]}}"#).unwrap();

        let skeleton = read_skeleton(file.path()).unwrap();
        assert!(skeleton.inputs.is_empty());
        assert_eq!(skeleton.witnesses, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn read_skeleton_reports_missing_file() {
        let err = read_skeleton(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read skeleton"));
    }

    #[test]
    fn parse_skeleton_rejects_bad_hex() {
        let err = parse_skeleton(r#"{"witnesses": ["0xzz"]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid skeleton JSON"));
    }

    #[test]
    fn custom_config_overrides_network() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut custom = NetworkConfig::aggron4();
        custom.prefix = "dev".into();
        write!(file, "{}", serde_json::to_string(&custom).unwrap()).unwrap();

        let cli = CellsealCli::try_parse_from([
            "cellseal",
            "--config",
            file.path().to_str().unwrap(),
            "version",
        ])
        .unwrap();

        assert_eq!(
            load_network(cli.config.as_deref(), cli.network).unwrap().prefix,
            "dev"
        );
    }

    #[test]
    fn predefined_networks_load() {
        assert_eq!(load_network(None, Network::Mainnet).unwrap().prefix, "ckb");
        assert_eq!(load_network(None, Network::Testnet).unwrap().prefix, "ckt");
    }
}
