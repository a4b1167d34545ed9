//! # CLI Interface
//!
//! Defines the command-line argument structure for `cellseal` using `clap`
//! derive. Supports five subcommands: `entries`, `sign`, `tx-hash`, `args`
//! and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Lock-group signing for CKB transactions.
///
/// Reads an unsigned transaction skeleton as JSON, computes the signing
/// message of every secp256k1-blake160 lock group, signs and seals the
/// witnesses.
#[derive(Parser, Debug)]
#[command(
    name = "cellseal",
    about = "Lock-group signing for CKB transactions",
    version,
    propagate_version = true
)]
pub struct CellsealCli {
    /// Predefined network whose script deployments to use.
    #[arg(long, global = true, env = "CELLSEAL_NETWORK", value_enum, default_value_t = Network::Testnet)]
    pub network: Network,

    /// JSON file with custom script deployments. Overrides `--network`.
    #[arg(long, short = 'c', global = true, env = "CELLSEAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the signing entries of a skeleton as JSON.
    Entries(SkeletonArgs),
    /// Sign every matching lock group and print the sealed transaction.
    Sign(SignArgs),
    /// Print the hash of a skeleton's transaction.
    TxHash(SkeletonArgs),
    /// Print the lock args (blake160 of the public key) of a private key.
    Args(KeyArgs),
    /// Print version information and exit.
    Version,
}

/// Predefined networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    /// LINA.
    Mainnet,
    /// AGGRON4.
    Testnet,
}

impl Network {
    pub fn name(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

/// Where to read the skeleton from.
#[derive(Args, Debug)]
pub struct SkeletonArgs {
    /// Skeleton JSON file, or `-` for stdin.
    #[arg(long, short = 's', default_value = "-")]
    pub skeleton: PathBuf,
}

/// A private key.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex-encoded secp256k1 private key.
    ///
    /// Prefer the environment variable; command-line arguments end up in
    /// shell history and process listings.
    #[arg(long, env = "CELLSEAL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub skeleton: SkeletonArgs,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Write the sealed transaction here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        CellsealCli::command().debug_assert();
    }

    #[test]
    fn parses_sign_with_globals() {
        let cli = CellsealCli::try_parse_from([
            "cellseal",
            "sign",
            "--skeleton",
            "tx.json",
            "--private-key",
            "0x01",
            "--network",
            "mainnet",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.network, Network::Mainnet);
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Sign(args) => {
                assert_eq!(args.skeleton.skeleton, PathBuf::from("tx.json"));
                assert_eq!(args.key.private_key, "0x01");
                assert!(args.output.is_none());
            }
            other => panic!("expected sign, got {other:?}"),
        }
    }

    #[test]
    fn skeleton_defaults_to_stdin() {
        let cli = CellsealCli::try_parse_from(["cellseal", "tx-hash"]).unwrap();
        match cli.command {
            Commands::TxHash(args) => assert_eq!(args.skeleton, PathBuf::from("-")),
            other => panic!("expected tx-hash, got {other:?}"),
        }
    }
}
