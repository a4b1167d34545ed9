//! # Protocol Configuration & Constants
//!
//! Every magic number the signing protocol depends on lives here, next to
//! the predefined script deployments for the public networks. Custom chains
//! (devnets, forks) load a [`NetworkConfig`] from JSON instead.
//!
//! The byte-level constants are consensus-critical. Change one and every
//! signature this crate produces stops verifying on chain.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signing::ScriptTemplate;
use crate::transaction::types::{DepType, HashType, OutPoint, Script};

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// BLAKE2b personalization used for every CKB hash. Exactly 16 bytes.
pub const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Hash output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// `ckb_hash` of the empty byte string.
pub const BLANK_HASH: [u8; 32] = [
    0x44, 0xf4, 0xc6, 0x97, 0x44, 0xd5, 0xf8, 0xc5, 0x5d, 0x64, 0x20, 0x62, 0x94, 0x9d, 0xca, 0xe4,
    0x9b, 0xc4, 0xe7, 0xef, 0x43, 0xd3, 0x88, 0xc5, 0xa1, 0x2f, 0x42, 0xb5, 0x63, 0x3d, 0x16, 0x3e,
];

// ---------------------------------------------------------------------------
// Witness / Signature Layout
// ---------------------------------------------------------------------------

/// Width of the little-endian length prefix written before each witness
/// when it is folded into a signing message.
pub const WITNESS_LENGTH_PREFIX_SIZE: usize = 8;

/// Recoverable secp256k1 signature: 64-byte compact form + 1 recovery byte.
pub const SIGNATURE_LENGTH: usize = 65;

/// Compact ECDSA signature length, without the recovery id.
pub const COMPACT_SIGNATURE_LENGTH: usize = 64;

/// Offset of the signature inside the `lock` field of the placeholder
/// witness for the secp256k1-blake160 lock.
pub const SIGNATURE_OFFSET: usize = 0;

/// Args length of the secp256k1-blake160 lock (a `blake160` digest).
pub const SECP256K1_BLAKE160_ARGS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Predefined Deployments
// ---------------------------------------------------------------------------

/// Code hash of the secp256k1-blake160-sighash-all lock. It is a type hash,
/// so it is identical on mainnet and testnet.
pub const SECP256K1_BLAKE160_CODE_HASH: [u8; 32] = [
    0x9b, 0xd7, 0xe0, 0x6f, 0x3e, 0xcf, 0x4b, 0xe0, 0xf2, 0xfc, 0xd2, 0x18, 0x8b, 0x23, 0xf1, 0xb9,
    0xfc, 0xc8, 0x8e, 0x5d, 0x4b, 0x65, 0xa8, 0x63, 0x7b, 0x17, 0x72, 0x3b, 0xbd, 0xa3, 0xcc, 0xe8,
];

/// Dep-group transaction for the secp256k1 lock on mainnet (LINA).
pub const LINA_SECP256K1_DEP_TX_HASH: [u8; 32] = [
    0x71, 0xa7, 0xba, 0x8f, 0xc9, 0x63, 0x49, 0xfe, 0xa0, 0xed, 0x3a, 0x5c, 0x47, 0x99, 0x2e, 0x3b,
    0x40, 0x84, 0xb0, 0x31, 0xa4, 0x22, 0x64, 0xa0, 0x18, 0xe0, 0x07, 0x2e, 0x81, 0x72, 0xe4, 0x6c,
];

/// Dep-group transaction for the secp256k1 lock on testnet (AGGRON4).
pub const AGGRON4_SECP256K1_DEP_TX_HASH: [u8; 32] = [
    0xf8, 0xde, 0x3b, 0xb4, 0x7d, 0x05, 0x5c, 0xdf, 0x46, 0x0d, 0x93, 0xa2, 0xa6, 0xe1, 0xb0, 0x5f,
    0x74, 0x32, 0xf9, 0x77, 0x7c, 0x8c, 0x47, 0x4a, 0xbf, 0x4e, 0xec, 0x1d, 0x4a, 0xee, 0x5d, 0x37,
];

// ---------------------------------------------------------------------------
// Confirmation Polling
// ---------------------------------------------------------------------------

/// Per-request timeout for a transaction status query.
pub const STATUS_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between status queries before backoff is applied.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on the delay between status queries.
pub const STATUS_POLL_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Status queries before giving up.
pub const STATUS_POLL_MAX_ATTEMPTS: u32 = 60;

/// Overall wall-clock budget for waiting on a commit.
pub const STATUS_POLL_DEADLINE: Duration = Duration::from_secs(600);

// ---------------------------------------------------------------------------
// Network Configuration
// ---------------------------------------------------------------------------

/// Errors raised while loading a network configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown network: {0} (expected mainnet or testnet)")]
    UnknownNetwork(String),
}

/// Where a lock script's code lives and how to reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(with = "crate::transaction::types::hex32")]
    pub code_hash: [u8; 32],
    pub hash_type: HashType,
    #[serde(with = "crate::transaction::types::hex32")]
    pub tx_hash: [u8; 32],
    #[serde(with = "crate::transaction::types::hex_u32")]
    pub index: u32,
    pub dep_type: DepType,
}

impl ScriptConfig {
    /// The template the entry generator matches inputs against.
    pub fn template(&self) -> ScriptTemplate {
        ScriptTemplate {
            code_hash: self.code_hash,
            hash_type: self.hash_type,
            args_len: Some(SECP256K1_BLAKE160_ARGS_LENGTH),
        }
    }

    /// Builds a lock script of this code with the given args.
    pub fn lock_script(&self, args: Vec<u8>) -> Script {
        Script {
            code_hash: self.code_hash,
            hash_type: self.hash_type,
            args,
        }
    }

    /// The out point of the cell dep carrying the script code.
    pub fn dep_out_point(&self) -> OutPoint {
        OutPoint {
            tx_hash: self.tx_hash,
            index: self.index,
        }
    }
}

/// Script deployments for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Address prefix of the chain (`ckb`, `ckt`, ...). Informational only.
    pub prefix: String,
    #[serde(rename = "SECP256K1_BLAKE160")]
    pub secp256k1_blake160: ScriptConfig,
}

impl NetworkConfig {
    /// Mainnet (LINA).
    pub fn lina() -> Self {
        Self {
            prefix: "ckb".to_string(),
            secp256k1_blake160: ScriptConfig {
                code_hash: SECP256K1_BLAKE160_CODE_HASH,
                hash_type: HashType::Type,
                tx_hash: LINA_SECP256K1_DEP_TX_HASH,
                index: 0,
                dep_type: DepType::DepGroup,
            },
        }
    }

    /// Testnet (AGGRON4).
    pub fn aggron4() -> Self {
        Self {
            prefix: "ckt".to_string(),
            secp256k1_blake160: ScriptConfig {
                code_hash: SECP256K1_BLAKE160_CODE_HASH,
                hash_type: HashType::Type,
                tx_hash: AGGRON4_SECP256K1_DEP_TX_HASH,
                index: 0,
                dep_type: DepType::DepGroup,
            },
        }
    }

    /// Resolves a predefined network by name.
    pub fn predefined(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "mainnet" | "lina" => Ok(Self::lina()),
            "testnet" | "aggron4" => Ok(Self::aggron4()),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
