//! Core type definitions for CKB transactions.
//!
//! These mirror the on-chain structures closely enough that the molecule
//! encoder can serialize them field-for-field. The JSON form follows the
//! node RPC conventions: byte strings and integers are `0x`-prefixed hex,
//! enums are lowercase/snake_case strings.
//!
//! Hex input is decoded case-insensitively, so two scripts written with
//! different hex casing compare equal once parsed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::digest::tx_hash;
use super::molecule::MoleculeError;

// ---------------------------------------------------------------------------
// HashType / DepType
// ---------------------------------------------------------------------------

/// How a script's `code_hash` is matched against cell deps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    /// Match the data hash; run on the original VM version.
    Data,
    /// Match the type script hash of the dep cell.
    Type,
    /// Match the data hash; run on VM version 1.
    Data1,
    /// Match the data hash; run on VM version 2.
    Data2,
}

impl HashType {
    /// The molecule byte for this hash type.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Data => 0,
            Self::Type => 1,
            Self::Data1 => 2,
            Self::Data2 => 4,
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "data"),
            Self::Type => write!(f, "type"),
            Self::Data1 => write!(f, "data1"),
            Self::Data2 => write!(f, "data2"),
        }
    }
}

/// Whether a cell dep points at code directly or at a group of deps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    Code,
    DepGroup,
}

impl DepType {
    /// The molecule byte for this dep type.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Code => 0,
            Self::DepGroup => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// A lock or type script: the spending condition attached to a cell.
///
/// Two scripts are the same condition iff code hash, hash type and args all
/// match. Immutable by convention; nothing in this crate mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script {
    #[serde(with = "hex32")]
    pub code_hash: [u8; 32],
    pub hash_type: HashType,
    #[serde(with = "hex_bytes")]
    pub args: Vec<u8>,
}

impl Script {
    /// `ckb_hash` of the molecule-encoded script.
    pub fn hash(&self) -> Result<[u8; 32], MoleculeError> {
        super::molecule::script_hash(self)
    }
}

// ---------------------------------------------------------------------------
// Cell references
// ---------------------------------------------------------------------------

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    #[serde(with = "hex32")]
    pub tx_hash: [u8; 32],
    #[serde(with = "hex_u32")]
    pub index: u32,
}

/// A cell the transaction reads code or data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellDep {
    pub out_point: OutPoint,
    pub dep_type: DepType,
}

/// A consumed cell as it appears in the on-chain transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellInput {
    pub previous_output: OutPoint,
    #[serde(with = "hex_u64")]
    pub since: u64,
}

/// A cell's capacity and scripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOutput {
    #[serde(with = "hex_u64")]
    pub capacity: u64,
    pub lock: Script,
    #[serde(rename = "type", default)]
    pub type_: Option<Script>,
}

// ---------------------------------------------------------------------------
// Skeleton
// ---------------------------------------------------------------------------

/// A consumed cell together with its resolved output.
///
/// The resolved `cell_output.lock` is what the signing-entry generator
/// groups on; the output data rides along but is not used for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInput {
    pub out_point: OutPoint,
    #[serde(with = "hex_u64", default)]
    pub since: u64,
    pub cell_output: CellOutput,
    #[serde(with = "hex_bytes", default)]
    pub data: Vec<u8>,
}

impl ResolvedInput {
    /// The lock script guarding this input.
    pub fn lock(&self) -> &Script {
        &self.cell_output.lock
    }

    /// The on-chain input form.
    pub fn to_cell_input(&self) -> CellInput {
        CellInput {
            previous_output: self.out_point,
            since: self.since,
        }
    }
}

/// A produced cell with its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCell {
    pub cell_output: CellOutput,
    #[serde(with = "hex_bytes", default)]
    pub data: Vec<u8>,
}

/// A fully assembled, not yet signed transaction.
///
/// Cell selection, change and fees are the assembler's job; by the time a
/// skeleton reaches this crate only the witnesses are still placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSkeleton {
    #[serde(with = "hex_u32", default)]
    pub version: u32,
    #[serde(default)]
    pub cell_deps: Vec<CellDep>,
    #[serde(with = "hex32_vec", default)]
    pub header_deps: Vec<[u8; 32]>,
    #[serde(default)]
    pub inputs: Vec<ResolvedInput>,
    #[serde(default)]
    pub outputs: Vec<OutputCell>,
    #[serde(with = "hex_bytes_vec", default)]
    pub witnesses: Vec<Vec<u8>>,
}

impl TransactionSkeleton {
    /// Flattens the skeleton into the on-chain transaction form.
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            version: self.version,
            cell_deps: self.cell_deps.clone(),
            header_deps: self.header_deps.clone(),
            inputs: self.inputs.iter().map(ResolvedInput::to_cell_input).collect(),
            outputs: self.outputs.iter().map(|o| o.cell_output.clone()).collect(),
            outputs_data: self.outputs.iter().map(|o| o.data.clone()).collect(),
            witnesses: self.witnesses.clone(),
        }
    }

    /// Hash of the structural fields; witnesses excluded.
    pub fn tx_hash(&self) -> Result<[u8; 32], MoleculeError> {
        tx_hash(&self.to_transaction())
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// The on-chain transaction, ready for submission once witnesses are sealed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "hex_u32")]
    pub version: u32,
    pub cell_deps: Vec<CellDep>,
    #[serde(with = "hex32_vec")]
    pub header_deps: Vec<[u8; 32]>,
    pub inputs: Vec<CellInput>,
    pub outputs: Vec<CellOutput>,
    #[serde(with = "hex_bytes_vec")]
    pub outputs_data: Vec<Vec<u8>>,
    #[serde(with = "hex_bytes_vec")]
    pub witnesses: Vec<Vec<u8>>,
}

impl Transaction {
    /// Hash of the structural fields; witnesses excluded.
    pub fn hash(&self) -> Result<[u8; 32], MoleculeError> {
        tx_hash(self)
    }

    /// Transaction hash as `0x`-prefixed hex.
    pub fn hash_hex(&self) -> Result<String, MoleculeError> {
        Ok(format!("0x{}", hex::encode(self.hash()?)))
    }
}

// ---------------------------------------------------------------------------
// Hex serde helpers
// ---------------------------------------------------------------------------

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes a `0x`-prefixed hex byte string, any letter case.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(s))
}

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// `Vec<u8>` as `0x…` hex.
pub mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::encode_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        super::decode_hex(&s).map_err(D::Error::custom)
    }
}

/// `[u8; 32]` as `0x…` hex.
pub mod hex32 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::encode_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = super::decode_hex(&s).map_err(D::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| D::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
    }
}

/// `Vec<[u8; 32]>` as a list of `0x…` hex strings.
pub mod hex32_vec {
    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[[u8; 32]], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&super::encode_hex(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<[u8; 32]>, D::Error> {
        let strings = Vec::<String>::deserialize(d)?;
        strings
            .iter()
            .map(|s| {
                let bytes = super::decode_hex(s).map_err(D::Error::custom)?;
                <[u8; 32]>::try_from(bytes.as_slice())
                    .map_err(|_| D::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
            })
            .collect()
    }
}

/// `Vec<Vec<u8>>` as a list of `0x…` hex strings.
pub mod hex_bytes_vec {
    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&super::encode_hex(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let strings = Vec::<String>::deserialize(d)?;
        strings
            .iter()
            .map(|s| super::decode_hex(s).map_err(D::Error::custom))
            .collect()
    }
}

/// `u32` as `0x…` hex quantity.
pub mod hex_u32 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let s = String::deserialize(d)?;
        u32::from_str_radix(super::strip_hex_prefix(&s), 16).map_err(D::Error::custom)
    }
}

/// `u64` as `0x…` hex quantity.
pub mod hex_u64 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let s = String::deserialize(d)?;
        u64::from_str_radix(super::strip_hex_prefix(&s), 16).map_err(D::Error::custom)
    }
}
