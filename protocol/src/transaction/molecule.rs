//! Molecule encoding for the structures that feed the transaction hash.
//!
//! Molecule is CKB's canonical binary format. The wire shapes below mirror
//! the on-chain schema and are serialized with `serde_molecule`:
//!
//! ```text
//! struct : fields packed back to back, fixed size   (#[serde(with = "struct_serde")])
//! fixvec : u32 LE item count, then fixed-size items (Vec<T>)
//! dynvec : u32 LE total size, u32 LE offsets, items (#[serde(with = "dynvec_serde")])
//! table  : same layout as dynvec, one slot per field (plain struct)
//! option : empty for None, the inner encoding for Some
//! ```
//!
//! Every size in the format is a u32. Encodings that would not fit are
//! rejected with [`MoleculeError::TooLarge`] instead of wrapping.

use serde::{de::DeserializeOwned, Serialize};
use serde_molecule::{dynvec_serde, struct_serde};
use thiserror::Error;

use super::types::{CellDep, CellInput, CellOutput, OutPoint, Script, Transaction};
use crate::crypto::hash::ckb_hash;

/// Errors raised while encoding or decoding molecule data.
#[derive(Debug, Error)]
pub enum MoleculeError {
    /// The value could not be serialized.
    #[error("molecule encoding failed: {0}")]
    Encode(#[source] serde_molecule::Error),

    /// The bytes are not a valid encoding of the expected type.
    #[error("malformed molecule data: {0}")]
    Decode(#[source] serde_molecule::Error),

    /// The bytes decode, but not from their canonical encoding (extra table
    /// fields, trailing bytes).
    #[error("molecule data is not in canonical form")]
    NonCanonical,

    /// The encoding is larger than a u32 size header can describe.
    #[error("encoded size {0} exceeds the 4 GiB molecule limit")]
    TooLarge(usize),
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct MolScript {
    code_hash: [u8; 32],
    hash_type: u8,
    args: Vec<u8>,
}

#[derive(Serialize)]
struct MolOutPoint {
    tx_hash: [u8; 32],
    index: u32,
}

#[derive(Serialize)]
struct MolCellDep {
    #[serde(with = "struct_serde")]
    out_point: MolOutPoint,
    dep_type: u8,
}

#[derive(Serialize)]
struct MolCellInput {
    since: u64,
    #[serde(with = "struct_serde")]
    previous_output: MolOutPoint,
}

#[derive(Serialize)]
struct MolCellOutput {
    capacity: u64,
    lock: MolScript,
    type_: Option<MolScript>,
}

/// `RawTransaction`. Witnesses are not part of it.
#[derive(Serialize)]
struct MolRawTransaction {
    version: u32,
    cell_deps: Vec<MolCellDep>,
    header_deps: Vec<[u8; 32]>,
    inputs: Vec<MolCellInput>,
    #[serde(with = "dynvec_serde")]
    outputs: Vec<MolCellOutput>,
    #[serde(with = "dynvec_serde")]
    outputs_data: Vec<Vec<u8>>,
}

impl From<&Script> for MolScript {
    fn from(script: &Script) -> Self {
        Self {
            code_hash: script.code_hash,
            hash_type: script.hash_type.as_byte(),
            args: script.args.clone(),
        }
    }
}

impl From<&OutPoint> for MolOutPoint {
    fn from(out_point: &OutPoint) -> Self {
        Self {
            tx_hash: out_point.tx_hash,
            index: out_point.index,
        }
    }
}

impl From<&CellDep> for MolCellDep {
    fn from(dep: &CellDep) -> Self {
        Self {
            out_point: MolOutPoint::from(&dep.out_point),
            dep_type: dep.dep_type.as_byte(),
        }
    }
}

impl From<&CellInput> for MolCellInput {
    fn from(input: &CellInput) -> Self {
        Self {
            since: input.since,
            previous_output: MolOutPoint::from(&input.previous_output),
        }
    }
}

impl From<&CellOutput> for MolCellOutput {
    fn from(output: &CellOutput) -> Self {
        Self {
            capacity: output.capacity,
            lock: MolScript::from(&output.lock),
            type_: output.type_.as_ref().map(MolScript::from),
        }
    }
}

impl From<&Transaction> for MolRawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            version: tx.version,
            cell_deps: tx.cell_deps.iter().map(MolCellDep::from).collect(),
            header_deps: tx.header_deps.clone(),
            inputs: tx.inputs.iter().map(MolCellInput::from).collect(),
            outputs: tx.outputs.iter().map(MolCellOutput::from).collect(),
            outputs_data: tx.outputs_data.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding and decoding
// ---------------------------------------------------------------------------

fn check_size(len: usize) -> Result<(), MoleculeError> {
    u32::try_from(len)
        .map(|_| ())
        .map_err(|_| MoleculeError::TooLarge(len))
}

/// Serializes `value` as a molecule table.
///
/// Every nested size is bounded by the outer one, so checking the total is
/// enough to rule out a wrapped header anywhere inside.
pub(crate) fn encode_table<T: Serialize>(value: &T) -> Result<Vec<u8>, MoleculeError> {
    let bytes = serde_molecule::to_vec(value, false).map_err(MoleculeError::Encode)?;
    check_size(bytes.len())?;
    Ok(bytes)
}

/// Deserializes a molecule table, accepting only its canonical encoding.
pub(crate) fn decode_table<T>(data: &[u8]) -> Result<T, MoleculeError>
where
    T: Serialize + DeserializeOwned,
{
    let value: T = serde_molecule::from_slice(data, false).map_err(MoleculeError::Decode)?;
    if encode_table(&value)? != data {
        return Err(MoleculeError::NonCanonical);
    }
    Ok(value)
}

/// Molecule bytes of a `Script` table.
pub fn encode_script(script: &Script) -> Result<Vec<u8>, MoleculeError> {
    encode_table(&MolScript::from(script))
}

/// Molecule bytes of the `RawTransaction` table of `tx`.
pub fn encode_raw_transaction(tx: &Transaction) -> Result<Vec<u8>, MoleculeError> {
    encode_table(&MolRawTransaction::from(tx))
}

/// Script hash: `ckb_hash` of the encoded script.
pub fn script_hash(script: &Script) -> Result<[u8; 32], MoleculeError> {
    Ok(ckb_hash(&encode_script(script)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::{DepType, HashType};

    fn script() -> Script {
        Script {
            code_hash: [0xab; 32],
            hash_type: HashType::Type,
            args: vec![0x01, 0x02, 0x03],
        }
    }

    #[test]
    fn script_layout() {
        let packed = encode_script(&script()).unwrap();
        // header (16) + code_hash (32) + hash_type (1) + args (4 + 3)
        assert_eq!(packed.len(), 56);
        assert_eq!(&packed[0..4], &56u32.to_le_bytes());
        assert_eq!(&packed[4..8], &16u32.to_le_bytes());
        assert_eq!(&packed[8..12], &48u32.to_le_bytes());
        assert_eq!(&packed[12..16], &49u32.to_le_bytes());
        assert_eq!(packed[48], 1);
        assert_eq!(&packed[49..53], &3u32.to_le_bytes());
    }

    #[test]
    fn fixed_struct_layouts() {
        let out_point = OutPoint {
            tx_hash: [1u8; 32],
            index: 0x0102_0304,
        };

        let dep = CellDep {
            out_point,
            dep_type: DepType::DepGroup,
        };
        let packed = serde_molecule::to_vec(&MolCellDep::from(&dep), true).unwrap();
        assert_eq!(packed.len(), 37);
        assert_eq!(&packed[32..36], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(packed[36], 1);

        let input = CellInput {
            previous_output: out_point,
            since: 5,
        };
        let packed = serde_molecule::to_vec(&MolCellInput::from(&input), true).unwrap();
        assert_eq!(packed.len(), 44);
        assert_eq!(&packed[..8], &5u64.to_le_bytes());
        assert_eq!(&packed[8..40], &[1u8; 32]);
    }

    #[test]
    fn empty_raw_transaction_layout() {
        let packed = encode_raw_transaction(&Transaction::default()).unwrap();
        // header (28) + version (4) + 3 empty fixvecs (12) + 2 empty dynvecs (8)
        assert_eq!(packed.len(), 52);
        assert_eq!(&packed[..4], &52u32.to_le_bytes());
        assert_eq!(&packed[28..32], &[0, 0, 0, 0]);
    }

    #[test]
    fn outputs_and_data_are_dynvecs() {
        let tx = Transaction {
            outputs: vec![CellOutput {
                capacity: 1,
                lock: script(),
                type_: None,
            }],
            outputs_data: vec![vec![0xee]],
            ..Transaction::default()
        };
        let packed = encode_raw_transaction(&tx).unwrap();

        // outputs_data is the last field: dynvec of one `Bytes` item.
        let data_field = &packed[packed.len() - 13..];
        assert_eq!(&data_field[..4], &13u32.to_le_bytes());
        assert_eq!(&data_field[4..8], &8u32.to_le_bytes());
        assert_eq!(&data_field[8..], &[1, 0, 0, 0, 0xee]);
    }

    #[test]
    fn default_script_hash_matches_ckb_types() {
        let empty = Script {
            code_hash: [0u8; 32],
            hash_type: HashType::Data,
            args: vec![],
        };
        assert_eq!(
            hex::encode(script_hash(&empty).unwrap()),
            "77c93b0632b5b6c3ef922c5b7cea208fb0a7c427a13d50e13d3fefad17e0c590"
        );

        let one_arg = Script {
            args: vec![1],
            ..empty
        };
        assert_eq!(
            hex::encode(script_hash(&one_arg).unwrap()),
            "67951b34bce20cb71b7e235c1f8cda259628d99d94825bffe549c23b4dd2930f"
        );
    }

    #[test]
    fn script_hash_depends_on_every_field() {
        let base = script_hash(&script()).unwrap();

        let mut s = script();
        s.args.push(0);
        assert_ne!(script_hash(&s).unwrap(), base);

        let mut s = script();
        s.hash_type = HashType::Data1;
        assert_ne!(script_hash(&s).unwrap(), base);

        let mut s = script();
        s.code_hash[0] ^= 1;
        assert_ne!(script_hash(&s).unwrap(), base);
    }

    #[test]
    fn sizes_past_u32_are_rejected() {
        assert!(check_size(u32::MAX as usize).is_ok());
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            check_size(u32::MAX as usize + 1),
            Err(MoleculeError::TooLarge(len)) if len == 1 << 32
        ));
    }
}
