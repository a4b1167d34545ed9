//! # Transaction Module
//!
//! Data model and canonical encoding for CKB transactions: everything the
//! signing path needs to turn a skeleton into a transaction hash.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    : Script, CellInput, CellOutput, TransactionSkeleton, Transaction
//! molecule.rs : Molecule wire shapes (serde_molecule) and the size limit
//! digest.rs   : Transaction hash over the witness-free RawTransaction
//! witness.rs  : Witness length prefix and the WitnessArgs table
//! ```
//!
//! ## Design Decisions
//!
//! - The skeleton keeps each input's resolved output next to its out point,
//!   because grouping needs the lock and the on-chain input does not carry it.
//! - Witnesses are plain `Vec<u8>`. Nothing forces them to be `WitnessArgs`
//!   until a signature has to be written into one.

pub mod digest;
pub mod molecule;
pub mod types;
pub mod witness;

pub use digest::{raw_transaction_bytes, tx_hash};
pub use molecule::MoleculeError;
pub use types::{
    CellDep, CellInput, CellOutput, DepType, HashType, OutPoint, OutputCell, ResolvedInput,
    Script, Transaction, TransactionSkeleton,
};
pub use witness::{decode_length_prefix, encode_length_prefix, hash_witness, WitnessArgs};
