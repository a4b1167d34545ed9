//! Transaction hash over the structural fields.
//!
//! `tx_hash = ckb_hash(molecule(RawTransaction))`. Witnesses are excluded,
//! so the hash is stable across signing and every signing message can be
//! seeded with it.

use super::molecule::{encode_raw_transaction, MoleculeError};
use super::types::Transaction;
use crate::crypto::hash::ckb_hash;

/// Canonical bytes of the raw (witness-free) transaction.
pub fn raw_transaction_bytes(tx: &Transaction) -> Result<Vec<u8>, MoleculeError> {
    encode_raw_transaction(tx)
}

/// The transaction hash.
///
/// # Errors
///
/// [`MoleculeError::TooLarge`] if the raw transaction does not fit molecule's
/// u32 size headers.
pub fn tx_hash(tx: &Transaction) -> Result<[u8; 32], MoleculeError> {
    Ok(ckb_hash(&raw_transaction_bytes(tx)?))
}
