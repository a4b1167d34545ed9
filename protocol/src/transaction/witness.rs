//! Witness encoding: the length prefix used when folding witnesses into a
//! signing message, and the `WitnessArgs` table that carries signatures.
//!
//! The prefix is a 64-bit little-endian length. It is assembled from two
//! 32-bit halves, low word first, matching what the lock script re-derives
//! on chain. A length that does not fit in 64 bits is rejected, never
//! wrapped.

use serde::{Deserialize, Serialize};

use super::molecule::{decode_table, encode_table, MoleculeError};
use crate::config::WITNESS_LENGTH_PREFIX_SIZE;
use crate::crypto::hash::CkbHasher;
use crate::signing::SigningError;

/// Encodes `len` as an 8-byte little-endian prefix.
///
/// # Errors
///
/// [`SigningError::LengthOverflow`] if `len` needs more than 64 bits. Only
/// reachable on targets where `usize` is wider than `u64`.
pub fn encode_length_prefix(len: usize) -> Result<[u8; WITNESS_LENGTH_PREFIX_SIZE], SigningError> {
    let len = u64::try_from(len).map_err(|_| SigningError::LengthOverflow(len))?;
    let low = (len & 0xffff_ffff) as u32;
    let high = (len >> 32) as u32;

    let mut prefix = [0u8; WITNESS_LENGTH_PREFIX_SIZE];
    prefix[..4].copy_from_slice(&low.to_le_bytes());
    prefix[4..].copy_from_slice(&high.to_le_bytes());
    Ok(prefix)
}

/// Reads back a prefix written by [`encode_length_prefix`].
pub fn decode_length_prefix(prefix: &[u8; WITNESS_LENGTH_PREFIX_SIZE]) -> u64 {
    let mut low = [0u8; 4];
    let mut high = [0u8; 4];
    low.copy_from_slice(&prefix[..4]);
    high.copy_from_slice(&prefix[4..]);
    (u64::from(u32::from_le_bytes(high)) << 32) | u64::from(u32::from_le_bytes(low))
}

/// Feeds `length_prefix(witness) || witness` into `hasher`.
pub fn hash_witness(hasher: &mut CkbHasher, witness: &[u8]) -> Result<(), SigningError> {
    let prefix = encode_length_prefix(witness.len())?;
    hasher.update(&prefix);
    hasher.update(witness);
    Ok(())
}

// ---------------------------------------------------------------------------
// WitnessArgs
// ---------------------------------------------------------------------------

/// The `WitnessArgs` table: `{ lock, input_type, output_type }`, each an
/// optional byte string. The serde derive doubles as the molecule layout.
///
/// Lock scripts read their proof from `lock`; type scripts use the other two
/// fields. Sealing only ever touches `lock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessArgs {
    pub lock: Option<Vec<u8>>,
    pub input_type: Option<Vec<u8>>,
    pub output_type: Option<Vec<u8>>,
}

impl WitnessArgs {
    /// A placeholder whose lock is `len` zero bytes. This is what a skeleton
    /// carries before signing so the signed and unsigned witnesses have the
    /// same length.
    pub fn placeholder(len: usize) -> Self {
        Self {
            lock: Some(vec![0u8; len]),
            ..Self::default()
        }
    }

    /// Molecule-encodes the table.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MoleculeError> {
        encode_table(self)
    }

    /// Decodes a molecule-encoded `WitnessArgs`.
    ///
    /// Only the canonical three-field encoding is accepted.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MoleculeError> {
        decode_table(data)
    }
}
