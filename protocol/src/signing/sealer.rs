//! Writes signatures into their witness slots.
//!
//! Sealing is all-or-nothing. Every replacement witness is computed against
//! the untouched skeleton first; the skeleton's witnesses are only swapped
//! once every entry has produced one.

use tracing::{debug, info};

use super::entries::SigningEntry;
use super::error::SigningError;
use crate::crypto::keys::Signature;
use crate::transaction::types::{Transaction, TransactionSkeleton};
use crate::transaction::witness::WitnessArgs;

/// Seals `skeleton` with one signature per entry and returns the on-chain
/// transaction.
///
/// For each entry the witness at `entry.index` is decoded as `WitnessArgs`
/// and the signature overwrites `lock[offset..offset + length]`. The
/// `input_type` and `output_type` fields are carried over unchanged.
/// Signatures are not verified here.
///
/// # Errors
///
/// - [`SigningError::SealMismatch`] if the counts differ, a witness changed
///   since its entry was generated, or the signature range does not fit the
///   lock field.
/// - [`SigningError::InvalidWitness`] if a witness is not a `WitnessArgs`.
/// - [`SigningError::Encoding`] if the transaction cannot be encoded.
/// - [`SigningError::MissingWitness`] if an entry points past the witnesses.
///
/// On error the skeleton is dropped without any witness modified.
pub fn seal(
    mut skeleton: TransactionSkeleton,
    entries: &[SigningEntry],
    signatures: &[Signature],
) -> Result<Transaction, SigningError> {
    if entries.len() != signatures.len() {
        return Err(SigningError::SealMismatch(format!(
            "{} entries but {} signatures",
            entries.len(),
            signatures.len()
        )));
    }

    let replacements = entries
        .iter()
        .zip(signatures)
        .map(|(entry, signature)| {
            sealed_witness(&skeleton, entry, signature).map(|witness| (entry.index, witness))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (index, witness) in replacements {
        debug!(index, len = witness.len(), "witness sealed");
        skeleton.witnesses[index] = witness;
    }

    let tx = skeleton.to_transaction();
    let tx_hash = tx.hash_hex()?;
    info!(
        tx_hash = %tx_hash,
        signatures = signatures.len(),
        "transaction sealed"
    );
    Ok(tx)
}

fn sealed_witness(
    skeleton: &TransactionSkeleton,
    entry: &SigningEntry,
    signature: &Signature,
) -> Result<Vec<u8>, SigningError> {
    let index = entry.index;
    let current = skeleton
        .witnesses
        .get(index)
        .ok_or(SigningError::MissingWitness {
            index,
            witnesses: skeleton.witnesses.len(),
        })?;

    if *current != entry.witness_base {
        return Err(SigningError::SealMismatch(format!(
            "witness {} differs from the one its message was computed over",
            index
        )));
    }
    if entry.signature_length != signature.as_bytes().len() {
        return Err(SigningError::SealMismatch(format!(
            "entry {} expects a {}-byte signature",
            index, entry.signature_length
        )));
    }

    let mut args = WitnessArgs::from_bytes(current)
        .map_err(|source| SigningError::InvalidWitness { index, source })?;

    let start = entry.signature_offset;
    let end = start
        .checked_add(entry.signature_length)
        .ok_or_else(|| {
            SigningError::SealMismatch(format!(
                "signature range of entry {} overflows: offset {}, length {}",
                index, start, entry.signature_length
            ))
        })?;
    let lock = args.lock.get_or_insert_with(Vec::new);
    if lock.len() < end {
        return Err(SigningError::SealMismatch(format!(
            "lock field of witness {} is {} bytes, signature needs {}..{}",
            index,
            lock.len(),
            start,
            end
        )));
    }
    lock[start..end].copy_from_slice(signature.as_bytes());

    args.to_bytes()
        .map_err(|source| SigningError::InvalidWitness { index, source })
}
