//! Lock-group signing-entry generation.
//!
//! Inputs guarded by the same lock script are authorized by one signature.
//! For each distinct lock that matches the target scheme, in order of first
//! appearance, the generator builds one message:
//!
//! ```text
//! message = ckb_hash(
//!     tx_hash
//!     || len(w[i]) || w[i]                    representative input i
//!     || len(w[j]) || w[j]  ...               later inputs with the same lock
//!     || len(w[k]) || w[k]  ...               every witness past the inputs
//! )
//! ```
//!
//! `len` is the 8-byte little-endian length prefix. Witnesses past the last
//! input belong to the transaction as a whole and are folded into every
//! group's message, not just one.
//!
//! The walk is a single pass. Seen locks are tracked by script hash in a
//! `HashSet`, and each group owns its own hasher.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::error::SigningError;
use crate::config::{SIGNATURE_LENGTH, SIGNATURE_OFFSET};
use crate::crypto::hash::CkbHasher;
use crate::transaction::types::{hex32, hex_bytes, HashType, Script, TransactionSkeleton};
use crate::transaction::witness::hash_witness;

// ---------------------------------------------------------------------------
// ScriptTemplate
// ---------------------------------------------------------------------------

/// Identifies the signing scheme whose inputs should be processed.
///
/// Only `code_hash` and `hash_type` decide whether an input belongs to the
/// scheme. `args_len`, when set, is a shape check applied to matched locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTemplate {
    #[serde(with = "hex32")]
    pub code_hash: [u8; 32],
    pub hash_type: HashType,
    #[serde(default)]
    pub args_len: Option<usize>,
}

impl ScriptTemplate {
    /// `true` if `script` runs this scheme's code.
    pub fn matches(&self, script: &Script) -> bool {
        script.code_hash == self.code_hash && script.hash_type == self.hash_type
    }

    fn check_shape(&self, index: usize, script: &Script) -> Result<(), SigningError> {
        match self.args_len {
            Some(expected) if script.args.len() != expected => {
                Err(SigningError::UnsupportedConditionShape {
                    index,
                    reason: format!(
                        "expected {} bytes of lock args, found {}",
                        expected,
                        script.args.len()
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// SigningEntry
// ---------------------------------------------------------------------------

/// One message to sign, covering every input locked by `script`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningEntry {
    /// The lock this entry authorizes.
    pub script: Script,
    /// First input index using `script`; its witness receives the signature.
    pub index: usize,
    /// The witness at `index` when the message was computed.
    #[serde(with = "hex_bytes")]
    pub witness_base: Vec<u8>,
    /// Where the signature goes inside the witness's `lock` field.
    pub signature_offset: usize,
    pub signature_length: usize,
    /// The digest to sign.
    #[serde(with = "hex32")]
    pub message: [u8; 32],
}

impl SigningEntry {
    /// The message as `0x`-prefixed hex.
    pub fn message_hex(&self) -> String {
        format!("0x{}", hex::encode(self.message))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Computes the signing entries for every lock in `skeleton` matching
/// `template`, seeding each message with the skeleton's transaction hash.
///
/// Returns an empty list when nothing matches.
///
/// # Errors
///
/// - [`SigningError::MissingWitness`] if a representative input has no
///   witness slot.
/// - [`SigningError::UnsupportedConditionShape`] if a matched lock fails the
///   template's args check.
/// - [`SigningError::Encoding`] if the transaction cannot be encoded.
pub fn generate_signing_entries(
    skeleton: &TransactionSkeleton,
    template: &ScriptTemplate,
) -> Result<Vec<SigningEntry>, SigningError> {
    let tx_hash = skeleton.tx_hash()?;
    generate_signing_entries_with_hash(skeleton, template, &tx_hash)
}

/// Same as [`generate_signing_entries`] with a caller-supplied transaction
/// hash. Useful when the hash is already known or comes from elsewhere.
pub fn generate_signing_entries_with_hash(
    skeleton: &TransactionSkeleton,
    template: &ScriptTemplate,
    tx_hash: &[u8; 32],
) -> Result<Vec<SigningEntry>, SigningError> {
    let inputs = &skeleton.inputs;
    let witnesses = &skeleton.witnesses;
    let lock_hashes = inputs
        .iter()
        .map(|input| input.lock().hash())
        .collect::<Result<Vec<[u8; 32]>, _>>()?;
    let grouped_end = inputs.len().min(witnesses.len());

    let mut processed: HashSet<[u8; 32]> = HashSet::new();
    let mut entries = Vec::new();

    for (i, input) in inputs.iter().enumerate() {
        let lock = input.lock();
        if !template.matches(lock) || processed.contains(&lock_hashes[i]) {
            continue;
        }
        template.check_shape(i, lock)?;
        processed.insert(lock_hashes[i]);

        let witness = witnesses.get(i).ok_or(SigningError::MissingWitness {
            index: i,
            witnesses: witnesses.len(),
        })?;

        let mut hasher = CkbHasher::new();
        hasher.update(tx_hash);
        hash_witness(&mut hasher, witness)?;

        let mut group = vec![i];
        for j in (i + 1)..grouped_end {
            if lock_hashes[j] == lock_hashes[i] {
                hash_witness(&mut hasher, &witnesses[j])?;
                group.push(j);
            }
        }
        for extra in witnesses.iter().skip(inputs.len()) {
            hash_witness(&mut hasher, extra)?;
        }

        let entry = SigningEntry {
            script: lock.clone(),
            index: i,
            witness_base: witness.clone(),
            signature_offset: SIGNATURE_OFFSET,
            signature_length: SIGNATURE_LENGTH,
            message: hasher.finalize(),
        };
        debug!(
            index = i,
            inputs = ?group,
            extra_witnesses = witnesses.len().saturating_sub(inputs.len()),
            message = %entry.message_hex(),
            "signing entry generated"
        );
        entries.push(entry);
    }

    Ok(entries)
}
