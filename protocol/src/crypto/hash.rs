//! # Hashing Utilities
//!
//! CKB hashes everything with one function and we follow suit:
//!
//! - **BLAKE2b-256 personalized with `ckb-default-hash`**: used for
//!   transaction hashes, script hashes, signing messages and the
//!   `blake160` lock args. Anything else is not CKB.
//!
//! ## Incremental vs. one-shot
//!
//! Signing messages are a strict sequential fold over the transaction hash
//! and a run of length-prefixed witnesses, so the workhorse here is the
//! incremental [`CkbHasher`]. [`ckb_hash`] is the one-shot shortcut for
//! callers that already have the whole buffer.
//!
//! ## Chaining
//!
//! When a digest is fed into another hasher it goes in as its 32 raw bytes.
//! Never feed the hex text; that produces a different (and wrong) message.

use blake2b_simd::{Params, State};

use crate::config::{CKB_HASH_PERSONALIZATION, HASH_OUTPUT_LENGTH};

/// Length of a `blake160` digest (the truncated hash used as lock args).
pub const BLAKE160_LENGTH: usize = 20;

/// Incremental CKB hasher.
///
/// `update` appends bytes in call order. `finalize` consumes the hasher, so
/// nothing can be appended after the digest is taken. Clone before
/// finalizing if you need to fork the state.
///
/// # Example
///
/// ```
/// use cellseal_protocol::crypto::hash::{ckb_hash, CkbHasher};
///
/// let mut hasher = CkbHasher::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), ckb_hash(b"hello world"));
/// ```
#[derive(Clone)]
pub struct CkbHasher {
    state: State,
}

impl CkbHasher {
    /// Creates a fresh hasher with the CKB personalization.
    pub fn new() -> Self {
        let state = Params::new()
            .hash_length(HASH_OUTPUT_LENGTH)
            .personal(CKB_HASH_PERSONALIZATION)
            .to_state();
        Self { state }
    }

    /// Appends `data` to the hashed stream.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.state.update(data);
        self
    }

    /// Finalizes the hasher and returns the 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        let hash = self.state.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(hash.as_bytes());
        output
    }

    /// Finalizes and returns the digest as `0x`-prefixed lowercase hex.
    pub fn finalize_hex(self) -> String {
        format!("0x{}", hex::encode(self.finalize()))
    }
}

impl Default for CkbHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CKB hash of `data`.
pub fn ckb_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = CkbHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// First 20 bytes of [`ckb_hash`].
///
/// The secp256k1-blake160 lock uses `blake160(compressed_pubkey)` as its
/// args, so this is how a key turns into an on-chain identity.
pub fn blake160(data: &[u8]) -> [u8; BLAKE160_LENGTH] {
    let hash = ckb_hash(data);
    let mut output = [0u8; BLAKE160_LENGTH];
    output.copy_from_slice(&hash[..BLAKE160_LENGTH]);
    output
}
