//! The signing backend seam.
//!
//! Entry generation and sealing are pure. Producing the signature itself is
//! the only step that may need to leave the process (hardware wallet, remote
//! service), so it sits behind an async trait and key material is injected,
//! never built in.

use async_trait::async_trait;
use std::fmt;
use tracing::debug;

use super::entries::SigningEntry;
use super::error::{SignerError, SigningError};
use crate::crypto::keys::{CkbKeypair, Signature};

/// Produces a 65-byte recoverable secp256k1 signature over a 32-byte digest.
///
/// The digest is signed as-is; implementations must not hash it again.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, message: &[u8; 32]) -> Result<Signature, SignerError>;
}

/// In-process signer backed by a caller-supplied private key.
#[derive(Clone)]
pub struct PrivateKeySigner {
    keypair: CkbKeypair,
}

impl PrivateKeySigner {
    pub fn new(keypair: CkbKeypair) -> Self {
        Self { keypair }
    }

    /// Parses a 32-byte hex key, with or without `0x`.
    pub fn from_hex(secret_key_hex: &str) -> Result<Self, SignerError> {
        CkbKeypair::from_hex(secret_key_hex)
            .map(Self::new)
            .map_err(|_| SignerError::InvalidSecretKey)
    }

    /// Lock args (`blake160(pubkey)`) of the key this signer holds.
    pub fn lock_args(&self) -> [u8; 20] {
        self.keypair.lock_args()
    }

    pub fn keypair(&self) -> &CkbKeypair {
        &self.keypair
    }
}

impl fmt::Debug for PrivateKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeySigner")
            .field("lock_args", &hex::encode(self.lock_args()))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for PrivateKeySigner {
    async fn sign(&self, message: &[u8; 32]) -> Result<Signature, SignerError> {
        Ok(self.keypair.sign_recoverable(message))
    }
}

/// Signs every entry's message in order.
///
/// Returns one signature per entry, in entry order. Stops at the first
/// failure.
pub async fn sign_entries(
    signer: &dyn Signer,
    entries: &[SigningEntry],
) -> Result<Vec<Signature>, SigningError> {
    let mut signatures = Vec::with_capacity(entries.len());
    for entry in entries {
        let signature = signer
            .sign(&entry.message)
            .await
            .map_err(|source| SigningError::SignerFailure {
                index: entry.index,
                source,
            })?;
        debug!(index = entry.index, recovery_id = signature.recovery_id(), "entry signed");
        signatures.push(signature);
    }
    Ok(signatures)
}
