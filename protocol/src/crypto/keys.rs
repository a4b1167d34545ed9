//! # Key Management
//!
//! secp256k1 keypairs and 65-byte recoverable signatures, the key material
//! behind the secp256k1-blake160 lock.
//!
//! ## Lock args
//!
//! A lock's args are `blake160(compressed_pubkey)`: the first 20 bytes of
//! the CKB hash of the 33-byte compressed public key. [`CkbKeypair::lock_args`]
//! computes it so callers never have to remember which encoding goes in.
//!
//! ## Recoverable signatures
//!
//! The on-chain lock recovers the public key from the signature and compares
//! its blake160 with the args. The signature therefore carries the recovery
//! id as a 65th byte after the 64-byte compact `r || s`.
//!
//! ## Security considerations
//!
//! - Key bytes are never logged and never appear in `Debug` output.
//! - Key material is always injected by the caller. There are no built-in
//!   keys, not even for tests.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::hash::{blake160, BLAKE160_LENGTH};
use crate::config::{COMPACT_SIGNATURE_LENGTH, SIGNATURE_LENGTH};
use crate::transaction::types::{decode_hex, encode_hex};

/// Errors that can occur during key operations.
///
/// Deliberately terse about the cause; key material never ends up in an
/// error message.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid signature bytes: expected 65 bytes with a recovery id of 0..=3")]
    InvalidSignature,

    #[error("public key recovery failed")]
    RecoveryFailed,
}

// ---------------------------------------------------------------------------
// CkbKeypair
// ---------------------------------------------------------------------------

/// A secp256k1 keypair.
///
/// `CkbKeypair` does not implement `Serialize`. Exporting a secret key should
/// be an explicit call to [`CkbKeypair::secret_key_bytes`], not a side effect
/// of dumping a struct to JSON.
///
/// # Examples
///
/// ```
/// use cellseal_protocol::crypto::keys::CkbKeypair;
///
/// let kp = CkbKeypair::generate();
/// let message = [7u8; 32];
/// let sig = kp.sign_recoverable(&message);
/// assert!(sig.verify(&message, &kp.public_key()));
/// ```
#[derive(Clone)]
pub struct CkbKeypair {
    secret_key: SecretKey,
}

impl CkbKeypair {
    /// Generates a fresh keypair from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut secp256k1::rand::thread_rng());
        Self { secret_key }
    }

    /// Builds a keypair from 32 raw secret key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { secret_key })
    }

    /// Builds a keypair from hex, with or without a `0x` prefix.
    ///
    /// This is how injected configuration (CLI flags, environment variables)
    /// turns into a signer.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = decode_hex(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&bytes)
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(SECP256K1, &self.secret_key)
    }

    /// 33-byte compressed public key.
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key().serialize()
    }

    /// secp256k1-blake160 lock args for this key.
    pub fn lock_args(&self) -> [u8; BLAKE160_LENGTH] {
        lock_args_for(&self.public_key())
    }

    /// Exports the raw secret key. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    /// Signs a 32-byte message digest, returning a recoverable signature.
    ///
    /// Nonces are RFC 6979 deterministic, so the same key and message always
    /// produce the same bytes.
    pub fn sign_recoverable(&self, message: &[u8; 32]) -> Signature {
        let msg = Message::from_digest(*message);
        let sig = SECP256K1.sign_ecdsa_recoverable(&msg, &self.secret_key);
        Signature::from_recoverable(&sig)
    }
}

impl fmt::Debug for CkbKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CkbKeypair(pub={})", encode_hex(&self.public_key_bytes()))
    }
}

impl PartialEq for CkbKeypair {
    /// Compares public keys; secret material is never compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for CkbKeypair {}

/// `blake160(compressed_pubkey)`.
pub fn lock_args_for(public_key: &PublicKey) -> [u8; BLAKE160_LENGTH] {
    blake160(&public_key.serialize())
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 65-byte recoverable secp256k1 signature: `r || s || recovery_id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Wraps raw signature bytes after checking the recovery id.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidSignature)?;
        if arr[COMPACT_SIGNATURE_LENGTH] > 3 {
            return Err(KeyError::InvalidSignature);
        }
        Ok(Self(arr))
    }

    /// Parses `0x`-prefixed hex.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = decode_hex(s).map_err(|_| KeyError::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    fn from_recoverable(sig: &RecoverableSignature) -> Self {
        let (recovery_id, compact) = sig.serialize_compact();
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..COMPACT_SIGNATURE_LENGTH].copy_from_slice(&compact);
        bytes[COMPACT_SIGNATURE_LENGTH] = recovery_id.to_i32() as u8;
        Self(bytes)
    }

    fn to_recoverable(&self) -> Result<RecoverableSignature, KeyError> {
        let recovery_id = RecoveryId::from_i32(i32::from(self.0[COMPACT_SIGNATURE_LENGTH]))
            .map_err(|_| KeyError::InvalidSignature)?;
        RecoverableSignature::from_compact(&self.0[..COMPACT_SIGNATURE_LENGTH], recovery_id)
            .map_err(|_| KeyError::InvalidSignature)
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// The recovery id byte.
    pub fn recovery_id(&self) -> u8 {
        self.0[COMPACT_SIGNATURE_LENGTH]
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Recovers the public key that produced this signature over `message`.
    pub fn recover(&self, message: &[u8; 32]) -> Result<PublicKey, KeyError> {
        let sig = self.to_recoverable()?;
        let msg = Message::from_digest(*message);
        SECP256K1
            .recover_ecdsa(&msg, &sig)
            .map_err(|_| KeyError::RecoveryFailed)
    }

    /// `true` if the signature over `message` recovers to `public_key`.
    pub fn verify(&self, message: &[u8; 32], public_key: &PublicKey) -> bool {
        matches!(self.recover(message), Ok(recovered) if recovered == *public_key)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..10], &hex_str[hex_str.len() - 8..])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
