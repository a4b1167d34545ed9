//! Error types for signing-entry generation, signing and sealing.
//!
//! Nothing in the signing path recovers from an error. A wrong digest signs
//! away funds, so every failure goes straight back to the caller.

use thiserror::Error;

use crate::transaction::molecule::MoleculeError;

/// Errors produced by a [`Signer`](super::Signer).
#[derive(Debug, Error)]
pub enum SignerError {
    /// The injected key material is unusable.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// The message is not a 32-byte digest.
    #[error("invalid message: expected 32 bytes, got {0}")]
    InvalidMessage(usize),

    /// The backend refused or could not process the message.
    #[error("signer backend error: {0}")]
    Backend(String),

    /// The backend (device, remote service) did not answer in time.
    #[error("signer timed out")]
    Timeout,
}

/// Errors raised while generating signing entries or sealing a transaction.
#[derive(Debug, Error)]
pub enum SigningError {
    /// An input that needs a signature has no witness slot.
    #[error("missing witness for input {index} (transaction has {witnesses} witnesses)")]
    MissingWitness {
        /// Input index that needed the witness.
        index: usize,
        /// Number of witnesses in the skeleton.
        witnesses: usize,
    },

    /// A matched input's lock does not have the shape the scheme requires.
    #[error("unsupported lock shape at input {index}: {reason}")]
    UnsupportedConditionShape {
        /// Input index of the offending lock.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The signer failed for the entry whose representative input is `index`.
    #[error("signer failed for input {index}: {source}")]
    SignerFailure {
        /// Representative input index of the entry.
        index: usize,
        #[source]
        source: SignerError,
    },

    /// Signatures and entries disagree, or a witness no longer looks like the
    /// one the message was computed over.
    #[error("seal mismatch: {0}")]
    SealMismatch(String),

    /// The transaction or a script could not be molecule-encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] MoleculeError),

    /// A witness length that does not fit the 64-bit length prefix.
    #[error("witness length {0} does not fit in 64 bits")]
    LengthOverflow(usize),

    /// A witness that had to be decoded as `WitnessArgs` is malformed.
    #[error("invalid witness at index {index}: {source}")]
    InvalidWitness {
        /// Witness index.
        index: usize,
        #[source]
        source: MoleculeError,
    },
}
