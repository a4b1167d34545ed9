//! # Lock-Group Signing
//!
//! Turns an unsigned [`TransactionSkeleton`](crate::transaction::TransactionSkeleton)
//! into a sealed transaction for every input guarded by one signing scheme.
//!
//! ## Pipeline
//!
//! ```text
//! skeleton ──▶ generate_signing_entries ──▶ [SigningEntry] ──▶ sign_entries ──▶ [Signature]
//!     │                                                                          │
//!     └──────────────────────────────▶ seal ◀────────────────────────────────────┘
//!                                        │
//!                                        ▼
//!                                   Transaction
//! ```
//!
//! ## Grouping
//!
//! All inputs with the same lock script share a single signature, stored in
//! the witness of the first such input. The message covers the transaction
//! hash, the witnesses of every input in the group, and every witness past
//! the last input. See [`entries`] for the exact byte layout.
//!
//! Entry generation and sealing are synchronous and pure. Only the
//! [`Signer`] is async.

pub mod entries;
pub mod error;
pub mod sealer;
pub mod script;
pub mod signer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use entries::{
    generate_signing_entries, generate_signing_entries_with_hash, ScriptTemplate, SigningEntry,
};
pub use error::{SignerError, SigningError};
pub use script::Secp256k1Blake160SignableScript;
pub use sealer::seal;
pub use signer::{sign_entries, PrivateKeySigner, Signer};
