// Copyright (c) 2026 cellseal contributors. MIT License.
// See LICENSE for details.

//! # cellseal Core Library
//!
//! Builds the per-lock signing messages of a CKB transaction, signs them with
//! recoverable secp256k1 signatures and seals the signatures into the
//! transaction's witnesses.
//!
//! ## Architecture
//!
//! - **crypto**: The CKB hash (personalized BLAKE2b-256) and secp256k1 keys.
//! - **transaction**: Cell model types, molecule encoding, transaction hash
//!   and witness layout.
//! - **signing**: Lock-group entry generation, the signer seam and sealing.
//! - **network**: Bounded waiting for a transaction to be committed.
//! - **config**: Protocol constants and per-network script deployments.
//!
//! ## Example
//!
//! ```no_run
//! use cellseal_protocol::config::NetworkConfig;
//! use cellseal_protocol::signing::{generate_signing_entries, seal, sign_entries, PrivateKeySigner};
//! use cellseal_protocol::transaction::TransactionSkeleton;
//!
//! # async fn run(skeleton: TransactionSkeleton) -> Result<(), Box<dyn std::error::Error>> {
//! let template = NetworkConfig::aggron4().secp256k1_blake160.template();
//! let signer = PrivateKeySigner::from_hex(&std::env::var("CELLSEAL_PRIVATE_KEY")?)?;
//!
//! let entries = generate_signing_entries(&skeleton, &template)?;
//! let signatures = sign_entries(&signer, &entries).await?;
//! let tx = seal(skeleton, &entries, &signatures)?;
//! println!("{}", tx.hash_hex()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Ground rules
//!
//! 1. Digests are byte-exact. Anything that changes a message is a bug.
//! 2. No key material is built in, logged or printed.
//! 3. Every failure propagates to the caller. Nothing retries silently.

pub mod config;
pub mod crypto;
pub mod network;
pub mod signing;
pub mod transaction;
