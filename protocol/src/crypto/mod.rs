//! # Cryptographic Primitives
//!
//! Two things live here: the CKB hash (BLAKE2b-256 with the
//! `ckb-default-hash` personalization) and secp256k1 key material with
//! recoverable signatures.
//!
//! Everything is a thin, typed wrapper over `blake2b_simd` and
//! `secp256k1`. Nothing here is clever, and it should stay that way.

pub mod hash;
pub mod keys;

pub use hash::{blake160, ckb_hash, CkbHasher};
pub use keys::{lock_args_for, CkbKeypair, KeyError, Signature};
