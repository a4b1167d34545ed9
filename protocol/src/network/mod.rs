//! # Network Module
//!
//! The chain-facing side of signing. The crate never talks to a node itself:
//! RPC clients are supplied by the caller through the
//! [`TransactionStatusSource`] trait, and this module only decides how long
//! and how often to ask them.
//!
//! ## Design Decisions
//!
//! - Waiting for a commit is bounded in attempts, per-request time and total
//!   time. An unreachable node ends the wait with an error instead of
//!   hanging the caller.
//! - Request failures are logged and retried on the normal schedule. There
//!   is no separate retry policy for individual calls.

pub mod confirmation;

pub use confirmation::{
    wait_for_commit, CommitOutcome, ConfirmationError, PollPolicy, SourceError,
    TransactionStatusSource, TxStatus,
};
