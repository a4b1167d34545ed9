//! # Commit Confirmation
//!
//! Waits for a submitted transaction to be committed, asking a
//! [`TransactionStatusSource`] at increasing intervals.
//!
//! Every dimension of the wait is bounded:
//!
//! - each status request is wrapped in `tokio::time::timeout`;
//! - the delay between requests grows by `backoff_factor` up to
//!   `max_interval`;
//! - at most `max_attempts` requests are made;
//! - the whole wait ends at `deadline`.
//!
//! A failed or timed-out request counts as an attempt and is logged, nothing
//! more. The caller cancels the wait by dropping the future.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::{
    STATUS_POLL_DEADLINE, STATUS_POLL_INTERVAL, STATUS_POLL_MAX_ATTEMPTS,
    STATUS_POLL_MAX_INTERVAL, STATUS_REQUEST_TIMEOUT,
};

/// Error type returned by status sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Status source
// ---------------------------------------------------------------------------

/// Chain-side status of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TxStatus {
    /// In the pool, not yet proposed.
    Pending,
    /// Proposed in a block, awaiting commitment.
    Proposed,
    /// Committed in a block.
    Committed,
    /// Dropped or refused by the node.
    Rejected(String),
    /// The node does not know the transaction (yet).
    Unknown,
}

/// Anything that can report a transaction's status, typically an RPC client.
#[async_trait]
pub trait TransactionStatusSource: Send + Sync {
    async fn status(&self, tx_hash: &[u8; 32]) -> Result<TxStatus, SourceError>;
}

// ---------------------------------------------------------------------------
// Policy and outcome
// ---------------------------------------------------------------------------

/// Bounds for [`wait_for_commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Upper bound for a single status request.
    pub request_timeout: Duration,
    /// Delay before the second request.
    pub interval: Duration,
    /// Multiplier applied to the delay after every request. `1` keeps it
    /// constant.
    pub backoff_factor: u32,
    /// The delay never grows past this.
    pub max_interval: Duration,
    /// Maximum number of status requests.
    pub max_attempts: u32,
    /// Total time budget, measured from the first request. A budget too large
    /// to represent as an instant (`Duration::MAX`) means no deadline.
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            request_timeout: STATUS_REQUEST_TIMEOUT,
            interval: STATUS_POLL_INTERVAL,
            backoff_factor: 1,
            max_interval: STATUS_POLL_MAX_INTERVAL,
            max_attempts: STATUS_POLL_MAX_ATTEMPTS,
            deadline: STATUS_POLL_DEADLINE,
        }
    }
}

impl PollPolicy {
    fn next_delay(&self, delay: Duration) -> Duration {
        delay
            .saturating_mul(self.backoff_factor.max(1))
            .min(self.max_interval)
    }
}

/// A successful wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub tx_hash: [u8; 32],
    /// Status requests made, including the one that saw the commit.
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Why a wait ended without a commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    /// The node reported the transaction as rejected.
    #[error("transaction {tx_hash} rejected: {reason}")]
    Rejected { tx_hash: String, reason: String },

    /// `max_attempts` requests were made without seeing a commit.
    #[error("transaction not committed after {attempts} status requests (last status: {last_status:?})")]
    AttemptsExhausted {
        attempts: u32,
        last_status: Option<TxStatus>,
    },

    /// The deadline passed before a commit was seen.
    #[error("transaction not committed within {elapsed:?}")]
    DeadlineExceeded {
        elapsed: Duration,
        last_status: Option<TxStatus>,
    },
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

/// Polls `source` until `tx_hash` is committed or `policy` runs out.
pub async fn wait_for_commit(
    source: &dyn TransactionStatusSource,
    tx_hash: &[u8; 32],
    policy: &PollPolicy,
) -> Result<CommitOutcome, ConfirmationError> {
    let tx_hex = format!("0x{}", hex::encode(tx_hash));
    let max_attempts = policy.max_attempts.max(1);
    let start = Instant::now();
    let deadline = start.checked_add(policy.deadline);
    let time_left = || deadline.map(|d| d.saturating_duration_since(Instant::now()));

    let mut delay = policy.interval;
    let mut attempts = 0u32;
    let mut last_status = None;

    loop {
        let remaining = time_left();
        if remaining.is_some_and(|r| r.is_zero()) {
            warn!(tx_hash = %tx_hex, attempts, "confirmation deadline exceeded");
            return Err(ConfirmationError::DeadlineExceeded {
                elapsed: start.elapsed(),
                last_status,
            });
        }
        let request_timeout = remaining.map_or(policy.request_timeout, |r| {
            policy.request_timeout.min(r)
        });

        attempts += 1;
        match timeout(request_timeout, source.status(tx_hash)).await {
            Ok(Ok(TxStatus::Committed)) => {
                let elapsed = start.elapsed();
                info!(tx_hash = %tx_hex, attempts, ?elapsed, "transaction committed");
                return Ok(CommitOutcome {
                    tx_hash: *tx_hash,
                    attempts,
                    elapsed,
                });
            }
            Ok(Ok(TxStatus::Rejected(reason))) => {
                warn!(tx_hash = %tx_hex, %reason, "transaction rejected");
                return Err(ConfirmationError::Rejected {
                    tx_hash: tx_hex,
                    reason,
                });
            }
            Ok(Ok(status)) => {
                debug!(tx_hash = %tx_hex, attempt = attempts, ?status, "not committed yet");
                last_status = Some(status);
            }
            Ok(Err(e)) => {
                warn!(tx_hash = %tx_hex, attempt = attempts, error = %e, "status request failed");
            }
            Err(_) => {
                warn!(tx_hash = %tx_hex, attempt = attempts, "status request timed out");
            }
        }

        if attempts >= max_attempts {
            warn!(tx_hash = %tx_hex, attempts, "status requests exhausted");
            return Err(ConfirmationError::AttemptsExhausted {
                attempts,
                last_status,
            });
        }

        sleep(time_left().map_or(delay, |r| delay.min(r))).await;
        delay = policy.next_delay(delay);
    }
}
