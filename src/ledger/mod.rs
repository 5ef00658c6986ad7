//! Version-control ledger for the content root.
//!
//! Every mutation is followed by a snapshot of the whole content root
//! into a revision with a human-readable message. The ledger is
//! best-effort auditing, not a transactional guarantee: a failed
//! snapshot is logged and swallowed, and must never unwind the data
//! mutation that preceded it.

pub mod git;

use async_trait::async_trait;

// Re-export the git-backed ledger
pub use git::GitLedger;

/// Trait for version-control ledgers.
///
/// The contract is deliberately narrow: `commit` reports success or
/// failure and never returns an error, so an orchestrator's success
/// path cannot come to depend on it.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Human-readable ledger name
    fn name(&self) -> &str;

    /// Snapshot all changes under the content root as a new revision.
    ///
    /// Returns whether a revision was recorded. Failures (nothing to
    /// commit, publish rejection, tool unavailable) are logged by the
    /// implementation and surface only as `false`.
    async fn commit(&self, message: &str) -> bool;
}

/// Ledger that records nothing; stands in for the real ledger in tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLedger;

#[async_trait]
impl Ledger for NoopLedger {
    fn name(&self) -> &str {
        "noop"
    }

    async fn commit(&self, _message: &str) -> bool {
        true
    }
}
