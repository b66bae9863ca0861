use thiserror::Error;

use ansa_core::AnsaError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// `resume` was called for a thread that has no checkpoint at all.
    #[error("unknown thread '{0}'")]
    UnknownThread(String),
    /// `resume` was called while no review is pending. Caller error;
    /// persisted state is untouched.
    #[error("no review is pending for thread '{0}'")]
    NoPendingReview(String),
    /// `submit` was called while a review is still pending. The open review
    /// must be resolved through `resume` first.
    #[error("a review is already pending for thread '{0}'")]
    ReviewPending(String),
    /// The rewriter failed during `resume`. The thread stays suspended, so
    /// retrying `resume` is safe.
    #[error("rewrite failed: {0}")]
    Rewrite(#[source] AnsaError),
    #[error("checkpoint store failed: {0}")]
    Checkpoint(#[source] AnsaError),
    #[error("memory store failed: {0}")]
    Memory(#[source] AnsaError),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
