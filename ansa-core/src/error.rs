use thiserror::Error;

/// Failure taxonomy shared by every provider contract.
///
/// Answer-source and evaluation failures are soft: the workflow degrades
/// (empty candidate, score forced to zero) instead of aborting the turn.
/// Checkpoint and memory failures are surfaced to the caller.
#[derive(Debug, Error)]
pub enum AnsaError {
    #[error("answer source failed: {0}")]
    AnswerSource(String),
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    #[error("rewrite failed: {0}")]
    Rewrite(String),
    #[error("memory store failed: {0}")]
    Memory(String),
    #[error("checkpoint failed: {0}")]
    Checkpoint(String),
    #[error("serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Custom(String),
}
