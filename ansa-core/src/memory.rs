use serde::{Deserialize, Serialize};

use crate::AnsaError;

/// One approved answer in a user's long-term memory. Immutable once written.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MemoryEntry {
    pub user_id: String,
    /// Strictly increasing per store, so replay preserves insertion order.
    pub key: String,
    pub text: String,
    pub created_at: String,
}

/// Append-only per-user memory of approved answers.
///
/// `read` returns the plain concatenation of all entries, oldest first, with
/// no filtering or relevance ranking.
#[async_trait::async_trait]
pub trait MemoryStore: Send + Sync {
    async fn append(&self, user_id: &str, text: &str) -> Result<(), AnsaError>;
    async fn read(&self, user_id: &str) -> Result<String, AnsaError>;
}
