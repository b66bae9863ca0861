use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AnsaError, ConversationState};

/// Payload of a pending human-review interrupt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReviewRequest {
    pub prompt: String,
    pub current_answer: String,
}

impl ReviewRequest {
    pub const PROMPT: &'static str = "Rewrite needed. Provide instructions or type 'approve'.";

    pub fn for_answer(current_answer: impl Into<String>) -> Self {
        Self {
            prompt: Self::PROMPT.to_string(),
            current_answer: current_answer.into(),
        }
    }
}

/// Durable snapshot of a thread's state.
///
/// `pending_review` is `Some` iff the thread is suspended awaiting human
/// input; the marker travels with the snapshot so suspension and state can
/// never be persisted separately.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Checkpoint {
    pub thread_id: String,
    pub state: ConversationState,
    pub pending_review: Option<ReviewRequest>,
    pub created_at: String,
}

impl Checkpoint {
    pub fn new(state: ConversationState, pending_review: Option<ReviewRequest>) -> Self {
        Self {
            thread_id: state.thread_id.clone(),
            state,
            pending_review,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

#[async_trait::async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), AnsaError>;
    /// Latest snapshot for the thread, if any.
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>, AnsaError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointMetadata {
    pub seq: u64,
    pub created_at: String,
}

#[async_trait::async_trait]
pub trait CheckpointHistory: Send + Sync {
    async fn list_checkpoints(&self, thread_id: &str)
        -> Result<Vec<CheckpointMetadata>, AnsaError>;
}

#[derive(Default, Clone)]
pub struct InMemoryCheckpointer {
    inner: Arc<RwLock<HashMap<String, Vec<Checkpoint>>>>,
}

#[async_trait::async_trait]
impl CheckpointStore for InMemoryCheckpointer {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), AnsaError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| AnsaError::Checkpoint("lock".into()))?;
        guard
            .entry(checkpoint.thread_id.clone())
            .or_default()
            .push(checkpoint.clone());
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>, AnsaError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| AnsaError::Checkpoint("lock".into()))?;
        Ok(guard
            .get(thread_id)
            .and_then(|history| history.last().cloned()))
    }
}

#[async_trait::async_trait]
impl CheckpointHistory for InMemoryCheckpointer {
    async fn list_checkpoints(
        &self,
        thread_id: &str,
    ) -> Result<Vec<CheckpointMetadata>, AnsaError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| AnsaError::Checkpoint("lock".into()))?;
        let history = guard.get(thread_id).cloned().unwrap_or_default();
        Ok(history
            .into_iter()
            .enumerate()
            .map(|(index, checkpoint)| CheckpointMetadata {
                seq: index as u64 + 1,
                created_at: checkpoint.created_at,
            })
            .collect())
    }
}
