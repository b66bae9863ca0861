use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use ansa_core::{AnsaError, MemoryEntry, MemoryStore};

use crate::key::KeySequence;

/// In-process memory store. Entries live in a per-user vector; suitable for
/// tests and single-process deployments.
pub struct BufferMemory {
    entries: RwLock<HashMap<String, Vec<MemoryEntry>>>,
    keys: KeySequence,
}

impl BufferMemory {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            keys: KeySequence::new(),
        }
    }

    /// All entries for a user, insertion order. Handy for inspection in
    /// tests and tooling.
    pub fn entries(&self, user_id: &str) -> Result<Vec<MemoryEntry>, AnsaError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AnsaError::Memory("lock".into()))?;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }
}

impl Default for BufferMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for BufferMemory {
    async fn append(&self, user_id: &str, text: &str) -> Result<(), AnsaError> {
        let entry = MemoryEntry {
            user_id: user_id.to_string(),
            key: self.keys.next()?,
            text: text.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        let mut guard = self
            .entries
            .write()
            .map_err(|_| AnsaError::Memory("lock".into()))?;
        guard.entry(user_id.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn read(&self, user_id: &str) -> Result<String, AnsaError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AnsaError::Memory("lock".into()))?;
        Ok(guard
            .get(user_id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default())
    }
}
