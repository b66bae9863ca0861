use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ansa_core::{AnsaError, Checkpoint, CheckpointHistory, CheckpointMetadata, CheckpointStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub seq: u64,
    pub created_at: String,
    pub checkpoint: Checkpoint,
}

/// Durable checkpoint store: one JSONL file per thread, one record appended
/// per save, latest record wins on load. Suspended threads survive process
/// restarts because the pending-review marker is part of the checkpoint.
#[derive(Clone, Debug)]
pub struct FileCheckpointer {
    base_dir: PathBuf,
}

impl FileCheckpointer {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn sanitize_thread_id(thread_id: &str) -> String {
        let mut out = String::with_capacity(thread_id.len());
        for ch in thread_id.chars() {
            match ch {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
                c if c.is_control() => {}
                c => out.push(c),
            }
        }
        let trimmed = out.trim_matches(|c: char| c == '.' || c.is_whitespace() || c == '_');
        if trimmed.is_empty() {
            let mut hasher = DefaultHasher::new();
            thread_id.hash(&mut hasher);
            return format!("thread-{:08x}", hasher.finish());
        }
        trimmed.to_string()
    }

    fn thread_path(&self, thread_id: &str) -> PathBuf {
        let filename = format!("{}.jsonl", Self::sanitize_thread_id(thread_id));
        self.base_dir.join(filename)
    }

    fn read_records(&self, thread_id: &str) -> Result<Vec<CheckpointRecord>, AnsaError> {
        let path = self.thread_path(thread_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path).map_err(|err| AnsaError::Checkpoint(err.to_string()))?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|err| AnsaError::Checkpoint(err.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(
                serde_json::from_str(&line)
                    .map_err(|err| AnsaError::Checkpoint(err.to_string()))?,
            );
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl CheckpointStore for FileCheckpointer {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), AnsaError> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|err| AnsaError::Checkpoint(err.to_string()))?;

        let path = self.thread_path(&checkpoint.thread_id);
        let seq = self
            .read_records(&checkpoint.thread_id)?
            .last()
            .map(|record| record.seq + 1)
            .unwrap_or(1);
        let record = CheckpointRecord {
            seq,
            created_at: checkpoint.created_at.clone(),
            checkpoint: checkpoint.clone(),
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| AnsaError::Checkpoint(err.to_string()))?;
        let line = serde_json::to_string(&record)
            .map_err(|err| AnsaError::Checkpoint(err.to_string()))?;
        file.write_all(format!("{line}\n").as_bytes())
            .map_err(|err| AnsaError::Checkpoint(err.to_string()))?;
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>, AnsaError> {
        Ok(self
            .read_records(thread_id)?
            .pop()
            .map(|record| record.checkpoint))
    }
}

#[async_trait::async_trait]
impl CheckpointHistory for FileCheckpointer {
    async fn list_checkpoints(
        &self,
        thread_id: &str,
    ) -> Result<Vec<CheckpointMetadata>, AnsaError> {
        Ok(self
            .read_records(thread_id)?
            .into_iter()
            .map(|record| CheckpointMetadata {
                seq: record.seq,
                created_at: record.created_at,
            })
            .collect())
    }
}
