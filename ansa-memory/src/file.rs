use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use ansa_core::{AnsaError, MemoryEntry, MemoryStore};

use crate::key::KeySequence;

/// Durable memory store: one JSONL file per user, one entry appended per
/// line. Appends serialize on an internal lock, so concurrent turns writing
/// for the same user never interleave partial lines; reads replay the file
/// in insertion order.
pub struct FileMemory {
    base_dir: PathBuf,
    keys: KeySequence,
    write_lock: Mutex<()>,
}

impl FileMemory {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            keys: KeySequence::new(),
            write_lock: Mutex::new(()),
        }
    }

    fn sanitize_user_id(user_id: &str) -> String {
        let mut out = String::with_capacity(user_id.len());
        for ch in user_id.chars() {
            match ch {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
                c if c.is_control() => {}
                c => out.push(c),
            }
        }
        let trimmed = out.trim_matches(|c: char| c == '.' || c.is_whitespace() || c == '_');
        if trimmed.is_empty() {
            let mut hasher = DefaultHasher::new();
            user_id.hash(&mut hasher);
            return format!("user-{:08x}", hasher.finish());
        }
        trimmed.to_string()
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        let filename = format!("{}.jsonl", Self::sanitize_user_id(user_id));
        self.base_dir.join(filename)
    }

    /// All entries for a user, file order.
    pub fn entries(&self, user_id: &str) -> Result<Vec<MemoryEntry>, AnsaError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path).map_err(|err| AnsaError::Memory(err.to_string()))?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|err| AnsaError::Memory(err.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            entries
                .push(serde_json::from_str(&line).map_err(|err| AnsaError::Memory(err.to_string()))?);
        }
        Ok(entries)
    }
}

#[async_trait]
impl MemoryStore for FileMemory {
    async fn append(&self, user_id: &str, text: &str) -> Result<(), AnsaError> {
        fs::create_dir_all(&self.base_dir).map_err(|err| AnsaError::Memory(err.to_string()))?;

        let entry = MemoryEntry {
            user_id: user_id.to_string(),
            key: self.keys.next()?,
            text: text.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        let line =
            serde_json::to_string(&entry).map_err(|err| AnsaError::Memory(err.to_string()))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AnsaError::Memory("write lock poisoned".into()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.user_path(user_id))
            .map_err(|err| AnsaError::Memory(err.to_string()))?;
        file.write_all(format!("{line}\n").as_bytes())
            .map_err(|err| AnsaError::Memory(err.to_string()))?;
        Ok(())
    }

    async fn read(&self, user_id: &str) -> Result<String, AnsaError> {
        Ok(self
            .entries(user_id)?
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
