use std::sync::Mutex;

use chrono::Utc;

use ansa_core::AnsaError;

/// Issues strictly increasing, timestamp-derived entry keys. Zero-padded so
/// lexicographic order matches issue order, and clamped so a clock step
/// backwards cannot produce an out-of-order key.
pub(crate) struct KeySequence {
    last: Mutex<u64>,
}

impl KeySequence {
    pub(crate) fn new() -> Self {
        Self {
            last: Mutex::new(0),
        }
    }

    pub(crate) fn next(&self) -> Result<String, AnsaError> {
        let now = Utc::now().timestamp_micros().max(0) as u64;
        let mut last = self
            .last
            .lock()
            .map_err(|_| AnsaError::Memory("key sequence lock poisoned".into()))?;
        *last = now.max(*last + 1);
        Ok(format!("{:020}", *last))
    }
}
