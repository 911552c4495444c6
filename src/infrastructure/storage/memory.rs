use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Storage;

/// In-process storage. Clones share the same payload, so a test can keep a
/// handle while the store owns another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    payload: Arc<Mutex<Option<String>>>,
    backup: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn with_payload(payload: &str) -> MemoryStorage {
        return MemoryStorage {
            payload: Arc::new(Mutex::new(Some(payload.to_string()))),
            backup: Arc::default(),
        };
    }

    pub fn payload(&self) -> Option<String> {
        return self
            .payload
            .lock()
            .map(|e| return e.clone())
            .unwrap_or_default();
    }

    pub fn backup_payload(&self) -> Option<String> {
        return self
            .backup
            .lock()
            .map(|e| return e.clone())
            .unwrap_or_default();
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    #[allow(clippy::implicit_return)]
    async fn read(&self) -> Result<Option<String>> {
        let payload = self
            .payload
            .lock()
            .map_err(|_| return anyhow!("Memory storage lock is poisoned"))?;

        return Ok(payload.clone());
    }

    #[allow(clippy::implicit_return)]
    async fn write(&self, payload: &str) -> Result<()> {
        let mut current = self
            .payload
            .lock()
            .map_err(|_| return anyhow!("Memory storage lock is poisoned"))?;
        *current = Some(payload.to_string());

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn backup(&self) -> Result<()> {
        let current = self.read().await?;
        let mut backup = self
            .backup
            .lock()
            .map_err(|_| return anyhow!("Memory storage lock is poisoned"))?;
        *backup = current;

        return Ok(());
    }
}
