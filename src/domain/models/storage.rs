use anyhow::Result;
use async_trait::async_trait;

pub type StorageBox = Box<dyn Storage + Send + Sync>;

/// A single named client-local entry that survives restarts.
#[async_trait]
pub trait Storage {
    /// Returns the stored payload, or `None` when nothing was written yet.
    async fn read(&self) -> Result<Option<String>>;

    /// Replaces the stored payload.
    async fn write(&self, payload: &str) -> Result<()>;

    /// Copies the current payload aside so a later `write` cannot lose it.
    async fn backup(&self) -> Result<()>;
}
