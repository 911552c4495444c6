use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub type IdentityBox = Arc<dyn IdentityProvider + Send + Sync>;

#[async_trait]
pub trait IdentityProvider {
    /// Returns a stable identifier for this device. Best effort: it should be
    /// the same across sessions, but it is neither unique nor spoof-proof.
    async fn get_id(&self) -> Result<String>;
}
