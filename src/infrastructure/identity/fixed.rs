use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::IdentityProvider;

pub struct FixedIdentity {
    id: String,
}

impl FixedIdentity {
    pub fn new(id: &str) -> FixedIdentity {
        return FixedIdentity { id: id.to_string() };
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    #[allow(clippy::implicit_return)]
    async fn get_id(&self) -> Result<String> {
        if self.id.trim().is_empty() {
            bail!("Device id is empty");
        }

        return Ok(self.id.to_string());
    }
}
