#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Storage;

/// Stores the payload as a single file, `future-hn-tokens.json` by default.
pub struct FileStorage {
    pub file_path: path::PathBuf,
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        return FileStorage::new(path::PathBuf::from(Config::get(ConfigKey::TokenFile)));
    }
}

impl FileStorage {
    pub fn new(file_path: path::PathBuf) -> FileStorage {
        return FileStorage { file_path };
    }

    fn sibling(&self, extension: &str) -> path::PathBuf {
        let mut file_name = self.file_path.as_os_str().to_os_string();
        file_name.push(extension);
        return path::PathBuf::from(file_name);
    }

    pub fn backup_path(&self) -> path::PathBuf {
        return self.sibling(".bak");
    }
}

#[async_trait]
impl Storage for FileStorage {
    #[allow(clippy::implicit_return)]
    async fn read(&self) -> Result<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        return Ok(Some(payload));
    }

    #[allow(clippy::implicit_return)]
    async fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Written next to the target and renamed, so a crash never leaves a
        // half written token file.
        let tmp_path = self.sibling(".tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&tmp_path, &self.file_path).await?;

        tracing::debug!(path = ?self.file_path, bytes = payload.len(), "Wrote storage file");
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn backup(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        let backup_path = self.backup_path();
        fs::copy(&self.file_path, &backup_path).await?;

        tracing::warn!(path = ?backup_path, "Backed up storage file");
        return Ok(());
    }
}
