#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::domain::models::StorageBox;
use crate::domain::models::Token;
use crate::domain::models::TokenInfo;

#[derive(Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: Vec<Token>,
}

/// Purchased credit tokens for this device. Reads once when loaded and
/// writes the full list back after every mutation.
pub struct TokenStore {
    storage: StorageBox,
    tokens: Vec<Token>,
}

impl TokenStore {
    pub async fn load(storage: StorageBox) -> Result<TokenStore> {
        let mut tokens = vec![];
        if let Some(payload) = storage.read().await? {
            match serde_json::from_str::<TokenFile>(&payload) {
                Ok(file) => tokens = file.tokens,
                Err(err) => {
                    // Never overwrite purchased tokens. If the backup fails the
                    // store refuses to load rather than risk the next write.
                    storage.backup().await?;
                    tracing::warn!(error = ?err, "Token file is malformed, backed it up and starting empty");
                }
            }
        }

        tracing::debug!(count = tokens.len(), "Loaded tokens");
        return Ok(TokenStore { storage, tokens });
    }

    /// Persists `tokens` and only then makes them the in-memory state, so a
    /// failed write leaves memory matching disk.
    async fn commit(&mut self, tokens: Vec<Token>) -> Result<()> {
        let file = TokenFile { tokens };
        let payload = serde_json::to_string_pretty(&file)?;
        self.storage.write(&payload).await?;
        self.tokens = file.tokens;

        return Ok(());
    }

    pub fn tokens(&self) -> &[Token] {
        return &self.tokens;
    }

    pub fn get_token(&self, token: &str) -> Option<&Token> {
        return self.tokens.iter().find(|e| return e.token == token);
    }

    /// Returns false when the token string is already stored.
    pub async fn add_token(&mut self, token: Token) -> Result<bool> {
        if self.get_token(&token.token).is_some() {
            return Ok(false);
        }

        let mut tokens = self.tokens.clone();
        tokens.push(token);
        self.commit(tokens).await?;

        return Ok(true);
    }

    /// Returns false for unknown tokens.
    pub async fn update_token_usage(&mut self, token: &str, remaining: u32) -> Result<bool> {
        let mut tokens = self.tokens.clone();
        let Some(entry) = tokens.iter_mut().find(|e| return e.token == token) else {
            return Ok(false);
        };

        entry.remaining_generations = remaining;
        self.commit(tokens).await?;

        return Ok(true);
    }

    /// The active token expiring soonest. Ties keep insertion order and
    /// tokens without a readable expiry sort last.
    pub fn get_active_token(&self, now: DateTime<Utc>) -> Option<&Token> {
        let mut active = self
            .tokens
            .iter()
            .filter(|e| return e.is_active(now))
            .collect::<Vec<&Token>>();

        // Stable sort, so equal keys stay in insertion order.
        active.sort_by_key(|e| return (e.expires_at().is_none(), e.expires_at()));

        return active.first().copied();
    }

    /// Sum of remaining generations across every stored token, expired ones
    /// included.
    pub fn get_total_generations(&self) -> u32 {
        return self
            .tokens
            .iter()
            .map(|e| return e.remaining_generations)
            .sum();
    }

    pub async fn remove_token(&mut self, token: &str) -> Result<bool> {
        let mut tokens = self.tokens.clone();
        tokens.retain(|e| return e.token != token);
        if tokens.len() == self.tokens.len() {
            return Ok(false);
        }

        self.commit(tokens).await?;
        return Ok(true);
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.commit(vec![]).await?;

        return Ok(());
    }

    /// Adds every server token missing locally and returns the added token
    /// strings. Running it twice with the same input adds nothing the second
    /// time.
    pub async fn merge(&mut self, infos: Vec<TokenInfo>) -> Result<Vec<String>> {
        let mut added = vec![];
        let mut tokens = self.tokens.clone();
        for info in infos {
            if tokens.iter().any(|e| return e.token == info.token) {
                continue;
            }

            added.push(info.token.to_string());
            tokens.push(info);
        }

        if !added.is_empty() {
            self.commit(tokens).await?;
        }

        return Ok(added);
    }
}
