#[cfg(test)]
#[path = "token_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A purchased bundle of generation credits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub remaining_generations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_generations: Option<u32>,
    #[serde(default)]
    pub expires_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_sku: Option<String>,
}

/// Wire form served by `/api/tokens/*`. It carries the same fields as the
/// locally stored token.
pub type TokenInfo = Token;

impl Token {
    /// Parses `expires_at`, accepting RFC 3339 as well as offset-less ISO
    /// timestamps, which are read as UTC.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.expires_at) {
            return Some(parsed.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.expires_at, "%Y-%m-%dT%H:%M:%S%.f")
        {
            return Some(Utc.from_utc_datetime(&naive));
        }

        return None;
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if let Some(expires_at) = self.expires_at() {
            return expires_at <= now;
        }

        return false;
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        return self.remaining_generations > 0 && !self.is_expired(now);
    }

    /// Shortens long tokens to `first12...last12` for display.
    pub fn truncated(&self) -> String {
        return truncate_token(&self.token);
    }
}

pub fn truncate_token(token: &str) -> String {
    let chars = token.chars().collect::<Vec<char>>();
    if chars.len() <= 24 {
        return token.to_string();
    }

    let head = chars[..12].iter().collect::<String>();
    let tail = chars[chars.len() - 12..].iter().collect::<String>();

    return format!("{head}...{tail}");
}
