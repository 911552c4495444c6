#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Product;
use super::Story;
use super::StoryDetails;
use super::TokenInfo;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub year: u16,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub year: u16,
    pub stories: Vec<Story>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatus {
    pub has_free_trial: bool,
    #[serde(default)]
    pub uses_remaining: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub product_sku: String,
    pub device_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    #[serde(default)]
    pub session_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTokensResponse {
    pub tokens: Vec<TokenInfo>,
}

/// Raised for any non-2xx response so callers can branch on the status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub endpoint: String,
}

impl ApiError {
    pub fn new(status: u16, endpoint: &str) -> ApiError {
        return ApiError {
            status,
            endpoint: endpoint.to_string(),
        };
    }

    /// Returns the status when `err` wraps an `ApiError`.
    pub fn status_of(err: &anyhow::Error) -> Option<u16> {
        return err.downcast_ref::<ApiError>().map(|e| return e.status);
    }

    pub fn is_payment_required(&self) -> bool {
        return self.status == 402;
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "HTTP {} from {}", self.status, self.endpoint);
    }
}

impl std::error::Error for ApiError {}

pub fn is_payment_required(err: &anyhow::Error) -> bool {
    return ApiError::status_of(err) == Some(402);
}

pub type ApiBox = Arc<dyn Api + Send + Sync>;

/// One function per endpoint of the Future Hacker News backend. A single
/// request per call: no retries, no timeouts, no backoff.
#[async_trait]
pub trait Api {
    /// Pings the service root. Used by the `doctor` command.
    async fn health_check(&self) -> Result<()>;

    /// Generates the front page for a year. Fails with a 402 `ApiError` once
    /// the trial and credits are exhausted.
    async fn generate_stories(&self, req: GenerateRequest) -> Result<GenerateResponse>;

    async fn get_story_details(&self, story_id: u64, year: u16, lang: &str)
        -> Result<StoryDetails>;

    async fn get_trial_status(&self, device_id: &str) -> Result<TrialStatus>;

    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn create_checkout(&self, req: CheckoutRequest) -> Result<CheckoutSession>;

    async fn get_token_info(&self, token: &str) -> Result<TokenInfo>;

    async fn get_tokens_by_device(&self, device_id: &str) -> Result<Vec<TokenInfo>>;
}
