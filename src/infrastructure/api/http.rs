#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Api;
use crate::domain::models::ApiError;
use crate::domain::models::CheckoutRequest;
use crate::domain::models::CheckoutSession;
use crate::domain::models::DeviceTokensResponse;
use crate::domain::models::GenerateRequest;
use crate::domain::models::GenerateResponse;
use crate::domain::models::Product;
use crate::domain::models::StoryDetails;
use crate::domain::models::TokenInfo;
use crate::domain::models::TrialStatus;

/// Fails with an `ApiError` carrying the status when the response is not 2xx.
fn ensure_success(res: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
    if !res.status().is_success() {
        tracing::error!(
            status = res.status().as_u16(),
            endpoint = endpoint,
            "Future Hacker News request failed"
        );
        return Err(ApiError::new(res.status().as_u16(), endpoint).into());
    }

    return Ok(res);
}

async fn parse<T: DeserializeOwned>(res: reqwest::Response, endpoint: &str) -> Result<T> {
    let res = ensure_success(res, endpoint)?;
    let body = res.json::<T>().await?;

    return Ok(body);
}

pub struct HttpApi {
    url: String,
    client: reqwest::Client,
}

impl Default for HttpApi {
    fn default() -> HttpApi {
        return HttpApi::new(&Config::get(ConfigKey::ApiURL));
    }
}

impl HttpApi {
    pub fn new(url: &str) -> HttpApi {
        return HttpApi {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url);
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(path = path, "GET");
        let res = self.client.get(self.endpoint(path)).send().await?;

        return parse::<T>(res, path).await;
    }
}

#[async_trait]
impl Api for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = match self.client.get(self.endpoint("/health")).send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Future Hacker News API is not reachable");
                return Err(err.into());
            }
        };

        ensure_success(res, "/health")?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn generate_stories(&self, req: GenerateRequest) -> Result<GenerateResponse> {
        let path = "/api/generate";
        tracing::debug!(
            year = req.year,
            lang = req.lang.as_str(),
            with_token = req.token.is_some(),
            "Generating stories"
        );

        let res = self
            .client
            .post(self.endpoint(path))
            .json(&req)
            .send()
            .await?;

        return parse::<GenerateResponse>(res, path).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_story_details(
        &self,
        story_id: u64,
        year: u16,
        lang: &str,
    ) -> Result<StoryDetails> {
        let path = format!("/api/story/{story_id}/details");
        let res = self
            .client
            .get(self.endpoint(&path))
            .query(&[("year", year.to_string()), ("lang", lang.to_string())])
            .send()
            .await?;

        return parse::<StoryDetails>(res, &path).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_trial_status(&self, device_id: &str) -> Result<TrialStatus> {
        let path = format!("/api/trial-status/{}", urlencoding::encode(device_id));
        return self.get::<TrialStatus>(&path).await;
    }

    #[allow(clippy::implicit_return)]
    async fn list_products(&self) -> Result<Vec<Product>> {
        return self.get::<Vec<Product>>("/api/payment/products").await;
    }

    #[allow(clippy::implicit_return)]
    async fn create_checkout(&self, req: CheckoutRequest) -> Result<CheckoutSession> {
        let path = "/api/payment/create-checkout";
        tracing::debug!(sku = req.product_sku.as_str(), "Creating checkout session");

        let res = self
            .client
            .post(self.endpoint(path))
            .json(&req)
            .send()
            .await?;

        return parse::<CheckoutSession>(res, path).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_token_info(&self, token: &str) -> Result<TokenInfo> {
        let path = format!("/api/tokens/info/{}", urlencoding::encode(token));
        return self.get::<TokenInfo>(&path).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_tokens_by_device(&self, device_id: &str) -> Result<Vec<TokenInfo>> {
        let path = format!("/api/tokens/by-device/{}", urlencoding::encode(device_id));
        let res = self.get::<DeviceTokensResponse>(&path).await?;

        return Ok(res.tokens);
    }
}
