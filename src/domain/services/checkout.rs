#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

use super::TokenStore;
use crate::domain::models::ApiBox;
use crate::domain::models::CheckoutRequest;
use crate::domain::models::CheckoutSession;
use crate::domain::models::IdentityBox;
use crate::domain::models::Product;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    /// The token to show the user: the last one added, else the first the
    /// server knows about.
    pub display_token: Option<String>,
}

pub struct CheckoutService {}

impl CheckoutService {
    pub fn success_url(base_url: &str) -> String {
        return format!("{}/payment/success", base_url.trim_end_matches('/'));
    }

    pub fn cancel_url(base_url: &str) -> String {
        return format!("{}/pricing", base_url.trim_end_matches('/'));
    }

    pub fn request(sku: &str, device_id: &str, base_url: &str) -> Result<CheckoutRequest> {
        if Product::find(sku).is_none() {
            bail!(format!("Unknown product '{sku}'"));
        }

        return Ok(CheckoutRequest {
            product_sku: sku.to_string(),
            device_id: device_id.to_string(),
            success_url: CheckoutService::success_url(base_url),
            cancel_url: CheckoutService::cancel_url(base_url),
        });
    }

    /// Creates a checkout session for `sku`. The caller sends the user to
    /// the returned URL.
    pub async fn start(
        api: &ApiBox,
        identity: &IdentityBox,
        sku: &str,
        base_url: &str,
    ) -> Result<CheckoutSession> {
        let device_id = identity.get_id().await?;
        let req = CheckoutService::request(sku, &device_id, base_url)?;
        let session = api.create_checkout(req).await?;
        tracing::info!(sku = sku, session_id = session.session_id.as_str(), "Checkout created");

        return Ok(session);
    }

    pub fn reconcile_tokens(
        server_tokens: &[String],
        added: Vec<String>,
    ) -> ReconcileReport {
        let display_token = added
            .last()
            .or_else(|| return server_tokens.first())
            .map(|e| return e.to_string());

        return ReconcileReport {
            added,
            display_token,
        };
    }

    /// Pulls every token the server holds for this device into the local
    /// store. Safe to repeat.
    pub async fn reconcile(
        api: &ApiBox,
        identity: &IdentityBox,
        store: &mut TokenStore,
    ) -> Result<ReconcileReport> {
        let device_id = identity.get_id().await?;
        let infos = api.get_tokens_by_device(&device_id).await?;
        let server_tokens = infos
            .iter()
            .map(|e| return e.token.to_string())
            .collect::<Vec<String>>();

        let added = store.merge(infos).await?;
        tracing::info!(added = added.len(), "Reconciled device tokens");

        return Ok(CheckoutService::reconcile_tokens(&server_tokens, added));
    }
}
