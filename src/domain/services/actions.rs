#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use super::CheckoutService;
use crate::domain::models::Action;
use crate::domain::models::ApiBox;
use crate::domain::models::Event;
use crate::domain::models::IdentityBox;

/// Runs API work off the UI loop. Every request gets its own task and its
/// result comes back as an `Event`, so slow requests never block input.
pub struct ActionsService {
    api: ApiBox,
    identity: IdentityBox,
    site_url: String,
}

impl ActionsService {
    pub fn new(api: ApiBox, identity: IdentityBox, site_url: &str) -> ActionsService {
        return ActionsService {
            api,
            identity,
            site_url: site_url.to_string(),
        };
    }

    fn spawn_request(&self, action: Action, tx: mpsc::UnboundedSender<Event>) {
        let api = self.api.clone();
        let identity = self.identity.clone();
        let site_url = self.site_url.to_string();

        tokio::spawn(async move {
            let event = match action {
                Action::CreateCheckout(sku) => Event::CheckoutCreated(
                    CheckoutService::start(&api, &identity, &sku, &site_url).await,
                ),
                Action::FetchDetails(req, year, lang) => Event::DetailsLoaded(
                    req,
                    api.get_story_details(req.story_id, year, &lang).await,
                ),
                Action::FetchDeviceTokens(device_id) => {
                    Event::DeviceTokensLoaded(api.get_tokens_by_device(&device_id).await)
                }
                Action::FetchTrialStatus(device_id) => {
                    Event::TrialStatusLoaded(api.get_trial_status(&device_id).await)
                }
                Action::GenerateStories(req, used) => {
                    Event::StoriesGenerated(used, api.generate_stories(req).await)
                }
                Action::CopyToClipboard(text) => {
                    Event::ClipboardCopied(ClipboardService::set(text))
                }
            };

            if tx.send(event).is_err() {
                tracing::debug!("UI closed before a request finished");
            }
        });
    }

    pub async fn start(
        &self,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        loop {
            let Some(action) = rx.recv().await else {
                return Ok(());
            };

            self.spawn_request(action, tx.clone());
        }
    }
}
