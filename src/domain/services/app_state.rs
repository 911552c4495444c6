#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::mpsc;

use super::CheckoutService;
use super::StoryList;
use super::TokenStore;
use super::Translations;
use crate::configuration::MAX_YEAR;
use crate::configuration::MIN_YEAR;
use crate::domain::models::is_payment_required;
use crate::domain::models::Action;
use crate::domain::models::CheckoutSession;
use crate::domain::models::CreditSource;
use crate::domain::models::Event;
use crate::domain::models::GenerateRequest;
use crate::domain::models::GenerateResponse;
use crate::domain::models::IdentityBox;
use crate::domain::models::Language;
use crate::domain::models::Product;
use crate::domain::models::StorageBox;
use crate::domain::models::TokenInfo;
use crate::domain::models::TrialStatus;
use crate::domain::models::View;

const PAGE_SIZE: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum GenerateDecision {
    /// Nothing can pay for a generation. The pricing view is shown instead.
    Blocked,
    Request(GenerateRequest, CreditSource),
}

/// The generation in flight. Results are tagged with the language of the
/// request, and only move the view when the user has not backed out since.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PendingGenerate {
    lang: Language,
    epoch: u64,
}

pub struct AppState {
    pub year: u16,
    pub language: Language,
    pub view: View,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub device_id: Option<String>,
    pub trial: Option<TrialStatus>,
    pub needs_credits: bool,
    pub token_store: TokenStore,
    pub story_list: StoryList,
    /// Year and language the current stories were generated for.
    pub stories_year: u16,
    pub stories_lang: Language,
    pub pricing_cursor: usize,
    pub display_token: Option<String>,
    /// Set once a checkout session exists. The UI opens it in the browser.
    pub checkout_url: Option<String>,
    /// Bumped when the user leaves a screen, so late results stay off it.
    generate_epoch: u64,
    pending_generate: Option<PendingGenerate>,
}

impl AppState {
    pub async fn new(
        identity: &IdentityBox,
        storage: StorageBox,
        year: u16,
        language: Language,
    ) -> Result<AppState> {
        let device_id = match identity.get_id().await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(error = ?err, "Device identity unavailable, skipping trial check");
                None
            }
        };

        let token_store = TokenStore::load(storage).await?;

        return Ok(AppState {
            year: year.clamp(MIN_YEAR, MAX_YEAR),
            language,
            view: View::Home,
            loading: false,
            error: None,
            notice: None,
            device_id,
            trial: None,
            needs_credits: false,
            token_store,
            story_list: StoryList::default(),
            stories_year: year,
            stories_lang: language,
            pricing_cursor: 0,
            display_token: None,
            checkout_url: None,
            generate_epoch: 0,
            pending_generate: None,
        });
    }

    /// Work to kick off once the UI is up.
    pub fn init(&self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if let Some(device_id) = &self.device_id {
            tx.send(Action::FetchTrialStatus(device_id.to_string()))?;
        }

        return Ok(());
    }

    pub fn t(&self, key: &str) -> String {
        return Translations::get(self.language, key);
    }

    pub fn has_trial(&self) -> bool {
        return self.trial.map(|e| return e.has_free_trial).unwrap_or(false);
    }

    /// A 402 blocks generation until a reconcile brings in new credits.
    pub fn can_generate(&self, now: DateTime<Utc>) -> bool {
        if self.needs_credits {
            return false;
        }

        return self.token_store.get_active_token(now).is_some() || self.has_trial();
    }

    /// Credits spendable right now: remaining generations on active tokens.
    pub fn available_credits(&self, now: DateTime<Utc>) -> u32 {
        return self
            .token_store
            .tokens()
            .iter()
            .filter(|e| return e.is_active(now))
            .map(|e| return e.remaining_generations)
            .sum();
    }

    pub fn begin_generate(&mut self, now: DateTime<Utc>) -> GenerateDecision {
        if !self.can_generate(now) {
            tracing::debug!("Generation blocked, no credits or trial");
            self.view = View::Pricing;
            return GenerateDecision::Blocked;
        }

        self.loading = true;
        self.error = None;
        self.pending_generate = Some(PendingGenerate {
            lang: self.language,
            epoch: self.generate_epoch,
        });

        let mut req = GenerateRequest {
            year: self.year,
            lang: self.language.to_string(),
            device_id: None,
            token: None,
        };

        if let Some(token) = self.token_store.get_active_token(now) {
            req.token = Some(token.token.to_string());
            return GenerateDecision::Request(req, CreditSource::Token(token.token.to_string()));
        }

        req.device_id = self.device_id.clone();
        return GenerateDecision::Request(req, CreditSource::Trial);
    }

    pub async fn apply_generate(
        &mut self,
        used: CreditSource,
        res: Result<GenerateResponse>,
    ) -> Result<()> {
        self.loading = false;
        let pending = self.pending_generate.take();
        let is_current = pending
            .map(|e| return e.epoch == self.generate_epoch)
            .unwrap_or(true);

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                if is_payment_required(&err) {
                    tracing::info!("Generation requires credits");
                    // The server is authoritative once it refuses a token.
                    if let CreditSource::Token(token) = &used {
                        self.token_store.update_token_usage(token, 0).await?;
                    }
                    self.needs_credits = true;
                    self.trial = Some(TrialStatus {
                        has_free_trial: false,
                        uses_remaining: 0,
                    });
                    self.view = View::Pricing;
                    return Ok(());
                }

                tracing::error!(error = ?err, "Failed to generate stories");
                self.error = Some(self.t("errorGenerate"));
                return Ok(());
            }
        };

        self.stories_year = res.year;
        self.stories_lang = pending.map(|e| return e.lang).unwrap_or(self.language);
        self.story_list.set_stories(res.stories);
        self.needs_credits = false;
        if is_current {
            self.view = View::Stories;
        } else {
            tracing::debug!("Generation finished after the user left, keeping the current view");
        }

        match used {
            CreditSource::Token(token) => {
                let remaining = self
                    .token_store
                    .get_token(&token)
                    .map(|e| return e.remaining_generations.saturating_sub(1))
                    .unwrap_or(0);
                self.token_store
                    .update_token_usage(&token, remaining)
                    .await?;
            }
            CreditSource::Trial => {
                if let Some(trial) = self.trial.as_mut() {
                    trial.has_free_trial = false;
                    trial.uses_remaining = trial.uses_remaining.saturating_sub(1);
                }
            }
        }

        return Ok(());
    }

    pub fn apply_trial_status(&mut self, res: Result<TrialStatus>) {
        match res {
            Ok(trial) => self.trial = Some(trial),
            Err(err) => {
                tracing::debug!(error = ?err, "Trial status unavailable");
                self.trial = None;
            }
        }
    }

    pub fn apply_checkout(&mut self, res: Result<CheckoutSession>) {
        self.loading = false;
        match res {
            Ok(session) => {
                self.checkout_url = Some(session.checkout_url);
                self.notice = Some(self.t("pricing.opened"));
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to create checkout");
                self.error = Some(self.t("pricing.error"));
            }
        }
    }

    pub async fn apply_device_tokens(&mut self, res: Result<Vec<TokenInfo>>) -> Result<()> {
        self.loading = false;
        self.view = View::PaymentSuccess;

        let infos = match res {
            Ok(infos) => infos,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to fetch device tokens");
                self.display_token = None;
                return Ok(());
            }
        };

        let server_tokens = infos
            .iter()
            .map(|e| return e.token.to_string())
            .collect::<Vec<String>>();
        let added = self.token_store.merge(infos).await?;
        let report = CheckoutService::reconcile_tokens(&server_tokens, added);

        if !report.added.is_empty() {
            self.needs_credits = false;
        }
        self.display_token = report.display_token;

        return Ok(());
    }

    pub fn next_year(&mut self) {
        self.year = (self.year + 1).min(MAX_YEAR);
    }

    pub fn prev_year(&mut self) {
        self.year = self.year.saturating_sub(1).max(MIN_YEAR);
    }

    pub fn next_language(&mut self) {
        self.language = self.language.next();
    }

    pub fn selected_product(&self) -> Option<Product> {
        return Product::catalog().get(self.pricing_cursor).cloned();
    }

    fn leave_to(&mut self, view: View) {
        self.generate_epoch += 1;
        self.view = view;
    }

    fn generate(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.loading {
            return Ok(());
        }

        if let GenerateDecision::Request(req, used) = self.begin_generate(Utc::now()) {
            tx.send(Action::GenerateStories(req, used))?;
        }

        return Ok(());
    }

    fn check_payment(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let Some(device_id) = &self.device_id else {
            self.view = View::PaymentSuccess;
            self.display_token = None;
            return Ok(());
        };

        self.loading = true;
        tx.send(Action::FetchDeviceTokens(device_id.to_string()))?;
        return Ok(());
    }

    fn handle_key(&mut self, key: char, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        match (self.view, key) {
            (_, 'q') => return Ok(true),
            (_, 'l') => self.next_language(),
            (View::Home | View::Stories, 'g') => self.generate(tx)?,
            (View::Home | View::Stories, 'p') => self.leave_to(View::Pricing),
            (View::Stories, 'j') => self.story_list.select_next(),
            (View::Stories, 'k') => self.story_list.select_prev(),
            (View::Pricing, 'p') => self.check_payment(tx)?,
            (View::PaymentSuccess, 'c') => {
                if let Some(token) = &self.display_token {
                    tx.send(Action::CopyToClipboard(token.to_string()))?;
                }
            }
            _ => {}
        }

        return Ok(false);
    }

    fn handle_enter(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        match self.view {
            View::Home => self.generate(tx)?,
            View::Stories => {
                if let Some(req) = self.story_list.toggle_selected() {
                    tx.send(Action::FetchDetails(
                        req,
                        self.stories_year,
                        self.stories_lang.to_string(),
                    ))?;
                }
            }
            View::Pricing => {
                if self.loading {
                    return Ok(());
                }
                if let Some(product) = self.selected_product() {
                    self.loading = true;
                    self.error = None;
                    tx.send(Action::CreateCheckout(product.sku))?;
                }
            }
            View::PaymentSuccess => self.view = View::Home,
        }

        return Ok(());
    }

    /// Applies one event. Returns true when the app should exit.
    pub async fn handle_event(
        &mut self,
        event: Event,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        match event {
            Event::StoriesGenerated(used, res) => self.apply_generate(used, res).await?,
            Event::DetailsLoaded(req, res) => self.story_list.apply_details(req, res),
            Event::TrialStatusLoaded(res) => self.apply_trial_status(res),
            Event::CheckoutCreated(res) => self.apply_checkout(res),
            Event::DeviceTokensLoaded(res) => self.apply_device_tokens(res).await?,
            Event::ClipboardCopied(res) => match res {
                Ok(()) => self.notice = Some(self.t("payment.copied")),
                Err(err) => self.error = Some(err.to_string()),
            },
            Event::KeyboardCTRLC() => return Ok(true),
            Event::KeyboardChar(key) => return self.handle_key(key, tx),
            Event::KeyboardEnter() => self.handle_enter(tx)?,
            Event::KeyboardEsc() => {
                self.error = None;
                self.notice = None;
                self.leave_to(View::Home);
            }
            Event::UIDown() => match self.view {
                View::Stories => self.story_list.select_next(),
                View::Pricing => {
                    self.pricing_cursor =
                        (self.pricing_cursor + 1).min(Product::catalog().len() - 1);
                }
                _ => {}
            },
            Event::UIUp() => match self.view {
                View::Stories => self.story_list.select_prev(),
                View::Pricing => self.pricing_cursor = self.pricing_cursor.saturating_sub(1),
                _ => {}
            },
            Event::UIPageDown() => self.story_list.select_page_down(PAGE_SIZE),
            Event::UIPageUp() => self.story_list.select_page_up(PAGE_SIZE),
            Event::UILeft() => {
                if self.view == View::Home {
                    self.prev_year();
                }
            }
            Event::UIRight() => {
                if self.view == View::Home {
                    self.next_year();
                }
            }
            Event::UIResize() => {}
        }

        return Ok(false);
    }
}
