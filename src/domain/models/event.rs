use anyhow::Result;

use super::CheckoutSession;
use super::CreditSource;
use super::DetailsRequest;
use super::GenerateResponse;
use super::StoryDetails;
use super::TokenInfo;
use super::TrialStatus;

pub enum Event {
    CheckoutCreated(Result<CheckoutSession>),
    ClipboardCopied(Result<()>),
    DetailsLoaded(DetailsRequest, Result<StoryDetails>),
    DeviceTokensLoaded(Result<Vec<TokenInfo>>),
    StoriesGenerated(CreditSource, Result<GenerateResponse>),
    TrialStatusLoaded(Result<TrialStatus>),
    KeyboardChar(char),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    UIDown(),
    UILeft(),
    UIPageDown(),
    UIPageUp(),
    UIResize(),
    UIRight(),
    UIUp(),
}
