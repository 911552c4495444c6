use super::GenerateRequest;

/// Identifies one detail fetch. `epoch` ties the result to the story list
/// that was on screen when the fetch started.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DetailsRequest {
    pub story_id: u64,
    pub epoch: u64,
}

/// What pays for a generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreditSource {
    Token(String),
    Trial,
}

pub enum Action {
    CopyToClipboard(String),
    /// Product SKU to buy.
    CreateCheckout(String),
    FetchDetails(DetailsRequest, u16, String),
    FetchDeviceTokens(String),
    FetchTrialStatus(String),
    GenerateStories(GenerateRequest, CreditSource),
}
