pub mod http;

use std::sync::Arc;

use crate::domain::models::ApiBox;

pub struct ApiManager {}

impl ApiManager {
    /// Builds the HTTP client against the configured `api-url`.
    pub fn get() -> ApiBox {
        return Arc::new(http::HttpApi::default());
    }
}
