pub mod rest;
pub mod soap;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::AuthSettings;
use crate::error::MceError;
use crate::helpers::time::{Clock, SystemClock};

/// The only thing that crosses the tool boundary: plain text, success or not.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub text: String,
}

impl NormalizedResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Boundary adapter: render an internal error as the textual contract.
    pub fn from_error(err: &MceError) -> Self {
        Self {
            text: format!("Error: {err}"),
        }
    }
}

/// Connect/request timeouts for vendor API calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates token acquisition, request construction and response
/// normalization for both wire protocols. Public operations never return an
/// error: failures render as text through `NormalizedResult::from_error`.
pub struct RequestExecutor {
    settings: AuthSettings,
    client: Client,
    tokens: TokenCache,
}

impl RequestExecutor {
    pub fn new(settings: AuthSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Injectable clock so expiry behavior stays deterministic under test.
    pub fn with_clock(settings: AuthSettings, clock: Arc<dyn Clock>) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        let tokens = TokenCache::new(settings.clone(), client.clone(), clock);
        Self {
            settings,
            client,
            tokens,
        }
    }
}
