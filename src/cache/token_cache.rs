use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::token::{TokenInfo, DEFAULT_SCOPE_KEY, TOKEN_SAFETY_MARGIN_SECONDS};
use crate::config::settings::AuthSettings;
use crate::error::MceError;
use crate::helpers::time::Clock;

/// Wire shape of the vendor token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    rest_instance_url: String,
    soap_instance_url: String,
}

/// Per-scope token cache: business unit id (or "default") -> live token.
///
/// No retries and no single-flight guard: a failed fetch surfaces once to
/// the caller, and concurrent misses for one scope may both fetch. The
/// vendor tolerates duplicate issuance; the later insert wins.
pub struct TokenCache {
    settings: AuthSettings,
    client: Client,
    clock: Arc<dyn Clock>,
    inner: RwLock<HashMap<String, TokenInfo>>,
}

impl TokenCache {
    pub fn new(settings: AuthSettings, client: Client, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            client,
            clock,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Return a live token for the scope, fetching one if absent or expired.
    ///
    /// A cached entry is reused while `expires_at` is strictly in the
    /// future; within that window a scope costs exactly one network call.
    pub async fn get_token(&self, scope: Option<&str>) -> Result<TokenInfo, MceError> {
        let key = scope
            .map(str::to_owned)
            .or_else(|| self.settings.default_account_id.clone())
            .unwrap_or_else(|| DEFAULT_SCOPE_KEY.to_owned());

        if let Some(token) = self.inner.read().await.get(&key) {
            if token.is_live(self.clock.now_unix()) {
                debug!(scope = %key, "token cache hit");
                return Ok(token.clone());
            }
        }

        let token = self.fetch_token(&key).await?;
        self.inner.write().await.insert(key, token.clone());
        Ok(token)
    }

    /// Client-credentials grant against the vendor token endpoint.
    async fn fetch_token(&self, key: &str) -> Result<TokenInfo, MceError> {
        let (client_id, client_secret) = self.settings.client_credentials()?;
        let url = self.settings.token_url()?;

        let mut payload = json!({
            "grant_type": "client_credentials",
            "client_id": client_id,
            "client_secret": client_secret,
        });
        if key != DEFAULT_SCOPE_KEY {
            payload["account_id"] = json!(key);
        }

        info!(scope = %key, "requesting vendor token");
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MceError::AuthRequest(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MceError::AuthRequest(format!("token endpoint read failed: {e}")))?;

        if !status.is_success() {
            warn!(scope = %key, %status, "token endpoint rejected request");
            return Err(MceError::AuthRequest(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| MceError::AuthRequest(format!("invalid token response: {e}")))?;

        Ok(TokenInfo {
            access_token: parsed.access_token,
            rest_base_url: parsed.rest_instance_url,
            soap_base_url: parsed.soap_instance_url,
            expires_at: self.clock.now_unix() + parsed.expires_in - TOKEN_SAFETY_MARGIN_SECONDS,
        })
    }
}
