use crate::error::MceError;

/// ================================
/// Vendor account settings
/// ================================
///
/// Credentials and instance coordinates for the Marketing Cloud account,
/// read from the `MCE_*` process environment. Nothing is validated at load
/// time: a server without credentials still serves `health` and
/// `documentation`, and the API tools report the missing variable per call.
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub subdomain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Default business unit (MID) used when a call carries no scope.
    pub default_account_id: Option<String>,
    /// Token endpoint base override for sandbox stacks and tests.
    pub auth_url: Option<String>,
}

impl AuthSettings {
    pub fn from_env() -> Self {
        Self {
            subdomain: env_non_empty("MCE_SUBDOMAIN"),
            client_id: env_non_empty("MCE_CLIENT_ID"),
            client_secret: env_non_empty("MCE_CLIENT_SECRET"),
            default_account_id: env_non_empty("MCE_DEFAULT_MID"),
            auth_url: env_non_empty("MCE_AUTH_URL"),
        }
    }

    /// Client id and secret for the client-credentials grant.
    pub fn client_credentials(&self) -> Result<(String, String), MceError> {
        Ok((
            require(&self.client_id, "MCE_CLIENT_ID")?,
            require(&self.client_secret, "MCE_CLIENT_SECRET")?,
        ))
    }

    /// Token endpoint URL: the `MCE_AUTH_URL` override when present,
    /// otherwise derived from the account subdomain.
    pub fn token_url(&self) -> Result<String, MceError> {
        if let Some(base) = &self.auth_url {
            return Ok(format!("{}/v2/token", base.trim_end_matches('/')));
        }
        let subdomain = require(&self.subdomain, "MCE_SUBDOMAIN")?;
        Ok(format!(
            "https://{subdomain}.auth.marketingcloudapis.com/v2/token"
        ))
    }

    /// SOAP endpoint derived from the subdomain; used for the WS-Addressing
    /// `To` header. The POST target comes from the token's instance URL.
    pub fn soap_endpoint(&self) -> Result<String, MceError> {
        let subdomain = require(&self.subdomain, "MCE_SUBDOMAIN")?;
        Ok(format!(
            "https://{subdomain}.soap.marketingcloudapis.com/Service.asmx"
        ))
    }
}

fn require(value: &Option<String>, name: &'static str) -> Result<String, MceError> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or(MceError::AuthConfig(name))
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// ================================
/// Logging
/// ================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}
