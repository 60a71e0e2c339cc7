/// Scope key used when a call carries no business unit and no default MID is
/// configured.
pub const DEFAULT_SCOPE_KEY: &str = "default";

/// Subtracted from the vendor-reported expiry so a token is never used while
/// it could expire mid-flight.
pub const TOKEN_SAFETY_MARGIN_SECONDS: i64 = 60;

/// One vendor-issued OAuth token plus the instance URLs reported with it.
///
/// Immutable once created; the cache replaces the whole entry on expiry.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub rest_base_url: String,
    pub soap_base_url: String,
    /// Vendor expiry minus the safety margin, unix seconds.
    pub expires_at: i64,
}

impl TokenInfo {
    pub fn is_live(&self, now_unix: i64) -> bool {
        self.expires_at > now_unix
    }
}
