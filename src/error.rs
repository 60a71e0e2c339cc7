use thiserror::Error;

/// Error kinds for vendor-facing calls.
///
/// These only travel inside the crate: the executors catch every variant at
/// the tool boundary and render it as a text result.
#[derive(Debug, Error)]
pub enum MceError {
    /// A required credential is absent from the environment.
    #[error("missing credential: {0}")]
    AuthConfig(&'static str),

    /// The token endpoint rejected the request or was unreachable.
    #[error("token request failed: {0}")]
    AuthRequest(String),

    /// SOAP action outside the implemented Create/Retrieve/Update/Delete set.
    #[error("unsupported SOAP action: {0}")]
    UnsupportedAction(String),

    /// The HTTP call itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A vendor payload could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),
}
