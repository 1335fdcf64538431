use thiserror::Error;

/// Normalized authentication and session errors.
///
/// Every authority-facing failure is converted to one of these at the
/// [`crate::authority`] boundary; no raw transport error crosses into the
/// session state machine.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Profile unavailable")]
    ProfileUnavailable,
    #[error("Refresh rejected")]
    RefreshRejected,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Session seal error: {0}")]
    Seal(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
