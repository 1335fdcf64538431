use chrono::Duration;

use crate::error::AuthError;

/// Expiry window substituted when the access token's `exp` claim cannot be
/// read (seconds).
pub const DEFAULT_FALLBACK_EXPIRY_SECS: i64 = 300;

/// Process-wide configuration, read once at startup and immutable for the
/// process lifetime.
///
/// Construction fails fast: a missing required value is an error at load
/// time, not at first use.
///
/// # Example
/// ```no_run
/// use vestibule::config::Config;
///
/// let config = Config::from_env()?;
/// # Ok::<(), vestibule::error::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub signing_secret: String,
    pub public_base_url: String,
    pub fallback_expiry_secs: i64,
}

impl Config {
    pub fn new(
        issuer_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        signing_secret: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            signing_secret: signing_secret.into(),
            public_base_url: public_base_url.into(),
            fallback_expiry_secs: DEFAULT_FALLBACK_EXPIRY_SECS,
        }
    }

    pub fn with_fallback_expiry_secs(mut self, secs: i64) -> Self {
        self.fallback_expiry_secs = secs;
        self
    }

    /// Load from environment variables (`OIDC_ISSUER`, `OIDC_CLIENT_ID`,
    /// `OIDC_CLIENT_SECRET`, `SESSION_SECRET`, `PUBLIC_BASE_URL`, optional
    /// `FALLBACK_EXPIRY_SECS`), failing on the first missing value.
    pub fn from_env() -> Result<Self, AuthError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let config = Self::new(
            required_var("OIDC_ISSUER")?,
            required_var("OIDC_CLIENT_ID")?,
            required_var("OIDC_CLIENT_SECRET")?,
            required_var("SESSION_SECRET")?,
            required_var("PUBLIC_BASE_URL")?,
        );
        match std::env::var("FALLBACK_EXPIRY_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<i64>().map_err(|_| {
                    AuthError::Configuration(format!(
                        "FALLBACK_EXPIRY_SECS is not a number: {raw}"
                    ))
                })?;
                Ok(config.with_fallback_expiry_secs(secs))
            }
            Err(_) => Ok(config),
        }
    }

    /// Fallback expiry as a duration.
    pub fn fallback_expiry(&self) -> Duration {
        Duration::seconds(self.fallback_expiry_secs)
    }
}

fn required_var(key: &str) -> Result<String, AuthError> {
    std::env::var(key)
        .map_err(|_| AuthError::Configuration(format!("environment variable {key} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_fallback_window() {
        let config = Config::new("https://idp.example.com/realms/main", "app", "s3cret", "sign", "https://app.example.com");
        assert_eq!(config.fallback_expiry_secs, 300);
        assert_eq!(config.fallback_expiry(), Duration::seconds(300));
    }

    #[test]
    fn fallback_window_can_be_overridden() {
        let config = Config::new("https://idp.example.com", "app", "s3cret", "sign", "https://app.example.com")
            .with_fallback_expiry_secs(60);
        assert_eq!(config.fallback_expiry(), Duration::seconds(60));
    }

    #[test]
    fn missing_required_var_fails_with_its_name() {
        let result = required_var("VESTIBULE_TEST_UNSET_VAR");
        match result {
            Err(AuthError::Configuration(message)) => {
                assert!(message.contains("VESTIBULE_TEST_UNSET_VAR"));
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }
}
