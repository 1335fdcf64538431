use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AuthError;
use crate::session::SessionRecord;

/// Envelope lifetime. Longer than any access token, so an expired access
/// token can still reach the refresh transition on the next request.
const SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Seals session records into signed compact tokens and opens them again.
///
/// The envelope is an HS256 JWT keyed by the configured signing secret. It
/// protects the session state between requests; it does not re-verify the
/// authority-issued tokens it carries.
///
/// # Example
/// ```no_run
/// use vestibule::config::Config;
/// use vestibule::seal::SessionSealer;
///
/// # fn example(record: &vestibule::session::SessionRecord) -> Result<(), vestibule::error::AuthError> {
/// let sealer = SessionSealer::from_config(&Config::from_env()?);
/// let cookie = sealer.seal(record)?;
/// let reopened = sealer.open(&cookie)?;
/// # Ok(())
/// # }
/// ```
pub struct SessionSealer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvelopeClaims {
    #[serde(flatten)]
    record: SessionRecord,
    iat: i64,
    exp: i64,
}

impl SessionSealer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.signing_secret)
    }

    pub fn seal(&self, record: &SessionRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = EnvelopeClaims {
            record: record.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_MAX_AGE_SECS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| AuthError::Seal(error.to_string()))
    }

    /// Verify and decode a sealed session token.
    ///
    /// Any failure (bad signature, expired envelope, malformed payload)
    /// means the bearer is unauthenticated.
    pub fn open(&self, sealed: &str) -> Result<SessionRecord, AuthError> {
        let data = decode::<EnvelopeClaims>(
            sealed,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|error| AuthError::Seal(error.to_string()))?;
        Ok(data.claims.record)
    }
}
