use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::claims;
use crate::error::AuthError;

/// Token triple issued by the authority, plus the resolved expiry instant.
///
/// `expires_at` is always populated: parsed from the access token's `exp`
/// claim, or `now + fallback` when the claim cannot be read. The set is
/// replaced as a whole on refresh, never field-patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Success payload of the authority's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Principal profile, fetched once at login for display. Never re-fetched
/// on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl TokenSet {
    /// Build a token set from a password-grant response.
    ///
    /// A success response without an `id_token` is invalid: the login scope
    /// includes `openid`.
    pub fn from_login(response: TokenResponse, fallback: Duration) -> Result<Self, AuthError> {
        let id_token = response.id_token.ok_or_else(|| {
            AuthError::InvalidResponse("token response missing id_token".to_string())
        })?;
        Ok(Self {
            expires_at: resolve_expiry(&response.access_token, fallback),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            id_token,
        })
    }

    /// Build the replacement set after a refresh grant.
    ///
    /// The authority may rotate refresh tokens or reuse them; a field it did
    /// not return again (refresh token, id token) is carried over from the
    /// prior set.
    pub fn refreshed(&self, response: TokenResponse, fallback: Duration) -> Self {
        Self {
            expires_at: resolve_expiry(&response.access_token, fallback),
            access_token: response.access_token,
            refresh_token: response.refresh_token.or_else(|| self.refresh_token.clone()),
            id_token: response.id_token.unwrap_or_else(|| self.id_token.clone()),
        }
    }

    /// Whether the access token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

fn resolve_expiry(access_token: &str, fallback: Duration) -> DateTime<Utc> {
    match claims::decode_expiry(access_token) {
        Some(expiry) => expiry,
        None => {
            // Flagged for review: an undecodable token silently gets a fixed
            // window instead of failing the exchange.
            tracing::warn!("could not decode access token expiry, using fallback window");
            Utc::now() + fallback
        }
    }
}
