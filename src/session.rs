use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::authority::AuthorityClient;
use crate::config::{Config, DEFAULT_FALLBACK_EXPIRY_SECS};
use crate::error::AuthError;
use crate::token::{Profile, TokenSet};

/// Sticky session-level failure flag.
///
/// Once set, no automatic refresh runs again for this session; only a fresh
/// login clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    RefreshTokenError,
}

/// Authoritative per-principal session state, round-tripped through the
/// sealed envelope between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub tokens: TokenSet,
    pub profile: Profile,
    pub error: Option<SessionError>,
}

/// State of a record as observed at one instant.
///
/// `Unauthenticated` has no variant here: it is the absence of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Expired,
    Errored,
}

impl SessionRecord {
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.error.is_some() {
            SessionStatus::Errored
        } else if self.tokens.is_expired_at(now) {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status_at(Utc::now())
    }

    fn with_error(mut self, error: SessionError) -> Self {
        self.error = Some(error);
        self
    }

    /// Map the internal state into the session shape the UI consumes.
    ///
    /// `expires` mirrors the access token's validity window rather than a
    /// fixed session TTL.
    pub fn project(&self) -> Session {
        Session {
            user: SessionUser {
                id: self.profile.id.clone(),
                name: self.profile.name.clone(),
                email: self.profile.email.clone(),
                image: self.profile.picture.clone(),
            },
            access_token: self.tokens.access_token.clone(),
            refresh_token: self.tokens.refresh_token.clone(),
            id_token: self.tokens.id_token.clone(),
            error: self.error,
            expires: self
                .tokens
                .expires_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Externally visible session shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub id_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
    /// RFC 3339 instant, millisecond precision.
    pub expires: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Session state machine: login, per-access resolution, sign-out.
///
/// Expiry is detected lazily on each access; there is no background timer
/// and no scheduler.
///
/// # Example
/// ```no_run
/// use vestibule::authority::AuthorityClient;
/// use vestibule::session::SessionService;
///
/// # async fn example() -> Result<(), vestibule::error::AuthError> {
/// let authority = AuthorityClient::new("https://idp.example.com", "client", "secret");
/// let sessions = SessionService::new(authority);
/// let record = sessions.login("user1", "pass1").await?;
/// let session = record.project();
/// # Ok(())
/// # }
/// ```
pub struct SessionService {
    authority: AuthorityClient,
    fallback_expiry: Duration,
}

impl SessionService {
    pub fn new(authority: AuthorityClient) -> Self {
        Self {
            authority,
            fallback_expiry: Duration::seconds(DEFAULT_FALLBACK_EXPIRY_SECS),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            authority: AuthorityClient::from_config(config),
            fallback_expiry: config.fallback_expiry(),
        }
    }

    pub fn with_fallback_expiry(mut self, window: Duration) -> Self {
        self.fallback_expiry = window;
        self
    }

    /// Establish a session from a credential pair.
    ///
    /// Credential exchange, expiry resolution, then a one-time profile
    /// fetch. Any failure blocks session creation. A successful login is
    /// also the only transition that clears a sticky [`SessionError`].
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord, AuthError> {
        let response = self.authority.exchange_password(username, password).await?;
        let tokens = TokenSet::from_login(response, self.fallback_expiry)?;
        let profile = self.authority.fetch_profile(&tokens.access_token).await?;
        Ok(SessionRecord {
            tokens,
            profile,
            error: None,
        })
    }

    /// Evaluate the state machine for one session access.
    ///
    /// An `Active` record is returned untouched. An `Expired` record gets at
    /// most one refresh attempt; failure, or a missing refresh token, marks
    /// the record with [`SessionError::RefreshTokenError`] while keeping the
    /// stale tokens for the caller to inspect. An `Errored` record is
    /// returned unchanged: a rejected refresh token never becomes valid
    /// again, so re-login is the only way out.
    ///
    /// Two concurrent accesses that both observe `Expired` will both hit the
    /// authority; its refresh-token rotation policy decides the second one.
    /// Callers needing at-most-one-refresh-in-flight must serialize accesses
    /// per principal.
    pub async fn resolve(&self, record: SessionRecord) -> SessionRecord {
        match record.status() {
            SessionStatus::Active | SessionStatus::Errored => record,
            SessionStatus::Expired => self.refresh(record).await,
        }
    }

    async fn refresh(&self, record: SessionRecord) -> SessionRecord {
        let Some(refresh_token) = record.tokens.refresh_token.clone() else {
            return record.with_error(SessionError::RefreshTokenError);
        };
        tracing::debug!("access token expired, refreshing");
        match self.authority.exchange_refresh(&refresh_token).await {
            Ok(response) => SessionRecord {
                tokens: record.tokens.refreshed(response, self.fallback_expiry),
                profile: record.profile,
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "token refresh failed");
                record.with_error(SessionError::RefreshTokenError)
            }
        }
    }

    /// Discard a session. The caller deletes the sealed envelope it was
    /// stored in.
    pub fn sign_out(&self, record: SessionRecord) {
        tracing::debug!(principal = %record.profile.id, "session discarded");
    }
}
