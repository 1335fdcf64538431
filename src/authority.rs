use serde::Deserialize;

use crate::config::Config;
use crate::error::AuthError;
use crate::token::{Profile, TokenResponse};

const TOKEN_PATH: &str = "/protocol/openid-connect/token";
const USERINFO_PATH: &str = "/protocol/openid-connect/userinfo";
const LOGIN_SCOPE: &str = "openid email profile";

/// HTTP client for the authority's token and userinfo endpoints.
///
/// Every method performs exactly one outbound request. Transport failures
/// surface as [`AuthError::Network`]; no retries, no caller timeout beyond
/// the surrounding request lifecycle.
///
/// # Example
/// ```no_run
/// use vestibule::authority::AuthorityClient;
///
/// let authority = AuthorityClient::new(
///     "https://idp.example.com/realms/main",
///     "my-client",
///     "my-secret",
/// );
/// ```
pub struct AuthorityClient {
    client: reqwest::Client,
    issuer: String,
    client_id: String,
    client_secret: String,
}

impl AuthorityClient {
    pub fn new(
        issuer: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            issuer: issuer.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.issuer_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    fn token_endpoint(&self) -> String {
        format!("{}{TOKEN_PATH}", self.issuer.trim_end_matches('/'))
    }

    fn userinfo_endpoint(&self) -> String {
        format!("{}{USERINFO_PATH}", self.issuer.trim_end_matches('/'))
    }

    /// Exchange a username/password pair for tokens (resource-owner password
    /// grant, fixed scope `openid email profile`).
    ///
    /// Empty credentials are rejected before any request is made. A
    /// non-success status maps to [`AuthError::InvalidCredentials`]; the
    /// response body is logged, never surfaced to the caller.
    pub async fn exchange_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let resp = self
            .client
            .post(self.token_endpoint())
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("username", username),
                ("password", password),
                ("scope", LOGIN_SCOPE),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "password grant rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(resp.json().await?)
    }

    /// Exchange a refresh token for a new token set.
    pub async fn exchange_refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let resp = self
            .client
            .post(self.token_endpoint())
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "refresh grant rejected");
            return Err(AuthError::RefreshRejected);
        }
        Ok(resp.json().await?)
    }

    /// Fetch the principal's profile from the userinfo endpoint.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<Profile, AuthError> {
        let resp = self
            .client
            .get(self.userinfo_endpoint())
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "userinfo request failed");
            return Err(AuthError::ProfileUnavailable);
        }
        let payload: UserInfoResponse = resp.json().await?;
        Ok(payload.into())
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<UserInfoResponse> for Profile {
    fn from(info: UserInfoResponse) -> Self {
        Self {
            id: info.sub,
            name: info.name.or(info.preferred_username),
            email: info.email,
            picture: info.picture,
        }
    }
}
