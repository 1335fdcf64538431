#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use vestibule::session::SessionRecord;
use vestibule::token::{Profile, TokenSet};

pub const TOKEN_PATH: &str = "/protocol/openid-connect/token";
pub const USERINFO_PATH: &str = "/protocol/openid-connect/userinfo";

/// Compact JWT carrying only an `exp` claim. The signature segment is a
/// placeholder; the decoder under test never verifies it.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "exp": exp }).to_string());
    format!("{header}.{payload}.signature")
}

pub fn token_body(
    access_token: &str,
    refresh_token: Option<&str>,
    id_token: Option<&str>,
) -> serde_json::Value {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
    });
    if let Some(refresh) = refresh_token {
        body["refresh_token"] = json!(refresh);
    }
    if let Some(id) = id_token {
        body["id_token"] = json!(id);
    }
    body
}

pub fn userinfo_body() -> serde_json::Value {
    json!({
        "sub": "user-123",
        "name": "Jin Park",
        "preferred_username": "jin",
        "email": "jin@example.com",
        "picture": "https://idp.example.com/avatar/jin.png",
    })
}

pub fn profile() -> Profile {
    Profile {
        id: "user-123".to_string(),
        name: Some("Jin Park".to_string()),
        email: Some("jin@example.com".to_string()),
        picture: Some("https://idp.example.com/avatar/jin.png".to_string()),
    }
}

pub fn record_expiring_at(
    expires_at: DateTime<Utc>,
    refresh_token: Option<&str>,
) -> SessionRecord {
    SessionRecord {
        tokens: TokenSet {
            access_token: "stale-access".to_string(),
            refresh_token: refresh_token.map(ToString::to_string),
            id_token: "stale-id".to_string(),
            expires_at,
        },
        profile: profile(),
        error: None,
    }
}

pub fn expired_record(refresh_token: Option<&str>) -> SessionRecord {
    record_expiring_at(Utc::now() - Duration::seconds(10), refresh_token)
}
