use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Read the `exp` claim from a compact JWT without verifying its signature.
///
/// The authority signed the token and the transport delivered it; this layer
/// only needs the expiry instant for scheduling the refresh cycle. No key
/// material is available here, so no verification may be added.
///
/// Returns `None` on any malformation. Decode failure is non-fatal by
/// contract: the caller substitutes a fallback window instead of treating
/// the token as invalid.
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    let exp = value.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}
