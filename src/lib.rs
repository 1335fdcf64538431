//! Vestibule — OIDC password-grant session layer.
//!
//! Owns the token lifecycle of a thin web front-end that delegates identity
//! to an external OpenID Connect authority: password-grant login, lazy
//! access-time refresh with a sticky failure flag, and projection into the
//! session shape a UI consumes. Session state travels between requests
//! inside a signed envelope.
//!
//! # Quick Start
//!
//! ```no_run
//! use vestibule::prelude::*;
//!
//! # async fn example() -> Result<(), AuthError> {
//! let config = Config::from_env()?;
//! let sessions = SessionService::from_config(&config);
//! let sealer = SessionSealer::from_config(&config);
//!
//! let record = sessions.login("user1", "pass1").await?;
//! let cookie = sealer.seal(&record)?;
//!
//! // On a later request: reopen, refresh if expired, hand the view to the UI.
//! let record = sessions.resolve(sealer.open(&cookie)?).await;
//! let session = record.project();
//! # Ok(())
//! # }
//! ```

pub mod authority;
pub mod claims;
pub mod config;
pub mod error;
pub mod prelude;
pub mod seal;
pub mod session;
pub mod token;
