//! Convenience re-exports for common use.

pub use crate::authority::AuthorityClient;
pub use crate::config::Config;
pub use crate::error::AuthError;
pub use crate::seal::SessionSealer;
pub use crate::session::{
    Session, SessionError, SessionRecord, SessionService, SessionStatus, SessionUser,
};
pub use crate::token::{Profile, TokenResponse, TokenSet};
