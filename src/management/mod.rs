mod auth;
mod generation;
mod materializer;
mod rate_limit;
mod session;
mod state;

pub use auth::{CredentialCache, EXPIRY_MARGIN_SECS, SystemCredential};
pub use generation::{
    Generator, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE, PLAYLIST_NOT_ACCESSIBLE,
};
pub use materializer::{Materializer, Resolution};
pub use rate_limit::{Admission, Permit, RateGovernor};
pub use session::{SESSION_TTL, SessionData, SessionStore};
pub use state::{AUTHORIZATION_TTL, PendingAuthorizations};
