//! Error taxonomy shared by the Spotify client, the Logic gateway and the
//! generation pipeline.
//!
//! Remote response bodies are carried for diagnostics only. The HTTP layer
//! ([`crate::api::ApiError`]) logs them and answers with a generic message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required secret or setting is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The refresh token exchange with the accounts service failed.
    #[error("token exchange failed ({status}): {body}")]
    UpstreamAuth { status: u16, body: String },

    /// The requested user or playlist does not exist or is not public.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response from the Spotify Web API.
    #[error("spotify api error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The Logic API answered with something other than 200.
    #[error("logic api error ({status}): {body}")]
    Oracle { status: u16, body: String },

    /// Malformed caller input.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("rate limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// Transport or decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
