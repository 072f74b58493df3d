//! # API Module
//!
//! JSON endpoints served under `/api`. Every answer carries a `status`
//! discriminator: `"ok"` next to the payload fields, or `"error"` with an
//! `error` code and a human readable `message` (see [`ApiError`]).
//!
//! ## Endpoints
//!
//! ### Browsing
//!
//! - [`profile::profile`] / [`profile::playlists`] - public profile and public
//!   playlists of a user given as name, profile URL or `spotify:user:` URI
//! - [`playlist::tracks`] - tracks of a playlist
//! - [`playlist::validate`] - resolves a pasted playlist link
//!
//! ### Generation
//!
//! - [`generation::describe`] - stores a description in the session
//! - [`generation::from_playlist`] / [`generation::from_text`] - rate
//!   limited by [`rate_limit::rate_limit`]
//! - [`generation::result`] - last generated playlist of the session
//!
//! ### Administration
//!
//! - [`admin::spotify_setup`] / [`admin::callback`] - one-time authorization
//!   of the system account, gated by `ADMIN_SECRET`
//!
//! ### Monitoring
//!
//! - [`health`] - liveness and version
//!
//! Sessions are anonymous and cookie based ([`session::session`]).

pub mod admin;
mod error;
pub mod generation;
mod health;
pub mod playlist;
pub mod profile;
pub mod rate_limit;
mod response;
pub mod session;

pub use error::ApiError;
pub use health::{health, not_found};
pub use response::ok;
pub use session::{SESSION_COOKIE, SessionId};
