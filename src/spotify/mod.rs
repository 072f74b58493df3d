//! # Spotify Integration Module
//!
//! Everything recomix does against Spotify goes through the shared system
//! account: reading public profiles and playlists, searching tracks, and
//! writing generated playlists.
//!
//! ## Layout
//!
//! ```text
//! Generation pipeline / HTTP handlers
//!          ↓
//!     Catalog trait
//!          ↓
//! SpotifyClient ── CredentialCache ── SpotifyAccounts (token exchange)
//!     ├── users     (profiles, public playlists)
//!     ├── playlist  (detail, create, details update, bulk add)
//!     └── search    (track lookup)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error mapping
//!
//! - `404` → [`Error::NotFound`], so callers can tell a private or missing
//!   playlist apart from an outage
//! - any other non-success status → [`Error::Upstream`] with the body kept
//!   for logging
//! - transport failures → [`Error::Http`]
//!
//! Nothing here retries. A failed call surfaces to the caller, which decides
//! whether it is fatal (profile lookup) or swallowed (single track search).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    error::{Error, Result},
    management::CredentialCache,
    types::{Playlist, PlaylistSummary, Profile, ResolvedTrack},
};

pub mod auth;
pub mod playlist;
pub mod search;
pub mod users;

/// Maximum number of tracks the Web API accepts in one add-items call.
pub const ADD_TRACKS_LIMIT: usize = 100;

/// Read and write operations on the music catalog, authenticated as the
/// system account.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Profile>;

    /// All public playlists of a user, every page concatenated in order.
    async fn list_public_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>>;

    /// Playlist detail including every track page.
    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist>;

    /// Creates a public playlist on the system account and returns its id.
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String>;

    async fn update_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
    ) -> Result<()>;

    /// Best catalog match for `name` by `artist`, `None` when the search has
    /// no hit.
    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<ResolvedTrack>>;

    /// One add-items write call. Callers go through [`Catalog::add_tracks`],
    /// which keeps every call within [`ADD_TRACKS_LIMIT`].
    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Adds tracks in input order, one write call per chunk of at most
    /// [`ADD_TRACKS_LIMIT`] ids. Stops at the first failing chunk.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        for chunk in track_ids.chunks(ADD_TRACKS_LIMIT) {
            self.append_tracks(playlist_id, chunk).await?;
        }
        Ok(())
    }
}

/// [`Catalog`] backed by the Spotify Web API.
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    credentials: Arc<CredentialCache>,
    system_user: OnceCell<String>,
}

impl SpotifyClient {
    pub fn new(client: Client, api_url: &str, credentials: Arc<CredentialCache>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            system_user: OnceCell::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Attaches the system account token and sends the request.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let token = self.credentials.get_token().await?;
        let response = request.bearer_auth(token).send().await?;
        check_status(response, what).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!(url, "spotify GET");
        let response = self.send(self.client.get(url), what).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound(what.to_string()));
    }

    Err(Error::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.user_profile(user_id).await
    }

    async fn list_public_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>> {
        self.public_playlists(user_id).await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.playlist(playlist_id).await
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        self.create(name, description).await
    }

    async fn update_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
    ) -> Result<()> {
        self.change_details(playlist_id, name, description).await
    }

    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<ResolvedTrack>> {
        self.find_track(name, artist).await
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.add_items(playlist_id, track_ids).await
    }
}
