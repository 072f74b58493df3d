//! Client for the Logic document-execution API, the recommendation oracle
//! behind every generated playlist.
//!
//! Two documents are executed: one turns a free-text description into a
//! titled list of recommendations, the other does the same from the tracks of
//! an existing playlist. Both answer with the same `output` shape.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    types::{OracleOutput, OracleResponse, Playlist, TrackDescriptor},
};

pub const FROM_TEXT_DOCUMENT: &str = "generate-spotify-playlist-from-text";
pub const FROM_PLAYLIST_DOCUMENT: &str = "recommend-songs-from-playlist";

#[async_trait]
pub trait Oracle: Send + Sync {
    async fn from_text(&self, description: &str) -> Result<OracleOutput>;

    async fn from_playlist(&self, tracks: &[TrackDescriptor]) -> Result<OracleOutput>;
}

/// [`Oracle`] backed by the Logic HTTP API, authenticated with a static
/// bearer token.
pub struct LogicClient {
    client: Client,
    base_url: String,
    token: String,
}

impl LogicClient {
    pub fn new(client: Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn execute(&self, document: &str, body: serde_json::Value) -> Result<OracleOutput> {
        let url = format!("{}/{document}/executions", self.base_url);
        debug!(document, "executing logic document");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Oracle {
                status: status.as_u16(),
                body,
            });
        }

        let execution: OracleResponse = response.json().await?;
        info!(
            document,
            recommendations = execution.output.recommendations.len(),
            "logic document executed"
        );
        Ok(execution.output)
    }
}

#[async_trait]
impl Oracle for LogicClient {
    async fn from_text(&self, description: &str) -> Result<OracleOutput> {
        self.execute(FROM_TEXT_DOCUMENT, json!({ "description": description }))
            .await
    }

    async fn from_playlist(&self, tracks: &[TrackDescriptor]) -> Result<OracleOutput> {
        self.execute(
            FROM_PLAYLIST_DOCUMENT,
            json!({ "playlistJson": { "tracks": tracks } }),
        )
        .await
    }
}

/// Summaries of every track of `playlist` in playlist order.
///
/// Items whose track is gone (removed or unavailable) are skipped. Only the
/// first credited artist is kept.
pub fn track_descriptors(playlist: &Playlist) -> Vec<TrackDescriptor> {
    playlist
        .tracks
        .items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .map(|track| TrackDescriptor {
            name: track.name.clone(),
            artist: track
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            album: track
                .album
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            release_date: track
                .album
                .as_ref()
                .and_then(|a| a.release_date.clone())
                .unwrap_or_default(),
        })
        .collect()
}
