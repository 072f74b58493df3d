use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::Error,
    management::PLAYLIST_NOT_ACCESSIBLE,
    state::AppState,
    types::ResolvedTrack,
    utils::parse_playlist_id,
};

use super::{ApiError, ok};

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    pub playlist_url: Option<String>,
}

pub(crate) fn is_playlist_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `GET /api/playlist/{id}/tracks`
pub async fn tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_playlist_id(&playlist_id) {
        return Err(ApiError::bad_request(
            "invalid_playlist_id",
            "Playlist ids only contain letters and digits",
        ));
    }

    let playlist = state
        .catalog
        .get_playlist(&playlist_id)
        .await
        .map_err(|e| ApiError::when_missing(e, StatusCode::NOT_FOUND, "playlist_not_found"))?;

    let tracks: Vec<ResolvedTrack> = playlist
        .tracks
        .items
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(ResolvedTrack::from_track)
        .collect();

    ok(json!({ "name": playlist.name, "tracks": tracks }))
}

/// `POST /api/playlist/validate`
///
/// Resolves a pasted playlist link and confirms the system account can
/// read it.
pub async fn validate(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let url = request
        .playlist_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing_url", "playlist_url is required"))?;

    let playlist_id = parse_playlist_id(&url).ok_or_else(|| {
        ApiError::bad_request(
            "invalid_url",
            "Enter a playlist link like https://open.spotify.com/playlist/...",
        )
    })?;

    let playlist = state
        .catalog
        .get_playlist(&playlist_id)
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => {
                ApiError::bad_request("playlist_not_accessible", PLAYLIST_NOT_ACCESSIBLE)
            }
            other => other.into(),
        })?;

    ok(json!({
        "playlist_id": playlist.id,
        "playlist_name": playlist.name,
        "tracks_total": playlist.tracks.total,
        "images": playlist.images,
    }))
}
