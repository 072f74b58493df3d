use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{state::AppState, utils::parse_user_id};

use super::{ApiError, ok};

fn user_id(input: &str) -> Result<String, ApiError> {
    parse_user_id(input).ok_or_else(|| {
        ApiError::bad_request(
            "invalid_username",
            "Enter a Spotify username or a profile link like https://open.spotify.com/user/...",
        )
    })
}

/// `GET /api/profile/{username}`
pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = user_id(&username)?;
    let profile = state
        .catalog
        .get_profile(&user_id)
        .await
        .map_err(|e| ApiError::when_missing(e, StatusCode::NOT_FOUND, "user_not_found"))?;
    ok(profile)
}

/// `GET /api/profile/{username}/playlists`
///
/// Public playlists sorted by name, ignoring case.
pub async fn playlists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = user_id(&username)?;
    let mut playlists = state
        .catalog
        .list_public_playlists(&user_id)
        .await
        .map_err(|e| ApiError::when_missing(e, StatusCode::NOT_FOUND, "user_not_found"))?;
    playlists.sort_by_cached_key(|p| p.name.to_lowercase());

    ok(json!({ "user_id": user_id, "playlists": playlists }))
}
