use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::Error,
    state::AppState,
    types::GeneratedPlaylist,
    utils::{log_tag, parse_playlist_id},
};

use super::{ApiError, SessionId, ok, playlist::is_playlist_id};

#[derive(Debug, Default, Deserialize)]
pub struct DescribeRequest {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FromPlaylistRequest {
    pub playlist_id: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing_description() -> ApiError {
    ApiError::bad_request("missing_description", "description is required")
}

/// `POST /api/describe`
///
/// Remembers a playlist description for the session so a later
/// `/generate/from-text` call may omit it.
pub async fn describe(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
    payload: Result<Json<DescribeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let description = trimmed(request.description).ok_or_else(missing_description)?;

    state
        .sessions
        .set_description(&session, description.clone())
        .await;
    ok(json!({ "description": description }))
}

/// `POST /api/generate/from-playlist`
pub async fn from_playlist(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
    payload: Result<Json<FromPlaylistRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let raw = trimmed(request.playlist_id).ok_or_else(|| {
        ApiError::bad_request("missing_playlist_id", "playlist_id is required")
    })?;

    let source_id = parse_playlist_id(&raw)
        .or_else(|| is_playlist_id(&raw).then(|| raw.clone()))
        .ok_or_else(|| ApiError::bad_request("invalid_playlist_id", "Invalid playlist id"))?;

    info!(session = %log_tag(&session), %source_id, "generating from playlist");
    let generated = state
        .generator
        .from_playlist(&source_id)
        .await
        .map_err(|e| match e {
            Error::NotFound(message) => ApiError::bad_request("playlist_error", message),
            other => other.into(),
        })?;

    respond(&state, &session, generated).await
}

/// `POST /api/generate/from-text`
///
/// Uses the description in the body, falling back to the one stored with
/// `/api/describe`.
pub async fn from_text(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
    payload: Result<Json<DescribeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let description = match trimmed(request.description) {
        Some(description) => description,
        None => state
            .sessions
            .description(&session)
            .await
            .ok_or_else(missing_description)?,
    };

    info!(session = %log_tag(&session), "generating from text");
    let generated = state.generator.from_text(&description).await?;

    respond(&state, &session, generated).await
}

/// `GET /api/generate/result`
pub async fn result(
    State(state): State<AppState>,
    Extension(SessionId(session)): Extension<SessionId>,
) -> Result<Json<Value>, ApiError> {
    let generated = state.sessions.last_result(&session).await.ok_or_else(|| {
        ApiError::not_found("no_result", "No playlist has been generated in this session")
    })?;
    ok(generated)
}

async fn respond(
    state: &AppState,
    session: &str,
    generated: GeneratedPlaylist,
) -> Result<Json<Value>, ApiError> {
    info!(
        playlist_id = %generated.playlist_id,
        found = generated.tracks.len(),
        missing = generated.not_found.len(),
        "playlist generated"
    );
    state.sessions.set_result(session, generated.clone()).await;
    ok(generated)
}
