use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    state::AppState,
    utils::{constant_time_eq, generate_code_challenge, generate_code_verifier, random_token},
};

use super::{ApiError, ok};

#[derive(Debug, Deserialize)]
pub struct SetupParams {
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// `GET /api/admin/spotify-setup?key=<ADMIN_SECRET>`
///
/// Starts the one-time authorization of the system account.
pub async fn spotify_setup(
    State(state): State<AppState>,
    Query(params): Query<SetupParams>,
) -> Result<Redirect, ApiError> {
    let Some(secret) = state.settings.admin_secret.as_deref() else {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "config_error",
            "ADMIN_SECRET is not configured",
        ));
    };

    let authorized = params
        .key
        .as_deref()
        .is_some_and(|key| constant_time_eq(key, secret));
    if !authorized {
        warn!("admin setup rejected");
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Invalid admin key",
        ));
    }

    let verifier = generate_code_verifier();
    let challenge = generate_code_challenge(&verifier);
    let oauth_state = random_token(32);
    let url = state.accounts.authorize_url(&oauth_state, &challenge)?;

    state.authorizations.insert(oauth_state, verifier).await;
    info!("redirecting admin to spotify authorization");
    Ok(Redirect::to(url.as_str()))
}

/// `GET /api/admin/callback?code=&state=`
///
/// Completes the authorization and hands the refresh token back to the
/// operator.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<Value>, ApiError> {
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing_code", "No authorization code received"))?;

    let invalid_state =
        || ApiError::bad_request("invalid_state", "Unknown or expired authorization state");
    let oauth_state = params.state.ok_or_else(invalid_state)?;
    let verifier = state
        .authorizations
        .take(&oauth_state)
        .await
        .ok_or_else(invalid_state)?;

    let token_error = |detail: String| {
        warn!(%detail, "authorization code exchange failed");
        ApiError::new(
            StatusCode::BAD_GATEWAY,
            "token_error",
            "Failed to exchange the authorization code",
        )
    };

    let token = state
        .accounts
        .exchange_code(&code, &verifier)
        .await
        .map_err(|e| token_error(e.to_string()))?;
    let refresh_token = token
        .refresh_token
        .ok_or_else(|| token_error("response carried no refresh token".to_string()))?;

    info!("system account authorized");
    state.authorizations.complete(refresh_token.clone());

    ok(json!({
        "refresh_token": refresh_token,
        "message": "Copy this refresh token and set it as SPOTIFY_SYSTEM_REFRESH_TOKEN",
    }))
}
