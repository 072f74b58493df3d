use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{
    config::CallerKeySource,
    error::Error,
    management::Admission,
    state::AppState,
    utils::log_tag,
};

use super::{ApiError, SessionId, session::SessionIssued};

/// Guards generation routes with the rate governor.
///
/// The reserved slot is kept only when the handler answers with a 2xx
/// status.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = caller_key(state.settings.rate_limit_key, &request);

    match state.governor.admit(&key) {
        Admission::Denied { retry_after } => {
            warn!(caller = %log_tag(&key), retry_after, "rate limit exceeded");
            ApiError::from(Error::RateLimited { retry_after }).into_response()
        }
        Admission::Admitted(permit) => {
            let response = next.run(request).await;
            if response.status().is_success() {
                permit.commit();
            }
            response
        }
    }
}

/// Session mode keys by the session cookie. A request without one falls
/// back to the peer address, since a fresh session id per request would
/// never be throttled.
fn caller_key(source: CallerKeySource, request: &Request) -> String {
    let extensions = request.extensions();
    let session = extensions.get::<SessionId>().map(|SessionId(id)| id.clone());
    let address = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let cookie_less = extensions.get::<SessionIssued>().is_some();

    let key = match source {
        CallerKeySource::Address => address.or(session),
        CallerKeySource::Session if cookie_less => address.or(session),
        CallerKeySource::Session => session.or(address),
    };
    key.unwrap_or_else(|| "anonymous".to_string())
}
