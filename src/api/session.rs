use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

use crate::utils::random_token;

pub const SESSION_COOKIE: &str = "recomix_session";
const SESSION_ID_LEN: usize = 32;

/// Anonymous session id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Marks a request that arrived without a valid session cookie. Its
/// [`SessionId`] was minted for this request only.
#[derive(Debug, Clone, Copy)]
pub struct SessionIssued;

/// Gives every browser an anonymous session id and makes it available to
/// handlers as an [`axum::Extension<SessionId>`].
pub async fn session(mut request: Request, next: Next) -> Response {
    let (id, fresh) = match session_cookie(request.headers()) {
        Some(id) => (id, false),
        None => (random_token(SESSION_ID_LEN), true),
    };
    request.extensions_mut().insert(SessionId(id.clone()));
    if fresh {
        request.extensions_mut().insert(SessionIssued);
    }

    let mut response = next.run(request).await;
    if fresh {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| {
            value.len() == SESSION_ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric())
        })
}
