use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{api, state::AppState};

/// Builds the full HTTP surface around `state`.
pub fn router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/generate/from-playlist", post(api::generation::from_playlist))
        .route("/generate/from-text", post(api::generation::from_text))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::rate_limit::rate_limit,
        ));

    let routes = Router::new()
        .route("/health", get(api::health))
        .route("/profile/{username}", get(api::profile::profile))
        .route("/profile/{username}/playlists", get(api::profile::playlists))
        .route("/playlist/validate", post(api::playlist::validate))
        .route("/playlist/{id}/tracks", get(api::playlist::tracks))
        .route("/describe", post(api::generation::describe))
        .route("/generate/result", get(api::generation::result))
        .route("/admin/spotify-setup", get(api::admin::spotify_setup))
        .route("/admin/callback", get(api::admin::callback))
        .merge(limited)
        .fallback(api::not_found);

    let cors = cors_layer(&state.settings.cors_origins);

    Router::new()
        .nest("/api", routes)
        .layer(middleware::from_fn(api::session::session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn start_api_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "recomix listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
