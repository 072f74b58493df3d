use std::net::SocketAddr;

use crate::{Res, config::Settings, info, server::start_api_server, state::AppState, warning};

/// Runs the HTTP service in the foreground.
pub async fn serve(mut settings: Settings, addr: Option<SocketAddr>) -> Res<()> {
    if let Some(addr) = addr {
        settings.server_addr = addr;
    }

    if settings.refresh_token.is_none() {
        warning!(
            "SPOTIFY_SYSTEM_REFRESH_TOKEN is not set. Run `recomix setup` or visit /api/admin/spotify-setup to authorize the system account."
        );
    }

    let addr = settings.server_addr;
    let state = AppState::from_settings(settings)?;
    info!("Serving on http://{}/api", addr);

    start_api_server(state, addr).await?;
    Ok(())
}
