use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res, config::Settings, info, server::start_api_server, state::AppState, success,
    utils::random_token, warning,
};

/// How long `setup` waits for the browser to come back through the callback.
const SETUP_TIMEOUT: Duration = Duration::from_secs(120);

/// Authorizes the system account from the terminal.
///
/// Starts the service, opens the admin setup page in the browser and waits
/// for the callback to deliver a refresh token, which is printed for the
/// operator to store as `SPOTIFY_SYSTEM_REFRESH_TOKEN`. Without a configured
/// `ADMIN_SECRET` a one-off key is generated for this run.
pub async fn setup(mut settings: Settings) -> Res<()> {
    let secret = match settings.admin_secret.clone() {
        Some(secret) => secret,
        None => {
            let secret = random_token(32);
            settings.admin_secret = Some(secret.clone());
            secret
        }
    };

    let addr = settings.server_addr;
    let state = AppState::from_settings(settings)?;
    let authorizations = state.authorizations.clone();

    tokio::spawn(async move {
        if let Err(e) = start_api_server(state, addr).await {
            tracing::error!(error = %e, "setup server stopped");
        }
    });

    let setup_url = format!("http://{addr}/api/admin/spotify-setup?key={secret}");
    if webbrowser::open(&setup_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            setup_url
        );
    } else {
        info!("Opened the Spotify authorization page in your browser.");
    }

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Waiting for Spotify authorization...");

    let token = tokio::time::timeout(SETUP_TIMEOUT, authorizations.wait_for_refresh_token()).await;
    pb.finish_and_clear();

    match token {
        Ok(Some(refresh_token)) => {
            success!("System account authorized.");
            info!("Set this value as SPOTIFY_SYSTEM_REFRESH_TOKEN:\n{}", refresh_token);
            Ok(())
        }
        _ => Err("Authorization failed or timed out.".into()),
    }
}
