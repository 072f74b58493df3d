use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    config::Settings,
    error::{Error, Result},
    types::TokenResponse,
};

/// Scopes granted to the system account. Playlists are created public so
/// visitors can open them, private modification is requested for cleanup.
pub const SYSTEM_ACCOUNT_SCOPE: &str =
    "playlist-modify-public playlist-modify-private user-read-private";

/// Exchanges a long-lived refresh token for a fresh access token.
///
/// This is the seam between the credential cache and the accounts service;
/// the cache never talks HTTP itself.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse>;
}

/// Client for the Spotify accounts service (`accounts.spotify.com`).
///
/// Every call authenticates the application with HTTP Basic credentials
/// built from the configured client id and secret.
#[derive(Debug, Clone)]
pub struct SpotifyAccounts {
    client: Client,
    token_url: String,
    auth_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyAccounts {
    pub fn new(settings: &Settings, client: Client) -> Self {
        Self {
            client,
            token_url: settings.spotify_token_url.clone(),
            auth_url: settings.spotify_auth_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
        }
    }

    /// Builds the authorization URL the admin visits once to grant the
    /// system account scopes.
    ///
    /// # Arguments
    ///
    /// * `state` - Opaque value echoed back on the callback, used to look up
    ///   the pending PKCE verifier
    /// * `code_challenge` - S256 challenge derived from that verifier
    ///
    /// The consent dialog is always shown so the admin can pick the right
    /// account even when already logged in to Spotify with another one.
    pub fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SYSTEM_ACCOUNT_SCOPE),
                ("state", state),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| Error::Configuration(format!("invalid SPOTIFY_API_AUTH_URL: {e}")))
    }

    /// Exchanges an authorization code from the admin callback for tokens.
    ///
    /// # Errors
    ///
    /// - [`Error::UpstreamAuth`] when the accounts service rejects the code
    /// - [`Error::Http`] on transport or decoding failures
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamAuth {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}

#[async_trait]
impl TokenExchange for SpotifyAccounts {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        debug!("refreshing system account access token");
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
