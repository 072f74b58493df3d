//! Configuration management for the recomix service.
//!
//! Settings come from environment variables, optionally seeded from `.env`
//! files. The lookup order is:
//! 1. Process environment variables (highest priority)
//! 2. `.env` in the local data directory (`<data_local_dir>/recomix/.env`)
//! 3. `.env` in the working directory
//! 4. Built-in defaults for everything that is not a secret
//!
//! [`Settings::from_env`] reads everything once at start-up. Handlers never
//! touch the environment directly; they receive the settings through the
//! shared application state.

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5001";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_LOGIC_API_URL: &str = "https://api.logic.inc/2024-03-01/documents";

/// Loads environment variables from `.env` files.
///
/// Creates `<data_local_dir>/recomix/` if needed and loads the `.env` file in
/// it, then the `.env` file of the working directory. Variables that are
/// already set in the process environment are never overwritten, and a missing
/// file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/recomix/.env`
/// - macOS: `~/Library/Application Support/recomix/.env`
/// - Windows: `%LOCALAPPDATA%/recomix/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> std::result::Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("recomix/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// How the rate governor identifies a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerKeySource {
    /// Anonymous per-browser session cookie.
    Session,
    /// Peer network address.
    Address,
}

impl FromStr for CallerKeySource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "address" | "ip" => Ok(Self::Address),
            other => Err(format!(
                "invalid value '{other}' (expected 'session' or 'address')"
            )),
        }
    }
}

/// Runtime settings of the service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Long-lived refresh token of the system account. Absent until the admin
    /// authorization flow has been completed once.
    pub refresh_token: Option<String>,
    pub admin_secret: Option<String>,
    pub logic_api_token: String,
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub spotify_auth_url: String,
    pub logic_api_url: String,
    pub rate_limit_max: usize,
    pub rate_limit_window: Duration,
    pub rate_limit_key: CallerKeySource,
    pub http_timeout: Duration,
    pub search_delay: Duration,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] naming every missing required variable, or the
    /// first variable whose value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| match non_empty(name) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let client_id = required("SPOTIFY_CLIENT_ID");
        let client_secret = required("SPOTIFY_CLIENT_SECRET");
        let redirect_uri = required("SPOTIFY_REDIRECT_URI");
        let logic_api_token = required("LOGIC_API_TOKEN");

        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let server_addr = parse_var("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)?;
        let rate_limit_max = parse_var("RATE_LIMIT_MAX", "10")?;
        let rate_limit_window = Duration::from_secs(parse_var("RATE_LIMIT_WINDOW_SECS", "3600")?);
        let rate_limit_key = parse_var("RATE_LIMIT_KEY", "session")?;
        let http_timeout = Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", "30")?);
        let search_delay = Duration::from_millis(parse_var("SEARCH_DELAY_MS", "100")?);

        let cors_origins = non_empty("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:5173".to_string(),
                    "http://127.0.0.1:5173".to_string(),
                ]
            });

        Ok(Self {
            server_addr,
            client_id,
            client_secret,
            redirect_uri,
            refresh_token: non_empty("SPOTIFY_SYSTEM_REFRESH_TOKEN"),
            admin_secret: non_empty("ADMIN_SECRET"),
            logic_api_token,
            spotify_api_url: with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            spotify_token_url: with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            spotify_auth_url: with_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            logic_api_url: with_default("LOGIC_API_URL", DEFAULT_LOGIC_API_URL),
            rate_limit_max,
            rate_limit_window,
            rate_limit_key,
            http_timeout,
            search_delay,
            cors_origins,
        })
    }

    /// Settings with every default applied and the given secrets, used by
    /// tests and tooling that do not read the environment.
    pub fn with_credentials(client_id: &str, client_secret: &str, logic_api_token: &str) -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDRESS
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5001))),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: "http://127.0.0.1:5001/api/admin/callback".to_string(),
            refresh_token: None,
            admin_secret: None,
            logic_api_token: logic_api_token.to_string(),
            spotify_api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            spotify_token_url: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            spotify_auth_url: DEFAULT_SPOTIFY_AUTH_URL.to_string(),
            logic_api_url: DEFAULT_LOGIC_API_URL.to_string(),
            rate_limit_max: 10,
            rate_limit_window: Duration::from_secs(3600),
            rate_limit_key: CallerKeySource::Session,
            http_timeout: Duration::from_secs(30),
            search_delay: Duration::from_millis(100),
            cors_origins: Vec::new(),
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn with_default(name: &str, default: &str) -> String {
    non_empty(name).unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = with_default(name, default);
    raw.parse::<T>()
        .map_err(|e| Error::Configuration(format!("{name}: {e}")))
}
