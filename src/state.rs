use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::Settings,
    error::Result,
    logic::{LogicClient, Oracle},
    management::{
        CredentialCache, Generator, Materializer, PendingAuthorizations, RateGovernor,
        SessionStore,
    },
    spotify::{Catalog, SpotifyClient, auth::SpotifyAccounts},
};

/// Everything request handlers share, built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<dyn Catalog>,
    pub generator: Arc<Generator>,
    pub governor: Arc<RateGovernor>,
    pub sessions: Arc<SessionStore>,
    pub accounts: Arc<SpotifyAccounts>,
    pub authorizations: Arc<PendingAuthorizations>,
}

impl AppState {
    /// Wires the live Spotify and Logic clients.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = Client::builder().timeout(settings.http_timeout).build()?;

        let accounts = Arc::new(SpotifyAccounts::new(&settings, client.clone()));
        let credentials = Arc::new(CredentialCache::new(
            settings.refresh_token.clone(),
            accounts.clone(),
        ));
        let catalog: Arc<dyn Catalog> = Arc::new(SpotifyClient::new(
            client.clone(),
            &settings.spotify_api_url,
            credentials,
        ));
        let oracle: Arc<dyn Oracle> = Arc::new(LogicClient::new(
            client.clone(),
            &settings.logic_api_url,
            &settings.logic_api_token,
        ));

        Ok(Self::assemble(settings, catalog, oracle, accounts))
    }

    /// State around caller-supplied catalog and oracle implementations.
    pub fn new(settings: Settings, catalog: Arc<dyn Catalog>, oracle: Arc<dyn Oracle>) -> Self {
        let accounts = Arc::new(SpotifyAccounts::new(&settings, Client::new()));
        Self::assemble(settings, catalog, oracle, accounts)
    }

    fn assemble(
        settings: Settings,
        catalog: Arc<dyn Catalog>,
        oracle: Arc<dyn Oracle>,
        accounts: Arc<SpotifyAccounts>,
    ) -> Self {
        let materializer = Materializer::new(catalog.clone(), settings.search_delay);
        let generator = Generator::new(catalog.clone(), oracle, materializer);
        let governor = RateGovernor::new(settings.rate_limit_max, settings.rate_limit_window);

        Self {
            settings: Arc::new(settings),
            catalog,
            generator: Arc::new(generator),
            governor: Arc::new(governor),
            sessions: Arc::new(SessionStore::new()),
            accounts,
            authorizations: Arc::new(PendingAuthorizations::new()),
        }
    }
}
