use std::{sync::Arc, time::Duration};

use tokio::{sync::RwLock, time::Instant};
use tracing::info;

use crate::{
    error::{Error, Result},
    spotify::auth::TokenExchange,
};

/// Seconds shaved off every token lifetime so a token is never presented
/// right as it expires.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct SystemCredential {
    pub access_token: String,
    pub expires_at: Instant,
}

impl SystemCredential {
    fn is_valid(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-wide cache of the system account's access token.
///
/// Valid tokens are served under a shared read lock; a refresh takes the
/// write lock and re-checks before calling the accounts service, so
/// concurrent callers that all found the token stale trigger one exchange.
pub struct CredentialCache {
    refresh_token: Option<String>,
    exchange: Arc<dyn TokenExchange>,
    credential: RwLock<Option<SystemCredential>>,
}

impl CredentialCache {
    pub fn new(refresh_token: Option<String>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            refresh_token,
            exchange,
            credential: RwLock::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.refresh_token.is_some()
    }

    pub async fn get_token(&self) -> Result<String> {
        let refresh_token = self.refresh_token.as_deref().ok_or_else(|| {
            Error::Configuration(
                "SPOTIFY_SYSTEM_REFRESH_TOKEN is not set. Visit /api/admin/spotify-setup \
                 to configure the system account."
                    .to_string(),
            )
        })?;

        if let Some(token) = self.cached(Instant::now()).await {
            return Ok(token);
        }

        let mut slot = self.credential.write().await;
        if let Some(credential) = slot.as_ref() {
            if credential.is_valid(Instant::now()) {
                return Ok(credential.access_token.clone());
            }
        }

        let response = self.exchange.refresh(refresh_token).await?;
        let lifetime = response.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        let credential = SystemCredential {
            access_token: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        };
        info!(valid_for_secs = lifetime, "system account token refreshed");

        let token = credential.access_token.clone();
        *slot = Some(credential);
        Ok(token)
    }

    async fn cached(&self, now: Instant) -> Option<String> {
        self.credential
            .read()
            .await
            .as_ref()
            .filter(|c| c.is_valid(now))
            .map(|c| c.access_token.clone())
    }
}
