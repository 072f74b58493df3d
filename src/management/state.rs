use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::{Mutex, watch},
    time::Instant,
};

/// How long an authorization started at `/admin/spotify-setup` may take to
/// come back through the callback.
pub const AUTHORIZATION_TTL: Duration = Duration::from_secs(600);

struct Pending {
    verifier: String,
    started: Instant,
}

/// PKCE verifiers of admin authorizations in flight, keyed by OAuth `state`,
/// plus the refresh token of the last one that completed.
pub struct PendingAuthorizations {
    pending: Mutex<HashMap<String, Pending>>,
    completed: watch::Sender<Option<String>>,
}

impl Default for PendingAuthorizations {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingAuthorizations {
    pub fn new() -> Self {
        let (completed, _) = watch::channel(None);
        Self {
            pending: Mutex::new(HashMap::new()),
            completed,
        }
    }

    pub async fn insert(&self, state: String, verifier: String) {
        let now = Instant::now();
        let mut pending = self.pending.lock().await;
        pending.retain(|_, p| now.duration_since(p.started) < AUTHORIZATION_TTL);
        pending.insert(
            state,
            Pending {
                verifier,
                started: now,
            },
        );
    }

    /// Removes and returns the verifier for `state`. Each state is usable
    /// once; expired states are treated as unknown.
    pub async fn take(&self, state: &str) -> Option<String> {
        let pending = self.pending.lock().await.remove(state)?;
        (pending.started.elapsed() < AUTHORIZATION_TTL).then_some(pending.verifier)
    }

    pub fn complete(&self, refresh_token: String) {
        self.completed.send_replace(Some(refresh_token));
    }

    /// Waits until an authorization completes and returns its refresh token.
    pub async fn wait_for_refresh_token(&self) -> Option<String> {
        let mut receiver = self.completed.subscribe();
        let token = receiver.wait_for(Option::is_some).await.ok()?;
        token.clone()
    }
}
