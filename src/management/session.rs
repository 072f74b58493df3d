use std::{collections::HashMap, time::Duration};

use tokio::{sync::RwLock, time::Instant};

use crate::types::GeneratedPlaylist;

/// How long a session is remembered after it last stored something.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// What the service remembers about one anonymous browser session.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub description: Option<String>,
    pub last_result: Option<GeneratedPlaylist>,
}

#[derive(Debug)]
struct Entry {
    data: SessionData,
    touched: Instant,
}

/// In-memory per-session state. Lost on restart.
///
/// Sessions idle for longer than the TTL are dropped whenever any session
/// stores something, and read as empty until then.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set_description(&self, session: &str, description: String) {
        self.update(session, |data| data.description = Some(description)).await;
    }

    pub async fn description(&self, session: &str) -> Option<String> {
        self.read(session, |data| data.description.clone()).await
    }

    pub async fn set_result(&self, session: &str, result: GeneratedPlaylist) {
        self.update(session, |data| data.last_result = Some(result)).await;
    }

    pub async fn last_result(&self, session: &str) -> Option<GeneratedPlaylist> {
        self.read(session, |data| data.last_result.clone()).await
    }

    /// Number of sessions currently held in memory.
    pub async fn tracked_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn update(&self, session: &str, apply: impl FnOnce(&mut SessionData)) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| now.duration_since(entry.touched) < self.ttl);

        let entry = sessions.entry(session.to_string()).or_insert_with(|| Entry {
            data: SessionData::default(),
            touched: now,
        });
        entry.touched = now;
        apply(&mut entry.data);
    }

    async fn read<T>(
        &self,
        session: &str,
        get: impl FnOnce(&SessionData) -> Option<T>,
    ) -> Option<T> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(session)?;
        if entry.touched.elapsed() >= self.ttl {
            return None;
        }
        get(&entry.data)
    }
}
