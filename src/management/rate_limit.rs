use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

type Windows = HashMap<String, VecDeque<Instant>>;

/// Result of an admission check.
#[derive(Debug)]
pub enum Admission {
    Admitted(Permit),
    Denied { retry_after: u64 },
}

/// Sliding-window throttle keyed by caller.
///
/// Checking and reserving a slot happen under one lock, so two concurrent
/// requests from the same caller can never both take the last slot. The
/// reservation only becomes a recorded request once the returned [`Permit`]
/// is committed.
#[derive(Debug)]
pub struct RateGovernor {
    max: usize,
    window: Duration,
    entries: Mutex<Windows>,
}

impl RateGovernor {
    pub fn new(max: usize, window: Duration) -> Self {
        Self {
            max,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn admit(self: &Arc<Self>, key: &str) -> Admission {
        self.admit_at(key, Instant::now())
    }

    pub fn admit_at(self: &Arc<Self>, key: &str, now: Instant) -> Admission {
        let mut entries = self.lock();
        self.sweep(&mut entries, now);

        let timestamps = entries.entry(key.to_string()).or_default();
        if timestamps.len() >= self.max {
            let retry_after = match timestamps.front() {
                Some(oldest) => ceil_secs(self.window.saturating_sub(now - *oldest)),
                None => ceil_secs(self.window),
            };
            if timestamps.is_empty() {
                entries.remove(key);
            }
            return Admission::Denied {
                retry_after: retry_after.max(1),
            };
        }

        timestamps.push_back(now);
        Admission::Admitted(Permit {
            governor: Arc::clone(self),
            key: key.to_string(),
            at: now,
            committed: false,
        })
    }

    /// Number of callers currently holding at least one timestamp.
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    /// Drops expired timestamps everywhere and forgets callers left with
    /// none.
    fn sweep(&self, entries: &mut Windows, now: Instant) {
        entries.retain(|_, timestamps| {
            while timestamps
                .front()
                .is_some_and(|t| now.duration_since(*t) >= self.window)
            {
                timestamps.pop_front();
            }
            !timestamps.is_empty()
        });
    }

    fn release(&self, key: &str, at: Instant) {
        let mut entries = self.lock();
        if let Some(timestamps) = entries.get_mut(key) {
            if let Some(pos) = timestamps.iter().rposition(|t| *t == at) {
                timestamps.remove(pos);
            }
            if timestamps.is_empty() {
                entries.remove(key);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Windows> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A reserved slot in a caller's window.
///
/// Dropping the permit without calling [`Permit::commit`] gives the slot
/// back.
#[derive(Debug)]
pub struct Permit {
    governor: Arc<RateGovernor>,
    key: String,
    at: Instant,
    committed: bool,
}

impl Permit {
    /// Keeps the reservation as a recorded request.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if !self.committed {
            self.governor.release(&self.key, self.at);
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
