//! Token-based web panel sessions.
//!
//! Tokens are 32 random bytes hex-encoded. Sessions expire 30 minutes after
//! creation; expired entries are evicted lazily on check, with an optional
//! sweep for long-idle stores.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::RngCore;

/// Default session lifetime
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub struct SessionStore {
    /// token -> expiry instant
    sessions: DashMap<String, Instant>,
    ttl: Duration,
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

    /// Custom lifetime, mainly for tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Create a session and return its token.
    pub fn create(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.sessions
            .insert(token.clone(), Instant::now() + self.ttl);
        token
    }

    /// Check a token, evicting it if expired.
    pub fn is_valid(&self, token: &str) -> bool {
        let Some(expiry) = self.sessions.get(token).map(|entry| *entry.value()) else {
            return false;
        };

        if Instant::now() > expiry {
            self.sessions.remove(token);
            return false;
        }
        true
    }

    /// Drop a session. Unknown tokens are fine (logout is idempotent).
    pub fn invalidate(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Drop every expired session, returning how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, expiry| now <= *expiry);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
