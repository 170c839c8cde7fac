//! Login throttling to slow down password guessing
//!
//! Only failed attempts count. Once a key reaches the failure limit within
//! the window it is locked out; a successful login clears the key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Failed attempts tolerated inside one window
    pub max_failures: u32,
    /// Window over which failures are counted
    pub window: Duration,
    /// How long a key stays locked after reaching the limit
    pub lockout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: Duration::from_secs(300),  // 5 minutes
            lockout: Duration::from_secs(900), // 15 minutes
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    failures: u32,
    window_start: Instant,
    locked_until: Option<Instant>,
}

/// Rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `key` may attempt a login right now
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let (locked_until, window_start) = match entries.get(key) {
            Some(entry) => (entry.locked_until, entry.window_start),
            None => return true,
        };

        match locked_until {
            Some(until) if now < until => false,
            Some(_) => {
                entries.remove(key);
                true
            }
            None => {
                if now.duration_since(window_start) >= self.config.window {
                    entries.remove(key);
                }
                true
            }
        }
    }

    /// Count a failed attempt for `key`
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        entries.retain(|_, entry| !self.is_stale(entry, now));

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            failures: 0,
            window_start: now,
            locked_until: None,
        });

        if now.duration_since(entry.window_start) >= self.config.window {
            entry.failures = 0;
            entry.window_start = now;
        }

        entry.failures += 1;

        if entry.failures >= self.config.max_failures && entry.locked_until.is_none() {
            entry.locked_until = Some(now + self.config.lockout);
            warn!(
                "Locked out {} for {} seconds after {} failed logins",
                key,
                self.config.lockout.as_secs(),
                entry.failures
            );
        }
    }

    /// An entry is stale once its lockout is over, or when unlocked, once its
    /// window has passed
    fn is_stale(&self, entry: &RateLimiterEntry, now: Instant) -> bool {
        match entry.locked_until {
            Some(until) => now >= until,
            None => now.duration_since(entry.window_start) >= self.config.window,
        }
    }

    /// Forget every failure recorded for `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
