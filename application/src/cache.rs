//! Response cache
//!
//! Time-bounded store of successful single-provider answers. Expiry is
//! checked on every lookup, so an entry is never served past its TTL even
//! if the background sweep has not run yet.

use dashmap::DashMap;
use panel_domain::QuerySuccess;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Model component of a key when the caller did not pick a model
pub const DEFAULT_MODEL_KEY: &str = "default";

/// Cache lookup key: provider, exact prompt and requested model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    provider: String,
    prompt: String,
    model: String,
}

impl CacheKey {
    pub fn new(provider: impl Into<String>, prompt: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            provider: provider.into(),
            prompt: prompt.into(),
            model: model.unwrap_or(DEFAULT_MODEL_KEY).to_string(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.prompt, self.model)
    }
}

/// Cache timing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of an entry; zero means entries never expire
    pub ttl: Duration,
    /// Period of the background sweep
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(600),
        }
    }
}

impl CacheConfig {
    pub fn with_ttl_seconds(seconds: u64) -> Self {
        Self {
            ttl: Duration::from_secs(seconds),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: QuerySuccess,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Process-lifetime cache of successful answers.
///
/// Only [`QuerySuccess`] values can be stored; failures are never cached.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a live entry, dropping it if it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<QuerySuccess> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!("Cache expired for key: {}", key);
        }
        None
    }

    /// Store a value with the configured TTL.
    pub fn insert(&self, key: CacheKey, value: QuerySuccess) {
        self.insert_with_ttl(key, value, self.config.ttl);
    }

    /// Store a value with an explicit TTL (zero: never expires).
    pub fn insert_with_ttl(&self, key: CacheKey, value: QuerySuccess, ttl: Duration) {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Remove every entry.
    pub fn flush(&self) {
        self.entries.clear();
        info!("Cache cleared");
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start the periodic sweep; it stops when `shutdown` is cancelled.
    pub fn spawn_sweeper(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let period = self.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!("Cache sweep removed {} expired entries", removed);
                        }
                    }
                }
            }
        })
    }
}

/// Cancel the periodic sweep and wait for it to finish.
///
/// Returns `false` when the sweeper task panicked or was aborted; the join
/// error is logged.
pub async fn stop_sweeper(shutdown: &CancellationToken, sweeper: JoinHandle<()>) -> bool {
    shutdown.cancel();
    match sweeper.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Cache sweeper ended abnormally: {}", e);
            false
        }
    }
}
