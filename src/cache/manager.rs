//! Cache manager.

use super::backend::CacheBackend;
use super::key::CacheKey;
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub default_ttl: Duration,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(3600),
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Typed cache over a [`CacheBackend`].
///
/// Constructed once at startup and shared; lives as long as the process.
pub struct CacheManager {
    config: CacheConfig,
    backend: Box<dyn CacheBackend>,
    stats: AtomicStats,
}

impl CacheManager {
    pub fn new(config: CacheConfig, backend: Box<dyn CacheBackend>) -> Self {
        Self {
            config,
            backend,
            stats: AtomicStats::default(),
        }
    }

    /// Fresh value for `key`, or `None` on a miss.
    ///
    /// An entry that no longer deserializes as `T` counts as a miss.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        self.fetch(key, true).await
    }

    /// Like [`lookup`](Self::lookup) but leaves hit and miss counters alone,
    /// for re-checking a key whose miss was already counted.
    pub async fn peek<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        self.fetch(key, false).await
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &CacheKey, record: bool) -> Result<Option<T>> {
        if !self.config.enabled {
            return Ok(None);
        }
        match self.backend.get(key).await {
            Ok(Some(data)) => match serde_json::from_slice(&data) {
                Ok(val) => {
                    if record {
                        self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(Some(val))
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                    self.stats.errors.fetch_add(1, Ordering::Relaxed);
                    Ok(None)
                }
            },
            Ok(None) => {
                if record {
                    self.stats.misses.fetch_add(1, Ordering::Relaxed);
                }
                Ok(None)
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Store `value` under `key` with the default TTL, replacing any entry.
    pub async fn store<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        self.store_with_ttl(key, value, self.config.default_ttl).await
    }

    pub async fn store_with_ttl<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let data = serde_json::to_vec(value)?;
        match self.backend.set(key, &data, ttl).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn entries(&self) -> Result<usize> {
        self.backend.len().await
    }
}
