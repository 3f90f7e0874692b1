//! # Result Cache
//!
//! Time-bounded cache of generated quote lists, keyed by request parameters.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Typed lookup/store with TTL and statistics |
//! | [`CacheConfig`] | TTL and enable flag |
//! | [`CacheBackend`] | Byte storage trait; swap in an external KV store here |
//! | [`MemoryCache`] | In-process map, stale entries read as misses |
//! | [`NullCache`] | Always-miss backend |
//! | [`CacheKeyGenerator`] | `(count, language)` key, optional credential fingerprint |
//!
//! ## Example
//!
//! ```rust
//! use quotegen::cache::{CacheConfig, CacheKeyGenerator, CacheManager, MemoryCache};
//! use quotegen::types::Language;
//! use std::time::Duration;
//!
//! let cache = CacheManager::new(
//!     CacheConfig::new().with_ttl(Duration::from_secs(3600)),
//!     Box::new(MemoryCache::new()),
//! );
//! let key = CacheKeyGenerator::new().generate(2, Language::En, "sk-...");
//! assert_eq!(key.as_str(), "quotes:2:en");
//! assert_eq!(cache.backend_name(), "memory");
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::{CacheKey, CacheKeyGenerator};
pub use manager::{CacheConfig, CacheManager, CacheStats};
