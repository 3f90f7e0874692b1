//! # Request Handler
//!
//! [`QuoteService`] owns everything one inbound call needs: request shape
//! validation, the result cache, per-key in-flight locks and the retry
//! orchestrator. It is built once at startup and shared behind an `Arc`.
//!
//! ```text
//! raw JSON → parse_request → cache hit? ──yes──→ quotes
//!                                 │no
//!                         in-flight lock → cache hit? ──yes──→ quotes
//!                                 │no
//!                 build_directives → RetryOrchestrator → store → quotes
//! ```

mod inflight;

pub use inflight::{InFlight, InFlightGuard};

use crate::cache::{
    CacheBackend, CacheKey, CacheKeyGenerator, CacheManager, CacheStats, MemoryCache, NullCache,
};
use crate::client::GenerationClient;
use crate::config::{CountPolicy, ServiceConfig};
use crate::i18n::MessageKey;
use crate::pipeline::RetryOrchestrator;
use crate::prompt::build_directives;
use crate::structured::{request_schema, OutputValidator};
use crate::types::{GenerationRequest, Language, QuoteItem, QuoteResponse};
use crate::{Error, FieldError, Result};
use serde_json::Value;
use std::sync::Arc;

pub struct QuoteService {
    config: ServiceConfig,
    cache: CacheManager,
    keys: CacheKeyGenerator,
    orchestrator: RetryOrchestrator,
    request_validator: OutputValidator,
    in_flight: InFlight,
}

impl QuoteService {
    /// Build with the cache backend implied by `config`.
    pub fn new(config: ServiceConfig, client: Arc<dyn GenerationClient>) -> Self {
        let backend: Box<dyn CacheBackend> = if config.cache_enabled {
            Box::new(MemoryCache::new())
        } else {
            Box::new(NullCache::new())
        };
        Self::with_cache_backend(config, client, backend)
    }

    pub fn with_cache_backend(
        config: ServiceConfig,
        client: Arc<dyn GenerationClient>,
        backend: Box<dyn CacheBackend>,
    ) -> Self {
        let orchestrator = RetryOrchestrator::new(
            client,
            Arc::new(config.retry_policy()),
            config.model.clone(),
            config.temperature,
        );
        let strict = config.count_policy == CountPolicy::Reject;
        Self {
            cache: CacheManager::new(config.cache_config(), backend),
            keys: config.key_generator(),
            orchestrator,
            request_validator: OutputValidator::new(request_schema(strict)),
            in_flight: InFlight::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validate `raw`, then answer from the cache or a fresh generation.
    pub async fn handle(&self, raw: Value) -> Result<QuoteResponse> {
        let request = self.parse_request(&raw)?;
        self.generate(&request).await.map(QuoteResponse::from)
    }

    /// Turn an inbound body into a [`GenerationRequest`] under the configured
    /// [`CountPolicy`].
    pub fn parse_request(&self, raw: &Value) -> Result<GenerationRequest> {
        let hint = language_hint(raw);
        if let Err(errors) = self.request_validator.validate_or_fail(raw) {
            let mut fields: Vec<FieldError> = Vec::with_capacity(errors.len());
            for error in errors {
                let field = localize(FieldError::from(error), hint);
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            return Err(Error::RequestShape(fields));
        }

        let count = match self.config.count_policy {
            CountPolicy::Reject => raw["quoteCount"]
                .as_f64()
                .and_then(whole_count)
                .ok_or_else(|| shape_error("quoteCount", hint))?,
            CountPolicy::Clamp => {
                let n = raw["quoteCount"]
                    .as_f64()
                    .ok_or_else(|| shape_error("quoteCount", hint))?;
                clamp_count(n)
            }
        };

        let language = match raw.get("language").and_then(Value::as_str) {
            Some(s) => s
                .parse::<Language>()
                .map_err(|_| shape_error("language", hint))?,
            None => Language::default(),
        };

        let credential = raw["apiKey"].as_str().unwrap_or_default().to_string();

        Ok(GenerationRequest {
            count,
            credential,
            language,
        })
    }

    /// Cached or freshly generated quotes for an already validated request.
    ///
    /// Everything after the first cache lookup is bounded by the request
    /// budget; an elapsed budget caches nothing.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<QuoteItem>> {
        let key = self
            .keys
            .generate(request.count, request.language, &request.credential);

        if let Some(items) = self.cached(&key).await {
            tracing::info!(key = %key, "cache hit");
            return Ok(items);
        }
        tracing::info!(key = %key, "cache miss");

        let budget = self.config.request_budget();
        match tokio::time::timeout(budget, self.generate_locked(&key, request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(key = %key, budget_secs = budget.as_secs(), "request budget elapsed");
                Err(Error::Timeout {
                    budget_secs: budget.as_secs(),
                })
            }
        }
    }

    async fn generate_locked(
        &self,
        key: &CacheKey,
        request: &GenerationRequest,
    ) -> Result<Vec<QuoteItem>> {
        let _guard = self.in_flight.acquire(key).await;

        // The miss was already counted before the lock.
        match self.cache.peek(key).await {
            Ok(Some(items)) => {
                tracing::debug!(key = %key, "served by a concurrent generation");
                return Ok(items);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "cache lookup failed"),
        }

        let directives = build_directives(request.count, request.language);
        let items = self
            .orchestrator
            .run(&request.credential, &directives, usize::from(request.count))
            .await
            .into_result()?;

        if let Err(e) = self.cache.store(key, &items).await {
            tracing::warn!(key = %key, error = %e, "failed to cache generated quotes");
        }
        tracing::info!(key = %key, quotes = items.len(), "generated quotes");
        Ok(items)
    }

    /// Cache failures degrade to a miss.
    async fn cached(&self, key: &CacheKey) -> Option<Vec<QuoteItem>> {
        match self.cache.lookup(key).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache lookup failed");
                None
            }
        }
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }

    pub async fn cache_entries(&self) -> Result<usize> {
        self.cache.entries().await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Best-effort language of a possibly invalid body, for localizing errors.
pub fn language_hint(raw: &Value) -> Language {
    raw.get("language")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn clamp_count(n: f64) -> u8 {
    let min = f64::from(GenerationRequest::MIN_COUNT);
    let max = f64::from(GenerationRequest::MAX_COUNT);
    n.trunc().clamp(min, max) as u8
}

/// `n` as a count when it is a whole number inside the allowed range.
fn whole_count(n: f64) -> Option<u8> {
    let range = f64::from(GenerationRequest::MIN_COUNT)..=f64::from(GenerationRequest::MAX_COUNT);
    (n.fract() == 0.0 && range.contains(&n)).then_some(n as u8)
}

fn message_key(field: &str) -> MessageKey {
    match field {
        "quoteCount" => MessageKey::InvalidCount,
        "apiKey" => MessageKey::MissingApiKey,
        "language" => MessageKey::InvalidLanguage,
        _ => MessageKey::InvalidRequest,
    }
}

/// Replace the validator's wording with the caller-facing message for the field.
fn localize(mut field: FieldError, language: Language) -> FieldError {
    field.message = language.message(message_key(&field.field)).to_string();
    field
}

fn shape_error(field: &str, language: Language) -> Error {
    Error::RequestShape(vec![localize(FieldError::new(field, ""), language)])
}
