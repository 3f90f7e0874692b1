//! Service configuration.
//!
//! Values come from an optional YAML file named by `QUOTEGEN_CONFIG`, then
//! from `QUOTEGEN_*` environment variables which override the file. Anything
//! left unset keeps its default.
//!
//! Environment variables:
//! - `QUOTEGEN_BIND_ADDR`: listen address (default: `0.0.0.0:3000`)
//! - `QUOTEGEN_PROVIDER_BASE_URL`: OpenAI-compatible API root (default: `https://api.openai.com/v1`)
//! - `QUOTEGEN_MODEL`: model id (default: `gpt-4-turbo`)
//! - `QUOTEGEN_TEMPERATURE`: sampling temperature (default: `0.7`)
//! - `QUOTEGEN_HTTP_TIMEOUT_SECS`: per-call HTTP timeout (default: `30`)
//! - `QUOTEGEN_PROXY_URL`: proxy for provider calls (default: none)
//! - `QUOTEGEN_MAX_ATTEMPTS`: generation attempt bound (default: `3`)
//! - `QUOTEGEN_RETRY_PROVIDER_ERRORS`: retry failed provider calls (default: `true`)
//! - `QUOTEGEN_CACHE_TTL_SECS`: cache entry lifetime (default: `3600`)
//! - `QUOTEGEN_CACHE_ENABLED`: "true" or "false" (default: `true`)
//! - `QUOTEGEN_CACHE_PER_CREDENTIAL`: key cache entries by credential too (default: `false`)
//! - `QUOTEGEN_REQUEST_BUDGET_SECS`: wall-clock budget per request (default: `30`)
//! - `QUOTEGEN_COUNT_POLICY`: `reject` or `clamp` (default: `reject`)

use crate::cache::{CacheConfig, CacheKeyGenerator};
use crate::pipeline::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::transport::TransportConfig;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const ENV_PREFIX: &str = "QUOTEGEN_";

/// How an out-of-range `quoteCount` is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Out-of-range counts and a missing `language` are request-shape errors.
    #[default]
    Reject,
    /// Counts are clamped into [1, 10] and `language` defaults to `en`.
    Clamp,
}

impl FromStr for CountPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(CountPolicy::Reject),
            "clamp" => Ok(CountPolicy::Clamp),
            other => Err(format!("expected 'reject' or 'clamp', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub provider_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub http_timeout_secs: u64,
    pub proxy_url: Option<String>,
    pub max_attempts: u32,
    pub retry_provider_errors: bool,
    pub cache_ttl_secs: u64,
    pub cache_enabled: bool,
    pub cache_per_credential: bool,
    pub request_budget_secs: u64,
    pub count_policy: CountPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            provider_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            http_timeout_secs: 30,
            proxy_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_provider_errors: true,
            cache_ttl_secs: 3600,
            cache_enabled: true,
            cache_per_credential: false,
            request_budget_secs: 30,
            count_policy: CountPolicy::Reject,
        }
    }
}

impl ServiceConfig {
    /// Load from `QUOTEGEN_CONFIG` (if set) and the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("QUOTEGEN_CONFIG") {
            Some(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {}", e),
                ErrorContext::new()
                    .with_field_path("QUOTEGEN_CONFIG")
                    .with_details(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config file: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = get("PROVIDER_BASE_URL") {
            self.provider_base_url = v;
        }
        if let Some(v) = get("MODEL") {
            self.model = v;
        }
        if let Some(v) = get("TEMPERATURE") {
            self.temperature = parse_value("TEMPERATURE", &v)?;
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_value("HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("PROXY_URL") {
            self.proxy_url = Some(v);
        }
        if let Some(v) = get("MAX_ATTEMPTS") {
            self.max_attempts = parse_value("MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = get("RETRY_PROVIDER_ERRORS") {
            self.retry_provider_errors = parse_bool("RETRY_PROVIDER_ERRORS", &v)?;
        }
        if let Some(v) = get("CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_value("CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = get("CACHE_ENABLED") {
            self.cache_enabled = parse_bool("CACHE_ENABLED", &v)?;
        }
        if let Some(v) = get("CACHE_PER_CREDENTIAL") {
            self.cache_per_credential = parse_bool("CACHE_PER_CREDENTIAL", &v)?;
        }
        if let Some(v) = get("REQUEST_BUDGET_SECS") {
            self.request_budget_secs = parse_value("REQUEST_BUDGET_SECS", &v)?;
        }
        if let Some(v) = get("COUNT_POLICY") {
            self.count_policy = parse_value("COUNT_POLICY", &v)?;
        }
        Ok(())
    }

    /// Reject values that would make the service unusable.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        let url = url::Url::parse(&self.provider_base_url).map_err(|e| {
            invalid("PROVIDER_BASE_URL", format!("not a valid URL: {}", e), &self.provider_base_url)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "PROVIDER_BASE_URL",
                "scheme must be http or https",
                &self.provider_base_url,
            ));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("MODEL", "must not be empty", &self.model));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(
                "TEMPERATURE",
                "must be between 0.0 and 2.0",
                self.temperature,
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(invalid("HTTP_TIMEOUT_SECS", "must be positive", 0));
        }
        if let Some(proxy) = &self.proxy_url {
            url::Url::parse(proxy)
                .map_err(|e| invalid("PROXY_URL", format!("not a valid URL: {}", e), proxy))?;
        }
        if self.max_attempts == 0 {
            return Err(invalid("MAX_ATTEMPTS", "must be at least 1", 0));
        }
        if self.request_budget_secs == 0 {
            return Err(invalid("REQUEST_BUDGET_SECS", "must be positive", 0));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| invalid("BIND_ADDR", format!("{}", e), &self.bind_addr))
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_secs(self.request_budget_secs)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.provider_base_url.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            proxy_url: self.proxy_url.clone(),
            ..TransportConfig::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts).with_retry_provider_errors(self.retry_provider_errors)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_enabled(self.cache_enabled)
    }

    pub fn key_generator(&self) -> CacheKeyGenerator {
        CacheKeyGenerator::new().per_credential(self.cache_per_credential)
    }
}

fn invalid(name: &str, message: impl Into<String>, value: impl std::fmt::Display) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(format!("{}{}", ENV_PREFIX, name))
            .with_details(format!("got '{}'", value))
            .with_source("config_loader"),
    )
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| invalid(name, format!("invalid value: {}", e), raw))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, "expected a boolean", raw)),
    }
}
