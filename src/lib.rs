//! # quotegen
//!
//! Inspirational quote generation over an OpenAI-compatible chat completions
//! API, served as a small HTTP service.
//!
//! ## Overview
//!
//! A caller asks for `quoteCount` quotes in a language, supplying its own
//! provider credential. The service builds a fixed directive pair, asks the
//! provider for a JSON answer, and accepts it only once it decodes, matches
//! the quote schema and passes the quality gate. Rejected answers are retried
//! up to a fixed bound. Accepted lists are cached per `(count, language)`.
//!
//! ## Core Flow
//!
//! ```text
//! POST /api → QuoteService → CacheManager ─hit──────────────────────→ quotes
//!                                 │miss
//!                                 └→ RetryOrchestrator ⇄ GenerationClient
//!                                        decode → QuoteSchema → QualityGate
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quotegen::client::OpenAiClient;
//! use quotegen::config::ServiceConfig;
//! use quotegen::service::QuoteService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> quotegen::Result<()> {
//!     let config = ServiceConfig::from_env()?;
//!     let client = OpenAiClient::new(&config.transport_config())?;
//!     let service = QuoteService::new(config, Arc::new(client));
//!
//!     let response = service
//!         .handle(serde_json::json!({
//!             "quoteCount": 3,
//!             "apiKey": "sk-...",
//!             "language": "en"
//!         }))
//!         .await?;
//!     for quote in response.quotes {
//!         println!("{} ({})", quote.text, quote.author);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Messages, quote items, validated requests, languages |
//! | [`prompt`] | Directive pair construction |
//! | [`client`] | Generation client trait and the OpenAI implementation |
//! | [`transport`] | Pooled HTTP transport |
//! | [`structured`] | Decoding and schema validation of provider output |
//! | [`quality`] | Semantic checks on schema-valid quote lists |
//! | [`pipeline`] | Retry orchestration |
//! | [`cache`] | TTL result cache with pluggable backends |
//! | [`service`] | Request handling end to end |
//! | [`server`] | axum routes and HTTP error mapping |
//! | [`config`] | Environment and YAML configuration |
//! | [`i18n`] | Localized user-visible messages |

pub mod cache;
pub mod client;
pub mod config;
pub mod i18n;
pub mod pipeline;
pub mod prompt;
pub mod quality;
pub mod server;
pub mod service;
pub mod structured;
pub mod transport;
pub mod types;

pub use client::{GenerationClient, OpenAiClient};
pub use config::{CountPolicy, ServiceConfig};
pub use service::QuoteService;
pub use types::{
    message::{Message, MessageRole},
    GenerationRequest, Language, QuoteItem, QuoteResponse,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, FieldError, GenerationError};
