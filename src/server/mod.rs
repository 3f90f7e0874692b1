//! # HTTP Surface
//!
//! - `POST /api` generates quotes from `{ quoteCount, apiKey, language }`
//! - `GET /health` reports liveness and cache occupancy
//!
//! Every response carries an `x-request-id` header whose value also tags the
//! request's log span.

mod error;

pub use error::ApiError;

use crate::i18n::MessageKey;
use crate::service::{language_hint, QuoteService};
use crate::types::{Language, QuoteResponse};
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: CacheHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub backend: &'static str,
    pub entries: usize,
}

pub fn router(service: Arc<QuoteService>) -> Router {
    Router::new()
        .route("/api", post(generate_quotes))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .with_state(service)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, service: Arc<QuoteService>) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

/// POST /api
async fn generate_quotes(
    State(service): State<Arc<QuoteService>>,
    body: Bytes,
) -> Result<Json<QuoteResponse>, ApiError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::info!(error = %e, "request body is not JSON");
        ApiError::malformed_body()
    })?;
    let language = language_hint(&raw);

    service
        .handle(raw)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_error(e, language))
}

/// GET /health
async fn health(State(service): State<Arc<QuoteService>>) -> Result<Json<HealthResponse>, ApiError> {
    let entries = service
        .cache_entries()
        .await
        .map_err(|e| ApiError::from_error(e, Language::En))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cache: CacheHealth {
            backend: service.cache_backend(),
            entries,
        },
    }))
}

async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %id);

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    ApiError::localized(Language::En, MessageKey::Internal).into_response()
}
