//! HTTP error responses.

use crate::i18n::MessageKey;
use crate::types::Language;
use crate::{Error, FieldError, GenerationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// What a caller sees when a request fails.
///
/// Request-shape problems list every field. An exhausted generation carries
/// the last attempt's failure next to the localized message. Anything else is
/// one generic localized message and the cause goes to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400 `{ "error": [ { field, message } ] }`
    Fields(Vec<FieldError>),
    /// 400 `{ "error": "<message>" }`
    BadRequest(String),
    /// 500 `{ "error": "<message>", "detail": "<last failure>", "attempts": n }`
    Generation {
        message: String,
        detail: String,
        attempts: u32,
    },
    /// 500 `{ "error": "<message>" }`
    Internal(String),
}

impl ApiError {
    pub fn localized(language: Language, key: MessageKey) -> Self {
        ApiError::Internal(language.message(key).to_string())
    }

    fn generation_failed(language: Language, last: &GenerationError, attempts: u32) -> Self {
        ApiError::Generation {
            message: language.message(MessageKey::GenerationFailed).to_string(),
            detail: last.public_detail(),
            attempts,
        }
    }

    pub fn malformed_body() -> Self {
        ApiError::BadRequest(Language::En.message(MessageKey::InvalidRequest).to_string())
    }

    /// Map a service error, logging the detail that is not exposed.
    pub fn from_error(err: Error, language: Language) -> Self {
        match err {
            Error::RequestShape(fields) => {
                tracing::info!(fields = fields.len(), "rejected request shape");
                ApiError::Fields(fields)
            }
            Error::Timeout { .. } => {
                tracing::error!(error = %err, "quote request timed out");
                ApiError::localized(language, MessageKey::Timeout)
            }
            Error::ExhaustedRetries { attempts, last } => {
                tracing::error!(attempts, last_error = ?last, "quote generation failed");
                match last {
                    Some(last) => ApiError::generation_failed(language, &last, attempts),
                    None => ApiError::localized(language, MessageKey::GenerationFailed),
                }
            }
            Error::Generation(last) => {
                tracing::error!(error = %last, "quote generation failed");
                ApiError::generation_failed(language, &last, 1)
            }
            other => {
                tracing::error!(error = %other, "unexpected error while serving quotes");
                ApiError::localized(language, MessageKey::Internal)
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Fields(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Fields(fields) => json!({ "error": fields }),
            ApiError::Generation {
                message,
                detail,
                attempts,
            } => json!({ "error": message, "detail": detail, "attempts": attempts }),
            ApiError::BadRequest(message) | ApiError::Internal(message) => {
                json!({ "error": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
