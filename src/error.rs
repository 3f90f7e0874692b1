use crate::quality::QualityIssue;
use crate::structured::ValidationError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "cache.ttl_secs", "quoteCount")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "openai_client")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A single rejected field of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        let field = err
            .path
            .as_deref()
            .map(|p| p.trim_start_matches('.'))
            .filter(|p| !p.is_empty())
            .unwrap_or("body")
            .to_string();
        Self {
            field,
            message: err.message,
        }
    }
}

/// Why a single generation attempt was rejected.
///
/// Every variant counts toward the retry bound; none of them is surfaced to
/// a caller directly, only as the last error of an exhausted run.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("provider returned no content")]
    EmptyContent,

    #[error("provider call failed: {0}")]
    Provider(String),

    #[error("provider returned HTTP {status} ({class}): {message}")]
    Upstream {
        status: u16,
        class: String,
        message: String,
    },

    #[error("provider rejected the credential (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("output is not valid JSON: {0}")]
    Parse(String),

    #[error("output does not match the quote schema: {}", join_display(.0))]
    Schema(Vec<ValidationError>),

    #[error("output rejected by quality gate: {}", join_display(.0))]
    QualityGate(Vec<QualityIssue>),
}

impl GenerationError {
    /// Short machine-readable tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::EmptyContent => "empty_content",
            GenerationError::Provider(_) => "provider",
            GenerationError::Upstream { .. } => "upstream",
            GenerationError::Unauthorized { .. } => "unauthorized",
            GenerationError::Parse(_) => "parse",
            GenerationError::Schema(_) => "schema",
            GenerationError::QualityGate(_) => "quality_gate",
        }
    }

    /// Description safe to return to a caller.
    ///
    /// Output problems are described in full. Provider failures are reduced
    /// to kind, class and status because provider messages may quote the
    /// credential back.
    pub fn public_detail(&self) -> String {
        match self {
            GenerationError::Provider(_) => "provider call failed".to_string(),
            GenerationError::Upstream { status, class, .. } => {
                format!("provider returned HTTP {} ({})", status, class)
            }
            GenerationError::Unauthorized { status, .. } => {
                format!("provider rejected the credential (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }
}

/// Unified error type for the quote service.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid request: {}", join_display(.0))]
    RequestShape(Vec<FieldError>),

    #[error("Generation attempt failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("No valid result after {attempts} attempts{}", format_last(.last))]
    ExhaustedRetries {
        attempts: u32,
        last: Option<GenerationError>,
    },

    #[error("Request exceeded its execution budget of {budget_secs}s")]
    Timeout { budget_secs: u64 },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote error: HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: String,
        message: String,
        retryable: bool,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_last(last: &Option<GenerationError>) -> String {
    match last {
        Some(e) => format!(": {}", e),
        None => String::new(),
    }
}

fn join_display<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the error was caused by the caller's request rather than by
    /// generation or the service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::RequestShape(_))
    }

    /// Convert a failed provider call into the attempt-level error the
    /// retry loop reasons about.
    pub fn into_generation_error(self) -> GenerationError {
        match self {
            Error::Generation(e) => e,
            Error::Remote {
                status, message, ..
            } if status == 401 || status == 403 => GenerationError::Unauthorized { status, message },
            Error::Remote {
                status,
                class,
                message,
                ..
            } => GenerationError::Upstream {
                status,
                class,
                message,
            },
            other => GenerationError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_formatting() {
        let err = Error::configuration_with_context(
            "invalid number",
            ErrorContext::new()
                .with_field_path("QUOTEGEN_MAX_ATTEMPTS")
                .with_details("got 'three'"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid number (field: QUOTEGEN_MAX_ATTEMPTS, details: got 'three')"
        );
        assert!(err.context().is_some());
    }

    #[test]
    fn test_field_error_from_validation_error_strips_root_dot() {
        let v = ValidationError::with_path("Value above maximum (10)", ".quoteCount".to_string());
        let f = FieldError::from(v);
        assert_eq!(f.field, "quoteCount");

        let root = ValidationError::with_path("Expected type 'object', got 'array'", String::new());
        assert_eq!(FieldError::from(root).field, "body");
    }

    #[test]
    fn test_remote_auth_maps_to_unauthorized() {
        let err = Error::Remote {
            status: 401,
            class: "authentication".into(),
            message: "Incorrect API key".into(),
            retryable: false,
        };
        assert!(matches!(
            err.into_generation_error(),
            GenerationError::Unauthorized { status: 401, .. }
        ));

        let err = Error::Remote {
            status: 500,
            class: "server_error".into(),
            message: "boom".into(),
            retryable: true,
        };
        assert_eq!(err.into_generation_error().kind(), "upstream");

        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "reset"));
        assert_eq!(io.into_generation_error().kind(), "provider");
    }

    #[test]
    fn test_public_detail_never_echoes_provider_text() {
        let unauthorized = GenerationError::Unauthorized {
            status: 401,
            message: "Incorrect API key provided: sk-secret".into(),
        };
        assert_eq!(
            unauthorized.public_detail(),
            "provider rejected the credential (HTTP 401)"
        );

        let upstream = GenerationError::Upstream {
            status: 429,
            class: "rate_limited".into(),
            message: "key sk-secret is over quota".into(),
        };
        assert_eq!(upstream.public_detail(), "provider returned HTTP 429 (rate_limited)");

        let provider = GenerationError::Provider("connect error for sk-secret".into());
        assert!(!provider.public_detail().contains("sk-secret"));

        let parse = GenerationError::Parse("expected value at line 1 column 1".into());
        assert_eq!(
            parse.public_detail(),
            "output is not valid JSON: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_exhausted_display_includes_last_error() {
        let err = Error::ExhaustedRetries {
            attempts: 3,
            last: Some(GenerationError::Parse("expected value at line 1".into())),
        };
        assert!(err.to_string().contains("after 3 attempts"));
        assert!(err.to_string().contains("not valid JSON"));

        let bare = Error::ExhaustedRetries {
            attempts: 0,
            last: None,
        };
        assert_eq!(bare.to_string(), "No valid result after 0 attempts");
    }
}
