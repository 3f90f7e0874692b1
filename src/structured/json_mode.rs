//! JSON mode support and the decode stage for provider output.
//!
//! Decoding is separate from schema validation: text that is not
//! JSON at all fails here with [`GenerationError::Parse`], before any schema
//! is consulted.

use crate::error::GenerationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// JSON mode options for the provider's `response_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JsonMode {
    /// Ask the provider to guarantee a JSON object
    #[default]
    Json,

    /// No JSON mode enforcement, rely on prompt instructions alone
    Off,
}

impl JsonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonMode::Json => "json_object",
            JsonMode::Off => "",
        }
    }

    /// Value for the `response_format` field of a chat completion request,
    /// or `None` when the field should be omitted.
    pub fn to_openai_format(&self) -> Option<Value> {
        match self {
            JsonMode::Json => Some(serde_json::json!({ "type": self.as_str() })),
            JsonMode::Off => None,
        }
    }
}

impl std::fmt::Display for JsonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JsonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json_object" | "json" => Ok(JsonMode::Json),
            "off" | "" => Ok(JsonMode::Off),
            _ => Err(format!("Unknown JSON mode: {}", s)),
        }
    }
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
});

/// Decode raw provider text into a JSON value.
///
/// A single surrounding markdown code fence (```` ```json ... ``` ````) is
/// stripped first, since models add one even in JSON mode.
pub fn decode(raw: &str) -> Result<Value, GenerationError> {
    let trimmed = raw.trim();
    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    serde_json::from_str(body).map_err(|e| GenerationError::Parse(e.to_string()))
}
