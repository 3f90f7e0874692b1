//! Fixed schemas for provider output and inbound requests.

use crate::error::GenerationError;
use crate::structured::validator::OutputValidator;
use crate::structured::ValidationError;
use crate::types::QuoteItem;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub const AUTHOR_MIN_LEN: usize = 2;
pub const AUTHOR_MAX_LEN: usize = 100;
pub const TEXT_MIN_LEN: usize = 10;
pub const TEXT_MAX_LEN: usize = 280;
pub const FORBIDDEN_TEXT: &str = "http";

/// Builder for object schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    description: Option<String>,
    properties: Vec<(String, Value)>,
    required: Vec<String>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a property and mark it required.
    pub fn add_required(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    pub fn build(self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("object"));

        let properties: serde_json::Map<String, Value> = self.properties.into_iter().collect();
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }
        if let Some(desc) = self.description {
            map.insert("description".into(), desc.into());
        }

        map.into()
    }
}

/// Schema of the provider's answer: `{"quotes": [{"author", "quote"}, ...]}`.
pub static QUOTE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let item = SchemaGenerator::new()
        .add_required(
            "author",
            json!({
                "type": "string",
                "minLength": AUTHOR_MIN_LEN,
                "maxLength": AUTHOR_MAX_LEN,
                "description": "Name of the person the quote is attributed to"
            }),
        )
        .add_required(
            "quote",
            json!({
                "type": "string",
                "minLength": TEXT_MIN_LEN,
                "maxLength": TEXT_MAX_LEN,
                "not": {
                    "pattern": FORBIDDEN_TEXT,
                    "description": "Quote must not contain links"
                }
            }),
        )
        .build();

    SchemaGenerator::new()
        .description("Generated quotes")
        .add_required(
            "quotes",
            json!({ "type": "array", "minItems": 1, "items": item }),
        )
        .build()
});

/// Schema of the inbound request body.
///
/// The strict form bounds `quoteCount` and requires `language`; the lenient
/// form only requires a numeric count and leaves range handling to the caller.
pub fn request_schema(strict: bool) -> Value {
    let count = if strict {
        json!({ "type": "integer", "minimum": 1, "maximum": 10 })
    } else {
        json!({ "type": "number" })
    };
    let api_key = json!({ "type": "string", "minLength": 1, "pattern": r"\S" });
    let language = json!({ "type": "string", "enum": ["en", "es"] });

    let generator = SchemaGenerator::new()
        .add_required("quoteCount", count)
        .add_required("apiKey", api_key);

    let generator = if strict {
        generator.add_required("language", language)
    } else {
        generator.add_property("language", language)
    };
    generator.build()
}

/// Validates decoded provider output into quote items.
pub struct QuoteSchema {
    validator: OutputValidator,
}

impl QuoteSchema {
    pub fn new() -> Self {
        Self {
            validator: OutputValidator::new(QUOTE_SCHEMA.clone()),
        }
    }

    /// Check the decoded value and convert it into quote items.
    ///
    /// Fails with [`GenerationError::Schema`] listing every violated
    /// constraint.
    pub fn validate(&self, value: &Value) -> Result<Vec<QuoteItem>, GenerationError> {
        self.validator
            .validate_or_fail(value)
            .map_err(GenerationError::Schema)?;

        serde_json::from_value(value["quotes"].clone()).map_err(|e| {
            GenerationError::Schema(vec![ValidationError::with_path(
                e.to_string(),
                ".quotes".to_string(),
            )])
        })
    }
}

impl Default for QuoteSchema {
    fn default() -> Self {
        Self::new()
    }
}
