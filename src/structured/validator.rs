//! Output validator for structured responses.
//!
//! Interprets the subset of JSON Schema the service relies on:
//! - Basic type validation (string, integer, number, boolean, array, object, null)
//! - String constraints (minLength, maxLength, pattern) with lengths counted in characters
//! - Number constraints (minimum, maximum) and enum
//! - Array constraints (minItems, maxItems, items)
//! - Object constraints (required, properties, additionalProperties)
//! - `not`, used to forbid content such as links inside quote text
//!
//! Every violation is collected; validation does not stop at the first one.

use crate::structured::error::{ValidationError, ValidationResult};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

/// Validator for structured output.
///
/// Properties not listed in `properties` are accepted unless the schema sets
/// `additionalProperties`.
pub struct OutputValidator {
    schema: Value,
}

impl OutputValidator {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate data against the schema.
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let mut errors = Vec::new();
        self.validate_against_schema(data, &self.schema, "", &mut errors);
        if errors.is_empty() {
            ValidationResult::success(data.clone())
        } else {
            ValidationResult::failure(errors)
        }
    }

    /// Validate data and return the validated value or every error found.
    pub fn validate_or_fail(&self, data: &Value) -> Result<Value, Vec<ValidationError>> {
        self.validate(data).into_result()
    }

    fn validate_against_schema(
        &self,
        data: &Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(type_name) = schema.get("type").and_then(|t| t.as_str()) {
            if let Err(e) = self.validate_type(data, type_name, path) {
                // Nested constraints are meaningless once the type is wrong.
                errors.push(e);
                return;
            }
        }

        match data {
            Value::String(s) => self.validate_string(s, schema, path, errors),
            Value::Number(_) => {
                if let Some(num) = data.as_f64() {
                    self.validate_number(num, schema, path, errors);
                }
            }
            Value::Array(arr) => self.validate_array(arr, schema, path, errors),
            Value::Object(obj) => self.validate_object(obj, schema, path, errors),
            _ => {}
        }

        if let Some(enum_values) = schema.get("enum").and_then(|e| e.as_array()) {
            self.validate_enum(data, enum_values, path, errors);
        }

        if let Some(forbidden) = schema.get("not") {
            let mut inner = Vec::new();
            self.validate_against_schema(data, forbidden, path, &mut inner);
            if inner.is_empty() {
                let message = forbidden
                    .get("description")
                    .and_then(|d| d.as_str())
                    .unwrap_or("Value matches a forbidden schema");
                errors.push(ValidationError::with_path(message, path.to_string()));
            }
        }
    }

    fn validate_type(
        &self,
        data: &Value,
        expected_type: &str,
        path: &str,
    ) -> Result<(), ValidationError> {
        let is_valid = match expected_type {
            "string" => data.is_string(),
            "integer" => is_whole_number(data),
            "number" => data.is_number(),
            "boolean" => data.is_boolean(),
            "array" => data.is_array(),
            "object" => data.is_object(),
            "null" => data.is_null(),
            _ => true,
        };

        if is_valid {
            return Ok(());
        }

        let actual_type = match data {
            Value::String(_) => "string",
            Value::Number(_) => {
                if is_whole_number(data) {
                    "integer"
                } else {
                    "number"
                }
            }
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        };
        Err(ValidationError::with_path(
            format!("Expected type '{}', got '{}'", expected_type, actual_type),
            path.to_string(),
        )
        .with_value(data.clone()))
    }

    fn validate_string(
        &self,
        s: &str,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let len = s.chars().count();

        if let Some(min_length) = schema.get("minLength").and_then(|m| m.as_u64()) {
            if len < min_length as usize {
                errors.push(ValidationError::with_path(
                    format!("String too short (minimum {} characters)", min_length),
                    path.to_string(),
                ));
            }
        }

        if let Some(max_length) = schema.get("maxLength").and_then(|m| m.as_u64()) {
            if len > max_length as usize {
                errors.push(ValidationError::with_path(
                    format!("String too long (maximum {} characters)", max_length),
                    path.to_string(),
                ));
            }
        }

        if let Some(pattern) = schema.get("pattern").and_then(|p| p.as_str()) {
            match Regex::new(pattern) {
                Ok(re) => {
                    if !re.is_match(s) {
                        errors.push(ValidationError::with_path(
                            "String does not match required pattern",
                            path.to_string(),
                        ));
                    }
                }
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "ignoring invalid schema pattern");
                }
            }
        }
    }

    fn validate_number(
        &self,
        value: f64,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(minimum) = schema.get("minimum").and_then(|m| m.as_f64()) {
            if value < minimum {
                errors.push(ValidationError::with_path(
                    format!("Value below minimum ({})", minimum),
                    path.to_string(),
                ));
            }
        }

        if let Some(maximum) = schema.get("maximum").and_then(|m| m.as_f64()) {
            if value > maximum {
                errors.push(ValidationError::with_path(
                    format!("Value above maximum ({})", maximum),
                    path.to_string(),
                ));
            }
        }
    }

    fn validate_array(
        &self,
        arr: &[Value],
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(min_items) = schema.get("minItems").and_then(|m| m.as_u64()) {
            if arr.len() < min_items as usize {
                errors.push(ValidationError::with_path(
                    format!("Array too short (minimum {} items)", min_items),
                    path.to_string(),
                ));
            }
        }

        if let Some(max_items) = schema.get("maxItems").and_then(|m| m.as_u64()) {
            if arr.len() > max_items as usize {
                errors.push(ValidationError::with_path(
                    format!("Array too long (maximum {} items)", max_items),
                    path.to_string(),
                ));
            }
        }

        if let Some(items_schema) = schema.get("items") {
            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                self.validate_against_schema(item, items_schema, &item_path, errors);
            }
        }
    }

    fn validate_object(
        &self,
        obj: &serde_json::Map<String, Value>,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for prop_name in required.iter().filter_map(|v| v.as_str()) {
                if !obj.contains_key(prop_name) {
                    errors.push(ValidationError::with_path(
                        format!("Missing required property: {}", prop_name),
                        format!("{}.{}", path, prop_name),
                    ));
                }
            }
        }

        let properties = schema.get("properties").and_then(|p| p.as_object());

        if let Some(properties) = properties {
            for (prop_name, prop_schema) in properties {
                if let Some(prop_value) = obj.get(prop_name) {
                    let prop_path = format!("{}.{}", path, prop_name);
                    self.validate_against_schema(prop_value, prop_schema, &prop_path, errors);
                }
            }
        }

        let allowed_keys: HashSet<&str> = properties
            .map(|p| p.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default();

        match schema.get("additionalProperties") {
            Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => self.reject_extra_keys(obj, &allowed_keys, path, errors),
            Some(additional_schema) => {
                for (key, value) in obj {
                    if !allowed_keys.contains(key.as_str()) {
                        let prop_path = format!("{}.{}", path, key);
                        self.validate_against_schema(value, additional_schema, &prop_path, errors);
                    }
                }
            }
            None => {}
        }
    }

    fn reject_extra_keys(
        &self,
        obj: &serde_json::Map<String, Value>,
        allowed_keys: &HashSet<&str>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        for key in obj.keys() {
            if !allowed_keys.contains(key.as_str()) {
                errors.push(ValidationError::with_path(
                    format!("Additional property not allowed: {}", key),
                    format!("{}.{}", path, key),
                ));
            }
        }
    }

    fn validate_enum(
        &self,
        data: &Value,
        enum_values: &[Value],
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if !enum_values.contains(data) {
            let allowed: Vec<String> = enum_values
                .iter()
                .map(|v| match v {
                    Value::String(s) => format!("\"{}\"", s),
                    _ => v.to_string(),
                })
                .collect();
            errors.push(
                ValidationError::with_path(
                    format!("Value not in allowed enum values: {}", allowed.join(", ")),
                    path.to_string(),
                )
                .with_value(data.clone()),
            );
        }
    }
}

/// JSON has a single number type, so `3.0` and `1e1` count as integers.
fn is_whole_number(data: &Value) -> bool {
    data.is_i64() || data.is_u64() || data.as_f64().is_some_and(|n| n.fract() == 0.0)
}
