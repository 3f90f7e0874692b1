//! Error types for schema validation.

use std::fmt;

/// A single violated constraint, with the location it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON path to the error location (e.g., ".quoteCount", ".quotes[0].author")
    pub path: Option<String>,
    /// The invalid value that caused the error
    pub value: Option<serde_json::Value>,
}

impl ValidationError {
    /// Create an error with a path.
    pub fn with_path(message: impl Into<String>, path: String) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
            value: None,
        }
    }

    /// Create an error without path.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            value: None,
        }
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validation operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
    /// Validated data (None if invalid)
    pub data: Option<serde_json::Value>,
}

impl ValidationResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            data: Some(data),
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: false,
            errors,
            data: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get errors as formatted strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Convert to Result, keeping every error if invalid.
    pub fn into_result(self) -> Result<serde_json::Value, Vec<ValidationError>> {
        if self.valid {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(self.errors)
        }
    }
}

impl From<Vec<ValidationError>> for ValidationResult {
    fn from(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            Self::success(serde_json::Value::Null)
        } else {
            Self::failure(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::without_path("Invalid type");
        assert_eq!(error.to_string(), "Invalid type");

        let error = ValidationError::with_path("Invalid type", ".quotes[0].author".to_string());
        assert_eq!(error.to_string(), ".quotes[0].author: Invalid type");

        let root = ValidationError::with_path("Expected type 'object'", String::new());
        assert_eq!(root.to_string(), "Expected type 'object'");
    }

    #[test]
    fn test_into_result_keeps_all_errors() {
        let errors = vec![
            ValidationError::with_path("Missing field", ".author".to_string()),
            ValidationError::with_path("String too short", ".quote".to_string()),
        ];
        let result = ValidationResult::failure(errors.clone());
        assert!(!result.is_valid());
        assert_eq!(result.error_messages().len(), 2);
        assert_eq!(result.into_result(), Err(errors));
    }

    #[test]
    fn test_from_empty_errors_is_success() {
        let result = ValidationResult::from(Vec::new());
        assert!(result.is_valid());
    }
}
