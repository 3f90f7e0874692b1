//! Structured output: decoding and schema validation of provider output.
//!
//! Two independent stages:
//! - [`decode`]: raw text to JSON ([`GenerationError::Parse`](crate::error::GenerationError::Parse) on failure)
//! - [`QuoteSchema::validate`]: JSON to quote items, reporting every violated constraint
//!
//! # Examples
//!
//! ```
//! use quotegen::structured::{decode, QuoteSchema};
//!
//! let raw = r#"{"quotes": [{"author": "Alan Kay", "quote": "The best way to predict the future is to invent it."}]}"#;
//! let value = decode(raw).unwrap();
//! let items = QuoteSchema::new().validate(&value).unwrap();
//!
//! assert_eq!(items[0].author, "Alan Kay");
//! ```

pub mod error;
pub mod json_mode;
pub mod schema;
pub mod validator;

pub use error::{ValidationError, ValidationResult};
pub use json_mode::{decode, JsonMode};
pub use schema::{request_schema, QuoteSchema, SchemaGenerator, QUOTE_SCHEMA};
pub use validator::OutputValidator;
