//! # Types Module
//!
//! Core data types shared by the validator, the generation pipeline and the
//! HTTP surface.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`QuoteItem`] | A validated author/text pair |
//! | [`QuoteResponse`] | Success body returned to callers |
//! | [`GenerationRequest`] | Validated inbound request |
//! | [`Language`] | Output language tag (`en` / `es`) |
//! | [`Message`] | Chat message sent to the provider |
//!
//! ## Example
//!
//! ```rust
//! use quotegen::types::{Language, Message};
//!
//! let lang: Language = "es".parse().unwrap();
//! assert_eq!(lang.as_str(), "es");
//!
//! let system = Message::system("You write quotes.");
//! assert_eq!(system.content, "You write quotes.");
//! ```

pub mod message;
pub mod quote;
pub mod request;

pub use message::{Message, MessageRole};
pub use quote::{QuoteItem, QuoteResponse};
pub use request::{GenerationRequest, Language};
