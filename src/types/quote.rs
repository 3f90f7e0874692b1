//! Quote items as produced by the provider and returned to callers.

use serde::{Deserialize, Serialize};

/// A single attributed quote.
///
/// Only constructed from provider output that passed the quote schema, so the
/// length and content bounds hold for every instance handed out by the
/// pipeline. The text travels as `quote` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
}

impl QuoteItem {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    /// Length of the text in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Success body of the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quotes: Vec<QuoteItem>,
}

impl From<Vec<QuoteItem>> for QuoteResponse {
    fn from(quotes: Vec<QuoteItem>) -> Self {
        Self { quotes }
    }
}
