//! Quality gate: semantic checks on schema-valid quote lists.
//!
//! The schema cannot know how many quotes were asked for, nor compare items
//! with each other. The gate checks:
//! - the returned count equals the requested count
//! - authors are pairwise distinct (case-sensitive exact match)
//! - every text length is within [10, 280] characters

use crate::structured::schema::{TEXT_MAX_LEN, TEXT_MIN_LEN};
use crate::types::QuoteItem;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A reason a candidate list failed the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    CountMismatch { requested: usize, returned: usize },
    DuplicateAuthor { author: String },
    TextLength { index: usize, len: usize },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::CountMismatch {
                requested,
                returned,
            } => write!(f, "requested {} quotes, got {}", requested, returned),
            QualityIssue::DuplicateAuthor { author } => {
                write!(f, "author '{}' appears more than once", author)
            }
            QualityIssue::TextLength { index, len } => write!(
                f,
                "quote {} has {} characters (allowed {}..={})",
                index, len, TEXT_MIN_LEN, TEXT_MAX_LEN
            ),
        }
    }
}

/// Stateless predicate over a validated quote list.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate;

impl QualityGate {
    pub fn new() -> Self {
        Self
    }

    /// Whether `items` is acceptable for a request of `requested` quotes.
    pub fn passes(&self, items: &[QuoteItem], requested: usize) -> bool {
        self.inspect(items, requested).is_empty()
    }

    /// Every issue found in `items`; empty when the list passes.
    pub fn inspect(&self, items: &[QuoteItem], requested: usize) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        if items.len() != requested {
            issues.push(QualityIssue::CountMismatch {
                requested,
                returned: items.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for item in items {
            if !seen.insert(item.author.as_str()) && reported.insert(item.author.as_str()) {
                issues.push(QualityIssue::DuplicateAuthor {
                    author: item.author.clone(),
                });
            }
        }

        for (index, item) in items.iter().enumerate() {
            let len = item.text_len();
            if !(TEXT_MIN_LEN..=TEXT_MAX_LEN).contains(&len) {
                issues.push(QualityIssue::TextLength { index, len });
            }
        }

        issues
    }
}
