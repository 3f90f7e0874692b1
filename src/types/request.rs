//! Validated inbound generation request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language of generated quotes and of user-visible error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Human-readable name used inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// A request that passed shape validation.
///
/// `count` is in [1, 10] and `credential` is non-empty. Built once per inbound
/// call and dropped when the call completes.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: u8,
    pub credential: String,
    pub language: Language,
}

impl GenerationRequest {
    pub const MIN_COUNT: u8 = 1;
    pub const MAX_COUNT: u8 = 10;
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("count", &self.count)
            .field("credential", &"[REDACTED]")
            .field("language", &self.language)
            .finish()
    }
}
