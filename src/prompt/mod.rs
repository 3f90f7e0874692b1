//! Prompt construction for quote generation.
//!
//! [`build_directives`] is a pure function of `(count, language)`; the same
//! inputs always produce byte-identical directives, which is what lets the
//! retry loop resend an attempt unchanged.

use crate::structured::schema::{TEXT_MAX_LEN, TEXT_MIN_LEN};
use crate::types::{Language, Message};

/// Public figures the model over-uses; avoided for small batches.
pub const OVERUSED_AUTHORS: [&str; 2] = ["Steve Jobs", "Elon Musk"];

/// Above this many quotes the over-used figures are allowed again.
pub const OVERUSED_AUTHOR_THRESHOLD: u8 = 5;

const SYSTEM_EN: &str = "You are a helpful assistant that generates inspirational quotes \
from technology entrepreneurs and builders. You MUST respond with valid JSON only. \
Do NOT include any text outside the JSON object. Do NOT use markdown code fences.";

const SYSTEM_ES: &str = "Eres un asistente que genera frases inspiradoras de emprendedores \
y creadores del mundo de la tecnología. Escribe las frases en español. Debes responder \
únicamente con JSON válido. NO incluyas texto fuera del objeto JSON. NO uses bloques de código markdown.";

/// System and user instructions sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectivePair {
    pub system: String,
    pub user: String,
}

impl DirectivePair {
    pub fn into_messages(self) -> Vec<Message> {
        vec![Message::system(self.system), Message::user(self.user)]
    }

    pub fn to_messages(&self) -> Vec<Message> {
        self.clone().into_messages()
    }
}

/// Build the directive pair for `count` quotes in `language`.
///
/// `count` is expected in [1, 10]; callers validate it before getting here.
pub fn build_directives(count: u8, language: Language) -> DirectivePair {
    let system = match language {
        Language::En => SYSTEM_EN,
        Language::Es => SYSTEM_ES,
    }
    .to_string();

    let mut user = format!(
        "Generate exactly {count} inspirational {noun} in {lang}. \
Each quote must be attributed to a different person; vary the attribution across \
founders, engineers, investors and researchers.",
        count = count,
        noun = if count == 1 { "quote" } else { "quotes" },
        lang = language.display_name(),
    );

    if count <= OVERUSED_AUTHOR_THRESHOLD {
        user.push_str(&format!(
            " Do not use quotes from {} or {}.",
            OVERUSED_AUTHORS[0], OVERUSED_AUTHORS[1]
        ));
    }

    user.push_str(&format!(
        " Each quote should be 10 to 100 words and between {} and {} characters long. \
Do not include links or URLs.",
        TEXT_MIN_LEN, TEXT_MAX_LEN
    ));

    user.push_str(
        " Format the response as a JSON object with a 'quotes' array containing objects \
with 'author' and 'quote' fields, for example: \
{\"quotes\": [{\"author\": \"Full Name\", \"quote\": \"Quote text\"}]}",
    );

    DirectivePair { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_are_deterministic() {
        assert_eq!(build_directives(3, Language::En), build_directives(3, Language::En));
        assert_ne!(build_directives(3, Language::En), build_directives(4, Language::En));
    }

    #[test]
    fn test_user_directive_mentions_count_and_shape() {
        let d = build_directives(7, Language::En);
        assert!(d.user.contains("exactly 7 inspirational quotes"));
        assert!(d.user.contains("'quotes' array"));
        assert!(d.user.contains("'author'"));
        assert!(d.user.contains("280 characters"));
    }

    #[test]
    fn test_overused_authors_excluded_for_small_batches() {
        let small = build_directives(OVERUSED_AUTHOR_THRESHOLD, Language::En);
        assert!(small.user.contains("Steve Jobs"));
        assert!(small.user.contains("Elon Musk"));

        let large = build_directives(OVERUSED_AUTHOR_THRESHOLD + 1, Language::En);
        assert!(!large.user.contains("Steve Jobs"));
    }

    #[test]
    fn test_language_selects_output_language() {
        let es = build_directives(2, Language::Es);
        assert!(es.user.contains("in Spanish"));
        assert!(es.system.contains("español"));

        let en = build_directives(1, Language::En);
        assert!(en.user.contains("1 inspirational quote "));
        assert!(en.user.contains("in English"));
    }

    #[test]
    fn test_into_messages_order() {
        let msgs = build_directives(2, Language::En).into_messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, crate::types::MessageRole::System);
        assert_eq!(msgs[1].role, crate::types::MessageRole::User);
    }
}
