//! User-visible message strings in every supported [`Language`].

use crate::types::Language;

/// Messages the HTTP surface can show to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    GenerationFailed,
    InvalidRequest,
    MissingApiKey,
    InvalidCount,
    InvalidLanguage,
    Timeout,
    Internal,
}

impl Language {
    pub fn message(&self, key: MessageKey) -> &'static str {
        match (self, key) {
            (Language::En, MessageKey::GenerationFailed) => {
                "Unable to generate quotes. Please try again."
            }
            (Language::Es, MessageKey::GenerationFailed) => {
                "No se pudieron generar las frases. Por favor, intenta de nuevo."
            }
            (Language::En, MessageKey::InvalidRequest) => "Invalid request body.",
            (Language::Es, MessageKey::InvalidRequest) => "Cuerpo de la solicitud no válido.",
            (Language::En, MessageKey::MissingApiKey) => "API Key is required",
            (Language::Es, MessageKey::MissingApiKey) => "Se requiere la clave de API",
            (Language::En, MessageKey::InvalidCount) => {
                "Quote count must be a whole number between 1 and 10"
            }
            (Language::Es, MessageKey::InvalidCount) => {
                "La cantidad de frases debe ser un número entero entre 1 y 10"
            }
            (Language::En, MessageKey::InvalidLanguage) => "Language must be 'en' or 'es'",
            (Language::Es, MessageKey::InvalidLanguage) => "El idioma debe ser 'en' o 'es'",
            (Language::En, MessageKey::Timeout) => {
                "Generating quotes took too long. Please try again."
            }
            (Language::Es, MessageKey::Timeout) => {
                "La generación de frases tardó demasiado. Por favor, intenta de nuevo."
            }
            (Language::En, MessageKey::Internal) => "Something went wrong. Please try again.",
            (Language::Es, MessageKey::Internal) => "Algo salió mal. Por favor, intenta de nuevo.",
        }
    }
}
