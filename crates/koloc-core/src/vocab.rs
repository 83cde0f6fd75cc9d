//! Fixed vocabularies shared by extraction and validation.
//!
//! Everything here is process-wide and immutable.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Supported language codes and their display names, in release order.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("zh", "Chinese (Simplified)"),
    ("es", "Spanish"),
    ("pt", "Portuguese"),
    ("pt_BR", "Brazilian Portuguese"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("ko_KR", "Korean"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("th", "Thai"),
    ("nl_NL", "Dutch"),
    ("cs", "Czech"),
    ("uk", "Ukrainian"),
    ("hi", "Hindi"),
];

/// Names that must appear verbatim in every translation of a string containing them.
pub const BRAND_NAMES: &[&str] = &[
    "KOAssistant",
    "KOReader",
    "Claude",
    "GPT",
    "Gemini",
    "OpenAI",
    "Anthropic",
    "DeepSeek",
    "Ollama",
    "Groq",
    "Mistral",
    "xAI",
    "OpenRouter",
    "Qwen",
    "Kimi",
    "Together",
    "Fireworks",
    "SambaNova",
    "Cohere",
    "Doubao",
];

/// Known wrong renderings of a brand, checked in order.
pub const BRAND_MISTRANSLATIONS: &[(&str, &[&str])] = &[(
    "KOAssistant",
    &[
        "KOAsistente",
        "KOAssistent",
        "KOAssistente",
        "KO助手",
        "مساعد KO",
    ],
)];

/// Terms kept in English; matched case-insensitively on word boundaries.
pub const TECHNICAL_TERMS: &[&str] = &["API", "token", "tokens", "cache", "caching", "streaming"];

static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LANGUAGES.iter().copied().collect());

pub fn is_known_language(code: &str) -> bool {
    LANGUAGE_NAMES.contains_key(code)
}

/// Display name for a language code; unknown codes are shown as-is.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES.get(code).copied().unwrap_or(code)
}

pub fn language_codes() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(code, _)| *code)
}

pub fn brand_mistranslations(brand: &str) -> &'static [&'static str] {
    BRAND_MISTRANSLATIONS
        .iter()
        .find(|(b, _)| *b == brand)
        .map(|(_, alts)| *alts)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_names_fall_back_to_code() {
        assert_eq!(language_name("pt_BR"), "Brazilian Portuguese");
        assert_eq!(language_name("xx"), "xx");
        assert!(is_known_language("ko_KR"));
        assert!(!is_known_language("ko"));
        assert_eq!(language_codes().count(), 20);
    }

    #[test]
    fn mistranslation_table_lookup() {
        assert!(brand_mistranslations("KOAssistant").contains(&"KOAsistente"));
        assert!(brand_mistranslations("Claude").is_empty());
    }
}
