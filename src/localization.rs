//! Localization
//!
//! Bilingual (English/Arabic) content resolution. Admin-entered content is often
//! only filled in one language, so every lookup falls back to the other language
//! before giving up with an empty string.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A storefront display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,

    /// Arabic
    Ar,
}

/// Text direction for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    /// Left to right
    Ltr,

    /// Right to left
    Rtl,
}

impl Language {
    /// Parse a language or locale tag. Anything that is not Arabic resolves to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default();

        if primary.eq_ignore_ascii_case("ar") {
            Language::Ar
        } else {
            Language::En
        }
    }

    /// The language used as a fallback for this one.
    pub fn other(self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    /// Writing direction of the language.
    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Ar => TextDirection::Rtl,
        }
    }

    /// Two-letter language code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

impl FromStr for Language {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::from_tag(s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;

        Ok(Language::from_tag(&tag))
    }
}

/// Content carrying both an English and an Arabic rendering.
///
/// Both fields are always present. An empty string means "no content" in that language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LocalizableInput")]
pub struct LocalizedContent {
    /// English rendering
    pub en: String,

    /// Arabic rendering
    pub ar: String,
}

impl LocalizedContent {
    /// Create localized content from both renderings.
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Return the string for `language`, falling back to the other language.
    pub fn get(&self, language: Language) -> &str {
        get_localized_string(self, language)
    }

    /// True when neither language has content.
    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.ar.is_empty()
    }

    fn raw(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Ar => &self.ar,
        }
    }
}

impl From<&str> for LocalizedContent {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

impl From<String> for LocalizedContent {
    fn from(value: String) -> Self {
        ensure_localized_content(LocalizableInput::Str(value))
    }
}

impl From<LocalizableInput> for LocalizedContent {
    fn from(input: LocalizableInput) -> Self {
        ensure_localized_content(input)
    }
}

/// The raw shapes localizable data arrives in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocalizableInput {
    /// Legacy single-language string
    Str(String),

    /// A `{en, ar}` object, possibly with only one member present
    Localized {
        /// English member, if present and a string
        en: Option<String>,

        /// Arabic member, if present and a string
        ar: Option<String>,
    },

    /// Null, absent, or an unrecognised shape
    #[default]
    Empty,
}

impl From<Value> for LocalizableInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => LocalizableInput::Str(s),
            Value::Object(mut map) => {
                let mut member = |key: &str| match map.remove(key) {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                };

                let en = member("en");
                let ar = member("ar");

                LocalizableInput::Localized { en, ar }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                LocalizableInput::Empty
            }
        }
    }
}

impl From<&str> for LocalizableInput {
    fn from(value: &str) -> Self {
        LocalizableInput::Str(value.to_string())
    }
}

impl From<LocalizedContent> for LocalizableInput {
    fn from(content: LocalizedContent) -> Self {
        LocalizableInput::Localized {
            en: Some(content.en),
            ar: Some(content.ar),
        }
    }
}

impl<'de> Deserialize<'de> for LocalizableInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Value>::deserialize(deserializer)
            .map(|value| value.map_or(LocalizableInput::Empty, LocalizableInput::from))
    }
}

/// Normalize any localizable input into content with both languages present.
///
/// A bare string is mirrored to both languages; missing members become empty strings.
pub fn ensure_localized_content(input: impl Into<LocalizableInput>) -> LocalizedContent {
    match input.into() {
        LocalizableInput::Str(s) => LocalizedContent {
            en: s.clone(),
            ar: s,
        },
        LocalizableInput::Localized { en, ar } => LocalizedContent {
            en: en.unwrap_or_default(),
            ar: ar.unwrap_or_default(),
        },
        LocalizableInput::Empty => LocalizedContent::default(),
    }
}

/// Return the string for `language`, or the other language's string when it is empty.
pub fn get_localized_string(content: &LocalizedContent, language: Language) -> &str {
    let requested = content.raw(language);

    if requested.is_empty() {
        content.raw(language.other())
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bare_string_is_mirrored() {
        let content = ensure_localized_content("Dates");

        assert_eq!(content, LocalizedContent::new("Dates", "Dates"));
    }

    #[test]
    fn partial_object_fills_missing_language() {
        let input = LocalizableInput::Localized {
            en: None,
            ar: Some("تمر".to_string()),
        };

        assert_eq!(
            ensure_localized_content(input),
            LocalizedContent::new("", "تمر")
        );
    }

    #[test]
    fn empty_input_yields_empty_content() {
        let content = ensure_localized_content(LocalizableInput::Empty);

        assert!(content.is_empty());
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let inputs = [
            LocalizableInput::from("Coffee"),
            LocalizableInput::Localized {
                en: Some("Tea".to_string()),
                ar: None,
            },
            LocalizableInput::Empty,
        ];

        for input in inputs {
            let once = ensure_localized_content(input);
            let twice = ensure_localized_content(once.clone());

            assert_eq!(once, twice);
        }
    }

    #[test]
    fn json_values_of_any_shape_normalize() {
        let cases = [
            (json!(null), LocalizedContent::default()),
            (json!(42), LocalizedContent::default()),
            (json!(true), LocalizedContent::default()),
            (json!(["en", "ar"]), LocalizedContent::default()),
            (json!({}), LocalizedContent::default()),
            (json!({"en": 5, "ar": "خمسة"}), LocalizedContent::new("", "خمسة")),
            (json!({"en": "Five"}), LocalizedContent::new("Five", "")),
            (json!("Five"), LocalizedContent::new("Five", "Five")),
        ];

        for (value, expected) in cases {
            assert_eq!(
                ensure_localized_content(LocalizableInput::from(value.clone())),
                expected,
                "input {value}"
            );
        }
    }

    #[test]
    fn localized_content_deserializes_from_any_shape() -> TestResult {
        let from_string: LocalizedContent = serde_json::from_str(r#""Oud""#)?;
        let from_object: LocalizedContent = serde_json::from_str(r#"{"ar":"عود"}"#)?;
        let from_null: LocalizedContent = serde_json::from_str("null")?;
        let from_number: LocalizedContent = serde_json::from_str("12.5")?;

        assert_eq!(from_string, LocalizedContent::new("Oud", "Oud"));
        assert_eq!(from_object, LocalizedContent::new("", "عود"));
        assert!(from_null.is_empty());
        assert!(from_number.is_empty());

        Ok(())
    }

    #[test]
    fn localized_content_serializes_both_keys() -> TestResult {
        let value = serde_json::to_value(LocalizedContent::new("Rug", ""))?;

        assert_eq!(value, json!({"en": "Rug", "ar": ""}));

        Ok(())
    }

    #[test]
    fn requested_language_is_preferred() {
        let content = LocalizedContent::new("Saffron", "زعفران");

        assert_eq!(get_localized_string(&content, Language::En), "Saffron");
        assert_eq!(get_localized_string(&content, Language::Ar), "زعفران");
    }

    #[test]
    fn empty_language_falls_back_to_other() {
        let content = LocalizedContent::new("", "X");

        assert_eq!(get_localized_string(&content, Language::En), "X");
        assert_eq!(content.get(Language::Ar), "X");
    }

    #[test]
    fn both_empty_returns_empty() {
        let content = LocalizedContent::default();

        assert_eq!(get_localized_string(&content, Language::En), "");
        assert_eq!(get_localized_string(&content, Language::Ar), "");
    }

    #[test]
    fn unknown_tags_resolve_to_english() {
        assert_eq!(Language::from_tag("fr"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
        assert_eq!(Language::from_tag("ar-SA"), Language::Ar);
        assert_eq!(Language::from_tag("AR_eg"), Language::Ar);
        assert_eq!("ar".parse::<Language>(), Ok(Language::Ar));
    }

    #[test]
    fn language_deserializes_leniently() -> TestResult {
        let language: Language = serde_json::from_str(r#""de-DE""#)?;

        assert_eq!(language, Language::En);

        Ok(())
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert_eq!(Language::Ar.direction(), TextDirection::Rtl);
        assert_eq!(Language::En.direction(), TextDirection::Ltr);
        assert_eq!(Language::Ar.other(), Language::En);
    }
}
