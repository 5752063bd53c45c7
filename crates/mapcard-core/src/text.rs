//! Text normalization utilities shared by the field parsers and the
//! domain validators.
//!
//! All functions are pure and total: any `&str` input produces a value,
//! including the empty string.

use regex::Regex;

/// Detected script of a text fragment, based on Cyrillic vs Latin letter
/// counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    En,
    Mixed,
    Unknown,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Ru => write!(f, "ru"),
            Language::En => write!(f, "en"),
            Language::Mixed => write!(f, "mixed"),
            Language::Unknown => write!(f, "unknown"),
        }
    }
}

/// Strips HTML tags and normalizes whitespace.
///
/// Runs of spaces and tabs collapse to a single space; spaces around
/// newlines are dropped; three or more consecutive newlines collapse to
/// exactly two. Line structure is otherwise preserved so line-oriented
/// splitting downstream keeps working.
#[must_use]
pub fn clean_text(text: &str, remove_html: bool, normalize_whitespace: bool) -> String {
    let mut result = text.trim().to_owned();

    if remove_html {
        let tag_re = Regex::new(r"<[^>]+>").expect("valid regex");
        result = tag_re.replace_all(&result, "").into_owned();
    }

    if normalize_whitespace {
        let horizontal_re = Regex::new(r"[^\S\n]+").expect("valid regex");
        result = horizontal_re.replace_all(&result, " ").into_owned();

        let newline_pad_re = Regex::new(r" ?\n ?").expect("valid regex");
        result = newline_pad_re.replace_all(&result, "\n").into_owned();

        let newline_run_re = Regex::new(r"\n{3,}").expect("valid regex");
        result = newline_run_re.replace_all(&result, "\n\n").into_owned();
    }

    result.trim().to_owned()
}

/// Classifies a fragment as Russian, English, or mixed script.
///
/// Ratio of Cyrillic letters to all letters: above 0.7 is [`Language::Ru`],
/// below 0.3 is [`Language::En`], anything between is [`Language::Mixed`].
/// Text with no letters at all is [`Language::Unknown`].
#[must_use]
pub fn detect_language(text: &str) -> Language {
    if text.is_empty() {
        return Language::Unknown;
    }

    let cyrillic = text
        .chars()
        .filter(|c| matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё'))
        .count();
    let latin = text.chars().filter(char::is_ascii_alphabetic).count();
    let total = cyrillic + latin;

    if total == 0 {
        return Language::Unknown;
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = cyrillic as f64 / total as f64;

    if ratio > 0.7 {
        Language::Ru
    } else if ratio < 0.3 {
        Language::En
    } else {
        Language::Mixed
    }
}

/// Extracts every integer/decimal token from `text` in left-to-right
/// order. A comma is accepted as a decimal separator.
#[must_use]
pub fn extract_numbers(text: &str) -> Vec<f64> {
    if text.is_empty() {
        return Vec::new();
    }

    let number_re = Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex");

    number_re
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .collect()
}

/// Ordered currency replacements. Multi-character words come before their
/// substrings so "рублей" never degrades to "руб" + "лей".
const CURRENCY_REPLACEMENTS: &[(&str, &str)] = &[
    ("₽", "руб"),
    ("₨", "руб"),
    ("рублей", "руб"),
    ("рубля", "руб"),
    ("p.", "руб"),
    ("р.", "руб"),
    ("$", "долл"),
    ("€", "евро"),
    ("£", "фунт"),
];

/// Replaces known currency symbols and words with canonical short forms.
#[must_use]
pub fn normalize_currency(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = text.to_owned();
    for (from, to) in CURRENCY_REPLACEMENTS {
        result = result.replace(from, to);
    }
    result
}

/// Ruble-specific map used when preparing price fragments for the price
/// patterns. A leading space keeps the marker detached from the number.
const PRICE_REPLACEMENTS: &[(&str, &str)] = &[
    ("₽", " руб"),
    ("рублей", " руб"),
    ("рубля", " руб"),
    ("руб.", " руб"),
    ("р.", " руб"),
];

/// Normalizes a price fragment: collapses whitespace and canonicalizes
/// ruble markers so the price patterns see one spelling.
#[must_use]
pub fn normalize_price_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let ws_re = Regex::new(r"\s+").expect("valid regex");
    let mut normalized = ws_re.replace_all(text.trim(), " ").into_owned();

    for (from, to) in PRICE_REPLACEMENTS {
        normalized = normalized.replace(from, to);
    }

    let ws_re2 = Regex::new(r"\s+").expect("valid regex");
    ws_re2.replace_all(normalized.trim(), " ").into_owned()
}

/// Caps `value` at `max` characters on a char boundary, logging when the
/// input was longer. Over-length optional fields are truncated rather
/// than rejected.
pub(crate) fn cap_len(field: &str, value: String, max: usize) -> String {
    if value.chars().count() <= max {
        return value;
    }

    tracing::warn!(field, max, "truncating over-length field");
    value.chars().take(max).collect()
}
