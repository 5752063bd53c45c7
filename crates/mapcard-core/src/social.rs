//! Social network links, normalized to canonical `https://` URLs.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Raw social handles as found by the contact parser: full URLs, bare
/// usernames, `@user` mentions, or phone numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialDraft {
    pub telegram: Option<String>,
    pub whatsapp: Option<String>,
    pub vk: Option<String>,
}

/// Canonical social links of an enterprise.
///
/// Each field is a full `https://` URL; bare usernames and phone numbers
/// are expanded, already-canonical URLs pass through unchanged.
/// Normalization never fails — unrecognizable input is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialNetworks {
    pub telegram: Option<String>,
    pub whatsapp: Option<String>,
    pub vk: Option<String>,
}

impl SocialNetworks {
    #[must_use]
    pub fn from_draft(draft: SocialDraft) -> Self {
        Self {
            telegram: draft.telegram.as_deref().and_then(normalize_telegram),
            whatsapp: draft.whatsapp.as_deref().and_then(normalize_whatsapp),
            vk: draft.vk.as_deref().and_then(normalize_vk),
        }
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        self.telegram.is_some() || self.whatsapp.is_some() || self.vk.is_some()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        [&self.telegram, &self.whatsapp, &self.vk]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}

fn normalize_telegram(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(username) = value.strip_prefix('@') {
        return Some(format!("https://t.me/{username}"));
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_owned());
    }

    if value.starts_with("t.me/") || value.starts_with("telegram.me/") {
        return Some(format!("https://{value}"));
    }

    Some(format!("https://t.me/{value}"))
}

fn normalize_whatsapp(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // A bare phone number becomes a wa.me link.
    let phone_re = Regex::new(r"^\+?\d{10,15}$").expect("valid regex");
    if phone_re.is_match(value) {
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();
        return Some(format!("https://wa.me/{digits}"));
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_owned());
    }

    if value.starts_with("wa.me/") || value.starts_with("api.whatsapp.com/") {
        return Some(format!("https://{value}"));
    }

    Some(value.to_owned())
}

fn normalize_vk(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_owned());
    }

    if value.starts_with("vk.com/") || value.starts_with("m.vk.com/") {
        return Some(format!("https://{value}"));
    }

    if !value.contains('/') {
        return Some(format!("https://vk.com/{value}"));
    }

    Some(value.to_owned())
}
