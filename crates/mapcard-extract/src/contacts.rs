//! Contact parser: phone, website, email, and social handles from
//! loosely-typed candidate fields plus an optional free-text blob.
//!
//! Direct fields always win; the text blob only fills gaps. Per social
//! network the ordered pattern list applies first-match-wins, so when a
//! text mentions several conflicting handles for one network the kept
//! one is whichever pattern fires first — documented behavior, not a
//! ranking.

use regex::Regex;
use serde::{Deserialize, Serialize};

use mapcard_core::{ExtractorConfig, SocialDraft};

use crate::outcome::ParseOutcome;

/// Per-field confidence weights.
const WEIGHT_PHONE: f32 = 0.9;
const WEIGHT_WEBSITE: f32 = 0.8;
const WEIGHT_EMAIL: f32 = 0.7;
const WEIGHT_SOCIAL: f32 = 0.6;
const WEIGHT_TEXT_MINED: f32 = 0.5;

/// Flat candidate-field input, as handed over by the page-retrieval
/// collaborator. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub telegram: Option<String>,
    pub whatsapp: Option<String>,
    pub vk: Option<String>,
    /// Free text mined for anything the direct fields lack.
    pub text: Option<String>,
}

/// Extracted contact data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactsDraft {
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub social: SocialDraft,
}

#[derive(Debug, Clone, Copy)]
enum PhoneKind {
    RussianPlus7,
    Russian8,
    Russian7,
    International,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Network {
    Telegram,
    Whatsapp,
    Vk,
}

pub struct ContactParser {
    phone_patterns: Vec<(Regex, PhoneKind)>,
    website_patterns: Vec<Regex>,
    email_re: Regex,
    telegram_patterns: Vec<Regex>,
    whatsapp_patterns: Vec<Regex>,
    vk_patterns: Vec<Regex>,
    config: ExtractorConfig,
}

impl ContactParser {
    #[must_use]
    pub fn new(config: &ExtractorConfig) -> Self {
        let phone_table: Vec<(&str, PhoneKind)> = vec![
            (
                r"\+7\s*\(?(\d{3})\)?\s*(\d{3})[-\s]*(\d{2})[-\s]*(\d{2})",
                PhoneKind::RussianPlus7,
            ),
            (
                r"8\s*\(?(\d{3})\)?\s*(\d{3})[-\s]*(\d{2})[-\s]*(\d{2})",
                PhoneKind::Russian8,
            ),
            (
                r"7\s*\(?(\d{3})\)?\s*(\d{3})[-\s]*(\d{2})[-\s]*(\d{2})",
                PhoneKind::Russian7,
            ),
            (
                r"\+(\d{1,3})\s*\(?(\d{1,4})\)?\s*(\d{1,4})[-\s]*(\d{1,4})[-\s]*(\d{0,4})",
                PhoneKind::International,
            ),
            (
                r"(\d{3,4})[-\s]*(\d{2,3})[-\s]*(\d{2,3})[-\s]*(\d{2,3})",
                PhoneKind::Generic,
            ),
        ];

        let phone_patterns = phone_table
            .into_iter()
            .map(|(pattern, kind)| (Regex::new(pattern).expect("valid regex"), kind))
            .collect();

        let website_patterns = [
            r"https?://[-\w.]+\.[a-zA-Z]{2,}(?:/[\w\-._~!$&'()*+,;=:@%/?#]*)?",
            r"www\.[-\w.]+\.[a-zA-Z]{2,}(?:/[\w\-._~!$&'()*+,;=:@%/]*)?",
            r"[-\w.]+\.[a-zA-Z]{2,}(?:/[\w\-._~!$&'()*+,;=:@%/]*)?",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let telegram_patterns = [
            r"(?i)(?:https?://)?(?:t\.me|telegram\.me|telegram\.org)/([a-zA-Z0-9_]+)",
            r"(?i)@([a-zA-Z0-9_]+)\s*(?:telegram|tg)",
            r"(?i)telegram\s*[:@]\s*([a-zA-Z0-9_]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let whatsapp_patterns = [
            r"(?i)(?:https?://)?(?:wa\.me/|api\.whatsapp\.com/send\?phone=)(\d+)",
            r"(?i)whatsapp\s*[:@]\s*\+?(\d+)",
            r"(?i)\bwa\s*[:@]\s*\+?(\d+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let vk_patterns = [
            r"(?i)(?:https?://)?(?:vk\.com|m\.vk\.com)/([a-zA-Z0-9_.]+)",
            r"(?i)vk\s*[:@]\s*([a-zA-Z0-9_.]+)",
            r"(?i)вконтакте\s*[:@]\s*([a-zA-Z0-9_.]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        Self {
            phone_patterns,
            website_patterns,
            email_re: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
                .expect("valid regex"),
            telegram_patterns,
            whatsapp_patterns,
            vk_patterns,
            config: config.clone(),
        }
    }

    /// Parses the candidate fields, then mines the free-text blob for
    /// anything still missing. Zero contacts found is an overall miss.
    #[must_use]
    pub fn parse(&self, input: &ContactInput) -> ParseOutcome<ContactsDraft> {
        let mut draft = ContactsDraft::default();
        let mut total_confidence = 0.0_f32;
        let mut found = 0u32;

        if let Some(raw) = input.phone.as_deref() {
            if let Some(phone) = self.parse_phone(raw) {
                draft.phone = Some(phone);
                total_confidence += WEIGHT_PHONE;
                found += 1;
            }
        }

        if let Some(raw) = input.website.as_deref() {
            if let Some(website) = self.parse_website(raw) {
                draft.website = Some(website);
                total_confidence += WEIGHT_WEBSITE;
                found += 1;
            }
        }

        if let Some(raw) = input.email.as_deref() {
            if let Some(email) = self.parse_email(raw) {
                draft.email = Some(email);
                total_confidence += WEIGHT_EMAIL;
                found += 1;
            }
        }

        for network in [Network::Telegram, Network::Whatsapp, Network::Vk] {
            if let Some(url) = self.resolve_social(network, input) {
                match network {
                    Network::Telegram => draft.social.telegram = Some(url),
                    Network::Whatsapp => draft.social.whatsapp = Some(url),
                    Network::Vk => draft.social.vk = Some(url),
                }
                total_confidence += WEIGHT_SOCIAL;
                found += 1;
            }
        }

        // Text fallback fills only the gaps; direct finds are never
        // overwritten.
        if let Some(text) = input.text.as_deref() {
            if draft.phone.is_none() {
                if let Some(phone) = self.parse_phone(text) {
                    draft.phone = Some(phone);
                    total_confidence += WEIGHT_TEXT_MINED;
                    found += 1;
                }
            }
            if draft.email.is_none() {
                if let Some(email) = self.parse_email(text) {
                    draft.email = Some(email);
                    total_confidence += WEIGHT_TEXT_MINED;
                    found += 1;
                }
            }
            if draft.website.is_none() {
                if let Some(website) = self.parse_website(text) {
                    draft.website = Some(website);
                    total_confidence += WEIGHT_TEXT_MINED;
                    found += 1;
                }
            }
        }

        if found == 0 {
            return ParseOutcome::miss(draft);
        }

        #[allow(clippy::cast_precision_loss)]
        let confidence = (total_confidence / found as f32).min(1.0);
        ParseOutcome::hit(draft, confidence)
    }

    /// Normalizes a phone fragment through the prioritized pattern list,
    /// with a pure-digit length heuristic as the last resort.
    #[must_use]
    pub fn parse_phone(&self, phone_text: &str) -> Option<String> {
        if phone_text.trim().is_empty() {
            return None;
        }

        let clean: String = phone_text
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
            .collect();

        for (re, kind) in &self.phone_patterns {
            let Some(caps) = re.captures(&clean) else {
                continue;
            };

            match kind {
                PhoneKind::RussianPlus7 | PhoneKind::Russian8 | PhoneKind::Russian7 => {
                    return Some(format!(
                        "+7 ({}) {}-{}-{}",
                        &caps[1], &caps[2], &caps[3], &caps[4]
                    ));
                }
                PhoneKind::International | PhoneKind::Generic => {
                    let digits: String = caps
                        .iter()
                        .skip(1)
                        .filter_map(|m| m.map(|m| m.as_str()))
                        .collect();
                    return Some(format!("+{digits}"));
                }
            }
        }

        digit_fallback(phone_text)
    }

    /// Matches a URL-shaped substring, defaults the scheme, and rejects
    /// self-links back to the source map service.
    #[must_use]
    pub fn parse_website(&self, website_text: &str) -> Option<String> {
        let clean = website_text.trim();
        if clean.is_empty() {
            return None;
        }

        for re in &self.website_patterns {
            let Some(m) = re.find(clean) else {
                continue;
            };

            let mut url = m.as_str().to_owned();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                url = format!("https://{url}");
            }

            if self.config.is_source_self_link(&url) {
                tracing::debug!(url, "rejecting map-service self-link as website");
                continue;
            }

            return Some(url);
        }

        None
    }

    /// Single regex match followed by structural validation.
    #[must_use]
    pub fn parse_email(&self, email_text: &str) -> Option<String> {
        let m = self.email_re.find(email_text)?;
        let email = m.as_str().to_lowercase();

        let (local, domain) = email.split_once('@')?;
        if domain.contains('@') {
            return None;
        }
        if local.is_empty() || local.len() > 64 {
            return None;
        }
        if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
            return None;
        }

        Some(email)
    }

    /// Direct field first, then the free-text blob, per network.
    fn resolve_social(&self, network: Network, input: &ContactInput) -> Option<String> {
        let direct = match network {
            Network::Telegram => input.telegram.as_deref(),
            Network::Whatsapp => input.whatsapp.as_deref(),
            Network::Vk => input.vk.as_deref(),
        };

        if let Some(raw) = direct {
            if let Some(url) = self.normalize_social(network, raw) {
                return Some(url);
            }
        }

        let text = input.text.as_deref()?;
        self.mine_social(network, text)
    }

    fn normalize_social(&self, network: Network, raw: &str) -> Option<String> {
        let clean = raw.trim();
        if clean.is_empty() {
            return None;
        }

        if clean.starts_with("http://") || clean.starts_with("https://") {
            if social_domain_valid(network, clean) {
                return Some(clean.to_owned());
            }
        }

        self.mine_social(network, clean)
    }

    /// First pattern in the network's ordered list wins.
    fn mine_social(&self, network: Network, text: &str) -> Option<String> {
        let patterns = match network {
            Network::Telegram => &self.telegram_patterns,
            Network::Whatsapp => &self.whatsapp_patterns,
            Network::Vk => &self.vk_patterns,
        };

        for re in patterns {
            let Some(caps) = re.captures(text) else {
                continue;
            };
            if let Some(url) = build_social_url(network, &caps[1]) {
                return Some(url);
            }
        }

        None
    }
}

fn build_social_url(network: Network, capture: &str) -> Option<String> {
    match network {
        Network::Telegram => Some(format!("https://t.me/{capture}")),
        Network::Whatsapp => {
            let digits: String = capture.chars().filter(char::is_ascii_digit).collect();
            if digits.len() >= 10 {
                Some(format!("https://wa.me/{digits}"))
            } else {
                None
            }
        }
        Network::Vk => Some(format!("https://vk.com/{capture}")),
    }
}

fn social_domain_valid(network: Network, url: &str) -> bool {
    let lower = url.to_lowercase();
    let domains: &[&str] = match network {
        Network::Telegram => &["t.me", "telegram.me", "telegram.org"],
        Network::Whatsapp => &["wa.me", "api.whatsapp.com"],
        Network::Vk => &["vk.com", "m.vk.com"],
    };
    domains.iter().any(|d| lower.contains(d))
}

/// Length-based heuristics over the raw digits when no pattern matched:
/// 11 digits starting with 8 or 7 are a Russian number, exactly 10
/// digits assume the implicit Russian country code.
fn digit_fallback(phone_text: &str) -> Option<String> {
    let digits: String = phone_text.chars().filter(char::is_ascii_digit).collect();

    let russian = |d: &str| {
        format!(
            "+7 ({}) {}-{}-{}",
            &d[0..3],
            &d[3..6],
            &d[6..8],
            &d[8..10]
        )
    };

    if digits.len() == 11 && (digits.starts_with('8') || digits.starts_with('7')) {
        return Some(russian(&digits[1..]));
    }
    if digits.len() == 10 {
        return Some(russian(&digits));
    }

    None
}

#[cfg(test)]
#[path = "contacts_test.rs"]
mod tests;
