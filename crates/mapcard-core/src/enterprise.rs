//! Enterprise aggregate: the one validated record produced per source
//! document.
//!
//! Construction is fail-fast on required-field violations (an empty name
//! never becomes a record) and tolerant everywhere else: malformed
//! optional input is dropped or truncated, never silently corrected into
//! range. Nested services/reviews failing their own validation are
//! dropped individually and counted in `extraction_stats`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::ExtractorConfig;
use crate::review::{Review, ReviewDraft};
use crate::service::{Service, ServiceDraft};
use crate::social::{SocialDraft, SocialNetworks};
use crate::text;
use crate::working_hours::{WorkingHours, WorkingHoursDraft};
use crate::ModelError;

const NAME_MAX: usize = 200;
const CATEGORY_MAX: usize = 100;
const ADDRESS_MAX: usize = 300;
const PHONE_MAX: usize = 50;
const WEBSITE_MAX: usize = 500;
const PHONE_MIN_DIGITS: usize = 7;

/// Number of fields the completeness score is measured against.
const COMPLETENESS_FIELDS: usize = 12;

/// Raw aggregate data assembled by the parsing facade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnterpriseDraft {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i64>,
    pub services: Vec<ServiceDraft>,
    pub reviews: Vec<ReviewDraft>,
    pub social: SocialDraft,
    pub working_hours: WorkingHoursDraft,
}

/// Validated business record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enterprise {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub services: Vec<Service>,
    pub reviews: Vec<Review>,
    pub social_networks: SocialNetworks,
    pub working_hours: WorkingHours,
    pub scraping_date: DateTime<Utc>,
    /// Open key-value bag: source URL, scraper version, extraction
    /// statistics. Downstream export stages may annotate it further;
    /// the extracted business fields above stay untouched.
    pub metadata: Map<String, Value>,
}

impl Enterprise {
    /// Validates a draft into an `Enterprise`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the name is empty after normalization or
    /// exceeds the length bound. All other field problems degrade to
    /// `None`/truncation/drops with a log entry.
    pub fn from_draft(
        draft: EnterpriseDraft,
        config: &ExtractorConfig,
    ) -> Result<Self, ModelError> {
        let name = normalize_name(&draft.name)?;
        warn_suspicious_name(&name);

        let category = clean_optional(draft.category)
            .map(|c| text::cap_len("enterprise.category", c, CATEGORY_MAX));
        let address = clean_optional(draft.address)
            .map(|a| trim_edge_commas(&a))
            .filter(|a| !a.is_empty())
            .map(|a| text::cap_len("enterprise.address", a, ADDRESS_MAX));
        let phone = draft.phone.as_deref().and_then(normalize_phone);
        let website = draft
            .website
            .as_deref()
            .and_then(|w| normalize_website(w, config));
        let rating = draft.rating.and_then(normalize_rating);
        let reviews_count = draft
            .reviews_count
            .map(|c| u32::try_from(c.max(0)).unwrap_or(u32::MAX));

        let mut services = Vec::new();
        let mut services_dropped = 0usize;
        for service_draft in draft.services {
            match Service::from_draft(service_draft) {
                Ok(service) => services.push(service),
                Err(error) => {
                    services_dropped += 1;
                    tracing::warn!(%error, "dropping service that failed validation");
                }
            }
        }

        let mut reviews = Vec::new();
        let mut reviews_dropped = 0usize;
        for review_draft in draft.reviews {
            match Review::from_draft(review_draft) {
                Ok(review) => reviews.push(review),
                Err(error) => {
                    reviews_dropped += 1;
                    tracing::warn!(%error, "dropping review that failed validation");
                }
            }
        }

        let social_networks = SocialNetworks::from_draft(draft.social);
        let working_hours = WorkingHours::from_draft(draft.working_hours);

        warn_rating_consistency(rating, reviews_count, reviews.len());

        let mut enterprise = Self {
            name,
            category,
            address,
            phone,
            website,
            rating,
            reviews_count,
            services,
            reviews,
            social_networks,
            working_hours,
            scraping_date: Utc::now(),
            metadata: Map::new(),
        };

        enterprise.populate_metadata(config, services_dropped, reviews_dropped);

        Ok(enterprise)
    }

    fn populate_metadata(
        &mut self,
        config: &ExtractorConfig,
        services_dropped: usize,
        reviews_dropped: usize,
    ) {
        self.metadata.insert(
            "scraper_version".to_owned(),
            Value::String(config.scraper_version.clone()),
        );
        self.metadata.insert(
            "extraction_stats".to_owned(),
            json!({
                "services_extracted": self.services.len(),
                "reviews_extracted": self.reviews.len(),
                "services_dropped": services_dropped,
                "reviews_dropped": reviews_dropped,
                "has_rating": self.rating.is_some(),
                "has_phone": self.phone.is_some(),
                "has_website": self.website.is_some(),
                "has_social_networks": self.social_networks.has_any(),
                "has_working_hours": self.working_hours.has_any_info(),
            }),
        );
    }

    /// Fraction of the expected fields that are non-empty on this record.
    #[must_use]
    pub fn completeness_score(&self) -> f64 {
        let mut filled = 2usize; // name and scraping_date always present

        let optional_filled = [
            self.category.is_some(),
            self.address.is_some(),
            !self.services.is_empty(),
            self.website.is_some(),
            self.social_networks.has_any(),
            self.phone.is_some(),
            self.working_hours.has_any_info(),
            self.rating.is_some(),
            self.reviews_count.is_some(),
            !self.reviews.is_empty(),
        ];
        filled += optional_filled.iter().filter(|f| **f).count();

        #[allow(clippy::cast_precision_loss)]
        let score = filled as f64 / COMPLETENESS_FIELDS as f64;
        score
    }

    /// Number of distinct ways to reach the business.
    #[must_use]
    pub fn contact_methods_count(&self) -> usize {
        usize::from(self.phone.is_some())
            + usize::from(self.website.is_some())
            + self.social_networks.count()
    }

    /// True when at least one service carries any price information.
    #[must_use]
    pub fn has_pricing_info(&self) -> bool {
        self.services
            .iter()
            .any(|s| s.price.is_some() || s.price_from.is_some() || s.price_to.is_some())
    }

    /// Mean of the per-review ratings, rounded to one decimal. `None`
    /// when no review carries a rating.
    #[must_use]
    pub fn average_rating_from_reviews(&self) -> Option<f64> {
        let ratings: Vec<f64> = self
            .reviews
            .iter()
            .filter_map(|r| r.rating.map(f64::from))
            .collect();

        if ratings.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }

    /// Reviews with exactly the given rating.
    #[must_use]
    pub fn reviews_by_rating(&self, rating: u8) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|r| r.rating == Some(rating))
            .collect()
    }

    /// Share of rated reviews with rating 4 or 5. `None` when no review
    /// carries a rating.
    #[must_use]
    pub fn positive_reviews_ratio(&self) -> Option<f64> {
        let rated = self.reviews.iter().filter(|r| r.rating.is_some()).count();
        if rated == 0 {
            return None;
        }

        let positive = self
            .reviews
            .iter()
            .filter(|r| r.is_positive() == Some(true))
            .count();

        #[allow(clippy::cast_precision_loss)]
        let ratio = positive as f64 / rated as f64;
        Some(ratio)
    }

    /// Services whose numeric price falls inside the given bounds.
    #[must_use]
    pub fn services_in_price_range(
        &self,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|service| {
                let Some(price) = service.price_numeric() else {
                    return false;
                };
                if min_price.is_some_and(|min| price < min) {
                    return false;
                }
                if max_price.is_some_and(|max| price > max) {
                    return false;
                }
                true
            })
            .collect()
    }

    /// Compact summary mapping for logs and QA tooling.
    #[must_use]
    pub fn export_summary(&self) -> Value {
        json!({
            "name": self.name,
            "category": self.category,
            "address": self.address,
            "rating": self.rating,
            "reviews_count": self.reviews_count,
            "services_count": self.services.len(),
            "has_pricing": self.has_pricing_info(),
            "contact_methods": self.contact_methods_count(),
            "data_completeness": (self.completeness_score() * 100.0).round() / 100.0,
            "scraping_date": self.scraping_date.to_rfc3339(),
        })
    }
}

fn normalize_name(raw: &str) -> Result<String, ModelError> {
    let cleaned = text::clean_text(raw, true, true);
    let name = cleaned
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
        .trim()
        .to_owned();

    if name.is_empty() {
        return Err(ModelError::EmptyName);
    }

    let len = name.chars().count();
    if len > NAME_MAX {
        return Err(ModelError::NameTooLong { len, max: NAME_MAX });
    }

    Ok(name)
}

/// Flags name shapes that usually signal extraction artifacts rather
/// than real business names. Warnings only; the record is kept.
fn warn_suspicious_name(name: &str) {
    let no_ws: Vec<char> = name.chars().filter(|c| !c.is_whitespace()).collect();
    if no_ws.is_empty() {
        return;
    }

    if no_ws.iter().all(char::is_ascii_lowercase) {
        tracing::warn!(name, "suspicious name: all lowercase latin");
    } else if no_ws.iter().all(char::is_ascii_uppercase) {
        tracing::warn!(name, "suspicious name: all uppercase latin");
    } else if no_ws.iter().all(char::is_ascii_digit) {
        tracing::warn!(name, "suspicious name: digits only");
    }

    let specials = name
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && *c != '_')
        .count();
    #[allow(clippy::cast_precision_loss)]
    let specials_ratio = specials as f64 / name.chars().count() as f64;
    if specials_ratio > 0.3 {
        tracing::warn!(name, "suspicious name: too many special characters");
    }

    let mut run = 1usize;
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if prev == Some(c) {
            run += 1;
            if run >= 5 {
                tracing::warn!(name, "suspicious name: repeated character run");
                break;
            }
        } else {
            run = 1;
        }
        prev = Some(c);
    }
}

fn warn_rating_consistency(rating: Option<f64>, reviews_count: Option<u32>, reviews_len: usize) {
    if rating.is_some() && reviews_count.unwrap_or(0) == 0 {
        tracing::warn!("rating present but no reviews counted");
    }

    if let (Some(r), Some(count)) = (rating, reviews_count) {
        if r >= 4.8 && count < 5 {
            tracing::warn!(rating = r, reviews_count = count, "high rating on very few reviews");
        }
    }

    if reviews_count.is_some_and(|c| c > 10) && rating.is_none() {
        tracing::warn!("many reviews but no rating");
    }

    if let Some(count) = reviews_count {
        if reviews_len > 0 && reviews_len != count as usize {
            tracing::warn!(
                declared = count,
                actual = reviews_len,
                "reviews_count disagrees with extracted review list"
            );
        }
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    let value = value?;
    let cleaned = text::clean_text(&value, true, true);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn trim_edge_commas(value: &str) -> String {
    value
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_owned()
}

/// Keeps only phone-shaped characters, then requires at least
/// [`PHONE_MIN_DIGITS`] digits for the value to survive.
fn normalize_phone(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
        .collect();

    let collapsed = {
        let re = regex::Regex::new(r"\s+").expect("valid regex");
        re.replace_all(kept.trim(), " ").into_owned()
    };

    let digits = collapsed.chars().filter(char::is_ascii_digit).count();
    if digits < PHONE_MIN_DIGITS {
        tracing::debug!(raw, "discarding phone with too few digits");
        return None;
    }

    Some(text::cap_len("enterprise.phone", collapsed, PHONE_MAX))
}

fn normalize_website(raw: &str, config: &ExtractorConfig) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(&url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if host.is_empty() {
        return None;
    }

    // A business's map-service self-link is never its external website.
    if config.is_source_self_link(&url) {
        tracing::debug!(url, "discarding website pointing back at the source map service");
        return None;
    }

    Some(text::cap_len("enterprise.website", url, WEBSITE_MAX))
}

/// Rounds to one decimal, then discards out-of-range values — malformed
/// ratings are dropped, never clamped into range.
fn normalize_rating(raw: f64) -> Option<f64> {
    if !raw.is_finite() {
        return None;
    }

    let rounded = (raw * 10.0).round() / 10.0;
    if (0.0..=5.0).contains(&rounded) {
        Some(rounded)
    } else {
        tracing::debug!(rating = raw, "discarding out-of-range rating");
        None
    }
}

#[cfg(test)]
#[path = "enterprise_test.rs"]
mod tests;
