//! Unified parsing facade: one call per field category, one validated
//! [`Enterprise`] per source document.
//!
//! Categories are independent. A parser that finds nothing reports a
//! miss for its own category and nothing else; only a hard violation of
//! the record's required fields makes [`DocumentExtractor::extract`]
//! return an error, and the caller treats that as "no record produced"
//! for that document — never as a batch abort.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use mapcard_core::{
    text, Enterprise, EnterpriseDraft, ExtractorConfig, ModelError, ReviewDraft, ServiceDraft,
    WorkingHoursDraft,
};

use crate::contacts::{ContactInput, ContactParser, ContactsDraft};
use crate::outcome::ParseOutcome;
use crate::reviews::ReviewParser;
use crate::schedule::ScheduleParser;
use crate::sentiment;
use crate::services::ServiceParser;

/// Raw per-category fragments for one listing page, as delivered by the
/// page-retrieval collaborator. Everything is plain text; nothing here
/// has been validated yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFragments {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    /// Raw rating text, e.g. `"4,8"` or `"Рейтинг 4.8"`.
    pub rating: Option<String>,
    /// Raw review-count text, e.g. `"101 отзыв"`.
    pub reviews_count: Option<String>,
    pub services: Option<String>,
    pub schedule: Option<String>,
    pub reviews: Option<String>,
    pub contacts: ContactInput,
    pub source_url: Option<String>,
}

/// Owns one instance of each field parser plus the shared config.
pub struct DocumentExtractor {
    config: ExtractorConfig,
    services: ServiceParser,
    schedule: ScheduleParser,
    contacts: ContactParser,
    reviews: ReviewParser,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl DocumentExtractor {
    #[must_use]
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            services: ServiceParser::new(&config),
            schedule: ScheduleParser::new(),
            contacts: ContactParser::new(&config),
            reviews: ReviewParser::new(),
            config,
        }
    }

    #[must_use]
    pub fn parse_services(&self, raw: &str) -> ParseOutcome<Vec<ServiceDraft>> {
        self.services.parse(raw)
    }

    #[must_use]
    pub fn parse_schedule(&self, raw: &str) -> ParseOutcome<WorkingHoursDraft> {
        self.schedule.parse(raw)
    }

    #[must_use]
    pub fn parse_contacts(&self, input: &ContactInput) -> ParseOutcome<ContactsDraft> {
        self.contacts.parse(input)
    }

    #[must_use]
    pub fn parse_reviews(&self, raw: &str) -> ParseOutcome<Vec<ReviewDraft>> {
        self.reviews.parse(raw)
    }

    /// Runs every field category over the fragments and assembles one
    /// validated record.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` only for hard required-field violations
    /// (empty or over-length name). Everything else degrades to absent
    /// fields with parser-level confidence reporting.
    pub fn extract(&self, fragments: &SourceFragments) -> Result<Enterprise, ModelError> {
        let services_outcome = self.parse_services(fragments.services.as_deref().unwrap_or(""));
        let schedule_outcome = self.parse_schedule(fragments.schedule.as_deref().unwrap_or(""));
        let contacts_outcome = self.parse_contacts(&fragments.contacts);
        let reviews_outcome = self.parse_reviews(fragments.reviews.as_deref().unwrap_or(""));

        let rating = fragments
            .rating
            .as_deref()
            .and_then(|raw| text::extract_numbers(raw).into_iter().next());

        #[allow(clippy::cast_possible_truncation)]
        let reviews_count = fragments
            .reviews_count
            .as_deref()
            .and_then(|raw| text::extract_numbers(raw).into_iter().next())
            .map(|n| n.trunc() as i64);

        let contacts = if contacts_outcome.success {
            contacts_outcome.data.clone()
        } else {
            ContactsDraft::default()
        };

        // Raw direct handles the parser could not shape (bare usernames,
        // bare phone numbers) still reach the model layer, which expands
        // them to canonical URLs itself.
        let mut social = contacts.social;
        social.telegram = social
            .telegram
            .or_else(|| fragments.contacts.telegram.clone());
        social.whatsapp = social
            .whatsapp
            .or_else(|| fragments.contacts.whatsapp.clone());
        social.vk = social.vk.or_else(|| fragments.contacts.vk.clone());

        let draft = EnterpriseDraft {
            name: fragments.name.clone().unwrap_or_default(),
            category: fragments.category.clone(),
            address: fragments.address.clone(),
            phone: contacts.phone.clone(),
            website: contacts.website.clone(),
            rating,
            reviews_count,
            services: if services_outcome.success {
                services_outcome.data.clone()
            } else {
                Vec::new()
            },
            reviews: if reviews_outcome.success {
                reviews_outcome.data.clone()
            } else {
                Vec::new()
            },
            social,
            working_hours: if schedule_outcome.success {
                schedule_outcome.data.clone()
            } else {
                WorkingHoursDraft::default()
            },
        };

        let mut enterprise = Enterprise::from_draft(draft, &self.config)?;

        annotate_metadata(
            &mut enterprise,
            fragments,
            contacts.email.as_deref(),
            &[
                ("services", services_outcome.confidence),
                ("schedule", schedule_outcome.confidence),
                ("contacts", contacts_outcome.confidence),
                ("reviews", reviews_outcome.confidence),
            ],
        );

        tracing::debug!(
            name = %enterprise.name,
            completeness = enterprise.completeness_score(),
            "extracted enterprise record"
        );

        Ok(enterprise)
    }
}

/// Annotates the metadata bag after validation: provenance, per-category
/// confidence, and derived quality metrics. Primary fields are never
/// touched here.
fn annotate_metadata(
    enterprise: &mut Enterprise,
    fragments: &SourceFragments,
    email: Option<&str>,
    confidences: &[(&str, f32)],
) {
    let completeness = (enterprise.completeness_score() * 100.0).round() / 100.0;

    let metadata = &mut enterprise.metadata;

    metadata.insert(
        "record_id".to_owned(),
        Value::String(Uuid::new_v4().to_string()),
    );

    if let Some(source_url) = &fragments.source_url {
        metadata.insert("source_url".to_owned(), Value::String(source_url.clone()));
    }

    if let Some(email) = email {
        metadata.insert("contact_email".to_owned(), Value::String(email.to_owned()));
    }

    let confidence_map: serde_json::Map<String, Value> = confidences
        .iter()
        .map(|(category, confidence)| ((*category).to_owned(), json!(confidence)))
        .collect();
    metadata.insert("parser_confidence".to_owned(), Value::Object(confidence_map));

    metadata.insert("completeness".to_owned(), json!(completeness));

    let review_texts: Vec<&str> = enterprise
        .reviews
        .iter()
        .filter_map(|r| r.text.as_deref())
        .collect();
    if !review_texts.is_empty() {
        let total: f32 = review_texts.iter().map(|t| sentiment::lexicon_score(t)).sum();
        #[allow(clippy::cast_precision_loss)]
        let lexicon_avg = total / review_texts.len() as f32;
        let (label, positive, negative) = sentiment::classify(&review_texts.join(" "));

        metadata.insert(
            "review_sentiment".to_owned(),
            json!({
                "lexicon_score": lexicon_avg,
                "label": label.to_string(),
                "positive_indicators": positive,
                "negative_indicators": negative,
                "from_ratings": rating_sentiment_mean(&enterprise.reviews),
            }),
        );
    }
}

/// Mean of the per-review rating-derived sentiment scores, or null when
/// no review carries a rating.
fn rating_sentiment_mean(reviews: &[mapcard_core::Review]) -> Option<f32> {
    let scores: Vec<f32> = reviews
        .iter()
        .filter_map(mapcard_core::Review::sentiment_score)
        .collect();
    if scores.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = scores.iter().sum::<f32>() / scores.len() as f32;
    Some(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_fails_without_name() {
        let extractor = DocumentExtractor::default();
        let fragments = SourceFragments::default();
        assert!(matches!(
            extractor.extract(&fragments),
            Err(ModelError::EmptyName)
        ));
    }

    #[test]
    fn categories_are_independent() {
        let extractor = DocumentExtractor::default();
        let fragments = SourceFragments {
            name: Some("Eva Beauty Studio".to_owned()),
            // Price with no resolvable service name: the category misses.
            services: Some("2800 руб".to_owned()),
            schedule: Some("Пн-Пт: 09:00-18:00".to_owned()),
            ..SourceFragments::default()
        };

        let enterprise = extractor.extract(&fragments).unwrap();
        // Service parsing missed; the schedule still landed.
        assert!(enterprise.services.is_empty());
        assert!(!enterprise.working_hours.schedule.is_empty());
    }

    #[test]
    fn metadata_carries_provenance() {
        let extractor = DocumentExtractor::default();
        let fragments = SourceFragments {
            name: Some("Eva Beauty Studio".to_owned()),
            source_url: Some("https://yandex.com.ge/maps/-/CHXU6Fmb".to_owned()),
            ..SourceFragments::default()
        };

        let enterprise = extractor.extract(&fragments).unwrap();
        assert_eq!(
            enterprise.metadata.get("source_url").and_then(Value::as_str),
            Some("https://yandex.com.ge/maps/-/CHXU6Fmb")
        );
        assert!(enterprise.metadata.contains_key("record_id"));
        assert!(enterprise.metadata.contains_key("parser_confidence"));
        assert!(enterprise.metadata.contains_key("scraper_version"));
    }
}
