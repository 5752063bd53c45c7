//! Service (priced offering) value object.

use serde::{Deserialize, Serialize};

use crate::text;
use crate::ModelError;

const NAME_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;
const DURATION_MAX: usize = 50;

/// Raw service data as produced by the price/service parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub price: Option<String>,
    pub price_from: Option<String>,
    pub price_to: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

/// Validated service entry of an enterprise.
///
/// Price fields hold digit strings plus a restricted set of punctuation
/// and currency tokens; anything else fails construction. An inverted
/// range (`price_from` above `price_to`) is tolerated as a soft
/// inconsistency because source data is unreliable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub price: Option<String>,
    pub price_from: Option<String>,
    pub price_to: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

impl Service {
    /// Validates a draft into a `Service`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the name is empty or over-length, or a
    /// price field contains characters outside the price alphabet.
    pub fn from_draft(draft: ServiceDraft) -> Result<Self, ModelError> {
        let name = draft.name.trim().to_owned();
        if name.is_empty() {
            return Err(ModelError::EmptyServiceName);
        }
        let name_len = name.chars().count();
        if name_len > NAME_MAX {
            return Err(ModelError::ServiceNameTooLong {
                len: name_len,
                max: NAME_MAX,
            });
        }

        let price = validate_price_field("price", draft.price)?;
        let price_from = validate_price_field("price_from", draft.price_from)?;
        let price_to = validate_price_field("price_to", draft.price_to)?;

        if let (Some(from), Some(to)) = (&price_from, &price_to) {
            if let (Some(from_val), Some(to_val)) = (first_number(from), first_number(to)) {
                if from_val > to_val {
                    tracing::warn!(
                        service = %name,
                        price_from = %from,
                        price_to = %to,
                        "price range is inverted; keeping as-is"
                    );
                }
            }
        }

        let description = optional_text(draft.description)
            .map(|d| text::cap_len("service.description", d, DESCRIPTION_MAX));
        let duration =
            optional_text(draft.duration).map(|d| text::cap_len("service.duration", d, DURATION_MAX));

        Ok(Self {
            name,
            price,
            price_from,
            price_to,
            description,
            duration,
        })
    }

    /// First numeric value of `price` (or `price_from` as fallback).
    #[must_use]
    pub fn price_numeric(&self) -> Option<f64> {
        let source = self.price.as_deref().or(self.price_from.as_deref())?;
        first_number(source)
    }

    /// True when both ends of a price range are present.
    #[must_use]
    pub fn has_price_range(&self) -> bool {
        self.price_from.is_some() && self.price_to.is_some()
    }

    /// Human-readable price, preferring the range form.
    #[must_use]
    pub fn display_price(&self) -> String {
        match (&self.price_from, &self.price_to, &self.price) {
            (Some(from), Some(to), _) => format!("от {from} до {to}"),
            (_, _, Some(price)) => price.clone(),
            (Some(from), None, None) => format!("от {from}"),
            (None, Some(to), None) => format!("до {to}"),
            (None, None, None) => "Цена не указана".to_owned(),
        }
    }
}

/// Currency and bound tokens stripped before the character check. Longer
/// tokens first so "рублей" is not left half-eaten by "руб".
const PRICE_TOKENS: &[&str] = &["рублей", "рубля", "руб", "от", "до", "₽"];

fn validate_price_field(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ModelError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let value = value.trim().to_owned();
    if value.is_empty() {
        return Ok(None);
    }

    let mut stripped = value.to_lowercase();
    for token in PRICE_TOKENS {
        stripped = stripped.replace(token, "");
    }

    let acceptable = stripped
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | ',' | '-'));

    if acceptable {
        Ok(Some(value))
    } else {
        Err(ModelError::InvalidPriceField { field, value })
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_owned();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn first_number(s: &str) -> Option<f64> {
    text::extract_numbers(s).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> ServiceDraft {
        ServiceDraft {
            name: name.to_owned(),
            ..ServiceDraft::default()
        }
    }

    #[test]
    fn plain_service_validates() {
        let service = Service::from_draft(ServiceDraft {
            name: "Маникюр с покрытием".to_owned(),
            price: Some("2800".to_owned()),
            duration: Some("60 мин".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert_eq!(service.name, "Маникюр с покрытием");
        assert_eq!(service.price.as_deref(), Some("2800"));
    }

    #[test]
    fn empty_name_fails() {
        let err = Service::from_draft(draft("   ")).unwrap_err();
        assert!(matches!(err, ModelError::EmptyServiceName));
    }

    #[test]
    fn over_length_name_fails() {
        let err = Service::from_draft(draft(&"х".repeat(201))).unwrap_err();
        assert!(matches!(err, ModelError::ServiceNameTooLong { len: 201, .. }));
    }

    #[test]
    fn price_with_currency_tokens_accepted() {
        let service = Service::from_draft(ServiceDraft {
            name: "Стрижка".to_owned(),
            price: Some("от 2800 руб".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert_eq!(service.price.as_deref(), Some("от 2800 руб"));
    }

    #[test]
    fn price_with_foreign_characters_rejected() {
        let err = Service::from_draft(ServiceDraft {
            name: "Стрижка".to_owned(),
            price: Some("звоните".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidPriceField { field: "price", .. }
        ));
    }

    #[test]
    fn empty_price_becomes_none() {
        let service = Service::from_draft(ServiceDraft {
            name: "Стрижка".to_owned(),
            price: Some("  ".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert!(service.price.is_none());
    }

    #[test]
    fn inverted_range_is_soft() {
        let service = Service::from_draft(ServiceDraft {
            name: "Массаж".to_owned(),
            price_from: Some("5000".to_owned()),
            price_to: Some("2800".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert!(service.has_price_range());
    }

    #[test]
    fn price_numeric_prefers_price_over_from() {
        let service = Service::from_draft(ServiceDraft {
            name: "Массаж".to_owned(),
            price: Some("2800-3500".to_owned()),
            price_from: Some("2800".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert_eq!(service.price_numeric(), Some(2800.0));
    }

    #[test]
    fn display_price_range_form() {
        let service = Service::from_draft(ServiceDraft {
            name: "Массаж".to_owned(),
            price_from: Some("2800".to_owned()),
            price_to: Some("3500".to_owned()),
            ..ServiceDraft::default()
        })
        .unwrap();
        assert_eq!(service.display_price(), "от 2800 до 3500");
    }

    #[test]
    fn display_price_absent() {
        let service = Service::from_draft(draft("Массаж")).unwrap();
        assert_eq!(service.display_price(), "Цена не указана");
    }
}
