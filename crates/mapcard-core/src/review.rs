//! Customer review value object.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text;
use crate::ModelError;

const AUTHOR_MAX: usize = 100;
const DATE_MAX: usize = 50;
const TEXT_MAX: usize = 5000;
const RESPONSE_MAX: usize = 3000;

/// Raw review data as produced by the review parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub author: String,
    pub rating: Option<i64>,
    pub date: Option<String>,
    pub text: Option<String>,
    pub response: Option<String>,
    /// Helpful-vote count; a parser confidence signal only, not carried
    /// into the validated review.
    pub helpful_count: Option<u32>,
}

/// Validated review of an enterprise.
///
/// The author is the mandatory anchor field. A rating outside 1-5 is a
/// hard failure here — unlike `Enterprise::rating`, which nulls out of
/// range — because the two are sourced differently and the asymmetry is
/// intentional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: Option<u8>,
    /// Free text: source date formats are too irregular to round-trip
    /// through a strict date type.
    pub date: Option<String>,
    pub text: Option<String>,
    pub response: Option<String>,
}

impl Review {
    /// Validates a draft into a `Review`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the author is empty or over-length, or
    /// the rating falls outside 1-5.
    pub fn from_draft(draft: ReviewDraft) -> Result<Self, ModelError> {
        let author = collapse_ws(draft.author.trim());
        if author.is_empty() {
            return Err(ModelError::EmptyAuthor);
        }
        let author_len = author.chars().count();
        if author_len > AUTHOR_MAX {
            return Err(ModelError::AuthorTooLong {
                len: author_len,
                max: AUTHOR_MAX,
            });
        }

        let rating = match draft.rating {
            None => None,
            Some(r) if (1..=5).contains(&r) => u8::try_from(r).ok(),
            Some(r) => return Err(ModelError::RatingOutOfRange(r)),
        };

        let date = optional_collapsed(draft.date).map(|d| text::cap_len("review.date", d, DATE_MAX));
        let text = optional_body(draft.text).map(|t| text::cap_len("review.text", t, TEXT_MAX));
        let response =
            optional_body(draft.response).map(|r| text::cap_len("review.response", r, RESPONSE_MAX));

        Ok(Self {
            author,
            rating,
            date,
            text,
            response,
        })
    }

    /// A review with rating 4 or 5.
    #[must_use]
    pub fn is_positive(&self) -> Option<bool> {
        self.rating.map(|r| r >= 4)
    }

    /// A review with rating 1 or 2.
    #[must_use]
    pub fn is_negative(&self) -> Option<bool> {
        self.rating.map(|r| r <= 2)
    }

    /// Linear sentiment proxy from the rating: -1.0 at one star, 1.0 at
    /// five.
    #[must_use]
    pub fn sentiment_score(&self) -> Option<f32> {
        self.rating.map(|r| (f32::from(r) - 3.0) / 2.0)
    }

    /// Rating rendered as filled and hollow stars.
    #[must_use]
    pub fn rating_stars(&self) -> String {
        match self.rating {
            None => "Рейтинг не указан".to_owned(),
            Some(r) => {
                let filled = usize::from(r);
                "★".repeat(filled) + &"☆".repeat(5 - filled)
            }
        }
    }

    #[must_use]
    pub fn has_owner_response(&self) -> bool {
        self.response.as_deref().is_some_and(|r| !r.trim().is_empty())
    }

    /// Word-boundary preview of the review text.
    #[must_use]
    pub fn text_preview(&self, max_length: usize) -> String {
        let Some(text) = &self.text else {
            return String::new();
        };

        if text.chars().count() <= max_length {
            return text.clone();
        }

        let mut preview = String::new();
        for word in text.split_whitespace() {
            let candidate_len = preview.chars().count() + 1 + word.chars().count();
            if !preview.is_empty() && candidate_len > max_length {
                break;
            }
            if !preview.is_empty() {
                preview.push(' ');
            }
            preview.push_str(word);
        }

        preview + "..."
    }
}

fn collapse_ws(s: &str) -> String {
    let re = Regex::new(r"\s+").expect("valid regex");
    re.replace_all(s, " ").into_owned()
}

fn optional_collapsed(value: Option<String>) -> Option<String> {
    let value = value?;
    let collapsed = collapse_ws(value.trim());
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Review body cleanup: HTML stripped, whitespace collapsed, runs of
/// trailing punctuation squeezed.
fn optional_body(value: Option<String>) -> Option<String> {
    let value = value?;
    let mut cleaned = text::clean_text(&value, true, true);
    if cleaned.is_empty() {
        return None;
    }

    for (pattern, replacement) in [(r"[.]{3,}", "..."), (r"[!]{2,}", "!"), (r"[?]{2,}", "?")] {
        let re = Regex::new(pattern).expect("valid regex");
        cleaned = re.replace_all(&cleaned, replacement).into_owned();
    }

    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(author: &str, rating: Option<i64>) -> ReviewDraft {
        ReviewDraft {
            author: author.to_owned(),
            rating,
            ..ReviewDraft::default()
        }
    }

    #[test]
    fn valid_review_constructs() {
        let review = Review::from_draft(ReviewDraft {
            author: "Анна К.".to_owned(),
            rating: Some(5),
            date: Some("15.01.2024".to_owned()),
            text: Some("Отличный сервис! Рекомендую.".to_owned()),
            ..ReviewDraft::default()
        })
        .unwrap();
        assert_eq!(review.author, "Анна К.");
        assert_eq!(review.rating, Some(5));
    }

    #[test]
    fn empty_author_fails() {
        let err = Review::from_draft(draft("  ", None)).unwrap_err();
        assert!(matches!(err, ModelError::EmptyAuthor));
    }

    #[test]
    fn rating_zero_fails() {
        let err = Review::from_draft(draft("Анна", Some(0))).unwrap_err();
        assert!(matches!(err, ModelError::RatingOutOfRange(0)));
    }

    #[test]
    fn rating_six_fails() {
        let err = Review::from_draft(draft("Анна", Some(6))).unwrap_err();
        assert!(matches!(err, ModelError::RatingOutOfRange(6)));
    }

    #[test]
    fn rating_bounds_accepted() {
        assert_eq!(
            Review::from_draft(draft("Анна", Some(1))).unwrap().rating,
            Some(1)
        );
        assert_eq!(
            Review::from_draft(draft("Анна", Some(5))).unwrap().rating,
            Some(5)
        );
    }

    #[test]
    fn positive_negative_split() {
        // Over {1,2,4,5} the two predicates are mutually exclusive and
        // jointly exhaustive; 3 is neither.
        for (rating, positive, negative) in
            [(1, false, true), (2, false, true), (4, true, false), (5, true, false)]
        {
            let review = Review::from_draft(draft("Анна", Some(rating))).unwrap();
            assert_eq!(review.is_positive(), Some(positive));
            assert_eq!(review.is_negative(), Some(negative));
        }

        let neutral = Review::from_draft(draft("Анна", Some(3))).unwrap();
        assert_eq!(neutral.is_positive(), Some(false));
        assert_eq!(neutral.is_negative(), Some(false));
    }

    #[test]
    fn sentiment_score_scale() {
        let one = Review::from_draft(draft("Анна", Some(1))).unwrap();
        let five = Review::from_draft(draft("Анна", Some(5))).unwrap();
        assert_eq!(one.sentiment_score(), Some(-1.0));
        assert_eq!(five.sentiment_score(), Some(1.0));
    }

    #[test]
    fn rating_stars_render() {
        let review = Review::from_draft(draft("Анна", Some(3))).unwrap();
        assert_eq!(review.rating_stars(), "★★★☆☆");
    }

    #[test]
    fn text_html_stripped() {
        let review = Review::from_draft(ReviewDraft {
            author: "Анна".to_owned(),
            text: Some("<p>Хорошо!!!</p>".to_owned()),
            ..ReviewDraft::default()
        })
        .unwrap();
        assert_eq!(review.text.as_deref(), Some("Хорошо!"));
    }

    #[test]
    fn text_preview_cuts_on_word_boundary() {
        let review = Review::from_draft(ReviewDraft {
            author: "Анна".to_owned(),
            text: Some("Отличный сервис и прекрасные мастера".to_owned()),
            ..ReviewDraft::default()
        })
        .unwrap();
        let preview = review.text_preview(16);
        assert_eq!(preview, "Отличный сервис...");
    }

    #[test]
    fn no_response_means_no_owner_reply() {
        let review = Review::from_draft(draft("Анна", None)).unwrap();
        assert!(!review.has_owner_response());
    }
}
