//! Word-weight lexicon scorer for review text.
//!
//! A crude proxy, not a model: positive and negative review vocabulary
//! with hand-tuned weights, summed and clamped. Used to stamp an
//! aggregate sentiment hint into record metadata alongside the
//! rating-derived score.

use serde::Serialize;

/// Review-domain word weights. Keys are lowercase single words; values
/// in `(0.0, 1.0]` are positive, in `[-1.0, 0.0)` negative. The final
/// score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("отлично", 0.5),
    ("отличный", 0.5),
    ("прекрасно", 0.5),
    ("замечательно", 0.5),
    ("замечательные", 0.4),
    ("великолепно", 0.5),
    ("супер", 0.4),
    ("класс", 0.4),
    ("круто", 0.4),
    ("восхитительно", 0.5),
    ("превосходно", 0.5),
    ("шикарно", 0.4),
    ("рекомендую", 0.5),
    ("советую", 0.4),
    ("довольна", 0.4),
    ("доволен", 0.4),
    ("понравилось", 0.4),
    ("хорошо", 0.3),
    ("хороший", 0.3),
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("wonderful", 0.5),
    ("amazing", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("recommend", 0.4),
    ("friendly", 0.3),
    ("clean", 0.3),
    // Negative signals
    ("плохо", -0.4),
    ("плохой", -0.4),
    ("ужасно", -0.6),
    ("ужасный", -0.6),
    ("кошмар", -0.6),
    ("отвратительно", -0.7),
    ("мерзко", -0.6),
    ("разочарована", -0.5),
    ("разочарован", -0.5),
    ("расстроена", -0.4),
    ("расстроен", -0.4),
    ("недовольна", -0.5),
    ("недоволен", -0.5),
    ("жаль", -0.3),
    ("сожалею", -0.3),
    ("проблема", -0.3),
    ("проблемы", -0.3),
    ("ошибка", -0.3),
    ("грязно", -0.5),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("horrible", -0.6),
    ("worst", -0.6),
    ("rude", -0.5),
    ("dirty", -0.5),
    ("disappointed", -0.5),
    ("problem", -0.3),
];

/// Sentiment label with its supporting indicator counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// Scores a text string against the lexicon.
///
/// Splits into lowercase words, strips edge punctuation, sums matching
/// weights, clamps to `[-1.0, 1.0]`. Empty or unknown text scores 0.0.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;

    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }

    score.clamp(-1.0, 1.0)
}

/// Classifies a text by counting positive vs negative lexicon hits.
#[must_use]
pub fn classify(text: &str) -> (SentimentLabel, usize, usize) {
    let mut positive = 0usize;
    let mut negative = 0usize;

    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| w == *lex_word) {
            if weight > 0.0 {
                positive += 1;
            } else {
                negative += 1;
            }
        }
    }

    let label = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    };

    (label, positive, negative)
}
