//! Review parser: splits a blob of concatenated reviews into segments
//! and extracts author, star rating, date, body text, and owner response
//! from each.
//!
//! The author is the mandatory anchor: a segment with no discernible
//! author is discarded entirely, whatever else it contained.

use chrono::{Datelike, Duration, Local};
use regex::Regex;

use mapcard_core::{text, ReviewDraft};

use crate::outcome::ParseOutcome;

const MIN_BLOCK_LEN: usize = 20;
const MIN_BODY_LEN: usize = 10;
const HELPFUL_MAX: u32 = 10_000;

/// Phrases that introduce the owner's reply inside a review body.
const OWNER_RESPONSE_INDICATORS: &[&str] = &[
    "ответ владельца",
    "ответ заведения",
    "от администрации",
    "owner response",
    "business response",
    "management response",
    "администратор",
    "менеджер",
    "руководство",
];

const MONTHS_RU: &[(&str, u32)] = &[
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

const MONTHS_EN: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// How a matched date pattern is converted to `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy)]
enum DateKind {
    RuFull,
    EnFull,
    RuShort,
    EnShort,
    NumericDot,
    /// American month/day/year order.
    NumericSlash,
    Iso,
    RelativeRu,
    RelativeEn,
    DaysAgoRu,
    DaysAgoEn,
    WeeksAgoRu,
    WeeksAgoEn,
    MonthsAgo,
}

pub struct ReviewParser {
    bullet_sep_re: Regex,
    numbered_sep_re: Regex,
    blank_run_re: Regex,
    author_boundary_re: Regex,
    rating_boundary_re: Regex,
    author_patterns: Vec<Regex>,
    rating_patterns: Vec<Regex>,
    star_run_re: Regex,
    date_patterns: Vec<(Regex, DateKind)>,
    helpful_patterns: Vec<Regex>,
}

impl Default for ReviewParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewParser {
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn new() -> Self {
        let author_patterns = [
            r"^([А-ЯЁ][а-яё]+\s+[А-ЯЁ]\.?)$",
            r"^([А-ЯЁ][а-яё]+)$",
            r"^([A-Z][a-z]+\s+[A-Z]\.?)$",
            r"^([A-Z][a-z]+)$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let rating_patterns = [
            r"(\d)\s*(?:из\s*5|/5|\*|★)",
            r"(\d+)\s*звезд[ыа]?",
            r"(\d+)\s*балл[ао]в?",
            r"(?i)оценка:\s*(\d+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let date_table: Vec<(&str, DateKind)> = vec![
            (
                r"(\d{1,2})\s+(января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)\s+(\d{4})",
                DateKind::RuFull,
            ),
            (
                r"(?i)(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+(\d{4})",
                DateKind::EnFull,
            ),
            (
                r"(\d{1,2})\s+(января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)",
                DateKind::RuShort,
            ),
            (
                r"(?i)(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
                DateKind::EnShort,
            ),
            (r"(\d{1,2})\.(\d{1,2})\.(\d{2,4})", DateKind::NumericDot),
            (r"(\d{1,2})/(\d{1,2})/(\d{2,4})", DateKind::NumericSlash),
            (r"(\d{4})-(\d{1,2})-(\d{1,2})", DateKind::Iso),
            (r"(сегодня|вчера|позавчера)", DateKind::RelativeRu),
            (r"(?i)\b(today|yesterday)\b", DateKind::RelativeEn),
            (r"(\d+)\s*(?:дн|дня|дней)\s*назад", DateKind::DaysAgoRu),
            (r"(?i)(\d+)\s*days?\s*ago", DateKind::DaysAgoEn),
            (r"(\d+)\s*(?:нед|недел[иь])\s*назад", DateKind::WeeksAgoRu),
            (r"(?i)(\d+)\s*weeks?\s*ago", DateKind::WeeksAgoEn),
            (
                r"(?i)(\d+)\s*(?:мес|месяц[ае]в?|months?)\s*(?:назад|ago)",
                DateKind::MonthsAgo,
            ),
        ];

        let date_patterns = date_table
            .into_iter()
            .map(|(pattern, kind)| (Regex::new(pattern).expect("valid regex"), kind))
            .collect();

        let helpful_patterns = [r"(?i)(\d+)\s*(?:полезно|helpful)", r"👍\s*(\d+)"]
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect();

        Self {
            bullet_sep_re: Regex::new(r"(?m)^\s*[-•*]\s*").expect("valid regex"),
            numbered_sep_re: Regex::new(r"(?m)^\s*\d+\.\s*").expect("valid regex"),
            blank_run_re: Regex::new(r"\n{3,}").expect("valid regex"),
            author_boundary_re: Regex::new(r"\n[А-ЯЁ][а-яё]+\s+[А-ЯЁ]\.").expect("valid regex"),
            rating_boundary_re: Regex::new(r"\n\d+\s+(?:звезд|★)").expect("valid regex"),
            author_patterns,
            rating_patterns,
            star_run_re: Regex::new(r"★+").expect("valid regex"),
            date_patterns,
            helpful_patterns,
        }
    }

    /// Parses a blob holding zero or more concatenated reviews. The
    /// outcome confidence is the mean over all split segments.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParseOutcome<Vec<ReviewDraft>> {
        if raw.trim().is_empty() {
            return ParseOutcome::miss(Vec::new());
        }

        let blocks = self.split_reviews(raw);
        if blocks.is_empty() {
            return ParseOutcome::miss(Vec::new());
        }

        let mut drafts = Vec::new();
        let mut total_confidence = 0.0_f32;

        for block in &blocks {
            if let Some((draft, confidence)) = self.parse_single(block) {
                drafts.push(draft);
                total_confidence += confidence;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let avg = total_confidence / blocks.len() as f32;

        if drafts.is_empty() {
            ParseOutcome::miss(Vec::new())
        } else {
            ParseOutcome::hit(drafts, avg)
        }
    }

    /// Tries the prioritized separators, then the author-line and
    /// rating-marker boundaries; first strategy yielding more than one
    /// sizable block wins.
    fn split_reviews(&self, raw: &str) -> Vec<String> {
        let candidate_splits: Vec<Vec<String>> = vec![
            self.bullet_sep_re.split(raw).map(str::to_owned).collect(),
            self.numbered_sep_re.split(raw).map(str::to_owned).collect(),
            self.blank_run_re.split(raw).map(str::to_owned).collect(),
            split_before(raw, &self.author_boundary_re),
            split_before(raw, &self.rating_boundary_re),
        ];

        for pieces in candidate_splits {
            let blocks: Vec<String> = pieces
                .iter()
                .map(|b| text::clean_text(b, true, true))
                .filter(|b| b.chars().count() > MIN_BLOCK_LEN)
                .collect();

            if blocks.len() > 1 {
                return blocks;
            }
        }

        let whole = text::clean_text(raw, true, true);
        if whole.is_empty() {
            Vec::new()
        } else {
            vec![whole]
        }
    }

    fn parse_single(&self, block: &str) -> Option<(ReviewDraft, f32)> {
        if block.trim().chars().count() < 10 {
            return None;
        }

        let mut confidence = 0.3_f32;

        let author = self.extract_author(block)?;
        confidence += 0.2;

        let rating = self.extract_rating(block);
        if rating.is_some() {
            confidence += 0.2;
        }

        let date = self.parse_date(block);
        if date.is_some() {
            confidence += 0.1;
        }

        let (body, response) = self.extract_body(block);
        if body.is_some() || response.is_some() {
            confidence += 0.2;
        }

        let helpful_count = self.extract_helpful(block);
        if helpful_count.is_some() {
            confidence += 0.1;
        }

        let draft = ReviewDraft {
            author,
            rating: rating.map(i64::from),
            date,
            text: body,
            response,
            helpful_count,
        };

        Some((draft, confidence.min(1.0)))
    }

    /// Name-shaped line among the first three, else the first
    /// capitalized non-numeric word among the first five.
    fn extract_author(&self, block: &str) -> Option<String> {
        for line in block.lines().take(3) {
            let line = line.trim();
            for re in &self.author_patterns {
                if let Some(caps) = re.captures(line) {
                    let name = caps[1].trim().to_owned();
                    let len = name.chars().count();
                    if (2..=50).contains(&len) {
                        return Some(name);
                    }
                }
            }
        }

        for word in block.split_whitespace().take(5) {
            let cleaned: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '.' | '-'))
                .collect();

            if cleaned.chars().count() >= 2
                && cleaned.chars().next().is_some_and(char::is_uppercase)
                && !cleaned.chars().all(|c| c.is_ascii_digit())
            {
                return Some(cleaned);
            }
        }

        None
    }

    fn extract_rating(&self, block: &str) -> Option<u8> {
        for re in &self.rating_patterns {
            if let Some(caps) = re.captures(block) {
                if let Ok(rating) = caps[1].parse::<u8>() {
                    if (1..=5).contains(&rating) {
                        return Some(rating);
                    }
                }
            }
        }

        // Literal star runs as the last resort.
        if let Some(m) = self.star_run_re.find(block) {
            let count = m.as_str().chars().count();
            if (1..=5).contains(&count) {
                return u8::try_from(count).ok();
            }
        }

        None
    }

    /// Ordered date-pattern table; every hit renders as `DD.MM.YYYY`.
    /// Relative offsets are bounded to reject nonsensical claims.
    #[must_use]
    pub fn parse_date(&self, date_text: &str) -> Option<String> {
        for (re, kind) in &self.date_patterns {
            let Some(caps) = re.captures(date_text) else {
                continue;
            };

            let resolved = match kind {
                DateKind::RuFull => {
                    let day: u32 = caps[1].parse().ok()?;
                    let month = month_ru(&caps[2])?;
                    format_date(day, month, caps[3].parse().ok()?)
                }
                DateKind::EnFull => {
                    let day: u32 = caps[1].parse().ok()?;
                    let month = month_en(&caps[2])?;
                    format_date(day, month, caps[3].parse().ok()?)
                }
                DateKind::RuShort => {
                    let day: u32 = caps[1].parse().ok()?;
                    let month = month_ru(&caps[2])?;
                    format_date(day, month, Local::now().year())
                }
                DateKind::EnShort => {
                    let day: u32 = caps[1].parse().ok()?;
                    let month = month_en(&caps[2])?;
                    format_date(day, month, Local::now().year())
                }
                DateKind::NumericDot => {
                    let day: u32 = caps[1].parse().ok()?;
                    let month: u32 = caps[2].parse().ok()?;
                    format_date(day, month, expand_year(&caps[3])?)
                }
                DateKind::NumericSlash => {
                    let month: u32 = caps[1].parse().ok()?;
                    let day: u32 = caps[2].parse().ok()?;
                    format_date(day, month, expand_year(&caps[3])?)
                }
                DateKind::Iso => {
                    let year: i32 = caps[1].parse().ok()?;
                    let month: u32 = caps[2].parse().ok()?;
                    let day: u32 = caps[3].parse().ok()?;
                    format_date(day, month, year)
                }
                DateKind::RelativeRu => {
                    let days_back = match &caps[1] {
                        "сегодня" => 0,
                        "вчера" => 1,
                        _ => 2,
                    };
                    days_ago(days_back)
                }
                DateKind::RelativeEn => {
                    let days_back = if caps[1].eq_ignore_ascii_case("today") {
                        0
                    } else {
                        1
                    };
                    days_ago(days_back)
                }
                DateKind::DaysAgoRu | DateKind::DaysAgoEn => {
                    let days: i64 = caps[1].parse().ok()?;
                    if days > 365 {
                        continue;
                    }
                    days_ago(days)
                }
                DateKind::WeeksAgoRu | DateKind::WeeksAgoEn => {
                    let weeks: i64 = caps[1].parse().ok()?;
                    if weeks > 52 {
                        continue;
                    }
                    days_ago(weeks * 7)
                }
                DateKind::MonthsAgo => {
                    let months: i64 = caps[1].parse().ok()?;
                    if months > 12 {
                        continue;
                    }
                    days_ago(months * 30)
                }
            };

            return Some(resolved);
        }

        None
    }

    fn extract_helpful(&self, block: &str) -> Option<u32> {
        for re in &self.helpful_patterns {
            if let Some(caps) = re.captures(block) {
                if let Ok(count) = caps[1].parse::<u32>() {
                    if count <= HELPFUL_MAX {
                        return Some(count);
                    }
                }
            }
        }
        None
    }

    /// Joins the lines not already claimed as author/rating/date, then
    /// splits review text from the owner's reply at the first indicator
    /// phrase. Either side shorter than the body minimum is nulled.
    fn extract_body(&self, block: &str) -> (Option<String>, Option<String>) {
        let mut kept_lines = Vec::new();

        for line in block.lines() {
            let line = line.trim();
            if line.chars().count() <= 5 {
                continue;
            }

            if self.author_patterns.iter().any(|re| re.is_match(line)) {
                continue;
            }
            if self.rating_patterns.iter().any(|re| re.is_match(line)) {
                continue;
            }
            if self.date_patterns.iter().any(|(re, _)| re.is_match(line)) {
                continue;
            }

            kept_lines.push(line);
        }

        if kept_lines.is_empty() {
            return (None, None);
        }

        let full_text = kept_lines.join(" ");
        let lower = full_text.to_lowercase();

        let mut body = full_text.clone();
        let mut response = None;

        for indicator in OWNER_RESPONSE_INDICATORS {
            if let Some(position) = lower.find(indicator) {
                body = full_text[..position].trim().to_owned();
                response = Some(full_text[position + indicator.len()..].trim().to_owned());
                break;
            }
        }

        let keep = |s: String| {
            let cleaned = text::clean_text(&s, true, true);
            if cleaned.chars().count() > MIN_BODY_LEN {
                Some(cleaned)
            } else {
                None
            }
        };

        (keep(body), response.and_then(keep))
    }
}

/// Splits `text` right before every match of `boundary`, keeping the
/// matched text at the head of the following piece. The regex crate has
/// no lookahead, so the boundary positions are collected manually.
fn split_before(text: &str, boundary: &Regex) -> Vec<String> {
    let starts: Vec<usize> = boundary.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![text.to_owned()];
    }

    let mut pieces = Vec::with_capacity(starts.len() + 1);
    let mut previous = 0;
    for start in starts {
        if start > previous {
            pieces.push(text[previous..start].to_owned());
        }
        previous = start;
    }
    pieces.push(text[previous..].to_owned());
    pieces
}

fn month_ru(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    MONTHS_RU
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, number)| *number)
}

fn month_en(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    MONTHS_EN
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, number)| *number)
}

/// Two-digit years pivot at 30: 24 is 2024, 95 is 1995.
fn expand_year(raw: &str) -> Option<i32> {
    let value: i32 = raw.parse().ok()?;
    if raw.len() == 2 {
        Some(if value <= 30 { 2000 + value } else { 1900 + value })
    } else {
        Some(value)
    }
}

fn format_date(day: u32, month: u32, year: i32) -> String {
    format!("{day:02}.{month:02}.{year}")
}

fn days_ago(days: i64) -> String {
    (Local::now() - Duration::days(days))
        .format("%d.%m.%Y")
        .to_string()
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod tests;
