//! Price/service parser: splits a raw text block into individual
//! services and extracts name, price, duration, and description from
//! each.
//!
//! Price extraction is an ordered pattern table — range, "от X", "до X",
//! bare number — where the first match wins. The tables stay separate
//! (not one combined mega-pattern) so the tie-break order remains
//! auditable and testable per pattern.

use regex::Regex;
use serde::Serialize;

use mapcard_core::text;
use mapcard_core::{ExtractorConfig, ServiceDraft};

use crate::outcome::ParseOutcome;

/// Minimum segment length for a split to count as meaningful.
const MIN_SEGMENT_LEN: usize = 5;

/// Price fields extracted from one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceFields {
    pub price: Option<String>,
    pub price_from: Option<String>,
    pub price_to: Option<String>,
}

/// Internal price scan result: the public fields plus what the name
/// extractor needs to cut the matched substring back out.
struct PriceScan {
    fields: PriceFields,
    confidence: f32,
    /// Share of extracted price values inside the plausible window.
    plausibility: f32,
    /// Exact substring the winning pattern consumed, against the
    /// normalized fragment.
    matched: Option<String>,
    /// True when the bare-number fallback produced the price.
    bare_match: bool,
}

pub struct ServiceParser {
    separators: Vec<Regex>,
    range_re: Regex,
    from_re: Regex,
    to_re: Regex,
    bare_re: Regex,
    duration_minutes_re: Regex,
    duration_hours_re: Regex,
    duration_clock_re: Regex,
    duration_range_re: Regex,
    price_strip_res: Vec<Regex>,
    duration_strip_res: Vec<Regex>,
    price_min: f64,
    price_max: f64,
}

impl ServiceParser {
    #[must_use]
    pub fn new(config: &ExtractorConfig) -> Self {
        let separators = [
            r"(?m)^\s*[-•*]\s*",
            r"(?m)^\s*\d+\.\s*",
            r"(?m)^\s*\d+\)\s*",
            r"\n{2,}",
            r";\s*",
            r"\|\s*",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        // Alternations run longest-first so a match never leaves the tail
        // of a longer word behind in the name.
        let price_strip_res = [
            r"\d+(?:[.,]\d+)?\s*[-–—]\s*\d+(?:[.,]\d+)?\s*(?:₽|рублей|рубля|руб|р\.)",
            r"(?:от\s*)?\d+(?:[.,]\d+)?\s*(?:₽|рублей|рубля|руб|р\.)",
            r"(?:до\s*)?\d+(?:[.,]\d+)?\s*(?:₽|рублей|рубля|руб|р\.)",
        ]
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex"))
        .collect();

        let duration_strip_res = [
            r"\d+(?:[.,]\d+)?\s*[-–—]\s*\d+(?:[.,]\d+)?\s*(?:минут[ыа]?|мин|minutes?|min)",
            r"\d+\s*(?:минут[ыа]?|мин|minutes?|min)",
            r"\d+\s*(?:часов|часа|час|ч|hours?|hour)",
            r"\d+:\d+",
        ]
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex"))
        .collect();

        Self {
            separators,
            range_re: Regex::new(r"(\d+(?:[.,]\d+)?)\s*[-–—]\s*(\d+(?:[.,]\d+)?)")
                .expect("valid regex"),
            from_re: Regex::new(r"(?i)от\s*(\d+(?:[.,]\d+)?)").expect("valid regex"),
            to_re: Regex::new(r"(?i)до\s*(\d+(?:[.,]\d+)?)").expect("valid regex"),
            bare_re: Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex"),
            duration_minutes_re: Regex::new(r"(?i)(\d+)\s*(?:мин|минут|min|minutes?)")
                .expect("valid regex"),
            duration_hours_re: Regex::new(r"(?i)(\d+)\s*(?:ч|час|часов|hour|hours?)")
                .expect("valid regex"),
            duration_clock_re: Regex::new(r"(\d+):(\d+)").expect("valid regex"),
            duration_range_re: Regex::new(
                r"(?i)(\d+(?:[.,]\d+)?)\s*[-–—]\s*(\d+(?:[.,]\d+)?)\s*(?:мин|минут)",
            )
            .expect("valid regex"),
            price_strip_res,
            duration_strip_res,
            price_min: config.price_min,
            price_max: config.price_max,
        }
    }

    /// Parses a raw block that may hold several services concatenated.
    ///
    /// Segments that yield no service name are discarded entirely, even
    /// when a price was found. The outcome confidence is the mean over
    /// all attempted segments.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParseOutcome<Vec<ServiceDraft>> {
        if raw.trim().is_empty() {
            return ParseOutcome::miss(Vec::new());
        }

        let clean = text::clean_text(raw, true, true);
        let segments = self.split_segments(&clean);
        if segments.is_empty() {
            return ParseOutcome::miss(Vec::new());
        }

        let mut drafts = Vec::new();
        let mut total_confidence = 0.0_f32;

        for segment in &segments {
            if let Some((draft, confidence)) = self.parse_single(segment) {
                drafts.push(draft);
                total_confidence += confidence;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let avg = total_confidence / segments.len() as f32;

        if drafts.is_empty() {
            ParseOutcome::miss(Vec::new())
        } else {
            ParseOutcome::hit(drafts, avg)
        }
    }

    /// Public price extraction: first matching pattern wins.
    #[must_use]
    pub fn parse_price(&self, price_text: &str) -> ParseOutcome<PriceFields> {
        if price_text.trim().is_empty() {
            return ParseOutcome::miss(PriceFields::default());
        }

        let scan = self.scan_price(price_text);
        if scan.confidence > 0.0 {
            let confidence = scan.confidence * scan.plausibility;
            if confidence > 0.0 {
                return ParseOutcome::hit(scan.fields, confidence);
            }
        }

        ParseOutcome::miss(PriceFields::default())
    }

    /// Splits a block on the first separator that produces more than one
    /// non-trivial segment; otherwise the whole block is one service.
    fn split_segments(&self, clean: &str) -> Vec<String> {
        for separator in &self.separators {
            let items: Vec<String> = separator
                .split(clean)
                .map(|item| text::clean_text(item, true, true))
                .filter(|item| item.chars().count() > MIN_SEGMENT_LEN)
                .collect();

            if items.len() > 1 {
                return items;
            }
        }

        if clean.trim().is_empty() {
            Vec::new()
        } else {
            vec![clean.to_owned()]
        }
    }

    fn parse_single(&self, segment: &str) -> Option<(ServiceDraft, f32)> {
        if segment.trim().chars().count() < 3 {
            return None;
        }

        let mut confidence = 0.5_f32;

        let scan = self.scan_price(segment);
        let price_found = scan.confidence > 0.0 && scan.plausibility > 0.0;
        if price_found {
            confidence += 0.3;
        }

        let duration = self.parse_duration(segment);
        if duration.is_some() {
            confidence += 0.1;
        }

        let name_source = self.strip_price_and_duration(segment, &scan, price_found);
        let (name, description) = self.extract_name(&name_source)?;
        confidence += 0.2;

        // An implausible price never reaches the draft.
        let fields = if price_found {
            scan.fields
        } else {
            PriceFields::default()
        };

        if price_found {
            confidence *= scan.plausibility;
        }

        let draft = ServiceDraft {
            name,
            price: fields.price,
            price_from: fields.price_from,
            price_to: fields.price_to,
            description,
            duration,
        };

        Some((draft, confidence.min(1.0)))
    }

    fn scan_price(&self, price_text: &str) -> PriceScan {
        let normalized = text::normalize_price_text(price_text);

        let mut fields = PriceFields::default();
        let mut confidence = 0.0_f32;
        let mut matched = None;
        let mut bare_match = false;

        if let Some(caps) = self.range_re.captures(&normalized) {
            let from = parse_number(&caps[1]);
            let to = parse_number(&caps[2]);
            if let (Some(from), Some(to)) = (from, to) {
                if from < to {
                    let from_str = format_int(from);
                    let to_str = format_int(to);
                    fields.price = Some(format!("{from_str}-{to_str}"));
                    fields.price_from = Some(from_str);
                    fields.price_to = Some(to_str);
                    confidence = 0.9;
                    matched = Some(caps[0].to_owned());
                }
            }
        }

        if fields.price.is_none() {
            if let Some(caps) = self.from_re.captures(&normalized) {
                if let Some(value) = parse_number(&caps[1]) {
                    let value_str = format_int(value);
                    fields.price = Some(format!("от {value_str}"));
                    fields.price_from = Some(value_str);
                    confidence = 0.8;
                    matched = Some(caps[0].to_owned());
                }
            } else if let Some(caps) = self.to_re.captures(&normalized) {
                if let Some(value) = parse_number(&caps[1]) {
                    let value_str = format_int(value);
                    fields.price = Some(format!("до {value_str}"));
                    fields.price_to = Some(value_str);
                    confidence = 0.8;
                    matched = Some(caps[0].to_owned());
                }
            } else if let Some(m) = self.bare_re.find(&normalized) {
                if let Some(value) = parse_number(m.as_str()) {
                    fields.price = Some(format_int(value));
                    confidence = 0.7;
                    matched = Some(m.as_str().to_owned());
                    bare_match = true;
                }
            }
        }

        let plausibility = if confidence > 0.0 {
            self.plausibility_ratio(&fields)
        } else {
            0.0
        };

        PriceScan {
            fields,
            confidence,
            plausibility,
            matched,
            bare_match,
        }
    }

    /// Share of extracted price values inside `[price_min, price_max]`.
    /// An implausible price lowers confidence; it never hard-rejects.
    fn plausibility_ratio(&self, fields: &PriceFields) -> f32 {
        let mut total = 0u32;
        let mut reasonable = 0u32;

        for value in [&fields.price, &fields.price_from, &fields.price_to]
            .into_iter()
            .flatten()
        {
            if let Some(number) = text::extract_numbers(value).into_iter().next() {
                total += 1;
                if number >= self.price_min && number <= self.price_max {
                    reasonable += 1;
                }
            }
        }

        if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = reasonable as f32 / total as f32;
            ratio
        }
    }

    fn parse_duration(&self, segment: &str) -> Option<String> {
        if let Some(caps) = self.duration_range_re.captures(segment) {
            return Some(format!("{}-{} мин", &caps[1], &caps[2]));
        }
        if let Some(caps) = self.duration_minutes_re.captures(segment) {
            return Some(format!("{} мин", &caps[1]));
        }
        if let Some(caps) = self.duration_hours_re.captures(segment) {
            return Some(format!("{} ч", &caps[1]));
        }
        if let Some(caps) = self.duration_clock_re.captures(segment) {
            return Some(format!("{}:{}", &caps[1], &caps[2]));
        }
        None
    }

    /// Removes price and duration substrings before name extraction.
    fn strip_price_and_duration(
        &self,
        segment: &str,
        scan: &PriceScan,
        price_found: bool,
    ) -> String {
        let mut remainder = segment.to_owned();

        for re in &self.price_strip_res {
            remainder = re.replace_all(&remainder, "").into_owned();
        }

        // A bare price has no currency marker for the patterns above to
        // anchor on; cut the exact matched digits instead.
        if price_found && scan.bare_match {
            if let Some(matched) = &scan.matched {
                remainder = remainder.replacen(matched.as_str(), "", 1);
            }
        }

        for re in &self.duration_strip_res {
            remainder = re.replace_all(&remainder, "").into_owned();
        }

        remainder
    }

    /// First sentence of the stripped remainder is the service name; the
    /// rest is the description when long enough to carry meaning.
    fn extract_name(&self, stripped: &str) -> Option<(String, Option<String>)> {
        let cleaned = text::clean_text(stripped, true, true);
        if cleaned.is_empty() {
            return None;
        }

        let mut sentences = cleaned.split(['.', '!', '?']);
        let name = sentences
            .next()?
            .trim()
            .trim_matches(|c: char| matches!(c, ',' | ';' | '-' | '–') || c.is_whitespace())
            .to_owned();

        let name_len = name.chars().count();
        if !(3..=200).contains(&name_len) {
            return None;
        }

        let description: String = sentences
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let description = if description.chars().count() > 10 {
            Some(description)
        } else {
            None
        };

        Some((name, description))
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', ".").parse::<f64>().ok()
}

/// Prices are carried as integer strings; fractional kopeck values are
/// truncated the way the source data shows them.
fn format_int(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let int_value = value.trunc() as i64;
    int_value.to_string()
}

#[cfg(test)]
#[path = "services_test.rs"]
mod tests;
