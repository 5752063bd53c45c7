//! Schedule parser: pulls a current open/closed status and a canonical
//! 7-day schedule out of mixed free text.
//!
//! The weekly schedule is assembled by three complementary strategies
//! applied in order — per-line single days, day-range phrases, and the
//! compact single-line form. Each produced entry is appended in order;
//! when several strategies disagree on a day, the later write wins.

use regex::Regex;

use mapcard_core::working_hours::{canonical_weekday, day_range, CLOSED, OPEN_ALL_DAY};
use mapcard_core::{text, WorkingHoursDraft};

use crate::outcome::ParseOutcome;

/// What a current-status pattern means once matched.
#[derive(Debug, Clone, Copy)]
enum StatusKind {
    OpenUntil,
    OpenFrom,
    ClosedUntil,
    WorkingUntil,
    Open,
    Closed,
    AlwaysOpen,
}

/// Day keywords searched as substrings inside a line, in lookup order.
/// Full names come first so the table documents intent, though any hit
/// for the same day resolves identically.
const DAY_KEYWORDS: &[(&str, &str)] = &[
    ("понедельник", "monday"),
    ("вторник", "tuesday"),
    ("среда", "wednesday"),
    ("четверг", "thursday"),
    ("пятница", "friday"),
    ("суббота", "saturday"),
    ("воскресенье", "sunday"),
    ("пн", "monday"),
    ("вт", "tuesday"),
    ("ср", "wednesday"),
    ("чт", "thursday"),
    ("пт", "friday"),
    ("сб", "saturday"),
    ("вс", "sunday"),
    ("monday", "monday"),
    ("tuesday", "tuesday"),
    ("wednesday", "wednesday"),
    ("thursday", "thursday"),
    ("friday", "friday"),
    ("saturday", "saturday"),
    ("sunday", "sunday"),
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

const WEEKDAY_KEYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];
const WEEKEND_KEYS: [&str; 2] = ["saturday", "sunday"];

const NOTE_INDICATORS: &[&str] = &[
    "примечание",
    "внимание",
    "обратите внимание",
    "важно",
    "уточнение",
    "дополнительно",
    "в праздничные дни",
    "в праздники",
    "летний режим",
    "зимний режим",
    "может изменяться",
    "уточняйте",
];

pub struct ScheduleParser {
    status_patterns: Vec<(Regex, StatusKind)>,
    weekday_range_res: Vec<Regex>,
    weekend_range_res: Vec<Regex>,
    compact_re: Regex,
    closed_re: Regex,
    all_day_re: Regex,
    time_full_re: Regex,
    time_bare_re: Regex,
    time_phrase_re: Regex,
}

impl Default for ScheduleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleParser {
    #[must_use]
    pub fn new() -> Self {
        let status_table: Vec<(&str, StatusKind)> = vec![
            (r"открыт[оа]?\s*до\s*(\d{1,2}):?(\d{0,2})", StatusKind::OpenUntil),
            (r"open\s*until\s*(\d{1,2}):?(\d{0,2})", StatusKind::OpenUntil),
            (r"открыт[оа]?\s*с\s*(\d{1,2}):?(\d{0,2})", StatusKind::OpenFrom),
            (r"open\s*from\s*(\d{1,2}):?(\d{0,2})", StatusKind::OpenFrom),
            (r"закрыт[оа]?\s*до\s*(\d{1,2}):?(\d{0,2})", StatusKind::ClosedUntil),
            (r"closed\s*until\s*(\d{1,2}):?(\d{0,2})", StatusKind::ClosedUntil),
            (r"работает\s*до\s*(\d{1,2}):?(\d{0,2})", StatusKind::WorkingUntil),
            (r"working\s*until\s*(\d{1,2}):?(\d{0,2})", StatusKind::WorkingUntil),
            (r"открыт[оа]?", StatusKind::Open),
            (r"\bopen\b", StatusKind::Open),
            (r"закрыт[оа]?", StatusKind::Closed),
            (r"\bclosed\b", StatusKind::Closed),
            (r"круглосуточно|24/7", StatusKind::AlwaysOpen),
        ];

        let status_patterns = status_table
            .into_iter()
            .map(|(pattern, kind)| (Regex::new(pattern).expect("valid regex"), kind))
            .collect();

        let weekday_range_res = [
            r"(?:пн|понедельник)\s*[-–—]\s*(?:пт|пятница)\s*:?\s*([^,\n]+)",
            r"будни\s*:?\s*([^,\n]+)",
            r"рабочие\s*дни\s*:?\s*([^,\n]+)",
            r"weekdays\s*:?\s*([^,\n]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        let weekend_range_res = [
            r"(?:сб|суббота)\s*[-–—]\s*(?:вс|воскресенье)\s*:?\s*([^,\n]+)",
            r"выходные\s*:?\s*([^,\n]+)",
            r"weekends\s*:?\s*([^,\n]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect();

        Self {
            status_patterns,
            weekday_range_res,
            weekend_range_res,
            compact_re: Regex::new(r"([а-яёa-z\-]+)\s*:?\s*([^,\n]+)").expect("valid regex"),
            closed_re: Regex::new(r"выходной|закрыт|не\s*работа|closed").expect("valid regex"),
            all_day_re: Regex::new(r"круглосуточно|24/7|24\s*часа").expect("valid regex"),
            time_full_re: Regex::new(r"(\d{1,2}):(\d{2})\s*[-–—]\s*(\d{1,2}):(\d{2})")
                .expect("valid regex"),
            time_bare_re: Regex::new(r"(\d{1,2})\s*[-–—]\s*(\d{1,2})").expect("valid regex"),
            time_phrase_re: Regex::new(r"с\s*(\d{1,2}):?(\d{0,2})\s*до\s*(\d{1,2}):?(\d{0,2})")
                .expect("valid regex"),
        }
    }

    /// Parses raw text that may mix a current-status sentence with a
    /// weekly table in any of the supported shapes.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParseOutcome<WorkingHoursDraft> {
        if raw.trim().is_empty() {
            return ParseOutcome::miss(WorkingHoursDraft::default());
        }

        let clean = text::clean_text(raw, true, true);
        let mut confidence = 0.0_f32;

        let current_status = self.parse_current_status(&clean);
        if current_status.is_some() {
            confidence += 0.3;
        }

        let schedule = self.parse_weekly_schedule(&clean);
        if !schedule.is_empty() {
            confidence += 0.5;
        }

        let notes = self.extract_notes(&clean);
        if notes.is_some() {
            confidence += 0.2;
        }

        let draft = WorkingHoursDraft {
            current_status,
            schedule,
            notes,
        };

        // A bare status line scores 0.3, which is not enough on its own;
        // the confidence is still reported for QA tooling.
        ParseOutcome {
            success: confidence > 0.3,
            data: draft,
            errors: Vec::new(),
            warnings: Vec::new(),
            confidence: confidence.min(1.0),
        }
    }

    /// First status pattern wins; each produces a canonical status string.
    fn parse_current_status(&self, clean: &str) -> Option<String> {
        let lower = clean.to_lowercase();

        for (re, kind) in &self.status_patterns {
            let Some(caps) = re.captures(&lower) else {
                continue;
            };

            let formatted_time = || {
                let hour = caps.get(1).map_or("", |m| m.as_str());
                let minute = caps.get(2).map_or("", |m| m.as_str());
                let minute = if minute.is_empty() { "00" } else { minute };
                format!("{hour}:{minute:0>2}")
            };

            let status = match kind {
                StatusKind::OpenUntil => format!("Открыто до {}", formatted_time()),
                StatusKind::OpenFrom => format!("Открыто с {}", formatted_time()),
                StatusKind::ClosedUntil => format!("Закрыто до {}", formatted_time()),
                StatusKind::WorkingUntil => format!("Работает до {}", formatted_time()),
                StatusKind::Open => "Открыто".to_owned(),
                StatusKind::Closed => "Закрыто".to_owned(),
                StatusKind::AlwaysOpen => OPEN_ALL_DAY.to_owned(),
            };

            return Some(status);
        }

        None
    }

    fn parse_weekly_schedule(&self, clean: &str) -> Vec<(String, String)> {
        let mut entries = Vec::new();

        // Strategy 1: a weekday keyword plus a time pattern on one line.
        for line in clean.lines() {
            if let Some(entry) = self.parse_day_line(line) {
                entries.push(entry);
            }
        }

        // Strategy 2: day-range phrases expanding to 5 or 2 day keys.
        self.parse_range_phrases(clean, &mut entries);

        // Strategy 3: compact multi-segment single-line form.
        self.parse_compact(clean, &mut entries);

        entries
    }

    fn parse_day_line(&self, line: &str) -> Option<(String, String)> {
        let lower = line.to_lowercase();

        let day = DAY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, key)| *key)?;

        let hours = self.extract_hours(line)?;
        Some((day.to_owned(), hours))
    }

    fn parse_range_phrases(&self, clean: &str, entries: &mut Vec<(String, String)>) {
        let lower = clean.to_lowercase();

        for re in &self.weekday_range_res {
            for caps in re.captures_iter(&lower) {
                if let Some(hours) = self.extract_hours(&caps[1]) {
                    for day in WEEKDAY_KEYS {
                        entries.push((day.to_owned(), hours.clone()));
                    }
                }
            }
        }

        for re in &self.weekend_range_res {
            for caps in re.captures_iter(&lower) {
                if let Some(hours) = self.extract_hours(&caps[1]) {
                    for day in WEEKEND_KEYS {
                        entries.push((day.to_owned(), hours.clone()));
                    }
                }
            }
        }
    }

    fn parse_compact(&self, clean: &str, entries: &mut Vec<(String, String)>) {
        let lower = clean.to_lowercase();

        for caps in self.compact_re.captures_iter(&lower) {
            let days = parse_day_spec(&caps[1]);
            if days.is_empty() {
                continue;
            }

            let Some(hours) = self.extract_hours(&caps[2]) else {
                continue;
            };

            for day in days {
                entries.push((day.to_owned(), hours.clone()));
            }
        }
    }

    /// Canonicalizes the time portion of one schedule fragment. Keyword
    /// markers outrank numeric time patterns in the same string.
    fn extract_hours(&self, time_text: &str) -> Option<String> {
        let time_text = time_text.trim();
        if time_text.is_empty() {
            return None;
        }

        let lower = time_text.to_lowercase();

        if self.closed_re.is_match(&lower) {
            return Some(CLOSED.to_owned());
        }
        if self.all_day_re.is_match(&lower) {
            return Some(OPEN_ALL_DAY.to_owned());
        }

        // Each pattern gets a chance; a match with out-of-range values
        // falls through to the next one.
        if let Some(caps) = self.time_full_re.captures(time_text) {
            if let Some(span) = format_span(&caps[1], &caps[2], &caps[3], &caps[4]) {
                return Some(span);
            }
        }
        if let Some(caps) = self.time_bare_re.captures(time_text) {
            if let Some(span) = format_span(&caps[1], "", &caps[2], "") {
                return Some(span);
            }
        }
        if let Some(caps) = self.time_phrase_re.captures(&lower) {
            let start_m = caps.get(2).map_or("", |m| m.as_str());
            let end_m = caps.get(4).map_or("", |m| m.as_str());
            if let Some(span) = format_span(&caps[1], start_m, &caps[3], end_m) {
                return Some(span);
            }
        }

        None
    }

    /// Sentences carrying a note indicator become the notes field, at
    /// most three of them.
    fn extract_notes(&self, clean: &str) -> Option<String> {
        let mut notes = Vec::new();

        for sentence in clean.split(['.', '!', '?']) {
            let sentence = sentence.trim();
            if sentence.chars().count() <= 10 {
                continue;
            }

            let lower = sentence.to_lowercase();
            if NOTE_INDICATORS.iter().any(|ind| lower.contains(ind)) {
                notes.push(sentence.to_owned());
                if notes.len() == 3 {
                    break;
                }
            }
        }

        if notes.is_empty() {
            None
        } else {
            Some(notes.join(". "))
        }
    }
}

/// Resolves a day specification: either a single alias or an alias range
/// with week wrap-around.
fn parse_day_spec(day_spec: &str) -> Vec<&'static str> {
    let spec = day_spec.trim();

    if spec.contains(['-', '–', '—']) {
        let parts: Vec<&str> = spec.split(['-', '–', '—']).collect();
        if parts.len() == 2 {
            if let (Some(start), Some(end)) =
                (canonical_weekday(parts[0]), canonical_weekday(parts[1]))
            {
                return day_range(start, end);
            }
        }
        return Vec::new();
    }

    canonical_weekday(spec).map_or_else(Vec::new, |day| vec![day])
}

fn format_span(start_h: &str, start_m: &str, end_h: &str, end_m: &str) -> Option<String> {
    let parse_minute = |m: &str| -> Option<u32> {
        if m.is_empty() {
            Some(0)
        } else {
            m.parse().ok()
        }
    };

    let sh: u32 = start_h.parse().ok()?;
    let eh: u32 = end_h.parse().ok()?;
    let sm = parse_minute(start_m)?;
    let em = parse_minute(end_m)?;

    if sh <= 23 && eh <= 23 && sm <= 59 && em <= 59 {
        Some(format!("{sh:02}:{sm:02}-{eh:02}:{em:02}"))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
