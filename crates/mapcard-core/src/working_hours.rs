//! Weekly schedule value object and the day/hour canonicalization rules.
//!
//! Schedule keys are always the 7 lowercase English weekday names, no
//! matter what language or abbreviation the source used. Hour strings
//! canonicalize to `HH:MM-HH:MM`; the literal markers [`CLOSED`] and
//! [`OPEN_ALL_DAY`] outrank any numeric time found in the same string.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text;

/// Marker for a non-working day.
pub const CLOSED: &str = "Выходной";

/// Marker for a day worked around the clock.
pub const OPEN_ALL_DAY: &str = "Круглосуточно";

/// Canonical day keys in calendar order.
pub const DAY_ORDER: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Russian display names for the canonical keys, in [`DAY_ORDER`] order.
const DAY_NAMES_RU: [&str; 7] = [
    "понедельник",
    "вторник",
    "среда",
    "четверг",
    "пятница",
    "суббота",
    "воскресенье",
];

/// Recognized day aliases, lowercase. Order matters: the prefix-matching
/// fallback walks this table top to bottom.
const DAY_ALIASES: &[(&str, &str)] = &[
    ("пн", "monday"),
    ("понедельник", "monday"),
    ("пон", "monday"),
    ("вт", "tuesday"),
    ("вторник", "tuesday"),
    ("втор", "tuesday"),
    ("ср", "wednesday"),
    ("среда", "wednesday"),
    ("сред", "wednesday"),
    ("чт", "thursday"),
    ("четверг", "thursday"),
    ("четв", "thursday"),
    ("пт", "friday"),
    ("пятница", "friday"),
    ("пят", "friday"),
    ("сб", "saturday"),
    ("суббота", "saturday"),
    ("суб", "saturday"),
    ("вс", "sunday"),
    ("воскресенье", "sunday"),
    ("воск", "sunday"),
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

/// Collapses any recognized day alias to its canonical key.
///
/// Exact alias lookup first; when that misses, a prefix relation in
/// either direction is accepted ("понед" matches "понедельник").
#[must_use]
pub fn canonical_weekday(name: &str) -> Option<&'static str> {
    let day = name.trim().to_lowercase();
    if day.is_empty() {
        return None;
    }

    for (alias, key) in DAY_ALIASES {
        if day == *alias {
            return Some(key);
        }
    }

    for (alias, key) in DAY_ALIASES {
        if day.starts_with(alias) || alias.starts_with(day.as_str()) {
            return Some(key);
        }
    }

    None
}

/// Expands a day range to the canonical keys it covers, wrapping across
/// the week boundary when needed ("сб-пн" covers saturday, sunday, monday).
#[must_use]
pub fn day_range(start: &str, end: &str) -> Vec<&'static str> {
    let Some(start_idx) = DAY_ORDER.iter().position(|d| *d == start) else {
        return Vec::new();
    };
    let Some(end_idx) = DAY_ORDER.iter().position(|d| *d == end) else {
        return Vec::new();
    };

    if start_idx <= end_idx {
        DAY_ORDER[start_idx..=end_idx].to_vec()
    } else {
        let mut days = DAY_ORDER[start_idx..].to_vec();
        days.extend_from_slice(&DAY_ORDER[..=end_idx]);
        days
    }
}

/// Canonicalizes an hour string for one day.
///
/// Returns `None` only for empty input. Marker keywords win over any
/// numeric time pattern in the same string; a non-empty string matching
/// nothing passes through verbatim — lossy source data is preserved,
/// not discarded.
#[must_use]
pub fn normalize_hours(hours: &str) -> Option<String> {
    let hours = hours.trim();
    if hours.is_empty() {
        return None;
    }

    let lower = hours.to_lowercase();

    if ["выходной", "закрыт", "не работает", "closed"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(CLOSED.to_owned());
    }

    if ["круглосуточно", "24/7", "всегда", "24"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(OPEN_ALL_DAY.to_owned());
    }

    let patterns = [
        r"(\d{1,2}):(\d{2})\s*[-–—]\s*(\d{1,2}):(\d{2})",
        r"с\s*(\d{1,2}):?(\d{0,2})\s*до\s*(\d{1,2}):?(\d{0,2})",
        r"от\s*(\d{1,2}):?(\d{0,2})\s*до\s*(\d{1,2}):?(\d{0,2})",
        r"(\d{1,2})\s*[-–—]\s*(\d{1,2})",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        let Some(caps) = re.captures(hours) else {
            continue;
        };

        let groups: Vec<&str> = caps
            .iter()
            .skip(1)
            .map(|m| m.map_or("", |m| m.as_str()))
            .collect();

        let (start_h, start_m, end_h, end_m) = match groups.len() {
            4 => (groups[0], groups[1], groups[2], groups[3]),
            2 => (groups[0], "", groups[1], ""),
            _ => continue,
        };

        if let Some(canonical) = format_span(start_h, start_m, end_h, end_m) {
            return Some(canonical);
        }
    }

    Some(hours.to_owned())
}

/// Formats a validated time span as `HH:MM-HH:MM`. Empty minute captures
/// default to `00`.
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

/// Raw schedule data as produced by the schedule parser.
///
/// The schedule keeps insertion order so "last write wins" stays
/// deterministic when duplicate aliases collapse to the same day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingHoursDraft {
    pub current_status: Option<String>,
    pub schedule: Vec<(String, String)>,
    pub notes: Option<String>,
}

/// Validated weekly schedule of an enterprise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Free-text status like "Открыто до 20:00".
    pub current_status: Option<String>,
    /// Canonical day key to canonical hour string.
    pub schedule: BTreeMap<String, String>,
    /// Free text for exceptions (holidays, seasonal hours).
    pub notes: Option<String>,
}

impl WorkingHours {
    /// Normalizes a draft into the canonical representation. Unknown day
    /// aliases and empty hour strings are skipped; construction itself
    /// never fails.
    #[must_use]
    pub fn from_draft(draft: WorkingHoursDraft) -> Self {
        let current_status = normalize_free_text(draft.current_status);
        let notes = normalize_free_text(draft.notes);

        let mut schedule = BTreeMap::new();
        for (day, hours) in draft.schedule {
            let Some(key) = canonical_weekday(&day) else {
                continue;
            };
            if let Some(normalized) = normalize_hours(&hours) {
                schedule.insert(key.to_owned(), normalized);
            }
        }

        Self {
            current_status,
            schedule,
            notes,
        }
    }

    /// True when either a status line or at least one schedule entry is
    /// present.
    #[must_use]
    pub fn has_any_info(&self) -> bool {
        self.current_status.is_some() || !self.schedule.is_empty()
    }

    /// Number of days with hours that are not the [`CLOSED`] marker.
    #[must_use]
    pub fn working_days_count(&self) -> usize {
        self.schedule.values().filter(|h| *h != CLOSED).count()
    }

    /// Today's hour string, if the schedule covers today.
    #[must_use]
    pub fn hours_today(&self) -> Option<&str> {
        let today = DAY_ORDER[Local::now().weekday().num_days_from_monday() as usize];
        self.schedule.get(today).map(String::as_str)
    }

    /// Best-effort "is the business open right now" from the schedule.
    ///
    /// Returns `None` when today is not covered or the hour string is not
    /// a parseable span. Spans crossing midnight are handled.
    #[must_use]
    pub fn is_open_now(&self) -> Option<bool> {
        let today = self.hours_today()?;

        if today == CLOSED {
            return Some(false);
        }
        if today == OPEN_ALL_DAY {
            return Some(true);
        }

        let span_re =
            Regex::new(r"(\d{1,2}):(\d{2})-(\d{1,2}):(\d{2})").expect("valid regex");
        let caps = span_re.captures(today)?;

        let minute_of = |h: &str, m: &str| -> Option<u32> {
            let h: u32 = h.parse().ok()?;
            let m: u32 = m.parse().ok()?;
            Some(h * 60 + m)
        };

        let start = minute_of(&caps[1], &caps[2])?;
        let end = minute_of(&caps[3], &caps[4])?;

        let now = Local::now();
        let current = now.hour() * 60 + now.minute();

        if start <= end {
            Some(current >= start && current <= end)
        } else {
            // Span crosses midnight.
            Some(current >= start || current <= end)
        }
    }

    /// Schedule rendered as "День: часы" lines in calendar order.
    #[must_use]
    pub fn display_lines(&self) -> Vec<String> {
        DAY_ORDER
            .iter()
            .zip(DAY_NAMES_RU.iter())
            .filter_map(|(key, name)| {
                self.schedule.get(*key).map(|hours| {
                    let mut chars = name.chars();
                    let capitalized = match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    };
                    format!("{capitalized}: {hours}")
                })
            })
            .collect()
    }
}

fn normalize_free_text(value: Option<String>) -> Option<String> {
    let value = value?;
    let cleaned = text::clean_text(&value, true, true);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
#[path = "working_hours_test.rs"]
mod tests;
