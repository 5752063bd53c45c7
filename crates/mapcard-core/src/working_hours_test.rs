use super::*;

// -----------------------------------------------------------------------
// canonical_weekday
// -----------------------------------------------------------------------

#[test]
fn every_day_reachable_from_russian_full_names() {
    let pairs = [
        ("понедельник", "monday"),
        ("вторник", "tuesday"),
        ("среда", "wednesday"),
        ("четверг", "thursday"),
        ("пятница", "friday"),
        ("суббота", "saturday"),
        ("воскресенье", "sunday"),
    ];
    for (alias, expected) in pairs {
        assert_eq!(canonical_weekday(alias), Some(expected), "alias {alias}");
    }
}

#[test]
fn every_day_reachable_from_russian_abbreviations() {
    let pairs = [
        ("пн", "monday"),
        ("вт", "tuesday"),
        ("ср", "wednesday"),
        ("чт", "thursday"),
        ("пт", "friday"),
        ("сб", "saturday"),
        ("вс", "sunday"),
    ];
    for (alias, expected) in pairs {
        assert_eq!(canonical_weekday(alias), Some(expected), "alias {alias}");
    }
}

#[test]
fn every_day_reachable_from_english_full_names() {
    for key in DAY_ORDER {
        assert_eq!(canonical_weekday(key), Some(key));
    }
}

#[test]
fn english_three_letter_abbreviations() {
    assert_eq!(canonical_weekday("Mon"), Some("monday"));
    assert_eq!(canonical_weekday("sun"), Some("sunday"));
}

#[test]
fn case_and_whitespace_insensitive() {
    assert_eq!(canonical_weekday("  Понедельник "), Some("monday"));
}

#[test]
fn prefix_matching_resolves_longer_forms() {
    assert_eq!(canonical_weekday("понед"), Some("monday"));
    assert_eq!(canonical_weekday("воскр"), Some("sunday"));
}

#[test]
fn unknown_alias_is_none() {
    assert_eq!(canonical_weekday("праздник"), None);
    assert_eq!(canonical_weekday(""), None);
}

// -----------------------------------------------------------------------
// day_range
// -----------------------------------------------------------------------

#[test]
fn forward_range_expands() {
    assert_eq!(
        day_range("monday", "friday"),
        vec!["monday", "tuesday", "wednesday", "thursday", "friday"]
    );
}

#[test]
fn wrap_around_range_expands() {
    assert_eq!(
        day_range("saturday", "monday"),
        vec!["saturday", "sunday", "monday"]
    );
}

#[test]
fn unknown_day_yields_empty_range() {
    assert!(day_range("funday", "friday").is_empty());
}

// -----------------------------------------------------------------------
// normalize_hours
// -----------------------------------------------------------------------

#[test]
fn canonical_span_is_idempotent() {
    let once = normalize_hours("09:00-21:00").unwrap();
    assert_eq!(once, "09:00-21:00");
    assert_eq!(normalize_hours(&once).unwrap(), once);
}

#[test]
fn bare_hours_get_default_minutes() {
    assert_eq!(normalize_hours("9-18").unwrap(), "09:00-18:00");
}

#[test]
fn from_to_phrasing_recognized() {
    assert_eq!(normalize_hours("с 9 до 18").unwrap(), "09:00-18:00");
    assert_eq!(normalize_hours("с 9:30 до 18:15").unwrap(), "09:30-18:15");
}

#[test]
fn closed_keyword_wins_over_time() {
    assert_eq!(normalize_hours("выходной (обычно 9-18)").unwrap(), CLOSED);
}

#[test]
fn around_the_clock_keyword_wins() {
    assert_eq!(normalize_hours("круглосуточно").unwrap(), OPEN_ALL_DAY);
    assert_eq!(normalize_hours("24/7").unwrap(), OPEN_ALL_DAY);
}

#[test]
fn invalid_hour_passes_through_verbatim() {
    assert_eq!(normalize_hours("25:00-26:00").unwrap(), "25:00-26:00");
}

#[test]
fn unparseable_text_passes_through_verbatim() {
    assert_eq!(normalize_hours("по договоренности").unwrap(), "по договоренности");
}

#[test]
fn empty_hours_is_none() {
    assert_eq!(normalize_hours("   "), None);
}

// -----------------------------------------------------------------------
// WorkingHours
// -----------------------------------------------------------------------

#[test]
fn draft_days_collapse_to_canonical_keys() {
    let hours = WorkingHours::from_draft(WorkingHoursDraft {
        current_status: Some("Открыто до 21:00".to_owned()),
        schedule: vec![
            ("Пн".to_owned(), "09:00-21:00".to_owned()),
            ("saturday".to_owned(), "10-20".to_owned()),
            ("вс".to_owned(), "выходной".to_owned()),
        ],
        notes: None,
    });

    assert_eq!(hours.schedule.get("monday").map(String::as_str), Some("09:00-21:00"));
    assert_eq!(hours.schedule.get("saturday").map(String::as_str), Some("10:00-20:00"));
    assert_eq!(hours.schedule.get("sunday").map(String::as_str), Some(CLOSED));
}

#[test]
fn duplicate_aliases_last_write_wins() {
    let hours = WorkingHours::from_draft(WorkingHoursDraft {
        schedule: vec![
            ("пн".to_owned(), "09:00-18:00".to_owned()),
            ("понедельник".to_owned(), "10:00-19:00".to_owned()),
        ],
        ..WorkingHoursDraft::default()
    });

    assert_eq!(
        hours.schedule.get("monday").map(String::as_str),
        Some("10:00-19:00")
    );
}

#[test]
fn unknown_days_skipped() {
    let hours = WorkingHours::from_draft(WorkingHoursDraft {
        schedule: vec![("праздники".to_owned(), "10:00-16:00".to_owned())],
        ..WorkingHoursDraft::default()
    });
    assert!(hours.schedule.is_empty());
    assert!(!hours.has_any_info());
}

#[test]
fn working_days_exclude_closed_marker() {
    let hours = WorkingHours::from_draft(WorkingHoursDraft {
        schedule: vec![
            ("пн".to_owned(), "09:00-18:00".to_owned()),
            ("вс".to_owned(), "выходной".to_owned()),
        ],
        ..WorkingHoursDraft::default()
    });
    assert_eq!(hours.working_days_count(), 1);
}

#[test]
fn display_lines_follow_calendar_order() {
    let hours = WorkingHours::from_draft(WorkingHoursDraft {
        schedule: vec![
            ("вс".to_owned(), "выходной".to_owned()),
            ("пн".to_owned(), "09:00-18:00".to_owned()),
        ],
        ..WorkingHoursDraft::default()
    });

    let lines = hours.display_lines();
    assert_eq!(lines[0], "Понедельник: 09:00-18:00");
    assert_eq!(lines[1], "Воскресенье: Выходной");
}
