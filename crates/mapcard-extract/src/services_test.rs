use super::*;

fn parser() -> ServiceParser {
    ServiceParser::new(&ExtractorConfig::default())
}

// -----------------------------------------------------------------------
// parse_price
// -----------------------------------------------------------------------

#[test]
fn price_range_with_currency() {
    let outcome = parser().parse_price("2800-3500 ₽");
    assert!(outcome.success);
    assert!(outcome.confidence >= 0.9);
    assert_eq!(outcome.data.price.as_deref(), Some("2800-3500"));
    assert_eq!(outcome.data.price_from.as_deref(), Some("2800"));
    assert_eq!(outcome.data.price_to.as_deref(), Some("3500"));
}

#[test]
fn price_range_inverted_falls_back_to_bare_number() {
    let outcome = parser().parse_price("5000-2800 руб");
    assert!(outcome.success);
    assert_eq!(outcome.data.price.as_deref(), Some("5000"));
    assert!(outcome.data.price_from.is_none());
}

#[test]
fn price_from_form() {
    let outcome = parser().parse_price("от 2800 руб");
    assert!(outcome.success);
    assert_eq!(outcome.data.price.as_deref(), Some("от 2800"));
    assert_eq!(outcome.data.price_from.as_deref(), Some("2800"));
    assert!((outcome.confidence - 0.8).abs() < 1e-6);
}

#[test]
fn price_to_form() {
    let outcome = parser().parse_price("до 5000 ₽");
    assert!(outcome.success);
    assert_eq!(outcome.data.price.as_deref(), Some("до 5000"));
    assert_eq!(outcome.data.price_to.as_deref(), Some("5000"));
}

#[test]
fn bare_number_price() {
    let outcome = parser().parse_price("2800");
    assert!(outcome.success);
    assert_eq!(outcome.data.price.as_deref(), Some("2800"));
    assert!((outcome.confidence - 0.7).abs() < 1e-6);
}

#[test]
fn implausible_price_lowers_confidence_without_rejecting() {
    let outcome = parser().parse_price("Стрижка 5");
    // 5 is below the plausible window, so the plausibility ratio zeroes
    // the confidence and the outcome degrades to a miss.
    assert!(!outcome.success);
}

#[test]
fn fractional_price_truncated_to_integer_string() {
    let outcome = parser().parse_price("2800,50 руб");
    assert_eq!(outcome.data.price.as_deref(), Some("2800"));
}

#[test]
fn no_price_is_a_miss() {
    let outcome = parser().parse_price("просто текст");
    assert!(!outcome.success);
    assert!(outcome.confidence.abs() < f32::EPSILON);
}

// -----------------------------------------------------------------------
// full parse
// -----------------------------------------------------------------------

#[test]
fn single_service_with_price_and_duration() {
    let outcome = parser().parse("Маникюр с покрытием 2800 ₽, 60 минут");
    assert!(outcome.success);

    let services = &outcome.data;
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].name, "Маникюр с покрытием");
    assert_eq!(services[0].price.as_deref(), Some("2800"));
    assert_eq!(services[0].duration.as_deref(), Some("60 мин"));
}

#[test]
fn semicolon_separated_services_split() {
    let outcome = parser().parse("Маникюр классический 1500 руб; Педикюр аппаратный 2500 руб");
    assert!(outcome.success);
    assert_eq!(outcome.data.len(), 2);
    assert_eq!(outcome.data[0].name, "Маникюр классический");
    assert_eq!(outcome.data[1].name, "Педикюр аппаратный");
}

#[test]
fn bulleted_list_splits() {
    let raw = "- Стрижка женская 2000 руб\n- Окрашивание волос 4500 руб";
    let outcome = parser().parse(raw);
    assert_eq!(outcome.data.len(), 2);
    assert_eq!(outcome.data[0].name, "Стрижка женская");
}

#[test]
fn numbered_list_splits() {
    let raw = "1. Массаж спины 1800 руб\n2. Массаж общий 3200 руб";
    let outcome = parser().parse(raw);
    assert_eq!(outcome.data.len(), 2);
}

#[test]
fn unsplittable_block_is_one_service() {
    let outcome = parser().parse("Консультация косметолога 1200 руб");
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(outcome.data[0].name, "Консультация косметолога");
}

#[test]
fn segment_without_name_is_discarded() {
    // Price only: after stripping, nothing long enough remains for a name.
    let outcome = parser().parse("2800 руб");
    assert!(!outcome.success);
    assert!(outcome.data.is_empty());
}

#[test]
fn empty_input_is_a_miss() {
    let outcome = parser().parse("   ");
    assert!(!outcome.success);
    assert!(outcome.data.is_empty());
}

#[test]
fn description_captured_from_second_sentence() {
    let outcome =
        parser().parse("Маникюр с покрытием 2800 руб. Классический маникюр с гель-лаком.");
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(
        outcome.data[0].description.as_deref(),
        Some("Классический маникюр с гель-лаком")
    );
}

#[test]
fn hour_duration_normalized() {
    let outcome = parser().parse("Массаж общий 3200 руб, 2 часа");
    assert_eq!(outcome.data[0].duration.as_deref(), Some("2 ч"));
}

#[test]
fn minute_range_duration_kept_as_range() {
    let outcome = parser().parse("Стрижка модельная 2000 руб, 30-60 минут");
    assert_eq!(outcome.data[0].duration.as_deref(), Some("30-60 мин"));
}

#[test]
fn high_confidence_for_fully_resolved_service() {
    let outcome = parser().parse("Маникюр с покрытием 2800 ₽, 60 минут");
    assert!(outcome.confidence >= 0.9);
}
