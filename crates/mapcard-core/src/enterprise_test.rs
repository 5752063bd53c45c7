use super::*;

fn config() -> ExtractorConfig {
    ExtractorConfig::default()
}

fn draft(name: &str) -> EnterpriseDraft {
    EnterpriseDraft {
        name: name.to_owned(),
        ..EnterpriseDraft::default()
    }
}

// -----------------------------------------------------------------------
// name
// -----------------------------------------------------------------------

#[test]
fn empty_name_fails_construction() {
    let err = Enterprise::from_draft(draft(""), &config()).unwrap_err();
    assert!(matches!(err, ModelError::EmptyName));
}

#[test]
fn whitespace_only_name_fails_construction() {
    let err = Enterprise::from_draft(draft("   \n  "), &config()).unwrap_err();
    assert!(matches!(err, ModelError::EmptyName));
}

#[test]
fn name_html_and_whitespace_cleaned() {
    let enterprise =
        Enterprise::from_draft(draft("<b>Eva   Beauty</b>  Studio"), &config()).unwrap();
    assert_eq!(enterprise.name, "Eva Beauty Studio");
}

#[test]
fn name_edge_symbols_stripped() {
    let enterprise = Enterprise::from_draft(draft("«Eva Beauty»"), &config()).unwrap();
    assert_eq!(enterprise.name, "Eva Beauty");
}

#[test]
fn over_length_name_fails_construction() {
    let err = Enterprise::from_draft(draft(&"x".repeat(201)), &config()).unwrap_err();
    assert!(matches!(err, ModelError::NameTooLong { len: 201, .. }));
}

// -----------------------------------------------------------------------
// rating
// -----------------------------------------------------------------------

#[test]
fn rating_boundaries_retained() {
    let mut d = draft("Eva");
    d.rating = Some(5.0);
    assert_eq!(
        Enterprise::from_draft(d, &config()).unwrap().rating,
        Some(5.0)
    );

    let mut d = draft("Eva");
    d.rating = Some(0.0);
    assert_eq!(
        Enterprise::from_draft(d, &config()).unwrap().rating,
        Some(0.0)
    );
}

#[test]
fn rating_out_of_range_nulled_not_clamped() {
    let mut d = draft("Eva");
    d.rating = Some(5.1);
    assert_eq!(Enterprise::from_draft(d, &config()).unwrap().rating, None);

    let mut d = draft("Eva");
    d.rating = Some(-0.1);
    assert_eq!(Enterprise::from_draft(d, &config()).unwrap().rating, None);
}

#[test]
fn rating_rounded_to_one_decimal() {
    let mut d = draft("Eva");
    d.rating = Some(4.84);
    assert_eq!(
        Enterprise::from_draft(d, &config()).unwrap().rating,
        Some(4.8)
    );
}

// -----------------------------------------------------------------------
// phone / website / counts
// -----------------------------------------------------------------------

#[test]
fn phone_with_too_few_digits_dropped() {
    let mut d = draft("Eva");
    d.phone = Some("12-34-5".to_owned());
    assert!(Enterprise::from_draft(d, &config()).unwrap().phone.is_none());
}

#[test]
fn phone_keeps_formatting_characters() {
    let mut d = draft("Eva");
    d.phone = Some("+7 (993) 602-65-90 доб. 2".to_owned());
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(enterprise.phone.as_deref(), Some("+7 (993) 602-65-90 2"));
}

#[test]
fn website_scheme_added() {
    let mut d = draft("Eva");
    d.website = Some("eva-beauty-studio.clients.site".to_owned());
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(
        enterprise.website.as_deref(),
        Some("https://eva-beauty-studio.clients.site")
    );
}

#[test]
fn website_self_link_rejected() {
    let mut d = draft("Eva");
    d.website = Some("https://yandex.ru/maps/org/eva/123".to_owned());
    assert!(Enterprise::from_draft(d, &config())
        .unwrap()
        .website
        .is_none());
}

#[test]
fn reviews_count_negative_clamped_to_zero() {
    let mut d = draft("Eva");
    d.reviews_count = Some(-3);
    assert_eq!(
        Enterprise::from_draft(d, &config()).unwrap().reviews_count,
        Some(0)
    );
}

// -----------------------------------------------------------------------
// nested drops
// -----------------------------------------------------------------------

#[test]
fn invalid_service_dropped_and_counted() {
    let mut d = draft("Eva");
    d.services = vec![
        ServiceDraft {
            name: "Маникюр".to_owned(),
            price: Some("2800".to_owned()),
            ..ServiceDraft::default()
        },
        ServiceDraft {
            name: "Педикюр".to_owned(),
            price: Some("звоните".to_owned()),
            ..ServiceDraft::default()
        },
    ];

    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(enterprise.services.len(), 1);
    assert_eq!(enterprise.services[0].name, "Маникюр");

    let stats = enterprise.metadata.get("extraction_stats").unwrap();
    assert_eq!(stats["services_dropped"], 1);
    assert_eq!(stats["services_extracted"], 1);
}

#[test]
fn invalid_review_dropped_record_survives() {
    let mut d = draft("Eva");
    d.reviews = vec![
        ReviewDraft {
            author: "Анна К.".to_owned(),
            rating: Some(5),
            ..ReviewDraft::default()
        },
        ReviewDraft {
            author: "Бот".to_owned(),
            rating: Some(9),
            ..ReviewDraft::default()
        },
    ];

    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(enterprise.reviews.len(), 1);
    let stats = enterprise.metadata.get("extraction_stats").unwrap();
    assert_eq!(stats["reviews_dropped"], 1);
}

// -----------------------------------------------------------------------
// derived metrics
// -----------------------------------------------------------------------

#[test]
fn completeness_minimal_record() {
    let enterprise = Enterprise::from_draft(draft("Eva"), &config()).unwrap();
    let expected = 2.0 / 12.0;
    assert!((enterprise.completeness_score() - expected).abs() < 1e-9);
}

#[test]
fn completeness_grows_with_fields() {
    let mut d = draft("Eva");
    d.category = Some("Beauty salon".to_owned());
    d.phone = Some("+7 (993) 602-65-90".to_owned());
    d.rating = Some(5.0);
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    let expected = 5.0 / 12.0;
    assert!((enterprise.completeness_score() - expected).abs() < 1e-9);
}

#[test]
fn average_rating_from_reviews_rounds() {
    let mut d = draft("Eva");
    d.reviews = vec![
        ReviewDraft {
            author: "Анна".to_owned(),
            rating: Some(5),
            ..ReviewDraft::default()
        },
        ReviewDraft {
            author: "Борис".to_owned(),
            rating: Some(4),
            ..ReviewDraft::default()
        },
        ReviewDraft {
            author: "Вера".to_owned(),
            rating: None,
            ..ReviewDraft::default()
        },
    ];
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(enterprise.average_rating_from_reviews(), Some(4.5));
}

#[test]
fn positive_ratio_ignores_unrated() {
    let mut d = draft("Eva");
    d.reviews = vec![
        ReviewDraft {
            author: "Анна".to_owned(),
            rating: Some(5),
            ..ReviewDraft::default()
        },
        ReviewDraft {
            author: "Борис".to_owned(),
            rating: Some(2),
            ..ReviewDraft::default()
        },
    ];
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    assert_eq!(enterprise.positive_reviews_ratio(), Some(0.5));
}

#[test]
fn services_in_price_range_filters() {
    let mut d = draft("Eva");
    d.services = vec![
        ServiceDraft {
            name: "Маникюр".to_owned(),
            price: Some("2800".to_owned()),
            ..ServiceDraft::default()
        },
        ServiceDraft {
            name: "Стрижка".to_owned(),
            price: Some("800".to_owned()),
            ..ServiceDraft::default()
        },
        ServiceDraft {
            name: "Консультация".to_owned(),
            ..ServiceDraft::default()
        },
    ];
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();
    let in_range = enterprise.services_in_price_range(Some(1000.0), None);
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].name, "Маникюр");
}

#[test]
fn metadata_carries_stats_and_version() {
    let enterprise = Enterprise::from_draft(draft("Eva"), &config()).unwrap();
    assert!(enterprise.metadata.contains_key("scraper_version"));
    let stats = enterprise.metadata.get("extraction_stats").unwrap();
    assert_eq!(stats["has_rating"], false);
}

#[test]
fn record_serializes_to_plain_json_mapping() {
    let mut d = draft("Eva Beauty Studio");
    d.category = Some("Beauty salon".to_owned());
    d.rating = Some(5.0);
    let enterprise = Enterprise::from_draft(d, &config()).unwrap();

    let value = serde_json::to_value(&enterprise).unwrap();
    assert_eq!(value["name"], "Eva Beauty Studio");
    assert_eq!(value["rating"], 5.0);

    let back: Enterprise = serde_json::from_value(value).unwrap();
    assert_eq!(back.name, enterprise.name);
    assert_eq!(back.rating, enterprise.rating);
    assert_eq!(back.category, enterprise.category);
}

#[test]
fn export_summary_shape() {
    let enterprise = Enterprise::from_draft(draft("Eva"), &config()).unwrap();
    let summary = enterprise.export_summary();
    assert_eq!(summary["name"], "Eva");
    assert_eq!(summary["services_count"], 0);
    assert_eq!(summary["has_pricing"], false);
}
