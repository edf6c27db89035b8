// Booking pricing and numbering tests
//
// Rate-card quotes: base + per-article * articles + parcel surcharge, then GST.
// LR numbers: LR-<booking year>-<6 digits>.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use freightdesk::modules::bookings::models::BookingStatus;
use freightdesk::modules::bookings::services::booking_service::generate_lr_number;
use freightdesk::modules::ratecards::models::{Quote, RateCard};

fn rate_card() -> RateCard {
    let mut surcharges = BTreeMap::new();
    surcharges.insert("Express".to_string(), dec!(150));
    surcharges.insert("Fragile".to_string(), dec!(75));

    RateCard {
        id: "rc-1".to_string(),
        company_id: "cmp-1".to_string(),
        company_name: Some("TechCorp".to_string()),
        base_rate: dec!(200),
        per_article_rate: dec!(60),
        surcharges,
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_quote_with_surcharge() {
    let quote = rate_card().quote(3, "Express", dec!(0.18));

    // 200 + 3 * 60 + 150
    assert_eq!(quote.subtotal, dec!(530));
    assert_eq!(quote.gst, dec!(95.40));
    assert_eq!(quote.grand_total, dec!(625.40));
}

#[test]
fn test_surcharge_lookup_ignores_case() {
    let card = rate_card();
    assert_eq!(card.surcharge_for("fragile"), dec!(75));
    assert_eq!(card.surcharge_for("Heavy"), Decimal::ZERO);
}

#[test]
fn test_quote_without_rate_card() {
    let quote = Quote::from_subtotal(dec!(1000), dec!(0.18));

    assert_eq!(quote.gst, dec!(180.00));
    assert_eq!(quote.grand_total, dec!(1180.00));
}

#[test]
fn test_lr_number_format() {
    let lr = generate_lr_number(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());

    let parts: Vec<&str> = lr.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "LR");
    assert_eq!(parts[1], "2024");
    assert_eq!(parts[2].len(), 6);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_nothing_leaves_delivered() {
    for next in [
        BookingStatus::Booked,
        BookingStatus::InTransit,
        BookingStatus::Pending,
        BookingStatus::Dispatched,
    ] {
        assert!(!BookingStatus::Delivered.can_transition_to(next));
    }
}

proptest! {
    /// Property: grand total is subtotal plus GST and never negative
    #[test]
    fn prop_quote_is_consistent(
        articles in 1i32..500,
        surcharge_idx in 0usize..3,
        gst_percent in 0u32..=28,
    ) {
        let kind = ["Express", "Fragile", "Standard"][surcharge_idx];
        let gst_rate = Decimal::from(gst_percent) / Decimal::from(100);

        let quote = rate_card().quote(articles, kind, gst_rate);

        prop_assert_eq!(quote.grand_total, quote.subtotal + quote.gst);
        prop_assert!(quote.grand_total >= Decimal::ZERO);
        prop_assert!(quote.gst <= quote.subtotal);
        prop_assert_eq!(quote.gst.scale() <= 2, true);
    }

    /// Property: more articles never cost less
    #[test]
    fn prop_quote_is_monotonic_in_articles(articles in 1i32..1_000) {
        let card = rate_card();
        let fewer = card.quote(articles, "Standard", dec!(0.18));
        let more = card.quote(articles + 1, "Standard", dec!(0.18));
        prop_assert!(more.grand_total > fewer.grand_total);
    }

    /// Property: the LR year always matches the booking date
    #[test]
    fn prop_lr_year_matches_booking_date(year in 2000i32..2100, ordinal in 1u32..=365) {
        let on = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let lr = generate_lr_number(on);
        let prefix = format!("LR-{}-", year);
        prop_assert!(lr.starts_with(&prefix));
        prop_assert_eq!(lr.len(), prefix.len() + 6);
    }
}
