// Report aggregation tests
//
// Exercises the pure folds behind /reports: totals, monthly trend, company
// ranking, parcel-type shares and vehicle ranking.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use freightdesk::core::money::format_money;
use freightdesk::modules::bookings::models::{Booking, BookingStatus, CompanyRef, VehicleRef};
use freightdesk::modules::reports::services::aggregations::{
    company_summary, parcel_type_distribution, revenue_trend, summarize, vehicle_dispatch,
    REVENUE_TREND_MONTHS, VEHICLE_DISPATCH_TOP,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn company(name: &str) -> CompanyRef {
    CompanyRef {
        id: name.to_lowercase(),
        name: name.to_string(),
    }
}

fn vehicle(registration: &str) -> VehicleRef {
    VehicleRef {
        id: registration.to_lowercase(),
        registration_number: registration.to_string(),
        vehicle_type: None,
    }
}

fn booking(lr: &str, on: NaiveDate, company_name: &str, revenue: Decimal) -> Booking {
    Booking::new(lr, on)
        .with_company(company(company_name))
        .with_grand_total(revenue)
}

#[test]
fn test_summary_two_companies() {
    let bookings = vec![
        booking("LR-1", date(2024, 1, 15), "A", dec!(500)),
        booking("LR-2", date(2024, 2, 3), "B", dec!(700)),
    ];

    let summary = summarize(&bookings);

    assert_eq!(format_money(summary.total_revenue), "1200.00");
    assert_eq!(summary.total_bookings, 2);
    assert_eq!(format_money(summary.avg_revenue_per_booking), "600.00");
}

#[test]
fn test_summary_counts_dispatched_bookings() {
    let bookings = vec![
        booking("LR-1", date(2024, 1, 15), "A", dec!(100)).with_status(BookingStatus::Booked),
        booking("LR-2", date(2024, 1, 15), "A", dec!(100)).with_status(BookingStatus::InTransit),
        booking("LR-3", date(2024, 1, 15), "A", dec!(100)).with_status(BookingStatus::Delivered),
        booking("LR-4", date(2024, 1, 15), "A", dec!(100)).with_status(BookingStatus::Pending),
    ];

    assert_eq!(summarize(&bookings).total_dispatches, 2);
}

#[test]
fn test_empty_summary_is_zero_not_nan() {
    let summary = summarize(&[]);

    assert_eq!(summary.total_bookings, 0);
    assert_eq!(format_money(summary.total_revenue), "0.00");
    assert_eq!(format_money(summary.avg_revenue_per_booking), "0.00");
}

#[test]
fn test_revenue_trend_keeps_last_six_months() {
    // 14 consecutive months, Jan 2023 .. Feb 2024
    let bookings: Vec<Booking> = (0..14)
        .map(|i| {
            let (year, month) = (2023 + i / 12, (i % 12) as u32 + 1);
            booking(&format!("LR-{}", i), date(year, month, 10), "A", Decimal::from(100 + i))
        })
        .collect();

    let trend = revenue_trend(&bookings, REVENUE_TREND_MONTHS);

    let months: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
    );
    assert_eq!(trend.last().unwrap().revenue, dec!(113));
}

#[test]
fn test_revenue_trend_sums_within_month() {
    let bookings = vec![
        booking("LR-1", date(2024, 3, 1), "A", dec!(250.50)),
        booking("LR-2", date(2024, 3, 31), "B", dec!(249.50)),
    ];

    let trend = revenue_trend(&bookings, REVENUE_TREND_MONTHS);

    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].month, "2024-03");
    assert_eq!(format_money(trend[0].revenue), "500.00");
}

#[test]
fn test_company_summary_orders_by_revenue() {
    let bookings = vec![
        booking("LR-1", date(2024, 1, 1), "TechCorp", dec!(300)),
        booking("LR-2", date(2024, 1, 2), "FastShip", dec!(900)),
        booking("LR-3", date(2024, 1, 3), "TechCorp", dec!(300)),
        Booking::new("LR-4", date(2024, 1, 4)).with_grand_total(dec!(50)),
    ];

    let rows = company_summary(&bookings);

    let names: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(names, vec!["FastShip", "TechCorp", "Unknown"]);
    assert_eq!(rows[1].total_bookings, 2);
    assert_eq!(format_money(rows[1].avg_per_booking), "300.00");
}

#[test]
fn test_parcel_type_distribution_percentages() {
    let kinds = ["Express", "Express", "Standard", "Fragile"];
    let mut bookings: Vec<Booking> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            booking(&format!("LR-{}", i), date(2024, 1, 1), "A", dec!(10)).with_parcels(kind, 1)
        })
        .collect();
    bookings.push(booking("LR-9", date(2024, 1, 1), "A", dec!(10)));

    let shares = parcel_type_distribution(&bookings);

    assert_eq!(shares[0].parcel_type, "Express");
    assert_eq!(shares[0].count, 2);
    assert_eq!(shares[0].percentage, 40.0);
    // Single-booking types tie on count and sort by name
    let rest: Vec<&str> = shares[1..].iter().map(|s| s.parcel_type.as_str()).collect();
    assert_eq!(rest, vec!["Fragile", "Standard", "Unknown"]);
}

#[test]
fn test_parcel_type_distribution_of_nothing() {
    assert!(parcel_type_distribution(&[]).is_empty());
}

#[test]
fn test_vehicle_dispatch_keeps_top_ten() {
    let mut bookings = Vec::new();
    for v in 0..12 {
        for n in 0..=v {
            bookings.push(
                booking(&format!("LR-{}-{}", v, n), date(2024, 1, 1), "A", dec!(10))
                    .with_vehicle(vehicle(&format!("MH-{:02}", v))),
            );
        }
    }
    // Unassigned bookings are not dispatches
    bookings.push(booking("LR-free", date(2024, 1, 1), "A", dec!(10)));

    let rows = vehicle_dispatch(&bookings, VEHICLE_DISPATCH_TOP);

    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].vehicle, "MH-11");
    assert_eq!(rows[0].count, 12);
    assert_eq!(rows[9].vehicle, "MH-02");
}

proptest! {
    /// Property: parcel-type counts always add up to the number of bookings
    #[test]
    fn prop_parcel_counts_cover_every_booking(kinds in prop::collection::vec(0usize..5, 1..60)) {
        let names = ["Standard", "Express", "Heavy", "Fragile", ""];
        let bookings: Vec<Booking> = kinds
            .iter()
            .enumerate()
            .map(|(i, k)| {
                booking(&format!("LR-{}", i), date(2024, 1, 1), "A", dec!(1))
                    .with_parcels(names[*k], 1)
            })
            .collect();

        let shares = parcel_type_distribution(&bookings);

        prop_assert_eq!(shares.iter().map(|s| s.count).sum::<i64>(), bookings.len() as i64);
        let pct: f64 = shares.iter().map(|s| s.percentage).sum();
        prop_assert!((pct - 100.0).abs() <= 0.05 * shares.len() as f64 + 1e-9);
    }

    /// Property: company rows partition total revenue
    #[test]
    fn prop_company_summary_partitions_revenue(
        amounts in prop::collection::vec((0usize..4, 0i64..100_000), 0..40),
    ) {
        let names = ["A", "B", "C", "D"];
        let bookings: Vec<Booking> = amounts
            .iter()
            .enumerate()
            .map(|(i, (c, cents))| {
                booking(&format!("LR-{}", i), date(2024, 1, 1), names[*c], Decimal::new(*cents, 2))
            })
            .collect();

        let rows = company_summary(&bookings);
        let total: Decimal = rows.iter().map(|r| r.total_revenue).sum();

        prop_assert_eq!(total, summarize(&bookings).total_revenue);
        prop_assert!(rows.windows(2).all(|w| w[0].total_revenue >= w[1].total_revenue));
    }
}
