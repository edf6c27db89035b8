//! Integration tests for the dashboard summary
//!
//! Pins "today" to Wednesday 2024-03-13 and checks KPIs, growth, status
//! overview, weekday trend and company distribution against a known store.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use freightdesk::core::{AppError, Result};
use freightdesk::modules::bookings::models::{Booking, BookingFilter, BookingPatch, BookingStatus};
use freightdesk::modules::bookings::repositories::BookingRepository;
use freightdesk::modules::dashboard::DashboardService;
use freightdesk::DemoStore;
use helpers::{add_booking, add_company, date, services_over};

fn today() -> NaiveDate {
    date(2024, 3, 13)
}

/// Three bookings today (two BOOKED, one IN-TRANSIT), two yesterday
async fn two_day_store() -> DemoStore {
    let store = DemoStore::new();
    add_company(&store, "cmp-a", "TechCorp").await;

    let yesterday = date(2024, 3, 12);
    add_booking(&store, "LR-T1", today(), "cmp-a", 100, BookingStatus::Booked).await;
    add_booking(&store, "LR-T2", today(), "cmp-a", 100, BookingStatus::Booked).await;
    add_booking(&store, "LR-T3", today(), "cmp-a", 100, BookingStatus::InTransit).await;
    add_booking(&store, "LR-Y1", yesterday, "cmp-a", 100, BookingStatus::Delivered).await;
    add_booking(&store, "LR-Y2", yesterday, "cmp-a", 100, BookingStatus::Delivered).await;
    store
}

#[actix_web::test]
async fn test_today_bookings_and_growth() {
    let services = services_over(two_day_store().await);

    let summary = services.dashboard.summary(today()).await.unwrap();

    assert_eq!(summary.stats.today_bookings, 3);
    assert_eq!(summary.stats.today_bookings_growth, 50);
    // Empty fleet: no growth either way
    assert_eq!(summary.stats.active_vehicles, 0);
    assert_eq!(summary.stats.active_vehicles_growth, 0);
    // The in-transit booking was touched after midnight
    assert_eq!(summary.stats.pending_deliveries, 1);
    assert_eq!(summary.stats.pending_deliveries_growth, 100);
}

#[actix_web::test]
async fn test_status_overview_counts_today_only() {
    let services = services_over(two_day_store().await);

    let summary = services.dashboard.summary(today()).await.unwrap();

    assert_eq!(summary.status_overview.booked, 2);
    assert_eq!(summary.status_overview.in_transit, 1);
    assert_eq!(summary.status_overview.delivered, 0);
}

#[actix_web::test]
async fn test_future_dated_bookings_are_not_today() {
    let store = two_day_store().await;
    add_booking(&store, "LR-F1", date(2024, 3, 20), "cmp-a", 100, BookingStatus::Booked).await;
    let services = services_over(store);

    let summary = services.dashboard.summary(today()).await.unwrap();
    let stats = services.dashboard.stats(today()).await.unwrap();

    assert_eq!(summary.stats.today_bookings, 3);
    assert_eq!(summary.stats.today_bookings_growth, 50);
    assert_eq!(stats.today_bookings, 3);
    let overview = &summary.status_overview;
    assert_eq!(
        overview.booked + overview.in_transit + overview.delivered,
        summary.stats.today_bookings
    );
}

#[actix_web::test]
async fn test_weekday_trend_buckets() {
    let services = services_over(two_day_store().await);

    let summary = services.dashboard.summary(today()).await.unwrap();

    assert_eq!(
        summary.trend.labels,
        vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
    );
    assert_eq!(summary.trend.values, vec![0, 0, 2, 3, 0, 0, 0]);
}

#[actix_web::test]
async fn test_recent_bookings_newest_first() {
    let services = services_over(two_day_store().await);

    let summary = services.dashboard.summary(today()).await.unwrap();

    assert_eq!(summary.recent_bookings.len(), 5);
    assert_eq!(summary.recent_bookings[0].booking_date, today());
    assert_eq!(summary.recent_bookings[4].booking_date, date(2024, 3, 12));
    assert_eq!(summary.recent_bookings[0].company_name(), "TechCorp");
}

#[actix_web::test]
async fn test_company_distribution_folds_others() {
    let store = DemoStore::new();
    let counts = [7, 6, 5, 4, 3, 2, 1];
    for (i, count) in counts.iter().enumerate() {
        let id = format!("cmp-{}", i);
        add_company(&store, &id, &format!("Company {}", i)).await;
        for n in 0..*count {
            add_booking(
                &store,
                &format!("LR-{}-{}", i, n),
                date(2024, 2, 1),
                &id,
                10,
                BookingStatus::Delivered,
            )
            .await;
        }
    }
    let services = services_over(store);

    let distribution = services.dashboard.company_distribution().await.unwrap();

    assert_eq!(
        distribution.labels,
        vec!["Company 0", "Company 1", "Company 2", "Company 3", "Company 4", "Others"]
    );
    assert_eq!(distribution.values, vec![7, 6, 5, 4, 3, 3]);
}

#[actix_web::test]
async fn test_empty_store_summary() {
    let services = services_over(DemoStore::new());

    let summary = services.dashboard.summary(today()).await.unwrap();

    assert_eq!(summary.stats.today_bookings, 0);
    assert_eq!(summary.stats.today_bookings_growth, 0);
    assert!(summary.recent_bookings.is_empty());
    assert_eq!(summary.trend.values, vec![0; 7]);
    assert!(summary.company_distribution.labels.is_empty());
}

#[actix_web::test]
async fn test_bookings_trend_days_end_today() {
    let services = services_over(two_day_store().await);

    let trend = services.dashboard.bookings_trend(today(), 3).await.unwrap();

    assert_eq!(trend.labels, vec!["Mon", "Tue", "Wed"]);
    assert_eq!(trend.values, vec![0, 2, 3]);
}

/// Booking store that never answers in time
struct StalledBookings;

#[async_trait]
impl BookingRepository for StalledBookings {
    async fn find(&self, _filter: &BookingFilter) -> Result<Vec<Booking>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn count(&self, _filter: &BookingFilter) -> Result<i64> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(0)
    }

    async fn sum_article_count(&self, _filter: &BookingFilter) -> Result<i64> {
        Ok(0)
    }

    async fn count_by_company(&self, _filter: &BookingFilter) -> Result<Vec<(String, i64)>> {
        Ok(Vec::new())
    }

    async fn count_by_vehicle(&self, _filter: &BookingFilter) -> Result<HashMap<String, i64>> {
        Ok(HashMap::new())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Booking>> {
        Ok(None)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        Ok(booking.clone())
    }

    async fn update(&self, _id: &str, _patch: &BookingPatch) -> Result<Option<Booking>> {
        Ok(None)
    }
}

#[actix_web::test]
async fn test_slow_store_times_out() {
    let service = DashboardService::new(
        Arc::new(StalledBookings),
        Arc::new(DemoStore::new()),
        Duration::from_millis(50),
    );

    let err = service.summary(today()).await.unwrap_err();

    assert!(matches!(err, AppError::Timeout(_)));
    assert_eq!(err.kind(), "TIMEOUT");
}
