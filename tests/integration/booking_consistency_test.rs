//! Integration tests for booking writes under contention
//!
//! Two updates racing on the same booking, and LR numbers that collide with
//! existing rows. The booking store is wrapped so each scenario can be
//! reproduced deterministically on the in-memory store.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use freightdesk::config::AppConfig;
use freightdesk::core::{AppError, Result};
use freightdesk::modules::bookings::models::{
    Booking, BookingFilter, BookingPatch, BookingStatus, CreateBookingRequest,
    UpdateBookingRequest,
};
use freightdesk::modules::bookings::repositories::BookingRepository;
use freightdesk::modules::bookings::services::booking_service::LR_ATTEMPTS;
use freightdesk::{DemoStore, Repositories, Services};
use helpers::{add_booking, date};

const TAKEN_LR: &str = "LR-2024-TAKEN";

/// Demo store with knobs: yield after every single-booking read, and rewrite
/// the LR number of the next `collisions` inserts to one already in use.
struct ContendedBookings {
    inner: DemoStore,
    yield_on_read: bool,
    collisions: AtomicUsize,
    attempted: Mutex<Vec<String>>,
}

impl ContendedBookings {
    fn new(inner: DemoStore) -> Self {
        Self {
            inner,
            yield_on_read: false,
            collisions: AtomicUsize::new(0),
            attempted: Mutex::new(Vec::new()),
        }
    }

    fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingRepository for ContendedBookings {
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        BookingRepository::find(&self.inner, filter).await
    }

    async fn count(&self, filter: &BookingFilter) -> Result<i64> {
        BookingRepository::count(&self.inner, filter).await
    }

    async fn sum_article_count(&self, filter: &BookingFilter) -> Result<i64> {
        self.inner.sum_article_count(filter).await
    }

    async fn count_by_company(&self, filter: &BookingFilter) -> Result<Vec<(String, i64)>> {
        self.inner.count_by_company(filter).await
    }

    async fn count_by_vehicle(&self, filter: &BookingFilter) -> Result<HashMap<String, i64>> {
        self.inner.count_by_vehicle(filter).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let booking = BookingRepository::find_by_id(&self.inner, id).await?;
        if self.yield_on_read {
            // Let the other request read the same row before either writes
            tokio::task::yield_now().await;
        }
        Ok(booking)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        self.attempted
            .lock()
            .unwrap()
            .push(booking.lr_number.clone());

        let clash = self
            .collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if clash {
            let mut duplicate = booking.clone();
            duplicate.lr_number = TAKEN_LR.to_string();
            return BookingRepository::create(&self.inner, &duplicate).await;
        }

        BookingRepository::create(&self.inner, booking).await
    }

    async fn update(&self, id: &str, patch: &BookingPatch) -> Result<Option<Booking>> {
        BookingRepository::update(&self.inner, id, patch).await
    }
}

fn services_with(store: DemoStore, bookings: Arc<ContendedBookings>) -> Services {
    let mut repos = Repositories::demo(store);
    repos.bookings = bookings;
    Services::new(repos, &AppConfig::default())
}

fn status_update(status: BookingStatus) -> UpdateBookingRequest {
    UpdateBookingRequest {
        status: Some(status),
        ..Default::default()
    }
}

fn submission() -> CreateBookingRequest {
    serde_json::from_value(serde_json::json!({
        "company_id": "cmp-001",
        "consignee_name": "Meera Iyer",
        "origin": "Mumbai",
        "destination": "Pune",
        "article_count": 2,
        "parcel_type": "Standard",
        "booking_date": "2024-03-13"
    }))
    .unwrap()
}

#[actix_web::test]
async fn test_racing_status_updates_cannot_reopen_a_delivered_booking() {
    let store = DemoStore::seeded(date(2024, 3, 13));
    let booking = add_booking(
        &store,
        "LR-RACE-1",
        date(2024, 3, 13),
        "cmp-001",
        500,
        BookingStatus::Booked,
    )
    .await;

    let mut contended = ContendedBookings::new(store.clone());
    contended.yield_on_read = true;
    let services = services_with(store.clone(), Arc::new(contended));

    let (to_transit, to_delivered) = tokio::join!(
        services
            .bookings
            .update_booking(&booking.id, status_update(BookingStatus::InTransit)),
        services
            .bookings
            .update_booking(&booking.id, status_update(BookingStatus::Delivered)),
    );

    // Both read BOOKED; only the first write may land
    let (winner, loser) = match (to_transit, to_delivered) {
        (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
        (a, b) => panic!("expected exactly one update to win, got {:?} and {:?}", a, b),
    };
    assert!(matches!(loser, AppError::Conflict(_)));
    assert_eq!(loser.kind(), "CONFLICT");

    let stored = BookingRepository::find_by_id(&store, &booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, winner.status);
}

#[actix_web::test]
async fn test_sequential_updates_still_move_forward() {
    let store = DemoStore::seeded(date(2024, 3, 13));
    let booking = add_booking(
        &store,
        "LR-SEQ-1",
        date(2024, 3, 13),
        "cmp-001",
        500,
        BookingStatus::Booked,
    )
    .await;
    let services = services_with(store.clone(), Arc::new(ContendedBookings::new(store)));

    let in_transit = services
        .bookings
        .update_booking(&booking.id, status_update(BookingStatus::InTransit))
        .await
        .unwrap();
    let delivered = services
        .bookings
        .update_booking(&booking.id, status_update(BookingStatus::Delivered))
        .await
        .unwrap();

    assert_eq!(in_transit.status, BookingStatus::InTransit);
    assert_eq!(delivered.status, BookingStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
}

#[actix_web::test]
async fn test_lr_collision_draws_a_fresh_number() {
    let store = DemoStore::seeded(date(2024, 3, 13));
    add_booking(
        &store,
        TAKEN_LR,
        date(2024, 3, 1),
        "cmp-001",
        100,
        BookingStatus::Delivered,
    )
    .await;

    let contended = Arc::new(ContendedBookings::new(store.clone()));
    contended.collisions.store(2, Ordering::SeqCst);
    let services = services_with(store.clone(), contended.clone());

    let created = services.bookings.create_booking(submission()).await.unwrap();

    let attempted = contended.attempted();
    assert_eq!(attempted.len(), 3);
    assert_eq!(created.lr_number, attempted[2]);
    assert_ne!(created.lr_number, TAKEN_LR);
    assert!(created.lr_number.starts_with("LR-2024-"));

    let stored = BookingRepository::find_by_id(&store, &created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.lr_number, created.lr_number);
}

#[actix_web::test]
async fn test_lr_collisions_give_up_after_bounded_attempts() {
    let store = DemoStore::seeded(date(2024, 3, 13));
    add_booking(
        &store,
        TAKEN_LR,
        date(2024, 3, 1),
        "cmp-001",
        100,
        BookingStatus::Delivered,
    )
    .await;
    let before = BookingRepository::count(&store, &BookingFilter::new()).await.unwrap();

    let contended = Arc::new(ContendedBookings::new(store.clone()));
    contended.collisions.store(usize::MAX, Ordering::SeqCst);
    let services = services_with(store.clone(), contended.clone());

    let err = services.bookings.create_booking(submission()).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(contended.attempted().len(), LR_ATTEMPTS);
    let after = BookingRepository::count(&store, &BookingFilter::new()).await.unwrap();
    assert_eq!(after, before);
}
