// Shared fixtures for the HTTP-level tests
//
// Every test builds its own in-memory store, so tests never share state and
// need no database. Include with:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use freightdesk::config::AppConfig;
use freightdesk::core::calendar::today_local;
use freightdesk::modules::bookings::models::{Booking, BookingStatus};
use freightdesk::modules::bookings::repositories::BookingRepository;
use freightdesk::modules::companies::models::Company;
use freightdesk::modules::companies::repositories::CompanyRepository;
use freightdesk::{DemoStore, Repositories, Services};

/// Services over the seeded sample data
pub fn demo_services() -> Services {
    services_over(DemoStore::seeded(today_local()))
}

/// Services over a caller-provided store
pub fn services_over(store: DemoStore) -> Services {
    Services::new(Repositories::demo(store), &AppConfig::default())
}

/// Parse a response body as JSON
pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let bytes = test::read_body(resp).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn add_company(store: &DemoStore, id: &str, name: &str) -> Company {
    let now = Utc::now();
    let company = Company {
        id: id.to_string(),
        name: name.to_string(),
        contact_person: None,
        phone: None,
        email: None,
        address: None,
        company_type: None,
        status: "Active".to_string(),
        created_at: now,
        updated_at: now,
    };
    CompanyRepository::create(store, &company)
        .await
        .expect("company inserted")
}

/// Insert a booking for `company_id` worth `grand_total`
pub async fn add_booking(
    store: &DemoStore,
    lr_number: &str,
    booking_date: NaiveDate,
    company_id: &str,
    grand_total: i64,
    status: BookingStatus,
) -> Booking {
    let mut booking = Booking::new(lr_number, booking_date)
        .with_route("Mumbai", "Pune", "Consignee")
        .with_grand_total(Decimal::from(grand_total))
        .with_status(status);
    booking.company_id = Some(company_id.to_string());

    BookingRepository::create(store, &booking)
        .await
        .expect("booking inserted")
}
