//! Contract tests for the /api/reports endpoints
//!
//! Validates envelope, field names and JSON types of every report document
//! against the seeded demo data.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use serde_json::Value;

use helpers::{demo_services, json_body};

async fn get(uri: &str) -> (u16, Value) {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status().as_u16();
    (status, json_body(resp).await)
}

fn is_money(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| {
            let (whole, cents) = s.split_once('.').unwrap_or((s, ""));
            !whole.is_empty()
                && whole.trim_start_matches('-').chars().all(|c| c.is_ascii_digit())
                && cents.len() == 2
                && cents.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false)
}

/// Test: summary document fields and types
#[actix_web::test]
async fn test_summary_contract() {
    let (status, body) = get("/api/reports/summary").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert!(is_money(&data["totalRevenue"]), "totalRevenue: {}", data["totalRevenue"]);
    assert!(data["totalBookings"].is_i64());
    assert!(data["totalDispatches"].is_i64());
    assert!(is_money(&data["avgRevenuePerBooking"]));
}

/// Test: revenue trend is a month-ordered array of at most six points
#[actix_web::test]
async fn test_revenue_trend_contract() {
    let (status, body) = get("/api/reports/revenue-trend").await;

    assert_eq!(status, 200);
    let points = body["data"].as_array().expect("data is an array");
    assert!(!points.is_empty());
    assert!(points.len() <= 6);

    let months: Vec<&str> = points.iter().map(|p| p["month"].as_str().unwrap()).collect();
    for month in &months {
        assert_eq!(month.len(), 7);
        assert_eq!(&month[4..5], "-");
    }
    assert!(months.windows(2).all(|w| w[0] < w[1]));
    assert!(points.iter().all(|p| is_money(&p["revenue"])));
}

/// Test: company rows carry camelCase money fields
#[actix_web::test]
async fn test_company_summary_contract() {
    let (status, body) = get("/api/reports/company-summary").await;

    assert_eq!(status, 200);
    let rows = body["data"].as_array().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert!(row["company"].is_string());
        assert!(is_money(&row["totalRevenue"]));
        assert!(row["totalBookings"].is_i64());
        assert!(is_money(&row["avgPerBooking"]));
    }
}

/// Test: parcel types use the "type" key and numeric percentages
#[actix_web::test]
async fn test_parcel_type_distribution_contract() {
    let (status, body) = get("/api/reports/parcel-type-distribution").await;

    assert_eq!(status, 200);
    let rows = body["data"].as_array().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert!(row["type"].is_string());
        assert!(row["count"].is_i64());
        assert!(row["percentage"].is_f64() || row["percentage"].is_i64());
    }
}

/// Test: vehicle ranking is capped at ten rows
#[actix_web::test]
async fn test_vehicle_dispatch_contract() {
    let (status, body) = get("/api/reports/vehicle-dispatch").await;

    assert_eq!(status, 200);
    let rows = body["data"].as_array().unwrap();
    assert!(rows.len() <= 10);
    for row in rows {
        assert!(row["vehicle"].is_string());
        assert!(row["count"].is_i64());
    }
}

/// Test: malformed dates are rejected with the error envelope
#[actix_web::test]
async fn test_invalid_date_contract() {
    let (status, body) = get("/api/reports/summary?dateFrom=15-01-2024").await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].is_string());
}
