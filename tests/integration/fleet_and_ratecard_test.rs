//! Integration tests for fleet, customer and pricing endpoints
//!
//! Vehicles (listing load, registration, dispatch), companies, drivers,
//! rate cards and the health checks, all over the seeded demo store.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use serde_json::json;

use freightdesk::middleware::RequestId;
use helpers::{demo_services, json_body};

#[actix_web::test]
async fn test_vehicle_listing_reports_in_transit_load() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/vehicles").to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    let vehicles = body["data"].as_array().unwrap();
    assert_eq!(vehicles.len(), 5);
    assert_eq!(body["count"], 5);
    // Ordered by registration number
    assert_eq!(vehicles[0]["registration_number"], "DL-07-IJ-7890");

    let total_load: i64 = vehicles
        .iter()
        .map(|v| v["assignedParcels"].as_i64().unwrap())
        .sum();
    assert!(total_load > 0);
    let maintenance = vehicles.iter().find(|v| v["status"] == "Maintenance").unwrap();
    assert_eq!(maintenance["assignedParcels"], 0);
}

#[actix_web::test]
async fn test_register_vehicle() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/vehicles")
        .set_json(json!({
            "registration_number": " gj-01-zz-0001 ",
            "vehicle_type": "Tempo",
            "capacity": 30,
            "current_driver_id": "drv-002"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let vehicle = json_body(resp).await["data"].clone();
    assert_eq!(vehicle["registration_number"], "GJ-01-ZZ-0001");
    assert_eq!(vehicle["status"], "Available");
    assert_eq!(vehicle["driver"]["name"], "Suresh Kumar");

    // Same plate, different case
    let req = test::TestRequest::post()
        .uri("/api/vehicles")
        .set_json(json!({ "registration_number": "GJ-01-zz-0001" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    assert_eq!(json_body(resp).await["error"], "CONFLICT");

    let req = test::TestRequest::post()
        .uri("/api/vehicles")
        .set_json(json!({ "registration_number": "GJ-01-ZZ-0002", "current_driver_id": "drv-999" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_dispatch_vehicle() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/vehicles/veh-001/dispatch")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let outcome = json_body(resp).await["data"].clone();
    assert_eq!(outcome["vehicle"]["status"], "Dispatched");
    assert!(outcome["bookingsDispatched"].as_u64().unwrap() >= 1);

    // Nothing left BOOKED on that truck
    let req = test::TestRequest::get()
        .uri("/api/bookings?status=BOOKED")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["assigned_vehicle_id"] != "veh-001"));

    let req = test::TestRequest::post()
        .uri("/api/vehicles/veh-005/dispatch")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/vehicles/veh-999/dispatch")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_companies() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/companies")
        .set_json(json!({ "name": "Coastal Cargo", "type": "Trader" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let company = json_body(resp).await["data"].clone();
    assert_eq!(company["type"], "Trader");

    let req = test::TestRequest::get()
        .uri(&format!("/api/companies/{}", company["id"].as_str().unwrap()))
        .to_request();
    let fetched = json_body(test::call_service(&app, req).await).await;
    assert_eq!(fetched["data"]["name"], "Coastal Cargo");

    let req = test::TestRequest::post()
        .uri("/api/companies")
        .set_json(json!({ "name": "coastal cargo" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 409);

    let req = test::TestRequest::get().uri("/api/companies").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 6);

    let req = test::TestRequest::get().uri("/api/companies/cmp-999").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_drivers() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/drivers")
        .set_json(json!({ "name": "Deepak Nair", "phone": "+91-98200-11006" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/drivers")
        .set_json(json!({ "name": "  " }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get().uri("/api/drivers").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 6);
}

#[actix_web::test]
async fn test_rate_card_upsert() {
    let services = demo_services();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/ratecards").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 3);

    // Replace TechCorp's card: id stays, rates change
    let req = test::TestRequest::put()
        .uri("/api/ratecards")
        .set_json(json!({
            "company_id": "cmp-001",
            "base_rate": "250",
            "per_article_rate": "70",
            "surcharges": { "Heavy": "300" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let card = json_body(resp).await["data"].clone();
    assert_eq!(card["id"], "rc-001");
    assert_eq!(card["company_name"], "TechCorp");
    assert!(card["surcharges"].get("Express").is_none());

    // First card for EasyLogistics
    let req = test::TestRequest::put()
        .uri("/api/ratecards")
        .set_json(json!({ "company_id": "cmp-005", "base_rate": "100", "per_article_rate": "50" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/api/ratecards").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 4);

    let req = test::TestRequest::put()
        .uri("/api/ratecards")
        .set_json(json!({ "company_id": "cmp-002", "base_rate": "-1", "per_article_rate": "50" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::put()
        .uri("/api/ratecards")
        .set_json(json!({ "company_id": "cmp-999", "base_rate": "1", "per_article_rate": "1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_health_checks_over_real_http() {
    let services = demo_services();
    let srv = actix_test::start(move || {
        let services = services.clone();
        App::new()
            .wrap(RequestId)
            .configure(|cfg| services.configure(cfg))
    });

    let mut res = srv
        .get("/health")
        .insert_header(("X-Request-ID", "health-1"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.headers().get("x-request-id").unwrap(), "health-1");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let mut res = srv.get("/ready").send().await.unwrap();
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ready"], true);
    assert_eq!(body["store"], "demo");
}
