// In-memory data store
//
// Backs the server when DEMO_DATA is enabled and the HTTP-level tests. Holds
// the same five tables as the MySQL schema and evaluates the repository
// contracts directly: references are resolved at read time, so a renamed
// company or re-assigned driver shows up on every booking immediately.

mod seed;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{
    Booking, BookingFilter, BookingPatch, BookingStatus, CompanyRef, DriverRef, VehicleRef,
};
use crate::modules::bookings::repositories::booking_repository::status_conflict;
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::companies::models::Company;
use crate::modules::companies::repositories::CompanyRepository;
use crate::modules::drivers::models::Driver;
use crate::modules::drivers::repositories::DriverRepository;
use crate::modules::ratecards::models::RateCard;
use crate::modules::ratecards::repositories::RateCardRepository;
use crate::modules::vehicles::models::{DispatchOutcome, Vehicle, VehicleFilter, VehicleStatus};
use crate::modules::vehicles::repositories::VehicleRepository;

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    drivers: Vec<Driver>,
    vehicles: Vec<Vehicle>,
    bookings: Vec<Booking>,
    rate_cards: Vec<RateCard>,
}

impl Tables {
    fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    fn driver_ref(&self, id: Option<&str>) -> Option<DriverRef> {
        id.and_then(|id| self.driver(id)).map(|d| DriverRef {
            id: d.id.clone(),
            name: d.name.clone(),
            phone: d.phone.clone(),
        })
    }

    fn resolve_booking(&self, booking: &Booking) -> Booking {
        let mut booking = booking.clone();
        booking.company = booking
            .company_id
            .as_deref()
            .and_then(|id| self.company(id))
            .map(|c| CompanyRef {
                id: c.id.clone(),
                name: c.name.clone(),
            });
        booking.vehicle = booking
            .assigned_vehicle_id
            .as_deref()
            .and_then(|id| self.vehicle(id))
            .map(|v| VehicleRef {
                id: v.id.clone(),
                registration_number: v.registration_number.clone(),
                vehicle_type: v.vehicle_type.clone(),
            });
        booking.driver = self.driver_ref(booking.assigned_driver_id.as_deref());
        booking
    }

    fn resolve_vehicle(&self, vehicle: &Vehicle) -> Vehicle {
        let mut vehicle = vehicle.clone();
        vehicle.driver = self.driver_ref(vehicle.current_driver_id.as_deref());
        vehicle
    }

    fn resolve_rate_card(&self, card: &RateCard) -> RateCard {
        let mut card = card.clone();
        card.company_name = self.company(&card.company_id).map(|c| c.name.clone());
        card
    }

    /// Resolved bookings matching `filter`, in no particular order
    fn matching_bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        self.bookings
            .iter()
            .map(|b| self.resolve_booking(b))
            .filter(|b| filter.matches(b))
            .collect()
    }
}

/// Shared in-memory store implementing every repository trait
#[derive(Debug, Clone, Default)]
pub struct DemoStore {
    tables: Arc<RwLock<Tables>>,
}

impl DemoStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store populated with sample data dated relative to `today`
    pub fn seeded(today: chrono::NaiveDate) -> Self {
        let tables = seed::build(today);
        tracing::debug!(
            companies = tables.companies.len(),
            vehicles = tables.vehicles.len(),
            bookings = tables.bookings.len(),
            "Seeded demo store"
        );
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl BookingRepository for DemoStore {
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings = tables.matching_bookings(filter);

        bookings.sort_by(|a, b| {
            b.booking_date
                .cmp(&a.booking_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        if let Some(limit) = filter.limit {
            bookings.truncate(limit);
        }

        Ok(bookings)
    }

    async fn count(&self, filter: &BookingFilter) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.matching_bookings(filter).len() as i64)
    }

    async fn sum_article_count(&self, filter: &BookingFilter) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .matching_bookings(filter)
            .iter()
            .map(|b| i64::from(b.article_count))
            .sum())
    }

    async fn count_by_company(&self, filter: &BookingFilter) -> Result<Vec<(String, i64)>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for booking in tables.matching_bookings(filter) {
            *counts.entry(booking.company_name().to_string()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_by_vehicle(&self, filter: &BookingFilter) -> Result<HashMap<String, i64>> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for booking in tables.matching_bookings(filter) {
            if let Some(vehicle_id) = booking.assigned_vehicle_id {
                *counts.entry(vehicle_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| tables.resolve_booking(b)))
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        let mut tables = self.tables.write().await;

        if tables
            .bookings
            .iter()
            .any(|b| b.id == booking.id || b.lr_number == booking.lr_number)
        {
            return Err(AppError::conflict(format!(
                "Booking '{}' already exists",
                booking.lr_number
            )));
        }

        tables.bookings.push(booking.clone());
        Ok(tables.resolve_booking(booking))
    }

    async fn update(&self, id: &str, patch: &BookingPatch) -> Result<Option<Booking>> {
        let mut tables = self.tables.write().await;

        let Some(booking) = tables.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        // Checked under the same write guard that applies the change
        if let Some(expected) = patch.expected_status {
            if booking.status != expected {
                return Err(status_conflict(id, expected, booking.status));
            }
        }

        booking.updated_at = Utc::now();
        if let Some(vehicle_id) = &patch.assigned_vehicle_id {
            booking.assigned_vehicle_id = vehicle_id.clone();
        }
        if let Some(driver_id) = &patch.assigned_driver_id {
            booking.assigned_driver_id = driver_id.clone();
        }
        if let Some(status) = patch.status {
            booking.status = status;
        }
        if let Some(at) = patch.dispatched_at {
            booking.dispatched_at = Some(at);
        }
        if let Some(at) = patch.delivered_at {
            booking.delivered_at = Some(at);
        }

        let updated = booking.clone();
        Ok(Some(tables.resolve_booking(&updated)))
    }
}

#[async_trait]
impl CompanyRepository for DemoStore {
    async fn list(&self) -> Result<Vec<Company>> {
        let tables = self.tables.read().await;
        let mut companies = tables.companies.clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.company(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn create(&self, company: &Company) -> Result<Company> {
        let mut tables = self.tables.write().await;

        if tables
            .companies
            .iter()
            .any(|c| c.name.to_lowercase() == company.name.to_lowercase())
        {
            return Err(AppError::conflict(format!(
                "Company '{}' already exists",
                company.name
            )));
        }

        tables.companies.push(company.clone());
        Ok(company.clone())
    }
}

#[async_trait]
impl DriverRepository for DemoStore {
    async fn list(&self) -> Result<Vec<Driver>> {
        let tables = self.tables.read().await;
        let mut drivers = tables.drivers.clone();
        drivers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drivers)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Driver>> {
        let tables = self.tables.read().await;
        Ok(tables.driver(id).cloned())
    }

    async fn create(&self, driver: &Driver) -> Result<Driver> {
        let mut tables = self.tables.write().await;
        tables.drivers.push(driver.clone());
        Ok(driver.clone())
    }
}

#[async_trait]
impl VehicleRepository for DemoStore {
    async fn list(&self) -> Result<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables
            .vehicles
            .iter()
            .map(|v| tables.resolve_vehicle(v))
            .collect();
        vehicles.sort_by(|a, b| a.registration_number.cmp(&b.registration_number));
        Ok(vehicles)
    }

    async fn count(&self, filter: &VehicleFilter) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.vehicles.iter().filter(|v| filter.matches(v)).count() as i64)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables.vehicle(id).map(|v| tables.resolve_vehicle(v)))
    }

    async fn find_by_registration(&self, registration_number: &str) -> Result<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .iter()
            .find(|v| v.registration_number.eq_ignore_ascii_case(registration_number))
            .map(|v| tables.resolve_vehicle(v)))
    }

    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let mut tables = self.tables.write().await;

        if tables
            .vehicles
            .iter()
            .any(|v| v.registration_number.eq_ignore_ascii_case(&vehicle.registration_number))
        {
            return Err(AppError::conflict(format!(
                "Vehicle '{}' already exists",
                vehicle.registration_number
            )));
        }

        tables.vehicles.push(vehicle.clone());
        Ok(tables.resolve_vehicle(vehicle))
    }

    async fn dispatch(&self, id: &str, at: DateTime<Utc>) -> Result<Option<DispatchOutcome>> {
        // One write guard covers the vehicle and its bookings
        let mut tables = self.tables.write().await;

        let Some(vehicle) = tables.vehicles.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        vehicle.status = VehicleStatus::Dispatched;
        vehicle.updated_at = at;
        let vehicle = vehicle.clone();

        let mut bookings_dispatched = 0;
        for booking in tables.bookings.iter_mut().filter(|b| {
            b.assigned_vehicle_id.as_deref() == Some(id) && b.status == BookingStatus::Booked
        }) {
            booking.status = BookingStatus::InTransit;
            booking.dispatched_at = Some(at);
            booking.updated_at = at;
            bookings_dispatched += 1;
        }

        Ok(Some(DispatchOutcome {
            vehicle: tables.resolve_vehicle(&vehicle),
            bookings_dispatched,
        }))
    }
}

#[async_trait]
impl RateCardRepository for DemoStore {
    async fn list(&self) -> Result<Vec<RateCard>> {
        let tables = self.tables.read().await;
        let mut cards: Vec<RateCard> = tables
            .rate_cards
            .iter()
            .map(|c| tables.resolve_rate_card(c))
            .collect();
        cards.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        Ok(cards)
    }

    async fn find_by_company(&self, company_id: &str) -> Result<Option<RateCard>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rate_cards
            .iter()
            .find(|c| c.company_id == company_id)
            .map(|c| tables.resolve_rate_card(c)))
    }

    async fn upsert(&self, card: &RateCard) -> Result<RateCard> {
        let mut tables = self.tables.write().await;

        match tables
            .rate_cards
            .iter_mut()
            .find(|c| c.company_id == card.company_id)
        {
            Some(existing) => {
                // company_id is the key; the row id survives the update
                let id = existing.id.clone();
                *existing = RateCard {
                    id,
                    ..card.clone()
                };
            }
            None => tables.rate_cards.push(card.clone()),
        }

        tables
            .rate_cards
            .iter()
            .find(|c| c.company_id == card.company_id)
            .map(|c| tables.resolve_rate_card(c))
            .ok_or_else(|| AppError::internal("Rate card vanished after upsert"))
    }
}
