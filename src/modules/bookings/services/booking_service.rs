use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::calendar::today_local;
use crate::core::{AppError, Result};
use crate::modules::bookings::models::{
    Booking, BookingFilter, BookingPatch, BookingStatus, CreateBookingRequest,
    UpdateBookingRequest,
};
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::companies::repositories::CompanyRepository;
use crate::modules::drivers::repositories::DriverRepository;
use crate::modules::ratecards::models::Quote;
use crate::modules::ratecards::repositories::RateCardRepository;
use crate::modules::vehicles::repositories::VehicleRepository;

/// Fresh LR numbers drawn before a collision is reported to the caller
pub const LR_ATTEMPTS: usize = 5;

/// Build an LR number of the form `LR-<year>-<6 digits>`
pub fn generate_lr_number(booking_date: NaiveDate) -> String {
    let serial = Uuid::new_v4().as_u128() % 1_000_000;
    format!("LR-{}-{:06}", booking_date.year(), serial)
}

/// Service for booking intake and updates
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    vehicle_repo: Arc<dyn VehicleRepository>,
    driver_repo: Arc<dyn DriverRepository>,
    rate_card_repo: Arc<dyn RateCardRepository>,
    gst_rate: Decimal,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        vehicle_repo: Arc<dyn VehicleRepository>,
        driver_repo: Arc<dyn DriverRepository>,
        rate_card_repo: Arc<dyn RateCardRepository>,
        gst_rate: Decimal,
    ) -> Self {
        Self {
            booking_repo,
            company_repo,
            vehicle_repo,
            driver_repo,
            rate_card_repo,
            gst_rate,
        }
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        self.booking_repo.find(filter).await
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking> {
        self.booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))
    }

    /// Accept a new booking, priced from the company's rate card when it has one
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        validate_create_request(&request)?;

        let company = self
            .company_repo
            .find_by_id(&request.company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {}", request.company_id)))?;

        let quote = match self.rate_card_repo.find_by_company(&company.id).await? {
            Some(card) => card.quote(request.article_count, &request.parcel_type, self.gst_rate),
            None => {
                warn!(company_id = %company.id, "No rate card, using submitted amount");
                Quote::from_subtotal(request.total_amount.unwrap_or(Decimal::ZERO), self.gst_rate)
            }
        };

        let booking_date = request.booking_date.unwrap_or_else(today_local);
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            lr_number: generate_lr_number(booking_date),
            booking_date,
            company_id: Some(company.id),
            consignee_name: request.consignee_name.trim().to_string(),
            consignee_contact: request.consignee_contact,
            origin: request.origin.trim().to_string(),
            destination: request.destination.trim().to_string(),
            destination_pincode: request.destination_pincode,
            article_count: request.article_count,
            parcel_type: Some(request.parcel_type),
            weight: request.weight,
            status: BookingStatus::Booked,
            total_amount: quote.subtotal,
            gst_amount: quote.gst,
            grand_total: quote.grand_total,
            payment_status: request
                .payment_status
                .unwrap_or_else(|| "Pending".to_string()),
            assigned_vehicle_id: None,
            assigned_driver_id: None,
            dispatched_at: None,
            estimated_delivery: request.estimated_delivery,
            delivered_at: None,
            created_at: now,
            updated_at: now,
            company: None,
            vehicle: None,
            driver: None,
        };

        let created = self.insert_with_fresh_lr(booking).await?;
        info!(
            booking_id = %created.id,
            lr_number = %created.lr_number,
            grand_total = %created.grand_total,
            "Booking created"
        );

        Ok(created)
    }

    /// Insert `booking`, drawing a new LR number whenever the store reports a
    /// duplicate. Gives up with the last Conflict after LR_ATTEMPTS tries.
    async fn insert_with_fresh_lr(&self, mut booking: Booking) -> Result<Booking> {
        let mut attempt = 1;
        loop {
            match self.booking_repo.create(&booking).await {
                Err(AppError::Conflict(reason)) if attempt < LR_ATTEMPTS => {
                    warn!(
                        lr_number = %booking.lr_number,
                        attempt,
                        "LR number collision, drawing another: {}",
                        reason
                    );
                    booking.lr_number = generate_lr_number(booking.booking_date);
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    /// Partial update of assignment and status
    pub async fn update_booking(&self, id: &str, request: UpdateBookingRequest) -> Result<Booking> {
        let current = self.get_booking(id).await?;

        if let Some(Some(vehicle_id)) = &request.assigned_vehicle_id {
            if self.vehicle_repo.find_by_id(vehicle_id).await?.is_none() {
                return Err(AppError::not_found(format!("Vehicle {}", vehicle_id)));
            }
        }
        if let Some(Some(driver_id)) = &request.assigned_driver_id {
            if self.driver_repo.find_by_id(driver_id).await?.is_none() {
                return Err(AppError::not_found(format!("Driver {}", driver_id)));
            }
        }

        let patch = build_patch(&current, request)?;
        if patch.is_empty() {
            return Err(AppError::validation("No updatable fields supplied"));
        }

        // A concurrent status change since `current` was read surfaces as Conflict
        let updated = self
            .booking_repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;

        info!(
            booking_id = %id,
            from = %current.status,
            to = %updated.status,
            "Booking updated"
        );

        Ok(updated)
    }
}

fn validate_create_request(request: &CreateBookingRequest) -> Result<()> {
    for (field, value) in [
        ("consignee_name", &request.consignee_name),
        ("origin", &request.origin),
        ("destination", &request.destination),
        ("parcel_type", &request.parcel_type),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!("{} is required", field)));
        }
    }
    if request.article_count <= 0 {
        return Err(AppError::validation("article_count must be at least 1"));
    }
    if matches!(request.weight, Some(w) if w < Decimal::ZERO) {
        return Err(AppError::validation("weight cannot be negative"));
    }
    if matches!(request.total_amount, Some(a) if a < Decimal::ZERO) {
        return Err(AppError::validation("total_amount cannot be negative"));
    }
    Ok(())
}

/// Translate a request into column changes, enforcing the status lifecycle
fn build_patch(current: &Booking, request: UpdateBookingRequest) -> Result<BookingPatch> {
    let mut patch = BookingPatch {
        assigned_vehicle_id: request.assigned_vehicle_id,
        assigned_driver_id: request.assigned_driver_id,
        ..Default::default()
    };

    if let Some(next) = request.status {
        if !current.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Cannot move booking from {} to {}",
                current.status, next
            )));
        }
        if next != current.status {
            let now = Utc::now();
            match next {
                BookingStatus::InTransit => patch.dispatched_at = Some(now),
                BookingStatus::Delivered => {
                    patch.delivered_at = Some(now);
                    if current.dispatched_at.is_none() {
                        patch.dispatched_at = Some(now);
                    }
                }
                _ => {}
            }
        }
        patch.status = Some(next);
        patch.expected_status = Some(current.status);
    }

    Ok(patch)
}
