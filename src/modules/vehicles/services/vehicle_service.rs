use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{BookingFilter, BookingStatus};
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::drivers::repositories::DriverRepository;
use crate::modules::vehicles::models::{
    CreateVehicleRequest, DispatchOutcome, Vehicle, VehicleListing, VehicleStatus,
};
use crate::modules::vehicles::repositories::VehicleRepository;

/// Service for fleet management
pub struct VehicleService {
    vehicle_repo: Arc<dyn VehicleRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    driver_repo: Arc<dyn DriverRepository>,
}

impl VehicleService {
    pub fn new(
        vehicle_repo: Arc<dyn VehicleRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        driver_repo: Arc<dyn DriverRepository>,
    ) -> Self {
        Self {
            vehicle_repo,
            booking_repo,
            driver_repo,
        }
    }

    /// Fleet list with the number of IN-TRANSIT parcels on each vehicle
    pub async fn list_vehicles(&self) -> Result<Vec<VehicleListing>> {
        let in_transit = BookingFilter::new().status(BookingStatus::InTransit);
        let (vehicles, loads) = tokio::try_join!(
            self.vehicle_repo.list(),
            self.booking_repo.count_by_vehicle(&in_transit),
        )?;

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let assigned_parcels = loads.get(&vehicle.id).copied().unwrap_or(0);
                VehicleListing {
                    vehicle,
                    assigned_parcels,
                }
            })
            .collect())
    }

    pub async fn create_vehicle(&self, request: CreateVehicleRequest) -> Result<Vehicle> {
        let registration_number = request.registration_number.trim().to_uppercase();
        if registration_number.is_empty() {
            return Err(AppError::validation("Registration number is required"));
        }
        if matches!(request.capacity, Some(c) if c < 0) {
            return Err(AppError::validation("Capacity cannot be negative"));
        }

        if self
            .vehicle_repo
            .find_by_registration(&registration_number)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Vehicle '{}' already exists",
                registration_number
            )));
        }

        if let Some(driver_id) = &request.current_driver_id {
            if self.driver_repo.find_by_id(driver_id).await?.is_none() {
                return Err(AppError::not_found(format!("Driver {}", driver_id)));
            }
        }

        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4().to_string(),
            registration_number,
            vehicle_type: request.vehicle_type,
            capacity: request.capacity,
            capacity_kg: request.capacity_kg,
            make: request.make,
            model: request.model,
            year: request.year,
            current_driver_id: request.current_driver_id,
            status: request.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            driver: None,
        };

        let created = self.vehicle_repo.create(&vehicle).await?;
        info!(
            vehicle_id = %created.id,
            registration = %created.registration_number,
            "Vehicle registered"
        );

        Ok(created)
    }

    /// Send a vehicle out with everything booked onto it
    pub async fn dispatch_vehicle(&self, id: &str) -> Result<DispatchOutcome> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {}", id)))?;

        if vehicle.status == VehicleStatus::Maintenance {
            return Err(AppError::validation(format!(
                "Vehicle {} is under maintenance",
                vehicle.registration_number
            )));
        }

        let outcome = self
            .vehicle_repo
            .dispatch(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {}", id)))?;

        info!(
            vehicle_id = %id,
            bookings = outcome.bookings_dispatched,
            "Vehicle dispatched"
        );

        Ok(outcome)
    }
}
