use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::bookings::models::DriverRef;

/// Vehicle availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Dispatched,
    Pending,
    Maintenance,
}

impl VehicleStatus {
    /// Statuses counted as part of the active fleet
    pub const ACTIVE: [VehicleStatus; 2] = [VehicleStatus::Available, VehicleStatus::Dispatched];
}

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Available
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleStatus::Available => write!(f, "Available"),
            VehicleStatus::Dispatched => write!(f, "Dispatched"),
            VehicleStatus::Pending => write!(f, "Pending"),
            VehicleStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Available" => Ok(VehicleStatus::Available),
            "Dispatched" => Ok(VehicleStatus::Dispatched),
            "Pending" => Ok(VehicleStatus::Pending),
            "Maintenance" => Ok(VehicleStatus::Maintenance),
            _ => Err(format!("Invalid vehicle status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Unique plate, e.g. "MH-12-AB-1234"
    pub registration_number: String,
    pub vehicle_type: Option<String>,
    /// Article capacity
    pub capacity: Option<i32>,
    pub capacity_kg: Option<Decimal>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub current_driver_id: Option<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub driver: Option<DriverRef>,
}

/// Vehicle row for GET /vehicles
#[derive(Debug, Clone, Serialize)]
pub struct VehicleListing {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// IN-TRANSIT bookings currently loaded on the vehicle
    #[serde(rename = "assignedParcels")]
    pub assigned_parcels: i64,
}

/// Request body for POST /vehicles
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleRequest {
    pub registration_number: String,
    pub vehicle_type: Option<String>,
    pub capacity: Option<i32>,
    pub capacity_kg: Option<Decimal>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub current_driver_id: Option<String>,
    pub status: Option<VehicleStatus>,
}

/// Predicate for fleet counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    /// status IN (...); empty means any status
    pub statuses: Vec<VehicleStatus>,
    /// updated_at < updated_before
    pub updated_before: Option<DateTime<Utc>>,
}

impl VehicleFilter {
    pub fn active() -> Self {
        Self {
            statuses: VehicleStatus::ACTIVE.to_vec(),
            updated_before: None,
        }
    }

    pub fn updated_before(mut self, instant: DateTime<Utc>) -> Self {
        self.updated_before = Some(instant);
        self
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&vehicle.status) {
            return false;
        }
        match self.updated_before {
            Some(instant) => vehicle.updated_at < instant,
            None => true,
        }
    }
}

/// Result of dispatching a vehicle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub vehicle: Vehicle,
    /// BOOKED bookings flipped to IN-TRANSIT
    pub bookings_dispatched: u64,
}
