// Booking model
//
// A booking is one consignment accepted at the counter: who sent it, where it
// goes, how many articles, and what it costs. Bookings move through
// BOOKED -> IN-TRANSIT -> DELIVERED and are never physically deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Booking status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Accepted at the counter, waiting for a vehicle
    #[serde(rename = "BOOKED")]
    Booked,

    /// Loaded on a dispatched vehicle
    #[serde(rename = "IN-TRANSIT")]
    InTransit,

    /// Handed over to the consignee
    #[serde(rename = "DELIVERED")]
    Delivered,

    // Legacy display states still present in older rows
    Pending,
    Assigned,
    Verified,
    Submitted,
    Dispatched,
}

impl BookingStatus {
    /// Position along BOOKED -> IN-TRANSIT -> DELIVERED; legacy states have none
    fn lifecycle_rank(&self) -> Option<u8> {
        match self {
            BookingStatus::Booked => Some(0),
            BookingStatus::InTransit => Some(1),
            BookingStatus::Delivered => Some(2),
            _ => None,
        }
    }

    /// Whether a booking in `self` may be moved to `next`.
    ///
    /// Nothing leaves DELIVERED, lifecycle states only move forward, and legacy
    /// rows may be brought onto the lifecycle from any state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        if *self == next {
            return true;
        }
        if *self == BookingStatus::Delivered {
            return false;
        }
        match (self.lifecycle_rank(), next.lifecycle_rank()) {
            (Some(from), Some(to)) => to > from,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Booked => write!(f, "BOOKED"),
            BookingStatus::InTransit => write!(f, "IN-TRANSIT"),
            BookingStatus::Delivered => write!(f, "DELIVERED"),
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Assigned => write!(f, "Assigned"),
            BookingStatus::Verified => write!(f, "Verified"),
            BookingStatus::Submitted => write!(f, "Submitted"),
            BookingStatus::Dispatched => write!(f, "Dispatched"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "BOOKED" => Ok(BookingStatus::Booked),
            "IN-TRANSIT" => Ok(BookingStatus::InTransit),
            "DELIVERED" => Ok(BookingStatus::Delivered),
            "Pending" => Ok(BookingStatus::Pending),
            "Assigned" => Ok(BookingStatus::Assigned),
            "Verified" => Ok(BookingStatus::Verified),
            "Submitted" => Ok(BookingStatus::Submitted),
            "Dispatched" => Ok(BookingStatus::Dispatched),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Company columns embedded in a booking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
}

/// Vehicle columns embedded in a booking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRef {
    pub id: String,
    pub registration_number: String,
    pub vehicle_type: Option<String>,
}

/// Driver columns embedded in a booking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRef {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
}

/// A booking with its company, vehicle and driver resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub lr_number: String,
    pub booking_date: NaiveDate,
    pub company_id: Option<String>,
    pub consignee_name: String,
    pub consignee_contact: Option<String>,
    pub origin: String,
    pub destination: String,
    pub destination_pincode: Option<String>,
    pub article_count: i32,
    pub parcel_type: Option<String>,
    pub weight: Option<Decimal>,
    pub status: BookingStatus,

    /// Pre-tax amount
    pub total_amount: Decimal,
    pub gst_amount: Decimal,
    /// total_amount + gst_amount; never negative
    pub grand_total: Decimal,
    pub payment_status: String,

    pub assigned_vehicle_id: Option<String>,
    pub assigned_driver_id: Option<String>,

    pub dispatched_at: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<NaiveDate>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub company: Option<CompanyRef>,
    pub vehicle: Option<VehicleRef>,
    pub driver: Option<DriverRef>,
}

impl Booking {
    /// A BOOKED, zero-value booking with one article; refine with the `with_*` methods
    pub fn new(lr_number: impl Into<String>, booking_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            lr_number: lr_number.into(),
            booking_date,
            company_id: None,
            consignee_name: String::new(),
            consignee_contact: None,
            origin: String::new(),
            destination: String::new(),
            destination_pincode: None,
            article_count: 1,
            parcel_type: None,
            weight: None,
            status: BookingStatus::Booked,
            total_amount: Decimal::ZERO,
            gst_amount: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            payment_status: "Pending".to_string(),
            assigned_vehicle_id: None,
            assigned_driver_id: None,
            dispatched_at: None,
            estimated_delivery: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
            company: None,
            vehicle: None,
            driver: None,
        }
    }

    pub fn with_company(mut self, company: CompanyRef) -> Self {
        self.company_id = Some(company.id.clone());
        self.company = Some(company);
        self
    }

    pub fn with_route(mut self, origin: &str, destination: &str, consignee: &str) -> Self {
        self.origin = origin.to_string();
        self.destination = destination.to_string();
        self.consignee_name = consignee.to_string();
        self
    }

    /// Set the pre-tax amount and GST; grand_total follows
    pub fn with_amounts(mut self, total_amount: Decimal, gst_amount: Decimal) -> Self {
        self.total_amount = total_amount;
        self.gst_amount = gst_amount;
        self.grand_total = total_amount + gst_amount;
        self
    }

    pub fn with_grand_total(self, grand_total: Decimal) -> Self {
        self.with_amounts(grand_total, Decimal::ZERO)
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_parcels(mut self, parcel_type: &str, article_count: i32) -> Self {
        self.parcel_type = Some(parcel_type.to_string());
        self.article_count = article_count;
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleRef) -> Self {
        self.assigned_vehicle_id = Some(vehicle.id.clone());
        self.vehicle = Some(vehicle);
        self
    }

    pub fn with_driver(mut self, driver: DriverRef) -> Self {
        self.assigned_driver_id = Some(driver.id.clone());
        self.driver = Some(driver);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Company display name, "Unknown" when the reference is missing
    pub fn company_name(&self) -> &str {
        self.company
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown")
    }
}

/// Request body for POST /bookings
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Defaults to the current day
    pub booking_date: Option<NaiveDate>,
    pub company_id: String,
    pub consignee_name: String,
    pub consignee_contact: Option<String>,
    pub origin: String,
    pub destination: String,
    pub destination_pincode: Option<String>,
    pub article_count: i32,
    pub parcel_type: String,
    pub weight: Option<Decimal>,
    /// Used as the pre-tax amount when the company has no rate card
    pub total_amount: Option<Decimal>,
    pub payment_status: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Request body for PUT /bookings/{id}.
///
/// Absent fields are left untouched; an explicit `null` on an assignment
/// clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default, deserialize_with = "present")]
    pub assigned_vehicle_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub assigned_driver_id: Option<Option<String>>,
    pub status: Option<BookingStatus>,
}

/// Some(..) for any field present in the body, null included
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Column changes applied by a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    /// Some(None) clears the assignment
    pub assigned_vehicle_id: Option<Option<String>>,
    pub assigned_driver_id: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// The write only applies while the stored status still equals this
    pub expected_status: Option<BookingStatus>,
}

impl BookingPatch {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.assigned_vehicle_id.is_none()
            && self.assigned_driver_id.is_none()
            && self.status.is_none()
            && self.dispatched_at.is_none()
            && self.delivered_at.is_none()
    }
}
