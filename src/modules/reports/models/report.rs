use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::bookings::models::BookingFilter;

/// Scope shared by every report: an optional date window and company
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Inclusive lower bound on booking_date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on booking_date
    pub date_to: Option<NaiveDate>,
    pub company_id: Option<String>,
}

impl ReportFilter {
    pub fn to_booking_filter(&self) -> BookingFilter {
        let mut filter = BookingFilter::new();
        if let Some(from) = self.date_from {
            filter = filter.date_from(from);
        }
        if let Some(to) = self.date_to {
            filter = filter.date_to(to);
        }
        if let Some(company_id) = &self.company_id {
            filter = filter.company_id(company_id.clone());
        }
        filter
    }
}

/// Headline figures for a report window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Σ grand_total
    pub total_revenue: Decimal,
    pub total_bookings: i64,
    /// Bookings that have left the yard (IN-TRANSIT or DELIVERED)
    pub total_dispatches: i64,
    /// Zero when there are no bookings
    pub avg_revenue_per_booking: Decimal,
}

/// Revenue of one `YYYY-MM` month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: Decimal,
}

/// Revenue and volume of one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRevenue {
    pub company: String,
    pub total_revenue: Decimal,
    pub total_bookings: i64,
    pub avg_per_booking: Decimal,
}

/// Share of one parcel type in the booking volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelTypeShare {
    pub parcel_type: String,
    pub count: i64,
    /// One decimal place; 0.0 when there are no bookings
    pub percentage: f64,
}

/// Number of bookings carried by one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDispatchCount {
    /// Registration number, "Unknown" when the vehicle row is gone
    pub vehicle: String,
    pub count: i64,
}
