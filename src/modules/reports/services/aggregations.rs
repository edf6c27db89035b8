// Report aggregations
//
// Pure folds over a slice of bookings. The service fetches the rows, these
// functions shape them. Ties in every ranking are broken by the group key in
// ascending order so identical input always yields identical output.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::core::calendar::month_key;
use crate::core::money::{average, percentage};
use crate::modules::bookings::models::{Booking, BookingStatus};
use crate::modules::reports::models::{
    CompanyRevenue, ParcelTypeShare, ReportSummary, RevenuePoint, VehicleDispatchCount,
};

/// Populated months kept by the revenue trend
pub const REVENUE_TREND_MONTHS: usize = 6;

/// Vehicles kept by the dispatch ranking
pub const VEHICLE_DISPATCH_TOP: usize = 10;

const UNKNOWN: &str = "Unknown";

pub fn summarize(bookings: &[Booking]) -> ReportSummary {
    let total_revenue: Decimal = bookings.iter().map(|b| b.grand_total).sum();
    let total_bookings = bookings.len() as i64;
    let total_dispatches = bookings
        .iter()
        .filter(|b| matches!(b.status, BookingStatus::InTransit | BookingStatus::Delivered))
        .count() as i64;

    ReportSummary {
        total_revenue,
        total_bookings,
        total_dispatches,
        avg_revenue_per_booking: average(total_revenue, total_bookings),
    }
}

/// Revenue per `YYYY-MM`, ascending, limited to the last `months` populated buckets
pub fn revenue_trend(bookings: &[Booking], months: usize) -> Vec<RevenuePoint> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for booking in bookings {
        *buckets.entry(month_key(booking.booking_date)).or_default() += booking.grand_total;
    }

    let skip = buckets.len().saturating_sub(months);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(month, revenue)| RevenuePoint { month, revenue })
        .collect()
}

/// Revenue, volume and average per company, highest revenue first
pub fn company_summary(bookings: &[Booking]) -> Vec<CompanyRevenue> {
    let mut groups: HashMap<&str, (Decimal, i64)> = HashMap::new();
    for booking in bookings {
        let entry = groups.entry(booking.company_name()).or_default();
        entry.0 += booking.grand_total;
        entry.1 += 1;
    }

    let mut rows: Vec<CompanyRevenue> = groups
        .into_iter()
        .map(|(company, (total_revenue, total_bookings))| CompanyRevenue {
            company: company.to_string(),
            total_revenue,
            total_bookings,
            avg_per_booking: average(total_revenue, total_bookings),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.company.cmp(&b.company))
    });
    rows
}

/// Booking count and share per parcel type, largest first
pub fn parcel_type_distribution(bookings: &[Booking]) -> Vec<ParcelTypeShare> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for booking in bookings {
        let kind = booking
            .parcel_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN);
        *counts.entry(kind).or_default() += 1;
    }

    let total = bookings.len() as i64;
    let mut shares: Vec<ParcelTypeShare> = counts
        .into_iter()
        .map(|(kind, count)| ParcelTypeShare {
            parcel_type: kind.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    shares.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.parcel_type.cmp(&b.parcel_type))
    });
    shares
}

/// Bookings per assigned vehicle, busiest first, at most `top` rows
pub fn vehicle_dispatch(bookings: &[Booking], top: usize) -> Vec<VehicleDispatchCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for booking in bookings.iter().filter(|b| b.assigned_vehicle_id.is_some()) {
        let vehicle = booking
            .vehicle
            .as_ref()
            .map(|v| v.registration_number.as_str())
            .unwrap_or(UNKNOWN);
        *counts.entry(vehicle).or_default() += 1;
    }

    let mut rows: Vec<VehicleDispatchCount> = counts
        .into_iter()
        .map(|(vehicle, count)| VehicleDispatchCount {
            vehicle: vehicle.to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.vehicle.cmp(&b.vehicle)));
    rows.truncate(top);
    rows
}
