use serde::{Deserialize, Serialize};

use crate::modules::bookings::models::Booking;

/// The four headline KPIs with their day-over-day growth (whole percent)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiStats {
    pub today_bookings: i64,
    pub today_bookings_growth: i64,
    pub active_vehicles: i64,
    pub active_vehicles_growth: i64,
    pub parcels_in_transit: i64,
    pub parcels_in_transit_growth: i64,
    pub pending_deliveries: i64,
    pub pending_deliveries_growth: i64,
}

/// Lifecycle counts among today's bookings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverview {
    pub booked: i64,
    pub in_transit: i64,
    pub delivered: i64,
}

/// Parallel label/value arrays ready for a chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl ChartSeries {
    pub fn push(&mut self, label: impl Into<String>, value: i64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

/// GET /dashboard/summary document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: KpiStats,
    pub status_overview: StatusOverview,
    pub recent_bookings: Vec<Booking>,
    pub trend: ChartSeries,
    pub company_distribution: ChartSeries,
}

/// GET /dashboard document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_bookings: i64,
    pub recent_bookings: Vec<Booking>,
}
