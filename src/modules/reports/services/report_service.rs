use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{Booking, BookingFilter};
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::reports::models::{
    CompanyRevenue, ParcelTypeShare, ReportFilter, ReportSummary, RevenuePoint,
    VehicleDispatchCount,
};
use crate::modules::reports::services::aggregations::{
    self, REVENUE_TREND_MONTHS, VEHICLE_DISPATCH_TOP,
};

/// Service for the reports page.
///
/// Each report reads the bookings in scope once and folds them in memory.
/// An inverted date range is not an error; it simply selects nothing.
pub struct ReportService {
    booking_repo: Arc<dyn BookingRepository>,
    query_timeout: Duration,
}

impl ReportService {
    pub fn new(booking_repo: Arc<dyn BookingRepository>, query_timeout: Duration) -> Self {
        Self {
            booking_repo,
            query_timeout,
        }
    }

    async fn bookings_in_scope(
        &self,
        filter: &ReportFilter,
        booking_filter: BookingFilter,
        report: &str,
    ) -> Result<Vec<Booking>> {
        let bookings = tokio::time::timeout(self.query_timeout, self.booking_repo.find(&booking_filter))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} report exceeded {}s",
                    report,
                    self.query_timeout.as_secs()
                ))
            })??;

        if bookings.is_empty() {
            warn!(
                report,
                date_from = ?filter.date_from,
                date_to = ?filter.date_to,
                company_id = ?filter.company_id,
                "No bookings in report scope"
            );
        } else {
            info!(report, rows = bookings.len(), "Building report");
        }

        Ok(bookings)
    }

    pub async fn summary(&self, filter: &ReportFilter) -> Result<ReportSummary> {
        let bookings = self
            .bookings_in_scope(filter, filter.to_booking_filter(), "summary")
            .await?;
        Ok(aggregations::summarize(&bookings))
    }

    pub async fn revenue_trend(&self, filter: &ReportFilter) -> Result<Vec<RevenuePoint>> {
        let bookings = self
            .bookings_in_scope(filter, filter.to_booking_filter(), "revenue-trend")
            .await?;
        Ok(aggregations::revenue_trend(&bookings, REVENUE_TREND_MONTHS))
    }

    pub async fn company_summary(&self, filter: &ReportFilter) -> Result<Vec<CompanyRevenue>> {
        let bookings = self
            .bookings_in_scope(filter, filter.to_booking_filter(), "company-summary")
            .await?;
        Ok(aggregations::company_summary(&bookings))
    }

    pub async fn parcel_type_distribution(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ParcelTypeShare>> {
        let bookings = self
            .bookings_in_scope(filter, filter.to_booking_filter(), "parcel-type-distribution")
            .await?;
        Ok(aggregations::parcel_type_distribution(&bookings))
    }

    pub async fn vehicle_dispatch(&self, filter: &ReportFilter) -> Result<Vec<VehicleDispatchCount>> {
        let booking_filter = filter.to_booking_filter().with_vehicle();
        let bookings = self
            .bookings_in_scope(filter, booking_filter, "vehicle-dispatch")
            .await?;
        Ok(aggregations::vehicle_dispatch(&bookings, VEHICLE_DISPATCH_TOP))
    }
}
