use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;

use crate::core::calendar::start_of_day_utc;
use crate::core::{AppError, Result};
use crate::modules::bookings::models::{Booking, BookingFilter, BookingStatus};
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::dashboard::models::{ChartSeries, DashboardOverview, DashboardSummary, KpiStats};
use crate::modules::dashboard::services::kpi::{
    self, growth_rate, COMPANY_DISTRIBUTION_TOP,
};
use crate::modules::vehicles::models::VehicleFilter;
use crate::modules::vehicles::repositories::VehicleRepository;

/// Bookings listed on the dashboard front page
pub const RECENT_BOOKINGS: usize = 10;

/// Service behind the dashboard.
///
/// Every document is assembled from independent reads issued together and
/// joined; the whole batch shares one timeout. `today` is passed in so the
/// calendar arithmetic can be pinned in tests.
///
/// The "yesterday" figures for fleet and in-transit KPIs are approximated by
/// rows whose updated_at falls before local midnight, since no daily snapshot
/// is kept.
pub struct DashboardService {
    booking_repo: Arc<dyn BookingRepository>,
    vehicle_repo: Arc<dyn VehicleRepository>,
    query_timeout: Duration,
}

impl DashboardService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        vehicle_repo: Arc<dyn VehicleRepository>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            booking_repo,
            vehicle_repo,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} exceeded {}s",
                    what,
                    self.query_timeout.as_secs()
                ))
            })?
    }

    /// GET /dashboard: total booking count plus the latest bookings
    pub async fn overview(&self) -> Result<DashboardOverview> {
        let all = BookingFilter::new();
        let recent = BookingFilter::new().limit(RECENT_BOOKINGS);

        let (total_bookings, recent_bookings) = self
            .bounded("dashboard overview", async {
                tokio::try_join!(self.booking_repo.count(&all), self.booking_repo.find(&recent))
            })
            .await?;

        Ok(DashboardOverview {
            total_bookings,
            recent_bookings,
        })
    }

    /// The four KPIs and their growth against the previous day
    pub async fn stats(&self, today: NaiveDate) -> Result<KpiStats> {
        self.bounded("dashboard stats", self.collect_stats(today))
            .await
    }

    async fn collect_stats(&self, today: NaiveDate) -> Result<KpiStats> {
        let yesterday = today.pred_opt().unwrap_or(today);
        let midnight = start_of_day_utc(today);

        let booked_today = BookingFilter::new().on(today);
        let booked_yesterday = BookingFilter::new().date_from(yesterday).date_before(today);
        let in_transit = BookingFilter::new().status(BookingStatus::InTransit);
        let in_transit_before = in_transit.clone().updated_before(midnight);
        let active = VehicleFilter::active();
        let active_before = VehicleFilter::active().updated_before(midnight);

        let (
            today_bookings,
            yesterday_bookings,
            active_vehicles,
            active_vehicles_before,
            parcels_in_transit,
            parcels_in_transit_before,
            pending_deliveries,
            pending_deliveries_before,
        ) = tokio::try_join!(
            self.booking_repo.count(&booked_today),
            self.booking_repo.count(&booked_yesterday),
            self.vehicle_repo.count(&active),
            self.vehicle_repo.count(&active_before),
            self.booking_repo.sum_article_count(&in_transit),
            self.booking_repo.sum_article_count(&in_transit_before),
            self.booking_repo.count(&in_transit),
            self.booking_repo.count(&in_transit_before),
        )?;

        Ok(KpiStats {
            today_bookings,
            today_bookings_growth: growth_rate(today_bookings, yesterday_bookings),
            active_vehicles,
            active_vehicles_growth: growth_rate(active_vehicles, active_vehicles_before),
            parcels_in_transit,
            parcels_in_transit_growth: growth_rate(parcels_in_transit, parcels_in_transit_before),
            pending_deliveries,
            pending_deliveries_growth: growth_rate(pending_deliveries, pending_deliveries_before),
        })
    }

    pub async fn recent_bookings(&self, limit: usize) -> Result<Vec<Booking>> {
        let filter = BookingFilter::new().limit(limit);
        self.bounded("recent bookings", self.booking_repo.find(&filter))
            .await
    }

    /// Per-day booking counts over the `days` days ending today
    pub async fn bookings_trend(&self, today: NaiveDate, days: u32) -> Result<ChartSeries> {
        let start = today - chrono::Duration::days(i64::from(days.saturating_sub(1)));
        let filter = BookingFilter::new().date_from(start).date_to(today);

        let bookings = self
            .bounded("bookings trend", self.booking_repo.find(&filter))
            .await?;

        Ok(kpi::daily_trend(&bookings, today, days))
    }

    /// Bookings per company: top five, then "Others"
    pub async fn company_distribution(&self) -> Result<ChartSeries> {
        let all = BookingFilter::new();
        let counts = self
            .bounded("company distribution", self.booking_repo.count_by_company(&all))
            .await?;

        Ok(kpi::top_with_others(counts, COMPANY_DISTRIBUTION_TOP))
    }

    /// GET /dashboard/summary: every panel of the dashboard in one document
    pub async fn summary(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let week_start = today - chrono::Duration::days(6);

        let booked_today = BookingFilter::new().on(today);
        let recent = BookingFilter::new().limit(RECENT_BOOKINGS);
        let this_week = BookingFilter::new().date_from(week_start).date_to(today);
        let all = BookingFilter::new();

        let (stats, todays_bookings, recent_bookings, week_bookings, company_counts) = self
            .bounded("dashboard summary", async {
                tokio::try_join!(
                    self.collect_stats(today),
                    self.booking_repo.find(&booked_today),
                    self.booking_repo.find(&recent),
                    self.booking_repo.find(&this_week),
                    self.booking_repo.count_by_company(&all),
                )
            })
            .await?;

        info!(
            today = %today,
            today_bookings = stats.today_bookings,
            week_bookings = week_bookings.len(),
            "Dashboard summary assembled"
        );

        Ok(DashboardSummary {
            stats,
            status_overview: kpi::status_overview(&todays_bookings),
            recent_bookings,
            trend: kpi::weekday_trend(&week_bookings),
            company_distribution: kpi::top_with_others(company_counts, COMPANY_DISTRIBUTION_TOP),
        })
    }
}
