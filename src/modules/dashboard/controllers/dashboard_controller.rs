use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::calendar::today_local;
use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::dashboard::services::dashboard_service::RECENT_BOOKINGS;
use crate::modules::dashboard::services::DashboardService;

const MAX_RECENT_BOOKINGS: usize = 100;
const DEFAULT_TREND_DAYS: u32 = 7;
const MAX_TREND_DAYS: u32 = 90;

/// Query parameters for GET /dashboard/recent-bookings
#[derive(Debug, Deserialize)]
pub struct RecentBookingsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    RECENT_BOOKINGS
}

/// Query parameters for GET /dashboard/bookings-trend
#[derive(Debug, Deserialize)]
pub struct BookingsTrendQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    DEFAULT_TREND_DAYS
}

fn success<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data))
}

/// GET /dashboard
pub async fn get_overview(
    service: web::Data<Arc<DashboardService>>,
) -> Result<HttpResponse, AppError> {
    Ok(success(service.overview().await?))
}

/// GET /dashboard/stats
pub async fn get_stats(
    service: web::Data<Arc<DashboardService>>,
) -> Result<HttpResponse, AppError> {
    Ok(success(service.stats(today_local()).await?))
}

/// GET /dashboard/recent-bookings
pub async fn get_recent_bookings(
    service: web::Data<Arc<DashboardService>>,
    query: web::Query<RecentBookingsQuery>,
) -> Result<HttpResponse, AppError> {
    if query.limit == 0 || query.limit > MAX_RECENT_BOOKINGS {
        return Err(AppError::validation(format!(
            "limit must be between 1 and {}",
            MAX_RECENT_BOOKINGS
        )));
    }

    let bookings = service.recent_bookings(query.limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(bookings)))
}

/// GET /dashboard/bookings-trend
pub async fn get_bookings_trend(
    service: web::Data<Arc<DashboardService>>,
    query: web::Query<BookingsTrendQuery>,
) -> Result<HttpResponse, AppError> {
    if query.days == 0 || query.days > MAX_TREND_DAYS {
        return Err(AppError::validation(format!(
            "days must be between 1 and {}",
            MAX_TREND_DAYS
        )));
    }

    Ok(success(
        service.bookings_trend(today_local(), query.days).await?,
    ))
}

/// GET /dashboard/company-distribution
pub async fn get_company_distribution(
    service: web::Data<Arc<DashboardService>>,
) -> Result<HttpResponse, AppError> {
    Ok(success(service.company_distribution().await?))
}

/// GET /dashboard/summary
pub async fn get_summary(
    service: web::Data<Arc<DashboardService>>,
) -> Result<HttpResponse, AppError> {
    Ok(success(service.summary(today_local()).await?))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .route("", web::get().to(get_overview))
            .route("/stats", web::get().to(get_stats))
            .route("/recent-bookings", web::get().to(get_recent_bookings))
            .route("/bookings-trend", web::get().to(get_bookings_trend))
            .route("/company-distribution", web::get().to(get_company_distribution))
            .route("/summary", web::get().to(get_summary)),
    );
}
