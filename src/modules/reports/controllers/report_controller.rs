use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::calendar::parse_query_date;
use crate::core::money::format_money;
use crate::core::{ApiResponse, Result};
use crate::modules::reports::models::{
    CompanyRevenue, ParcelTypeShare, ReportFilter, ReportSummary, RevenuePoint,
    VehicleDispatchCount,
};
use crate::modules::reports::services::ReportService;

/// Query parameters shared by every report endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Inclusive start (YYYY-MM-DD); absent means unbounded
    pub date_from: Option<String>,
    /// Inclusive end (YYYY-MM-DD); absent means unbounded
    pub date_to: Option<String>,
    /// Company id; "All" or absent means every company
    pub company_id: Option<String>,
}

impl ReportQuery {
    pub fn to_filter(&self) -> Result<ReportFilter> {
        let company_id = self
            .company_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        Ok(ReportFilter {
            date_from: parse_query_date(self.date_from.as_deref(), "dateFrom")?,
            date_to: parse_query_date(self.date_to.as_deref(), "dateTo")?,
            company_id,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_revenue: String, // Decimal as string for JSON precision
    pub total_bookings: i64,
    pub total_dispatches: i64,
    pub avg_revenue_per_booking: String,
}

#[derive(Debug, Serialize)]
pub struct RevenuePointResponse {
    pub month: String,
    pub revenue: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummaryResponse {
    pub company: String,
    pub total_revenue: String,
    pub total_bookings: i64,
    pub avg_per_booking: String,
}

#[derive(Debug, Serialize)]
pub struct ParcelTypeResponse {
    #[serde(rename = "type")]
    pub parcel_type: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct VehicleDispatchResponse {
    pub vehicle: String,
    pub count: i64,
}

impl From<ReportSummary> for SummaryResponse {
    fn from(summary: ReportSummary) -> Self {
        Self {
            total_revenue: format_money(summary.total_revenue),
            total_bookings: summary.total_bookings,
            total_dispatches: summary.total_dispatches,
            avg_revenue_per_booking: format_money(summary.avg_revenue_per_booking),
        }
    }
}

impl From<RevenuePoint> for RevenuePointResponse {
    fn from(point: RevenuePoint) -> Self {
        Self {
            month: point.month,
            revenue: format_money(point.revenue),
        }
    }
}

impl From<CompanyRevenue> for CompanySummaryResponse {
    fn from(row: CompanyRevenue) -> Self {
        Self {
            company: row.company,
            total_revenue: format_money(row.total_revenue),
            total_bookings: row.total_bookings,
            avg_per_booking: format_money(row.avg_per_booking),
        }
    }
}

impl From<ParcelTypeShare> for ParcelTypeResponse {
    fn from(share: ParcelTypeShare) -> Self {
        Self {
            parcel_type: share.parcel_type,
            count: share.count,
            percentage: share.percentage,
        }
    }
}

impl From<VehicleDispatchCount> for VehicleDispatchResponse {
    fn from(row: VehicleDispatchCount) -> Self {
        Self {
            vehicle: row.vehicle,
            count: row.count,
        }
    }
}

fn convert<S, D: From<S>>(rows: Vec<S>) -> Vec<D> {
    rows.into_iter().map(D::from).collect()
}

/// GET /reports/summary
pub async fn get_summary(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let summary = service.summary(&query.to_filter()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(SummaryResponse::from(summary))))
}

/// GET /reports/revenue-trend
pub async fn get_revenue_trend(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let trend = service.revenue_trend(&query.to_filter()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::<_, RevenuePointResponse>(trend))))
}

/// GET /reports/company-summary
pub async fn get_company_summary(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let rows = service.company_summary(&query.to_filter()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::<_, CompanySummaryResponse>(rows))))
}

/// GET /reports/parcel-type-distribution
pub async fn get_parcel_type_distribution(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let shares = service.parcel_type_distribution(&query.to_filter()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::<_, ParcelTypeResponse>(shares))))
}

/// GET /reports/vehicle-dispatch
pub async fn get_vehicle_dispatch(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let rows = service.vehicle_dispatch(&query.to_filter()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(convert::<_, VehicleDispatchResponse>(rows))))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/summary", web::get().to(get_summary))
            .route("/revenue-trend", web::get().to(get_revenue_trend))
            .route("/company-summary", web::get().to(get_company_summary))
            .route(
                "/parcel-type-distribution",
                web::get().to(get_parcel_type_distribution),
            )
            .route("/vehicle-dispatch", web::get().to(get_vehicle_dispatch)),
    );
}
