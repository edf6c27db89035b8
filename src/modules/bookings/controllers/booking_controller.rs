use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::calendar::parse_query_date;
use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::bookings::models::{
    BookingFilter, BookingStatus, CreateBookingRequest, UpdateBookingRequest,
};
use crate::modules::bookings::services::BookingService;

/// Query parameters for GET /bookings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    /// Company name; "All" disables the filter
    pub company: Option<String>,
    /// Booking status; "All" disables the filter
    pub status: Option<String>,
    pub lr_number: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// "All", blank and absent all mean "no filter"
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ListBookingsQuery {
    pub fn to_filter(&self) -> Result<BookingFilter, AppError> {
        let mut filter = BookingFilter::new();

        if let Some(company) = selected(&self.company) {
            filter = filter.company_name(company);
        }
        if let Some(status) = selected(&self.status) {
            let status = status
                .parse::<BookingStatus>()
                .map_err(AppError::Validation)?;
            filter = filter.status(status);
        }
        if let Some(fragment) = selected(&self.lr_number) {
            filter = filter.lr_number_like(fragment);
        }
        if let Some(from) = parse_query_date(self.date_from.as_deref(), "dateFrom")? {
            filter = filter.date_from(from);
        }
        if let Some(to) = parse_query_date(self.date_to.as_deref(), "dateTo")? {
            filter = filter.date_to(to);
        }

        Ok(filter)
    }
}

/// GET /bookings
pub async fn list_bookings(
    service: web::Data<Arc<BookingService>>,
    query: web::Query<ListBookingsQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.to_filter()?;
    let bookings = service.list_bookings(&filter).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(bookings)))
}

/// GET /bookings/{id}
pub async fn get_booking(
    service: web::Data<Arc<BookingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = service.get_booking(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(booking)))
}

/// POST /bookings
pub async fn create_booking(
    service: web::Data<Arc<BookingService>>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = service.create_booking(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(booking)))
}

/// PUT /bookings/{id}
pub async fn update_booking(
    service: web::Data<Arc<BookingService>>,
    path: web::Path<String>,
    request: web::Json<UpdateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = service
        .update_booking(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(booking)))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(list_bookings))
            .route("", web::post().to(create_booking))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}", web::put().to(update_booking)),
    );
}
