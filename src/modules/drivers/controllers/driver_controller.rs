use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::drivers::models::CreateDriverRequest;
use crate::modules::drivers::services::DriverService;

/// GET /drivers
pub async fn list_drivers(
    service: web::Data<Arc<DriverService>>,
) -> Result<HttpResponse, AppError> {
    let drivers = service.list_drivers().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(drivers)))
}

/// POST /drivers
pub async fn create_driver(
    service: web::Data<Arc<DriverService>>,
    request: web::Json<CreateDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let driver = service.create_driver(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(driver)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/drivers")
            .route("", web::get().to(list_drivers))
            .route("", web::post().to(create_driver)),
    );
}
