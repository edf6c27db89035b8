use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::vehicles::models::CreateVehicleRequest;
use crate::modules::vehicles::services::VehicleService;

/// GET /vehicles
pub async fn list_vehicles(
    service: web::Data<Arc<VehicleService>>,
) -> Result<HttpResponse, AppError> {
    let vehicles = service.list_vehicles().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(vehicles)))
}

/// POST /vehicles
pub async fn create_vehicle(
    service: web::Data<Arc<VehicleService>>,
    request: web::Json<CreateVehicleRequest>,
) -> Result<HttpResponse, AppError> {
    let vehicle = service.create_vehicle(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(vehicle)))
}

/// POST /vehicles/{id}/dispatch
pub async fn dispatch_vehicle(
    service: web::Data<Arc<VehicleService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let outcome = service.dispatch_vehicle(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(outcome)))
}

/// Configure vehicle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::get().to(list_vehicles))
            .route("", web::post().to(create_vehicle))
            .route("/{id}/dispatch", web::post().to(dispatch_vehicle)),
    );
}
