use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::companies::models::CreateCompanyRequest;
use crate::modules::companies::services::CompanyService;

/// GET /companies
pub async fn list_companies(
    service: web::Data<Arc<CompanyService>>,
) -> Result<HttpResponse, AppError> {
    let companies = service.list_companies().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(companies)))
}

/// GET /companies/{id}
pub async fn get_company(
    service: web::Data<Arc<CompanyService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let company = service.get_company(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(company)))
}

/// POST /companies
pub async fn create_company(
    service: web::Data<Arc<CompanyService>>,
    request: web::Json<CreateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    let company = service.create_company(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(company)))
}

/// Configure company routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/companies")
            .route("", web::get().to(list_companies))
            .route("", web::post().to(create_company))
            .route("/{id}", web::get().to(get_company)),
    );
}
