use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::core::ApiResponse;
use crate::modules::ratecards::models::UpsertRateCardRequest;
use crate::modules::ratecards::services::RateCardService;

/// GET /ratecards
pub async fn list_rate_cards(
    service: web::Data<Arc<RateCardService>>,
) -> Result<HttpResponse, AppError> {
    let cards = service.list_rate_cards().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(cards)))
}

/// PUT /ratecards
pub async fn upsert_rate_card(
    service: web::Data<Arc<RateCardService>>,
    request: web::Json<UpsertRateCardRequest>,
) -> Result<HttpResponse, AppError> {
    let card = service.upsert_rate_card(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(card)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ratecards")
            .route("", web::get().to(list_rate_cards))
            .route("", web::put().to(upsert_rate_card)),
    );
}
