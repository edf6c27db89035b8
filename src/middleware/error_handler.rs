use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::error::AppError;

/// Render malformed JSON bodies with the standard error envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

/// Render malformed query strings with the standard error envelope
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

/// Render malformed path segments with the standard error envelope
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::validation(format!("Invalid path parameter: {}", err)).into()
}

fn log_rejection(req: &HttpRequest, err: &dyn std::fmt::Display) {
    tracing::warn!(
        method = %req.method(),
        path = %req.path(),
        "Rejected request: {}",
        err
    );
}

/// Extractor configuration shared by the server and the test harness
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
