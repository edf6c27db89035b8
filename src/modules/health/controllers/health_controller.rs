use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::Result;

/// Backing store as seen by the readiness probe
#[derive(Clone)]
pub enum DataStore {
    MySql(MySqlPool),
    /// Seeded in-memory store; always reachable
    Demo,
}

impl DataStore {
    pub fn label(&self) -> &'static str {
        match self {
            DataStore::MySql(_) => "mysql",
            DataStore::Demo => "demo",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            DataStore::MySql(pool) => {
                sqlx::query("SELECT 1").fetch_one(pool).await?;
                Ok(())
            }
            DataStore::Demo => Ok(()),
        }
    }
}

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub store: String,
}

/// GET /health - Liveness probe
/// Does not check dependencies
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}

/// GET /ready - Readiness probe
/// Returns 503 while the data store is unreachable
pub async fn readiness_check(store: web::Data<DataStore>) -> impl Responder {
    let ready = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Data store readiness check failed: {}", e);
            false
        }
    };

    let response = ReadinessResponse {
        ready,
        store: store.label().to_string(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
