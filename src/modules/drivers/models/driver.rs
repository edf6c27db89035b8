use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /drivers
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}
