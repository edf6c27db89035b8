use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::drivers::models::{CreateDriverRequest, Driver};
use crate::modules::drivers::repositories::DriverRepository;

pub struct DriverService {
    driver_repo: Arc<dyn DriverRepository>,
}

impl DriverService {
    pub fn new(driver_repo: Arc<dyn DriverRepository>) -> Self {
        Self { driver_repo }
    }

    pub async fn list_drivers(&self) -> Result<Vec<Driver>> {
        self.driver_repo.list().await
    }

    pub async fn create_driver(&self, request: CreateDriverRequest) -> Result<Driver> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Driver name is required"));
        }

        let driver = Driver {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: request.phone,
            license_number: request.license_number,
            created_at: Utc::now(),
        };

        let created = self.driver_repo.create(&driver).await?;
        info!(driver_id = %created.id, "Driver registered");

        Ok(created)
    }
}
