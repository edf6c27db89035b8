use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::drivers::models::Driver;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// All drivers ordered by name
    async fn list(&self) -> Result<Vec<Driver>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Driver>>;

    async fn create(&self, driver: &Driver) -> Result<Driver>;
}

pub struct MySqlDriverRepository {
    pool: MySqlPool,
}

impl MySqlDriverRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for MySqlDriverRepository {
    async fn list(&self) -> Result<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, name, phone, license_number, created_at
            FROM drivers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, name, phone, license_number, created_at
            FROM drivers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn create(&self, driver: &Driver) -> Result<Driver> {
        sqlx::query(
            r#"
            INSERT INTO drivers (id, name, phone, license_number, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&driver.id)
        .bind(&driver.name)
        .bind(&driver.phone)
        .bind(&driver.license_number)
        .bind(driver.created_at)
        .execute(&self.pool)
        .await?;

        Ok(driver.clone())
    }
}
