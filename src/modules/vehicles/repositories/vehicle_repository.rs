use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{BookingStatus, DriverRef};
use crate::modules::vehicles::models::{DispatchOutcome, Vehicle, VehicleFilter, VehicleStatus};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// All vehicles ordered by registration number, driver joined
    async fn list(&self) -> Result<Vec<Vehicle>>;

    async fn count(&self, filter: &VehicleFilter) -> Result<i64>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>>;

    async fn find_by_registration(&self, registration_number: &str) -> Result<Option<Vehicle>>;

    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle>;

    /// Mark the vehicle Dispatched and move its BOOKED bookings to IN-TRANSIT.
    /// Both changes land together or not at all. None when the vehicle is unknown.
    async fn dispatch(&self, id: &str, at: DateTime<Utc>) -> Result<Option<DispatchOutcome>>;
}

const SELECT_VEHICLES: &str = r#"
    SELECT v.id, v.registration_number, v.vehicle_type, v.capacity, v.capacity_kg,
           v.make, v.model, v.year, v.current_driver_id, v.status,
           v.created_at, v.updated_at,
           d.name AS driver_name,
           d.phone AS driver_phone
    FROM vehicles v
    LEFT JOIN drivers d ON d.id = v.current_driver_id
"#;

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: String,
    registration_number: String,
    vehicle_type: Option<String>,
    capacity: Option<i32>,
    capacity_kg: Option<Decimal>,
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    current_driver_id: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    driver_name: Option<String>,
    driver_phone: Option<String>,
}

impl VehicleRow {
    fn into_vehicle(self) -> Result<Vehicle> {
        let status = self
            .status
            .parse::<VehicleStatus>()
            .map_err(AppError::Internal)?;

        let driver = match (&self.current_driver_id, self.driver_name) {
            (Some(id), Some(name)) => Some(DriverRef {
                id: id.clone(),
                name,
                phone: self.driver_phone,
            }),
            _ => None,
        };

        Ok(Vehicle {
            id: self.id,
            registration_number: self.registration_number,
            vehicle_type: self.vehicle_type,
            capacity: self.capacity,
            capacity_kg: self.capacity_kg,
            make: self.make,
            model: self.model,
            year: self.year,
            current_driver_id: self.current_driver_id,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            driver,
        })
    }
}

pub struct MySqlVehicleRepository {
    pool: MySqlPool,
}

impl MySqlVehicleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Vehicle>> {
        let mut qb = QueryBuilder::<MySql>::new(SELECT_VEHICLES);
        qb.push(format!(" WHERE v.{} = ", column))
            .push_bind(value.to_string());

        let row = qb
            .build_query_as::<VehicleRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(VehicleRow::into_vehicle).transpose()
    }
}

#[async_trait]
impl VehicleRepository for MySqlVehicleRepository {
    async fn list(&self) -> Result<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "{} ORDER BY v.registration_number",
            SELECT_VEHICLES
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VehicleRow::into_vehicle).collect()
    }

    async fn count(&self, filter: &VehicleFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM vehicles v WHERE 1 = 1");

        if !filter.statuses.is_empty() {
            qb.push(" AND v.status IN (");
            let mut statuses = qb.separated(", ");
            for status in &filter.statuses {
                statuses.push_bind(status.to_string());
            }
            statuses.push_unseparated(")");
        }
        if let Some(instant) = filter.updated_before {
            qb.push(" AND v.updated_at < ").push_bind(instant);
        }

        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>> {
        self.find_one("id", id).await
    }

    async fn find_by_registration(&self, registration_number: &str) -> Result<Option<Vehicle>> {
        self.find_one("registration_number", registration_number)
            .await
    }

    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id, registration_number, vehicle_type, capacity, capacity_kg,
                make, model, year, current_driver_id, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.capacity)
        .bind(vehicle.capacity_kg)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.current_driver_id)
        .bind(vehicle.status.to_string())
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Vehicle '{}' already exists",
                        vehicle.registration_number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        self.find_by_id(&vehicle.id)
            .await?
            .ok_or_else(|| AppError::internal("Vehicle vanished after insert"))
    }

    async fn dispatch(&self, id: &str, at: DateTime<Utc>) -> Result<Option<DispatchOutcome>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE vehicles SET status = ?, updated_at = ? WHERE id = ?")
            .bind(VehicleStatus::Dispatched.to_string())
            .bind(at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let flipped = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?, dispatched_at = ?, updated_at = ?
            WHERE assigned_vehicle_id = ? AND status = ?
            "#,
        )
        .bind(BookingStatus::InTransit.to_string())
        .bind(at)
        .bind(at)
        .bind(id)
        .bind(BookingStatus::Booked.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Vehicle vanished after dispatch"))?;

        Ok(Some(DispatchOutcome {
            vehicle,
            bookings_dispatched: flipped.rows_affected(),
        }))
    }
}
