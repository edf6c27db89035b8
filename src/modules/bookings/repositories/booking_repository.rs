// Booking repository
//
// Every booking read goes through a BookingFilter so the dashboard, reports and
// list endpoints share one predicate language. Rows are returned with their
// company, vehicle and driver joined in.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{
    Booking, BookingFilter, BookingPatch, BookingStatus, CompanyRef, DriverRef, VehicleRef,
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Bookings matching `filter`, newest booking_date first
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>>;

    /// Number of bookings matching `filter`
    async fn count(&self, filter: &BookingFilter) -> Result<i64>;

    /// Σ article_count over bookings matching `filter`
    async fn sum_article_count(&self, filter: &BookingFilter) -> Result<i64>;

    /// Booking counts per company name ("Unknown" for missing companies), unordered
    async fn count_by_company(&self, filter: &BookingFilter) -> Result<Vec<(String, i64)>>;

    /// Booking counts per assigned vehicle id
    async fn count_by_vehicle(&self, filter: &BookingFilter) -> Result<HashMap<String, i64>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;

    /// Insert a booking and return it with references resolved
    async fn create(&self, booking: &Booking) -> Result<Booking>;

    /// Apply a partial update; None when the booking does not exist.
    ///
    /// When `patch.expected_status` is set the write is a compare-and-set:
    /// a booking whose stored status differs is left alone and the call
    /// fails with `AppError::Conflict`.
    async fn update(&self, id: &str, patch: &BookingPatch) -> Result<Option<Booking>>;
}

const SELECT_BOOKINGS: &str = r#"
    SELECT b.id, b.lr_number, b.booking_date, b.company_id,
           b.consignee_name, b.consignee_contact, b.origin, b.destination,
           b.destination_pincode, b.article_count, b.parcel_type, b.weight,
           b.status, b.total_amount, b.gst_amount, b.grand_total, b.payment_status,
           b.assigned_vehicle_id, b.assigned_driver_id,
           b.dispatched_at, b.estimated_delivery, b.delivered_at,
           b.created_at, b.updated_at,
           c.name AS company_name,
           v.registration_number AS vehicle_registration_number,
           v.vehicle_type AS vehicle_type,
           d.name AS driver_name,
           d.phone AS driver_phone
    FROM bookings b
    LEFT JOIN companies c ON c.id = b.company_id
    LEFT JOIN vehicles v ON v.id = b.assigned_vehicle_id
    LEFT JOIN drivers d ON d.id = b.assigned_driver_id
"#;

const FROM_BOOKINGS: &str = r#"
    FROM bookings b
    LEFT JOIN companies c ON c.id = b.company_id
"#;

/// Flat row produced by SELECT_BOOKINGS
#[derive(Debug, FromRow)]
struct BookingRow {
    id: String,
    lr_number: String,
    booking_date: NaiveDate,
    company_id: Option<String>,
    consignee_name: String,
    consignee_contact: Option<String>,
    origin: String,
    destination: String,
    destination_pincode: Option<String>,
    article_count: i32,
    parcel_type: Option<String>,
    weight: Option<Decimal>,
    status: String,
    total_amount: Decimal,
    gst_amount: Decimal,
    grand_total: Decimal,
    payment_status: String,
    assigned_vehicle_id: Option<String>,
    assigned_driver_id: Option<String>,
    dispatched_at: Option<DateTime<Utc>>,
    estimated_delivery: Option<NaiveDate>,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    company_name: Option<String>,
    vehicle_registration_number: Option<String>,
    vehicle_type: Option<String>,
    driver_name: Option<String>,
    driver_phone: Option<String>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking> {
        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(AppError::Internal)?;

        let company = match (&self.company_id, self.company_name) {
            (Some(id), Some(name)) => Some(CompanyRef {
                id: id.clone(),
                name,
            }),
            _ => None,
        };
        let vehicle = match (&self.assigned_vehicle_id, self.vehicle_registration_number) {
            (Some(id), Some(registration_number)) => Some(VehicleRef {
                id: id.clone(),
                registration_number,
                vehicle_type: self.vehicle_type,
            }),
            _ => None,
        };
        let driver = match (&self.assigned_driver_id, self.driver_name) {
            (Some(id), Some(name)) => Some(DriverRef {
                id: id.clone(),
                name,
                phone: self.driver_phone,
            }),
            _ => None,
        };

        Ok(Booking {
            id: self.id,
            lr_number: self.lr_number,
            booking_date: self.booking_date,
            company_id: self.company_id,
            consignee_name: self.consignee_name,
            consignee_contact: self.consignee_contact,
            origin: self.origin,
            destination: self.destination,
            destination_pincode: self.destination_pincode,
            article_count: self.article_count,
            parcel_type: self.parcel_type,
            weight: self.weight,
            status,
            total_amount: self.total_amount,
            gst_amount: self.gst_amount,
            grand_total: self.grand_total,
            payment_status: self.payment_status,
            assigned_vehicle_id: self.assigned_vehicle_id,
            assigned_driver_id: self.assigned_driver_id,
            dispatched_at: self.dispatched_at,
            estimated_delivery: self.estimated_delivery,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            company,
            vehicle,
            driver,
        })
    }
}

/// Error for a compare-and-set update that lost the race
pub fn status_conflict(id: &str, expected: BookingStatus, stored: BookingStatus) -> AppError {
    AppError::conflict(format!(
        "Booking {} is {} now, not {}; reload and retry",
        id, stored, expected
    ))
}

/// LIKE pattern matching `fragment` literally anywhere, case-insensitively.
/// `\\`, `%` and `_` are escaped with a backslash.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Append `WHERE ...` for `filter`. Column aliases: b = bookings, c = companies.
fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &BookingFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(from) = filter.date_from {
        qb.push(" AND b.booking_date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND b.booking_date <= ").push_bind(to);
    }
    if let Some(before) = filter.date_before {
        qb.push(" AND b.booking_date < ").push_bind(before);
    }
    if let Some(company_id) = &filter.company_id {
        qb.push(" AND b.company_id = ").push_bind(company_id.clone());
    }
    if let Some(name) = &filter.company_name {
        qb.push(" AND c.name = ").push_bind(name.clone());
    }
    if !filter.statuses.is_empty() {
        qb.push(" AND b.status IN (");
        let mut statuses = qb.separated(", ");
        for status in &filter.statuses {
            statuses.push_bind(status.to_string());
        }
        statuses.push_unseparated(")");
    }
    if let Some(fragment) = &filter.lr_number_like {
        qb.push(" AND LOWER(b.lr_number) LIKE ")
            .push_bind(contains_pattern(fragment))
            .push(" ESCAPE '\\\\'");
    }
    if let Some(vehicle_id) = &filter.vehicle_id {
        qb.push(" AND b.assigned_vehicle_id = ")
            .push_bind(vehicle_id.clone());
    }
    if filter.has_vehicle {
        qb.push(" AND b.assigned_vehicle_id IS NOT NULL");
    }
    if let Some(instant) = filter.updated_before {
        qb.push(" AND b.updated_at < ").push_bind(instant);
    }
}

pub struct MySqlBookingRepository {
    pool: MySqlPool,
}

impl MySqlBookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let mut qb = QueryBuilder::<MySql>::new(SELECT_BOOKINGS);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY b.booking_date DESC, b.created_at DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb
            .build_query_as::<BookingRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn count(&self, filter: &BookingFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT COUNT(*)");
        qb.push(FROM_BOOKINGS);
        push_filter(&mut qb, filter);

        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn sum_article_count(&self, filter: &BookingFilter) -> Result<i64> {
        let mut qb =
            QueryBuilder::<MySql>::new("SELECT CAST(COALESCE(SUM(b.article_count), 0) AS SIGNED)");
        qb.push(FROM_BOOKINGS);
        push_filter(&mut qb, filter);

        let (total,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn count_by_company(&self, filter: &BookingFilter) -> Result<Vec<(String, i64)>> {
        let mut qb = QueryBuilder::<MySql>::new(
            "SELECT COALESCE(c.name, 'Unknown') AS company, COUNT(*) AS bookings",
        );
        qb.push(FROM_BOOKINGS);
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY COALESCE(c.name, 'Unknown')");

        let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn count_by_vehicle(&self, filter: &BookingFilter) -> Result<HashMap<String, i64>> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT b.assigned_vehicle_id, COUNT(*)");
        qb.push(FROM_BOOKINGS);
        push_filter(&mut qb, filter);
        qb.push(" AND b.assigned_vehicle_id IS NOT NULL GROUP BY b.assigned_vehicle_id");

        let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let mut qb = QueryBuilder::<MySql>::new(SELECT_BOOKINGS);
        qb.push(" WHERE b.id = ").push_bind(id.to_string());

        let row = qb
            .build_query_as::<BookingRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn create(&self, booking: &Booking) -> Result<Booking> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, lr_number, booking_date, company_id, consignee_name, consignee_contact,
                origin, destination, destination_pincode, article_count, parcel_type, weight,
                status, total_amount, gst_amount, grand_total, payment_status,
                assigned_vehicle_id, assigned_driver_id, dispatched_at, estimated_delivery,
                delivered_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.lr_number)
        .bind(booking.booking_date)
        .bind(&booking.company_id)
        .bind(&booking.consignee_name)
        .bind(&booking.consignee_contact)
        .bind(&booking.origin)
        .bind(&booking.destination)
        .bind(&booking.destination_pincode)
        .bind(booking.article_count)
        .bind(&booking.parcel_type)
        .bind(booking.weight)
        .bind(booking.status.to_string())
        .bind(booking.total_amount)
        .bind(booking.gst_amount)
        .bind(booking.grand_total)
        .bind(&booking.payment_status)
        .bind(&booking.assigned_vehicle_id)
        .bind(&booking.assigned_driver_id)
        .bind(booking.dispatched_at)
        .bind(booking.estimated_delivery)
        .bind(booking.delivered_at)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "LR number '{}' already exists",
                        booking.lr_number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        self.find_by_id(&booking.id)
            .await?
            .ok_or_else(|| AppError::internal("Booking vanished after insert"))
    }

    async fn update(&self, id: &str, patch: &BookingPatch) -> Result<Option<Booking>> {
        let mut qb = QueryBuilder::<MySql>::new("UPDATE bookings SET updated_at = ");
        qb.push_bind(Utc::now());

        // Some(None) binds NULL and clears the assignment
        if let Some(vehicle_id) = &patch.assigned_vehicle_id {
            qb.push(", assigned_vehicle_id = ").push_bind(vehicle_id.clone());
        }
        if let Some(driver_id) = &patch.assigned_driver_id {
            qb.push(", assigned_driver_id = ").push_bind(driver_id.clone());
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status.to_string());
        }
        if let Some(at) = patch.dispatched_at {
            qb.push(", dispatched_at = ").push_bind(at);
        }
        if let Some(at) = patch.delivered_at {
            qb.push(", delivered_at = ").push_bind(at);
        }
        qb.push(" WHERE id = ").push_bind(id.to_string());
        if let Some(expected) = patch.expected_status {
            qb.push(" AND status = ").push_bind(expected.to_string());
        }

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            return self.find_by_id(id).await;
        }

        // Nothing matched: either the row is missing or its status moved on
        match self.find_by_id(id).await? {
            None => Ok(None),
            Some(stored) => match patch.expected_status {
                Some(expected) if stored.status != expected => {
                    Err(status_conflict(id, expected, stored.status))
                }
                _ => Ok(Some(stored)),
            },
        }
    }
}
