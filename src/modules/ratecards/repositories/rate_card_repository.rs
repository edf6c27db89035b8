use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::ratecards::models::RateCard;

#[async_trait]
pub trait RateCardRepository: Send + Sync {
    /// All rate cards ordered by company name
    async fn list(&self) -> Result<Vec<RateCard>>;

    async fn find_by_company(&self, company_id: &str) -> Result<Option<RateCard>>;

    /// Insert, or replace the company's existing card
    async fn upsert(&self, card: &RateCard) -> Result<RateCard>;
}

const SELECT_RATE_CARDS: &str = r#"
    SELECT r.id, r.company_id, c.name AS company_name, r.base_rate, r.per_article_rate,
           r.surcharges, r.effective_from, r.updated_at
    FROM rate_cards r
    LEFT JOIN companies c ON c.id = r.company_id
"#;

#[derive(Debug, FromRow)]
struct RateCardRow {
    id: String,
    company_id: String,
    company_name: Option<String>,
    base_rate: Decimal,
    per_article_rate: Decimal,
    /// JSON object text
    surcharges: String,
    effective_from: NaiveDate,
    updated_at: DateTime<Utc>,
}

impl RateCardRow {
    fn into_rate_card(self) -> Result<RateCard> {
        let surcharges: BTreeMap<String, Decimal> = serde_json::from_str(&self.surcharges)?;

        Ok(RateCard {
            id: self.id,
            company_id: self.company_id,
            company_name: self.company_name,
            base_rate: self.base_rate,
            per_article_rate: self.per_article_rate,
            surcharges,
            effective_from: self.effective_from,
            updated_at: self.updated_at,
        })
    }
}

pub struct MySqlRateCardRepository {
    pool: MySqlPool,
}

impl MySqlRateCardRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateCardRepository for MySqlRateCardRepository {
    async fn list(&self) -> Result<Vec<RateCard>> {
        let rows = sqlx::query_as::<_, RateCardRow>(&format!(
            "{} ORDER BY c.name",
            SELECT_RATE_CARDS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RateCardRow::into_rate_card).collect()
    }

    async fn find_by_company(&self, company_id: &str) -> Result<Option<RateCard>> {
        let row = sqlx::query_as::<_, RateCardRow>(&format!(
            "{} WHERE r.company_id = ?",
            SELECT_RATE_CARDS
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RateCardRow::into_rate_card).transpose()
    }

    async fn upsert(&self, card: &RateCard) -> Result<RateCard> {
        sqlx::query(
            r#"
            INSERT INTO rate_cards (
                id, company_id, base_rate, per_article_rate, surcharges, effective_from, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                base_rate = VALUES(base_rate),
                per_article_rate = VALUES(per_article_rate),
                surcharges = VALUES(surcharges),
                effective_from = VALUES(effective_from),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&card.id)
        .bind(&card.company_id)
        .bind(card.base_rate)
        .bind(card.per_article_rate)
        .bind(serde_json::to_string(&card.surcharges)?)
        .bind(card.effective_from)
        .bind(card.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_company(&card.company_id)
            .await?
            .ok_or_else(|| AppError::internal("Rate card vanished after upsert"))
    }
}
