use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::core::calendar::today_local;
use crate::core::{AppError, Result};
use crate::modules::companies::repositories::CompanyRepository;
use crate::modules::ratecards::models::{RateCard, UpsertRateCardRequest};
use crate::modules::ratecards::repositories::RateCardRepository;

pub struct RateCardService {
    rate_card_repo: Arc<dyn RateCardRepository>,
    company_repo: Arc<dyn CompanyRepository>,
}

impl RateCardService {
    pub fn new(
        rate_card_repo: Arc<dyn RateCardRepository>,
        company_repo: Arc<dyn CompanyRepository>,
    ) -> Self {
        Self {
            rate_card_repo,
            company_repo,
        }
    }

    pub async fn list_rate_cards(&self) -> Result<Vec<RateCard>> {
        self.rate_card_repo.list().await
    }

    /// Create or replace the rate card of a company
    pub async fn upsert_rate_card(&self, request: UpsertRateCardRequest) -> Result<RateCard> {
        if request.base_rate < Decimal::ZERO || request.per_article_rate < Decimal::ZERO {
            return Err(AppError::validation("Rates cannot be negative"));
        }
        if let Some((kind, _)) = request
            .surcharges
            .iter()
            .find(|(_, amount)| **amount < Decimal::ZERO)
        {
            return Err(AppError::validation(format!(
                "Surcharge for '{}' cannot be negative",
                kind
            )));
        }

        let company = self
            .company_repo
            .find_by_id(&request.company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {}", request.company_id)))?;

        // Keep the id stable across replacements
        let id = self
            .rate_card_repo
            .find_by_company(&company.id)
            .await?
            .map(|existing| existing.id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let card = RateCard {
            id,
            company_id: company.id,
            company_name: Some(company.name),
            base_rate: request.base_rate,
            per_article_rate: request.per_article_rate,
            surcharges: request.surcharges,
            effective_from: request.effective_from.unwrap_or_else(today_local),
            updated_at: Utc::now(),
        };

        let saved = self.rate_card_repo.upsert(&card).await?;
        info!(company_id = %saved.company_id, "Rate card saved");

        Ok(saved)
    }
}
