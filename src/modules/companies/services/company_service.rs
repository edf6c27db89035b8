use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::companies::models::{Company, CreateCompanyRequest};
use crate::modules::companies::repositories::CompanyRepository;

/// Service for company master data
pub struct CompanyService {
    company_repo: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
        Self { company_repo }
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        self.company_repo.list().await
    }

    pub async fn get_company(&self, id: &str) -> Result<Company> {
        self.company_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {}", id)))
    }

    /// Register a company; names are unique regardless of case
    pub async fn create_company(&self, request: CreateCompanyRequest) -> Result<Company> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Company name is required"));
        }

        if let Some(existing) = self.company_repo.find_by_name(name).await? {
            return Err(AppError::conflict(format!(
                "Company '{}' already exists",
                existing.name
            )));
        }

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            contact_person: request.contact_person,
            phone: request.phone,
            email: request.email,
            address: request.address,
            company_type: request.company_type,
            status: request.status.unwrap_or_else(|| "Active".to_string()),
            created_at: now,
            updated_at: now,
        };

        let created = self.company_repo.create(&company).await?;
        info!(company_id = %created.id, name = %created.name, "Company created");

        Ok(created)
    }
}
