use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::companies::models::Company;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies ordered by name
    async fn list(&self) -> Result<Vec<Company>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>>;

    /// Case-insensitive name lookup
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>>;

    async fn create(&self, company: &Company) -> Result<Company>;
}

const SELECT_COMPANIES: &str = r#"
    SELECT id, name, contact_person, phone, email, address, company_type, status,
           created_at, updated_at
    FROM companies
"#;

pub struct MySqlCompanyRepository {
    pool: MySqlPool,
}

impl MySqlCompanyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for MySqlCompanyRepository {
    async fn list(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!("{} ORDER BY name", SELECT_COMPANIES))
            .fetch_all(&self.pool)
            .await?;

        Ok(companies)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!("{} WHERE id = ?", SELECT_COMPANIES))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "{} WHERE LOWER(name) = LOWER(?) LIMIT 1",
            SELECT_COMPANIES
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    async fn create(&self, company: &Company) -> Result<Company> {
        sqlx::query(
            r#"
            INSERT INTO companies (
                id, name, contact_person, phone, email, address, company_type, status,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.contact_person)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(&company.address)
        .bind(&company.company_type)
        .bind(&company.status)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Company '{}' already exists",
                        company.name
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Ok(company.clone())
    }
}
