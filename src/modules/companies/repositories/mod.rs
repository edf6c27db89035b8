pub mod company_repository;

pub use company_repository::{CompanyRepository, MySqlCompanyRepository};
