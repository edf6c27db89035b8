// Reports module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::ReportFilter;
pub use services::ReportService;
