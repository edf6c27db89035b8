// Dashboard module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::DashboardSummary;
pub use services::DashboardService;
