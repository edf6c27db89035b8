pub mod dashboard_service;
pub mod kpi;

pub use dashboard_service::DashboardService;
