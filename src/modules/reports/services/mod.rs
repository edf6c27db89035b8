pub mod aggregations;
pub mod report_service;

pub use report_service::ReportService;
