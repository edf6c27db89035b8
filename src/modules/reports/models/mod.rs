mod report;

pub use report::{
    CompanyRevenue, ParcelTypeShare, ReportFilter, ReportSummary, RevenuePoint,
    VehicleDispatchCount,
};
