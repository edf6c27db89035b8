mod dashboard;

pub use dashboard::{ChartSeries, DashboardOverview, DashboardSummary, KpiStats, StatusOverview};
