//! Reports module for Parcela
//!
//! Derived views over the stored transactions: the dashboard, forward
//! balance projections, the six-month chart and period summaries.

pub mod dashboard;
pub mod monthly_chart;
pub mod projection;
pub mod summary;

pub use dashboard::{DashboardReport, RecentTransaction, RECENT_TRANSACTIONS};
pub use monthly_chart::{ChartPoint, MonthlyChart};
pub use projection::{ProjectedInstallment, ProjectedMonth, ProjectionReport};
pub use summary::{CategoryTotal, GroupBy, MonthTotals, PeriodTotals, ReportSummary};
