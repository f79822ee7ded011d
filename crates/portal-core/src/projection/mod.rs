//! Pure derivation of what each list and panel shows.
//!
//! Every function here takes borrowed snapshots of [`AppState`](crate::AppState)
//! collections and returns borrowed views; nothing is cached between renders.

mod clients;
mod dashboard;
mod premises;
mod query;
mod reports;

pub use clients::{ClientBadge, ClientSummary, Inactivity, filter_clients, summarize_clients};
pub use dashboard::{DashboardStats, GROWTH_MONTHS, GrowthSeries};
pub use premises::{
	DEFAULT_PREMISE_STATUS, MISSING_FIELD, PremiseView, age_in_years, filter_premises, premise_reports,
	project_premise,
};
pub use query::SearchQuery;
pub use reports::{ReportRow, UNKNOWN_PROPERTY, filter_reports, report_display_name};
