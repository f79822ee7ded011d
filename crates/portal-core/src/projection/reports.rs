use super::query::SearchQuery;
use crate::models::{Premise, Report};
use crate::view::SubFilter;

/// Name shown for a report with neither its own name nor a known premise.
pub const UNKNOWN_PROPERTY: &str = "Unknown Property";

/// One row of the admin reports tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow<'a> {
	pub report: &'a Report,
	pub premise: Option<&'a Premise>,
	pub display_name: String,
}

/// Report name, else the joined premise name, else [`UNKNOWN_PROPERTY`].
pub fn report_display_name(report: &Report, premise: Option<&Premise>) -> String {
	report
		.name
		.clone()
		.or_else(|| {
			premise
				.map(|premise| premise.name.clone())
				.filter(|name| !name.is_empty())
		})
		.unwrap_or_else(|| UNKNOWN_PROPERTY.to_string())
}

/// Reports matching `query` on job number, type, name or premise address and
/// the status filter, ordered by status rank then job number descending.
pub fn filter_reports<'a>(
	reports: &'a [Report],
	premises: &'a [Premise],
	query: &SearchQuery,
	filter: &SubFilter,
) -> Vec<ReportRow<'a>> {
	let mut rows: Vec<ReportRow<'a>> = reports
		.iter()
		.filter(|report| match filter {
			SubFilter::All => true,
			other => report.status.key() == other.key(),
		})
		.filter_map(|report| {
			let premise = report
				.premise_id
				.as_ref()
				.and_then(|id| premises.iter().find(|premise| &premise.id == id));
			let matched = query.matches_any([
				Some(report.job_number.as_str()),
				report.report_type.as_deref(),
				report.name.as_deref(),
				premise.map(|premise| premise.address.as_str()),
			]);
			matched.then(|| ReportRow {
				report,
				premise,
				display_name: report_display_name(report, premise),
			})
		})
		.collect();
	rows.sort_by(|a, b| {
		a.report
			.status
			.rank()
			.cmp(&b.report.status.rank())
			.then_with(|| a.report.job_number.cmp_descending(&b.report.job_number))
	});
	rows
}
