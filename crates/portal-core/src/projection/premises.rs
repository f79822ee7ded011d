use super::query::SearchQuery;
use crate::images::ImageList;
use crate::job;
use crate::models::{Premise, Report};
use crate::status::Status;
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;

/// Status shown for a premise without reports.
pub const DEFAULT_PREMISE_STATUS: &str = "Active";

/// Condition shown when neither the latest report nor the premise has one.
pub const MISSING_FIELD: &str = "-";

/// Display projection of one premise.
#[derive(Debug, Clone, PartialEq)]
pub struct PremiseView<'a> {
	pub premise: &'a Premise,
	/// Report history, highest job number first.
	pub reports: Vec<&'a Report>,
	/// Union of every report's images, first occurrence order.
	pub images: ImageList,
	pub status: Status,
	pub condition: String,
}

impl<'a> PremiseView<'a> {
	pub fn latest(&self) -> Option<&'a Report> {
		self.reports.first().copied()
	}

	pub fn display_image(&self) -> Option<&str> {
		self.images.first()
	}
}

/// Reports of a premise: the server-side join when present, else the matching
/// rows of `all_reports`.
pub fn premise_reports<'a>(premise: &'a Premise, all_reports: &'a [Report]) -> Vec<&'a Report> {
	match &premise.reports {
		Some(joined) => joined.iter().collect(),
		None => all_reports
			.iter()
			.filter(|report| report.belongs_to_premise(&premise.id))
			.collect(),
	}
}

pub fn project_premise<'a>(premise: &'a Premise, all_reports: &'a [Report]) -> PremiseView<'a> {
	let mut reports = premise_reports(premise, all_reports);
	job::sort_by_job_descending(&mut reports, |report| &report.job_number);

	let mut images = ImageList::default();
	for report in &reports {
		images.extend(report.images.iter());
	}

	let latest = reports.first();
	let status = latest
		.map(|report| report.status.clone())
		.filter(|status| !status.is_empty())
		.unwrap_or_else(|| Status::new(DEFAULT_PREMISE_STATUS));
	let condition = latest
		.and_then(|report| report.condition.clone())
		.or_else(|| premise.condition.clone())
		.unwrap_or_else(|| MISSING_FIELD.to_string());

	PremiseView {
		premise,
		reports,
		images,
		status,
		condition,
	}
}

/// Premises matching `query` on name, address or sector, ordered by derived
/// status rank, then by name.
pub fn filter_premises<'a>(
	premises: &'a [Premise],
	all_reports: &'a [Report],
	query: &SearchQuery,
) -> Vec<PremiseView<'a>> {
	let mut views: Vec<PremiseView<'a>> = premises
		.iter()
		.filter(|premise| {
			query.matches_any([
				Some(premise.name.as_str()),
				Some(premise.address.as_str()),
				premise.sector.as_deref(),
			])
		})
		.map(|premise| project_premise(premise, all_reports))
		.collect();
	views.sort_by(|a, b| {
		a.status
			.rank()
			.cmp(&b.status.rank())
			.then_with(|| compare_names(&a.premise.name, &b.premise.name))
	});
	views
}

/// Case-insensitive name order with the raw text as tie-break.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
	a.to_lowercase()
		.cmp(&b.to_lowercase())
		.then_with(|| a.cmp(b))
}

/// Whole years since `year_built`.
pub fn age_in_years(year_built: Option<i32>, today: NaiveDate) -> Option<i32> {
	year_built
		.filter(|year| *year != 0)
		.map(|year| today.year() - year)
}
