use crate::dates;
use crate::models::{Premise, Report};
use crate::status::StatusKind;
use chrono::{Datelike, NaiveDate};

/// Number of calendar months in the growth chart, ending with the current one.
pub const GROWTH_MONTHS: u32 = 6;

/// Headline counters of the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
	pub active_jobs: usize,
	pub to_inspect: usize,
	pub to_invoice: usize,
	pub premises: usize,
}

impl DashboardStats {
	pub fn compute(reports: &[Report], premises: &[Premise]) -> Self {
		let kinds = || reports.iter().map(|report| report.status.kind());
		Self {
			active_jobs: reports.iter().filter(|report| report.status.is_active()).count(),
			to_inspect: kinds().filter(|kind| *kind == Some(StatusKind::New)).count(),
			to_invoice: kinds()
				.filter(|kind| matches!(kind, Some(StatusKind::Report | StatusKind::Advice)))
				.count(),
			premises: premises.len(),
		}
	}
}

/// Monthly counts of new premises and reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrowthSeries {
	/// `"Jan 25"` style labels, oldest first.
	pub labels: Vec<String>,
	pub reports: Vec<usize>,
	pub premises: Vec<usize>,
}

impl GrowthSeries {
	/// Premises count by `created_at`; reports by delivery date, else
	/// inspection date, else `created_at`.
	pub fn compute(premises: &[Premise], reports: &[Report], today: NaiveDate) -> Self {
		let premise_months: Vec<(i32, u32)> = premises
			.iter()
			.filter_map(|premise| dates::parse_optional_date(premise.created_at.as_deref()))
			.map(|date| (date.year(), date.month()))
			.collect();
		let report_months: Vec<(i32, u32)> = reports
			.iter()
			.filter_map(|report| {
				report
					.delivery_date
					.as_deref()
					.or(report.inspection_date.as_deref())
					.or(report.created_at.as_deref())
					.and_then(dates::parse_date)
			})
			.map(|date| (date.year(), date.month()))
			.collect();

		let mut series = Self::default();
		for back in (0..GROWTH_MONTHS).rev() {
			let month = months_before(today, back);
			series.labels.push(month.format("%b %y").to_string());
			let key = (month.year(), month.month());
			series.premises.push(premise_months.iter().filter(|m| **m == key).count());
			series.reports.push(report_months.iter().filter(|m| **m == key).count());
		}
		series
	}
}

/// First day of the month `back` months before `today`'s month.
fn months_before(today: NaiveDate, back: u32) -> NaiveDate {
	let index = today.year() * 12 + today.month0() as i32 - back as i32;
	let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
	NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(today)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_dashboard_counters() {
		// Arrange
		let reports: Vec<Report> = serde_json::from_value(json!([
			{"id": 1, "status": "New"},
			{"id": 2, "status": "new "},
			{"id": 3, "status": "Report"},
			{"id": 4, "status": "Advice"},
			{"id": 5, "status": "Invoice"},
			{"id": 6, "status": "Complete"}
		]))
		.unwrap();

		// Act
		let stats = DashboardStats::compute(&reports, &[]);

		// Assert
		assert_eq!(
			stats,
			DashboardStats {
				active_jobs: 4,
				to_inspect: 2,
				to_invoice: 2,
				premises: 0,
			}
		);
	}

	#[rstest]
	fn test_growth_series_spans_year_boundary() {
		// Arrange
		let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
		let premises: Vec<Premise> = serde_json::from_value(json!([
			{"id": 1, "name": "A", "address": "", "created_at": "2025-02-01T09:00:00+00:00"},
			{"id": 2, "name": "B", "address": "", "created_at": "2024-09-30T23:00:00+00:00"},
			{"id": 3, "name": "C", "address": "", "created_at": "2023-02-01T00:00:00+00:00"}
		]))
		.unwrap();
		let reports: Vec<Report> = serde_json::from_value(json!([
			{"id": 1, "delivery_date": "2024-12-05", "inspection_date": "2024-11-01"},
			{"id": 2, "inspection_date": "2024-11-20"},
			{"id": 3, "created_at": "2025-01-03T10:00:00+00:00"},
			{"id": 4}
		]))
		.unwrap();

		// Act
		let series = GrowthSeries::compute(&premises, &reports, today);

		// Assert
		assert_eq!(series.labels, ["Sep 24", "Oct 24", "Nov 24", "Dec 24", "Jan 25", "Feb 25"]);
		assert_eq!(series.premises, [1, 0, 0, 0, 0, 1]);
		assert_eq!(series.reports, [0, 0, 1, 1, 1, 0]);
	}
}
