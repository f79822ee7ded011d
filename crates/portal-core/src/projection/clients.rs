use super::premises::compare_names;
use super::query::SearchQuery;
use crate::dates;
use crate::models::{Client, Report};
use crate::view::SubFilter;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

/// Time since a client's most recent delivered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inactivity {
	Days(i64),
	Weeks(i64),
	Months(i64),
	Years(i64),
	NoPriorReports,
}

impl Inactivity {
	/// Buckets the whole days elapsed since the last delivery.
	///
	/// Deliveries dated in the future count as zero days.
	pub fn from_elapsed_days(days: i64) -> Self {
		match days {
			d if d < 7 => Self::Days(d.max(0)),
			d if d < 30 => Self::Weeks(d / 7),
			d if d < 365 => Self::Months(d / 30),
			d => Self::Years(d / 365),
		}
	}

	pub fn since(last_delivery: Option<NaiveDate>, today: NaiveDate) -> Self {
		match last_delivery {
			Some(date) => Self::from_elapsed_days((today - date).num_days()),
			None => Self::NoPriorReports,
		}
	}
}

impl fmt::Display for Inactivity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Days(n) => write!(f, "{n} days inactive"),
			Self::Weeks(n) => write!(f, "{n} wks inactive"),
			Self::Months(n) => write!(f, "{n} mos inactive"),
			Self::Years(n) => write!(f, "{n} yrs inactive"),
			Self::NoPriorReports => f.write_str("No prior reports"),
		}
	}
}

/// Badge on a client card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientBadge {
	ActiveJobs(usize),
	Inactive(Inactivity),
}

impl fmt::Display for ClientBadge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ActiveJobs(n) => write!(f, "{n} Active Jobs"),
			Self::Inactive(inactivity) => inactivity.fmt(f),
		}
	}
}

/// A client with counts derived from the report list.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSummary<'a> {
	pub client: &'a Client,
	/// Distinct premises among the client's reports.
	pub premise_count: usize,
	/// Reports not complete, invoiced or pending.
	pub active_jobs: usize,
	/// Latest parseable delivery date among the client's reports.
	pub last_delivery: Option<NaiveDate>,
}

impl ClientSummary<'_> {
	pub fn is_active(&self) -> bool {
		self.active_jobs > 0
	}

	pub fn badge(&self, today: NaiveDate) -> ClientBadge {
		if self.is_active() {
			ClientBadge::ActiveJobs(self.active_jobs)
		} else {
			ClientBadge::Inactive(Inactivity::since(self.last_delivery, today))
		}
	}
}

pub fn summarize_clients<'a>(clients: &'a [Client], reports: &[Report]) -> Vec<ClientSummary<'a>> {
	clients
		.iter()
		.map(|client| {
			let owned: Vec<&Report> = reports
				.iter()
				.filter(|report| report.belongs_to_client(&client.id))
				.collect();
			let premise_count = owned
				.iter()
				.map(|report| report.premise_id.as_ref())
				.collect::<HashSet<_>>()
				.len();
			ClientSummary {
				client,
				premise_count,
				active_jobs: owned.iter().filter(|report| report.status.is_active()).count(),
				last_delivery: owned
					.iter()
					.filter_map(|report| dates::parse_optional_date(report.delivery_date.as_deref()))
					.max(),
			}
		})
		.collect()
}

/// Clients matching `query` on name and the active/inactive filter, by name.
pub fn filter_clients<'a>(
	summaries: &[ClientSummary<'a>],
	query: &SearchQuery,
	filter: &SubFilter,
) -> Vec<ClientSummary<'a>> {
	let mut visible: Vec<ClientSummary<'a>> = summaries
		.iter()
		.filter(|summary| query.matches(&summary.client.name))
		.filter(|summary| match filter {
			SubFilter::Active => summary.is_active(),
			SubFilter::Inactive => !summary.is_active(),
			SubFilter::All | SubFilter::Status(_) => true,
		})
		.cloned()
		.collect();
	visible.sort_by(|a, b| compare_names(&a.client.name, &b.client.name));
	visible
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn fixtures() -> (Vec<Client>, Vec<Report>) {
		let clients = serde_json::from_value(json!([
			{"id": "c1", "name": "Harbour Holdings"},
			{"id": "c2", "name": "acme Property"},
			{"id": "c3", "name": "Quiet Trust"}
		]))
		.unwrap();
		let reports = serde_json::from_value(json!([
			{"id": "r1", "client_id": "c1", "premise_id": "p1", "job_number": "1", "status": "New"},
			{"id": "r2", "client_id": "c1", "premise_id": "p1", "job_number": "2", "status": "Complete"},
			{"id": "r3", "client_id": "c1", "premise_id": "p2", "job_number": "3", "status": "Invoice"},
			{"id": "r4", "client_id": "c2", "premise_id": "p3", "job_number": "4", "status": "Pending",
				"delivery_date": "2025-05-01"},
			{"id": "r5", "client_id": "c2", "premise_id": "p3", "job_number": "5", "status": "Complete",
				"delivery_date": "2025-05-20"}
		]))
		.unwrap();
		(clients, reports)
	}

	#[rstest]
	fn test_active_count_and_distinct_premises() {
		// Arrange
		let (clients, reports) = fixtures();

		// Act
		let summaries = summarize_clients(&clients, &reports);

		// Assert
		assert_eq!(summaries[0].active_jobs, 1);
		assert_eq!(summaries[0].premise_count, 2);
		assert_eq!(summaries[1].active_jobs, 0);
		assert_eq!(summaries[1].premise_count, 1);
		assert_eq!(summaries[1].last_delivery, NaiveDate::from_ymd_opt(2025, 5, 20));
	}

	#[rstest]
	fn test_badges() {
		// Arrange
		let (clients, reports) = fixtures();
		let today = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

		// Act
		let badges: Vec<String> = summarize_clients(&clients, &reports)
			.iter()
			.map(|summary| summary.badge(today).to_string())
			.collect();

		// Assert
		assert_eq!(badges, ["1 Active Jobs", "2 wks inactive", "No prior reports"]);
	}

	#[rstest]
	#[case(-3, "0 days inactive")]
	#[case(0, "0 days inactive")]
	#[case(6, "6 days inactive")]
	#[case(7, "1 wks inactive")]
	#[case(29, "4 wks inactive")]
	#[case(30, "1 mos inactive")]
	#[case(364, "12 mos inactive")]
	#[case(365, "1 yrs inactive")]
	#[case(800, "2 yrs inactive")]
	fn test_inactivity_buckets(#[case] days: i64, #[case] expected: &str) {
		assert_eq!(Inactivity::from_elapsed_days(days).to_string(), expected);
	}

	#[rstest]
	#[case(SubFilter::All, "", &["acme Property", "Harbour Holdings", "Quiet Trust"])]
	#[case(SubFilter::Active, "", &["Harbour Holdings"])]
	#[case(SubFilter::Inactive, "", &["acme Property", "Quiet Trust"])]
	#[case(SubFilter::Inactive, "TRUST", &["Quiet Trust"])]
	fn test_filter_clients(#[case] filter: SubFilter, #[case] query: &str, #[case] expected: &[&str]) {
		// Arrange
		let (clients, reports) = fixtures();
		let summaries = summarize_clients(&clients, &reports);

		// Act
		let visible = filter_clients(&summaries, &SearchQuery::new(query), &filter);

		// Assert
		let names: Vec<&str> = visible.iter().map(|s| s.client.name.as_str()).collect();
		assert_eq!(names, expected);
	}
}
