//! Projections over recorded backend rows.

use chrono::NaiveDate;
use portal_core::projection::{
	DashboardStats, GrowthSeries, ReportRow, SearchQuery, filter_clients, filter_premises, filter_reports,
	summarize_clients,
};
use portal_core::{Client, Coordinates, Premise, Report, SubFilter};
use rstest::*;

#[fixture]
fn clients() -> Vec<Client> {
	serde_json::from_str(include_str!("fixtures/clients.json")).unwrap()
}

#[fixture]
fn premises() -> Vec<Premise> {
	serde_json::from_str(include_str!("fixtures/premises.json")).unwrap()
}

#[fixture]
fn reports() -> Vec<Report> {
	serde_json::from_str(include_str!("fixtures/reports.json")).unwrap()
}

#[fixture]
fn portfolio() -> Vec<Premise> {
	serde_json::from_str(include_str!("fixtures/client_portfolio.json")).unwrap()
}

fn job_order(rows: &[ReportRow<'_>]) -> Vec<String> {
	rows.iter().map(|row| row.report.job_number.to_string()).collect()
}

fn today() -> NaiveDate {
	NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()
}

#[rstest]
fn test_rows_normalize_at_the_boundary(
	clients: Vec<Client>,
	premises: Vec<Premise>,
	reports: Vec<Report>,
) {
	// Assert
	assert_eq!(clients[1].access_code, None);
	assert_eq!(clients[2].logo_url, None);
	assert_eq!(premises[0].coordinates, Some(Coordinates::new(-36.8431, 174.7668)));
	assert_eq!(premises[1].coordinates, None);
	assert_eq!(premises[1].floor_area.as_deref(), Some("5400"));
	assert_eq!(premises[2].year_built, Some(2008));
	assert_eq!(premises[2].floor_area, None);
	assert_eq!(reports[1].job_number.as_str(), "1107");
	assert_eq!(reports[1].images.len(), 2);
	assert!(reports[4].images.is_empty());
}

#[rstest]
fn test_client_list(clients: Vec<Client>, reports: Vec<Report>) {
	// Act
	let summaries = summarize_clients(&clients, &reports);
	let visible = filter_clients(&summaries, &SearchQuery::new(""), &SubFilter::All);

	// Assert
	let cards: Vec<(&str, usize, String)> = visible
		.iter()
		.map(|s| (s.client.name.as_str(), s.premise_count, s.badge(today()).to_string()))
		.collect();
	assert_eq!(
		cards,
		[
			("Harbour Holdings", 2, "2 Active Jobs".to_string()),
			("Kauri Retail", 0, "No prior reports".to_string()),
			("Northshore Trust", 1, "1 Active Jobs".to_string()),
		]
	);
}

#[rstest]
fn test_report_list(premises: Vec<Premise>, reports: Vec<Report>) {
	// Act
	let all = filter_reports(&reports, &premises, &SearchQuery::new(""), &SubFilter::All);
	let auckland = filter_reports(&reports, &premises, &SearchQuery::new("Auckland"), &SubFilter::All);

	// Assert
	assert_eq!(job_order(&all), ["1107", "1110", "998", "1042", "TBC"]);
	assert_eq!(job_order(&auckland), ["1107", "1110", "1042"]);
}

#[rstest]
fn test_dashboard(premises: Vec<Premise>, reports: Vec<Report>) {
	// Act
	let stats = DashboardStats::compute(&reports, &premises);
	let growth = GrowthSeries::compute(&premises, &reports, today());

	// Assert
	assert_eq!(
		(stats.active_jobs, stats.to_inspect, stats.to_invoice, stats.premises),
		(3, 0, 1, 3)
	);
	assert_eq!(growth.labels.first().map(String::as_str), Some("Sep 24"));
	assert_eq!(growth.premises, [0, 0, 1, 0, 1, 0]);
	assert_eq!(growth.reports, [0, 1, 0, 1, 0, 2]);
}

#[rstest]
fn test_client_portfolio_uses_joined_reports(portfolio: Vec<Premise>) {
	// Act
	let views = filter_premises(&portfolio, &[], &SearchQuery::new(""));

	// Assert
	assert_eq!(views.len(), 2);
	assert_eq!(views[0].premise.name, "Quay Street Depot");
	assert_eq!(views[0].status.as_str(), "inspection");
	assert_eq!(views[0].condition, "Good");
	assert_eq!(
		views[0].images.as_slice(),
		[
			"https://cdn.example.test/covers/1107 - a.jpg",
			"https://cdn.example.test/covers/1042 - 1.jpg",
		]
	);
	assert_eq!(views[1].condition, "Average");
}
