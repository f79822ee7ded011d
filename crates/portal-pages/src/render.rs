//! View models handed to the [`Surface`](crate::surface::Surface).
//!
//! Every function here is a pure projection of [`AppState`]; the shell calls
//! them after each state change and forwards the result.

use chrono::NaiveDate;
use portal_core::projection::{
	DashboardStats, GrowthSeries, MISSING_FIELD, PremiseView, SearchQuery, age_in_years,
	filter_clients, filter_premises, filter_reports, project_premise, summarize_clients,
};
use portal_core::{
	AdminTab, AppState, Client, Gallery, Premise, RecordId, STATUS_OPTIONS, Screen, Session,
	Status, SubFilter,
};

pub const NO_CLIENTS_MESSAGE: &str = "No clients found matching criteria.";
pub const NO_REPORTS_MESSAGE: &str = "No reports found matching criteria.";

/// Header and navigation of the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenChrome {
	pub brand_logo: Option<String>,
	pub display_name: String,
	/// First two characters of the display name, upper-cased.
	pub initials: String,
	pub show_back_to_admin: bool,
	pub show_request_report: bool,
}

pub fn screen_chrome(session: &Session, screen: Screen) -> ScreenChrome {
	let display_name = session.display_name().to_string();
	ScreenChrome {
		brand_logo: session.display_client().and_then(|client| client.logo_url.clone()),
		initials: display_name.chars().take(2).collect::<String>().to_uppercase(),
		display_name,
		show_back_to_admin: session.is_impersonating(),
		show_request_report: screen == Screen::Premises,
	}
}

/// One entry of the admin filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
	pub value: String,
	pub label: String,
	pub selected: bool,
}

pub fn filter_options(tab: AdminTab, selected: SubFilter) -> Vec<FilterOption> {
	let choices: Vec<(String, String)> = match tab {
		AdminTab::Clients => [("all", "All Clients"), ("active", "Active Clients"), ("inactive", "Inactive Clients")]
			.into_iter()
			.map(|(value, label)| (value.to_string(), label.to_string()))
			.collect(),
		AdminTab::Reports => std::iter::once(("all".to_string(), "All Job Statuses".to_string()))
			.chain(STATUS_OPTIONS.iter().map(|label| (label.to_lowercase(), label.to_string())))
			.collect(),
	};
	choices
		.into_iter()
		.map(|(value, label)| FilterOption {
			selected: value == selected.key(),
			value,
			label,
		})
		.collect()
}

/// A card of the clients tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCard {
	pub id: RecordId,
	pub name: String,
	pub logo_url: Option<String>,
	pub premise_count: usize,
	pub badge: String,
	pub inactive: bool,
}

/// A card of the reports tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCard {
	pub report_id: RecordId,
	/// Opens this premise's detail when clicked.
	pub premise_id: Option<RecordId>,
	pub job_number: String,
	pub report_type: String,
	pub status: String,
	pub status_class: String,
	pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminListView {
	Clients(Vec<ClientCard>),
	Reports(Vec<ReportCard>),
	Empty(&'static str),
}

pub fn admin_list(state: &AppState, today: NaiveDate) -> AdminListView {
	let query = SearchQuery::new(&state.view.admin_search);
	match state.view.admin_tab {
		AdminTab::Clients => {
			let summaries = summarize_clients(&state.clients, &state.reports);
			let visible = filter_clients(&summaries, &query, &state.view.sub_filter);
			if visible.is_empty() {
				return AdminListView::Empty(NO_CLIENTS_MESSAGE);
			}
			AdminListView::Clients(
				visible
					.iter()
					.map(|summary| ClientCard {
						id: summary.client.id.clone(),
						name: summary.client.name.clone(),
						logo_url: summary.client.logo_url.clone(),
						premise_count: summary.premise_count,
						badge: summary.badge(today).to_string(),
						inactive: !summary.is_active(),
					})
					.collect(),
			)
		}
		AdminTab::Reports => {
			let rows = filter_reports(&state.reports, &state.premises, &query, &state.view.sub_filter);
			if rows.is_empty() {
				return AdminListView::Empty(NO_REPORTS_MESSAGE);
			}
			AdminListView::Reports(
				rows.into_iter()
					.map(|row| ReportCard {
						report_id: row.report.id.clone(),
						premise_id: row.report.premise_id.clone(),
						job_number: row.report.job_number.to_string(),
						report_type: format!(
							"{} Report",
							row.report.report_type.as_deref().unwrap_or(MISSING_FIELD)
						),
						status: row.report.status.to_string(),
						status_class: status_class(&row.report.status),
						display_name: row.display_name,
					})
					.collect(),
			)
		}
	}
}

/// CSS-style class token of a status, e.g. `"new-status"`.
pub fn status_class(status: &Status) -> String {
	format!("{}-status", status.key())
}

/// A card of the client premises list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiseCard {
	pub id: RecordId,
	pub name: String,
	pub image: String,
	pub status: String,
	pub status_class: String,
	/// `"<floor area> • <sector> • <condition>"`.
	pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PremiseListView {
	Cards(Vec<PremiseCard>),
	Empty(String),
}

pub fn premise_list(state: &AppState, card_placeholder: &str) -> PremiseListView {
	let query = SearchQuery::new(&state.view.client_search);
	let views = filter_premises(&state.premises, &state.reports, &query);
	if views.is_empty() {
		return PremiseListView::Empty(format!("No premises found matching \"{}\"", query.as_str()));
	}
	PremiseListView::Cards(
		views
			.iter()
			.map(|view| PremiseCard {
				id: view.premise.id.clone(),
				name: view.premise.name.clone(),
				image: view.display_image().unwrap_or(card_placeholder).to_string(),
				status: view.status.to_string(),
				status_class: status_class(&view.status),
				meta: [
					view.premise.floor_area.as_deref().unwrap_or(MISSING_FIELD),
					view.premise.sector.as_deref().unwrap_or(MISSING_FIELD),
					view.condition.as_str(),
				]
				.join(" \u{2022} "),
			})
			.collect(),
	)
}

/// Status cell of a report table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCell {
	/// Editable select with the seven statuses.
	Select(Vec<SelectOption>),
	Pill { text: String, class: String },
}

/// A row of the detail panel's report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTableRow {
	pub report_id: RecordId,
	pub property: String,
	pub report_type: String,
	pub job_number: String,
	pub status: StatusCell,
	pub status_class: String,
	pub pdf_url: Option<String>,
	pub info_url: Option<String>,
	pub invoice_url: Option<String>,
	/// Edit button, shown to the administrator only.
	pub editable: bool,
}

/// The premise detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
	pub premise_id: RecordId,
	pub title: String,
	pub address: String,
	pub floor_area: String,
	pub site_area: String,
	pub sector: String,
	/// `"N Years"` or `"-"`.
	pub age: String,
	pub condition: String,
	pub surveyed_by: String,
	pub inspection_date: String,
	pub delivery_date: String,
	pub video_url: Option<String>,
	pub editable: bool,
	pub reports: Vec<ReportTableRow>,
}

fn or_missing(value: Option<&str>) -> String {
	value.unwrap_or(MISSING_FIELD).to_string()
}

pub fn detail_view(view: &PremiseView<'_>, editable: bool, today: NaiveDate) -> DetailView {
	let premise = view.premise;
	let latest = view.latest();
	DetailView {
		premise_id: premise.id.clone(),
		title: premise.name.clone(),
		address: premise.address.clone(),
		floor_area: or_missing(premise.floor_area.as_deref()),
		site_area: or_missing(premise.site_area.as_deref()),
		sector: or_missing(premise.sector.as_deref()),
		age: age_in_years(premise.year_built, today)
			.map_or_else(|| MISSING_FIELD.to_string(), |years| format!("{years} Years")),
		condition: view.condition.clone(),
		surveyed_by: or_missing(latest.and_then(|report| report.surveyed_by.as_deref())),
		inspection_date: or_missing(latest.and_then(|report| report.inspection_date.as_deref())),
		delivery_date: or_missing(latest.and_then(|report| report.delivery_date.as_deref())),
		video_url: latest.and_then(|report| report.video_url.clone()),
		editable,
		reports: view
			.reports
			.iter()
			.map(|report| ReportTableRow {
				report_id: report.id.clone(),
				property: report.name.clone().unwrap_or_else(|| premise.name.clone()),
				report_type: or_missing(report.report_type.as_deref()),
				job_number: report.job_number.to_string(),
				status: if editable {
					StatusCell::Select(status_options(&report.status))
				} else {
					StatusCell::Pill {
						text: report.status.to_string(),
						class: status_class(&report.status),
					}
				},
				status_class: status_class(&report.status),
				pdf_url: report.pdf_url.clone(),
				info_url: report.info_url.clone(),
				invoice_url: report.invoice_url.clone(),
				editable,
			})
			.collect(),
	}
}

/// Detail of the premise currently open in `state`, if any.
pub fn open_detail(state: &AppState, today: NaiveDate) -> Option<DetailView> {
	state
		.open_premise()
		.map(|premise| detail_view(&project_premise(premise, &state.reports), state.session.can_edit(), today))
}

/// Gallery image and counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
	pub image: String,
	/// `"i / n"`.
	pub counter: String,
	pub navigation: bool,
}

pub fn gallery_view(gallery: &Gallery) -> GalleryView {
	let (position, total) = gallery.position();
	GalleryView {
		image: gallery.current().unwrap_or_default().to_string(),
		counter: format!("{position} / {total}"),
		navigation: gallery.has_navigation(),
	}
}

/// Dashboard counters and growth chart data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
	pub stats: DashboardStats,
	pub growth: GrowthSeries,
}

pub fn dashboard_view(state: &AppState, today: NaiveDate) -> DashboardView {
	DashboardView {
		stats: DashboardStats::compute(&state.reports, &state.premises),
		growth: GrowthSeries::compute(&state.premises, &state.reports, today),
	}
}

/// An `<option>` of a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
	pub selected: bool,
}

/// The seven statuses, with `current` selected by normalized key.
pub fn status_options(current: &Status) -> Vec<SelectOption> {
	let key = current.key();
	STATUS_OPTIONS
		.iter()
		.map(|label| SelectOption {
			value: label.to_string(),
			label: label.to_string(),
			selected: label.to_lowercase() == key,
		})
		.collect()
}

fn sorted_options<'a>(
	entries: impl Iterator<Item = (&'a RecordId, &'a str)>,
	selected: Option<&RecordId>,
) -> Vec<SelectOption> {
	let mut options: Vec<SelectOption> = entries
		.map(|(id, name)| SelectOption {
			value: id.to_string(),
			label: name.to_string(),
			selected: selected == Some(id),
		})
		.collect();
	options.sort_by(|a, b| {
		a.label
			.to_lowercase()
			.cmp(&b.label.to_lowercase())
			.then_with(|| a.label.cmp(&b.label))
	});
	options
}

/// Clients of the create-report select, sorted by name.
pub fn client_options(clients: &[Client], selected: Option<&RecordId>) -> Vec<SelectOption> {
	sorted_options(clients.iter().map(|client| (&client.id, client.name.as_str())), selected)
}

/// Premises of the create-report select, sorted by name.
pub fn premise_options(premises: &[Premise], selected: Option<&RecordId>) -> Vec<SelectOption> {
	sorted_options(
		premises.iter().map(|premise| (&premise.id, premise.name.as_str())),
		selected,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use portal_core::AdminSession;
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn today() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
	}

	#[fixture]
	fn state() -> AppState {
		let mut state = AppState::new();
		state.clients = serde_json::from_value(json!([
			{"id": 1, "name": "Zenith Property", "logo_url": "https://cdn.test/z.png"},
			{"id": 2, "name": "acme holdings"}
		]))
		.unwrap();
		state.premises = serde_json::from_value(json!([
			{"id": 10, "name": "Wharf", "address": "1 Quay St", "lat": -36.8, "lng": 174.7,
			 "floor_area": "1200 m2", "sector": "Industrial", "year_built": 1995}
		]))
		.unwrap();
		state.reports = serde_json::from_value(json!([
			{"id": 100, "client_id": 1, "premise_id": 10, "job_number": "2001", "status": "New",
			 "report_type": "Condition", "condition": "Good", "surveyed_by": "K. Lee",
			 "image_url": ["https://cdn.test/a.jpg"]},
			{"id": 101, "client_id": 2, "premise_id": 10, "job_number": "1999", "status": "Complete",
			 "delivery_date": "2025-02-01"}
		]))
		.unwrap();
		state
	}

	#[rstest]
	fn test_client_cards_sorted_with_badges(state: AppState) {
		// Act
		let list = admin_list(&state, today());

		// Assert
		let AdminListView::Clients(cards) = &list else {
			panic!("expected client cards, got {list:?}");
		};
		let summary: Vec<(&str, &str)> = cards.iter().map(|c| (c.name.as_str(), c.badge.as_str())).collect();
		assert_eq!(
			summary,
			[("acme holdings", "4 wks inactive"), ("Zenith Property", "1 Active Jobs")]
		);
		assert!(cards[0].inactive);
	}

	#[rstest]
	fn test_report_cards_use_rank_order(mut state: AppState) {
		state.view.switch_tab(AdminTab::Reports);

		let list = admin_list(&state, today());

		let AdminListView::Reports(cards) = &list else {
			panic!("expected report cards, got {list:?}");
		};
		assert_eq!(cards[0].job_number, "2001");
		assert_eq!(cards[0].report_type, "Condition Report");
		assert_eq!(cards[0].status_class, "new-status");
		assert_eq!(cards[1].display_name, "Wharf");
	}

	#[rstest]
	fn test_empty_messages(mut state: AppState) {
		state.view.admin_search = "nobody".to_string();
		assert_eq!(admin_list(&state, today()), AdminListView::Empty(NO_CLIENTS_MESSAGE));

		state.view.switch_tab(AdminTab::Reports);
		assert_eq!(admin_list(&state, today()), AdminListView::Empty(NO_REPORTS_MESSAGE));

		state.view.client_search = "  Mall ".to_string();
		assert_eq!(
			premise_list(&state, "placeholder"),
			PremiseListView::Empty("No premises found matching \"mall\"".to_string())
		);
	}

	#[rstest]
	fn test_premise_card_meta_and_image(state: AppState) {
		let PremiseListView::Cards(cards) = premise_list(&state, "placeholder") else {
			panic!("expected premise cards");
		};

		assert_eq!(cards[0].image, "https://cdn.test/a.jpg");
		assert_eq!(cards[0].status, "New");
		assert_eq!(cards[0].meta, "1200 m2 \u{2022} Industrial \u{2022} Good");
	}

	#[rstest]
	fn test_detail_for_admin_has_status_select(mut state: AppState) {
		// Arrange
		state.session = Session::Admin(AdminSession::new(RecordId::from("admin"), "Portal Admin"));
		state.view.open_premise = Some(RecordId::from("10"));

		// Act
		let detail = open_detail(&state, today()).unwrap();

		// Assert
		assert_eq!(detail.age, "30 Years");
		assert_eq!(detail.surveyed_by, "K. Lee");
		assert_eq!(detail.delivery_date, "-");
		assert_eq!(detail.site_area, "-");
		assert!(detail.editable);
		let StatusCell::Select(options) = &detail.reports[0].status else {
			panic!("expected a status select");
		};
		let selected: Vec<&str> = options.iter().filter(|o| o.selected).map(|o| o.value.as_str()).collect();
		assert_eq!(selected, ["New"]);
	}

	#[rstest]
	fn test_detail_for_client_has_pills(mut state: AppState) {
		state.session = Session::Client(state.clients[0].clone());
		state.view.open_premise = Some(RecordId::from("10"));

		let detail = open_detail(&state, today()).unwrap();

		assert!(!detail.editable);
		assert!(matches!(detail.reports[1].status, StatusCell::Pill { ref class, .. } if class == "complete-status"));
	}

	#[rstest]
	fn test_filter_options_mark_selection() {
		let options = filter_options(AdminTab::Reports, SubFilter::parse("invoice").unwrap());

		assert_eq!(options.len(), 8);
		assert_eq!(options[0].label, "All Job Statuses");
		let selected: Vec<&str> = options.iter().filter(|o| o.selected).map(|o| o.label.as_str()).collect();
		assert_eq!(selected, ["Invoice"]);
	}

	#[rstest]
	fn test_client_options_sorted_case_insensitively(state: AppState) {
		let options = client_options(&state.clients, Some(&RecordId::from("1")));

		let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
		assert_eq!(labels, ["acme holdings", "Zenith Property"]);
		assert!(options[1].selected);
	}

	#[rstest]
	fn test_gallery_counter() {
		let images = portal_core::ImageList::from_urls(["a", "b", "c"]);
		let mut gallery = Gallery::open(&images, "placeholder");
		gallery.prev();

		let view = gallery_view(&gallery);

		assert_eq!(view.image, "c");
		assert_eq!(view.counter, "3 / 3");
		assert!(view.navigation);
	}

	#[rstest]
	fn test_chrome_while_impersonating(state: AppState) {
		let mut session = Session::Admin(AdminSession::new(RecordId::from("admin"), "Portal Admin"));
		session.start_viewing(state.clients[0].clone());

		let chrome = screen_chrome(&session, Screen::Premises);

		assert_eq!(chrome.initials, "ZE");
		assert_eq!(chrome.brand_logo.as_deref(), Some("https://cdn.test/z.png"));
		assert!(chrome.show_back_to_admin);
		assert!(chrome.show_request_report);
	}
}
