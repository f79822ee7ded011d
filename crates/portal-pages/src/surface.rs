//! The rendering seam.
//!
//! A [`Surface`] is whatever draws the portal: a browser binding, a terminal
//! front end or a recording double in tests. It receives fully computed view
//! models and never reads application state itself.

use crate::map::MaintenanceView;
use crate::render::{
	AdminListView, DashboardView, DetailView, FilterOption, GalleryView, PremiseListView,
	ScreenChrome, SelectOption,
};
use portal_core::Screen;
use std::time::Duration;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
	Info,
	Error,
}

/// A line in the status box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub message: String,
	pub level: NoticeLevel,
	/// Errors stay until replaced; informational notices fade after this.
	pub dismiss_after: Option<Duration>,
}

impl Notice {
	pub fn info(message: impl Into<String>, dismiss_after: Duration) -> Self {
		Self {
			message: message.into(),
			level: NoticeLevel::Info,
			dismiss_after: Some(dismiss_after),
		}
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			level: NoticeLevel::Error,
			dismiss_after: None,
		}
	}

	pub fn is_error(&self) -> bool {
		self.level == NoticeLevel::Error
	}
}

/// Modal dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
	RequestReport,
	CreateReport,
	EditReport,
	CreateClient,
	CreatePremise,
}

impl Modal {
	pub const ALL: [Modal; 5] = [
		Modal::RequestReport,
		Modal::CreateReport,
		Modal::EditReport,
		Modal::CreateClient,
		Modal::CreatePremise,
	];

	pub fn key(self) -> &'static str {
		match self {
			Self::RequestReport => "request-report",
			Self::CreateReport => "create-report",
			Self::EditReport => "edit-report",
			Self::CreateClient => "create-client",
			Self::CreatePremise => "create-premise",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|modal| modal.key() == value.trim())
	}

	pub fn submit_control(self) -> Control {
		match self {
			Self::RequestReport => Control::SubmitRequest,
			Self::CreateReport => Control::SubmitCreateReport,
			Self::EditReport => Control::SubmitEditReport,
			Self::CreateClient => Control::SubmitCreateClient,
			Self::CreatePremise => Control::SubmitCreatePremise,
		}
	}
}

/// Buttons that show a busy label while their action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
	Login,
	SubmitRequest,
	SubmitCreateReport,
	SubmitEditReport,
	SubmitCreateClient,
	SubmitCreatePremise,
}

impl Control {
	pub fn idle_label(self) -> &'static str {
		match self {
			Self::Login => "Login",
			Self::SubmitRequest => "Submit Request",
			Self::SubmitCreateReport => "Create Report",
			Self::SubmitEditReport => "Save Changes",
			Self::SubmitCreateClient => "Save Client",
			Self::SubmitCreatePremise => "Save Premise",
		}
	}

	pub fn busy_label(self) -> &'static str {
		match self {
			Self::Login => "Verifying...",
			Self::SubmitRequest => "Uploading...",
			Self::SubmitCreateReport => "Creating & Uploading...",
			Self::SubmitEditReport => "Saving Updates...",
			Self::SubmitCreateClient => "Saving...",
			Self::SubmitCreatePremise => "Geocoding & Saving...",
		}
	}
}

/// Label and enabled flag of a [`Control`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
	pub label: &'static str,
	pub enabled: bool,
}

impl ControlState {
	pub fn busy(control: Control) -> Self {
		Self {
			label: control.busy_label(),
			enabled: control == Control::Login,
		}
	}

	pub fn idle(control: Control) -> Self {
		Self {
			label: control.idle_label(),
			enabled: true,
		}
	}
}

/// Select inputs of the create-report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectField {
	ReportClient,
	ReportPremise,
}

/// Values the edit-report form opens with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditFormValues {
	pub condition: String,
	pub surveyed_by: String,
	pub inspection_date: String,
	pub delivery_date: String,
	pub pdf_url: String,
	pub info_url: String,
	pub invoice_url: String,
	pub video_url: String,
}

/// Draws the portal.
///
/// Calls arrive from async handlers, so implementations take `&self` and
/// synchronize internally.
pub trait Surface: Send + Sync {
	fn notify(&self, notice: Notice);

	/// Blocking message box.
	fn alert(&self, message: &str);

	fn show_screen(&self, screen: Screen, chrome: &ScreenChrome);

	/// `None` hides the dashboard overlay.
	fn render_dashboard(&self, dashboard: Option<&DashboardView>);

	fn render_admin_list(&self, list: &AdminListView);

	fn render_filter_options(&self, options: &[FilterOption]);

	fn render_premises(&self, list: &PremiseListView);

	/// `None` closes the detail panel.
	fn render_detail(&self, detail: Option<&DetailView>);

	fn render_gallery(&self, gallery: &GalleryView);

	fn set_control(&self, control: Control, state: ControlState);

	fn show_modal(&self, modal: Modal, open: bool);

	fn fill_edit_form(&self, values: &EditFormValues);

	fn populate_select(&self, field: SelectField, options: &[SelectOption]);

	fn render_maintenance(&self, panel: &MaintenanceView);

	fn open_url(&self, url: &str);
}
