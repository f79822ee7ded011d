//! Named actions triggered from rendered markup.
//!
//! Rendered cards, buttons and selects carry an action name and an optional
//! argument. [`ActionTable`] turns such a pair into a typed [`Action`] that the
//! shell dispatches.

use crate::error::{PortalError, PortalResult};
use crate::map::MaintenanceTool;
use crate::surface::Modal;
use portal_core::{AdminTab, RecordId, SubFilter};
use std::collections::HashMap;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	SwitchAdminTab(AdminTab),
	SetSubFilter(SubFilter),
	/// Administrator opens a client's portfolio.
	OpenClient(RecordId),
	OpenPremise(RecordId),
	UpdateStatus { report_id: RecordId, status: String },
	OpenEditReport(RecordId),
	NextImage,
	PrevImage,
	CloseDetail,
	BackToAdmin,
	Logout,
	OpenModal(Modal),
	CloseModal(Modal),
	ToggleMapStyle,
	RunMaintenance(MaintenanceTool),
	/// Opens the latest report's walkthrough video of the open premise.
	OpenVideo,
	/// The map widget finished loading its style.
	MapLoaded,
}

impl Action {
	/// Name under which the action is registered.
	pub fn name(&self) -> &'static str {
		match self {
			Self::SwitchAdminTab(_) => "switch-admin-tab",
			Self::SetSubFilter(_) => "set-sub-filter",
			Self::OpenClient(_) => "open-client",
			Self::OpenPremise(_) => "open-premise",
			Self::UpdateStatus { .. } => "update-status",
			Self::OpenEditReport(_) => "open-edit-report",
			Self::NextImage => "next-image",
			Self::PrevImage => "prev-image",
			Self::CloseDetail => "close-detail",
			Self::BackToAdmin => "back-to-admin",
			Self::Logout => "logout",
			Self::OpenModal(_) => "open-modal",
			Self::CloseModal(_) => "close-modal",
			Self::ToggleMapStyle => "toggle-map-style",
			Self::RunMaintenance(_) => "run-maintenance",
			Self::OpenVideo => "open-video",
			Self::MapLoaded => "map-loaded",
		}
	}

	/// Argument that [`ActionTable::parse`] reads back into the same action.
	pub fn argument(&self) -> Option<String> {
		match self {
			Self::SwitchAdminTab(tab) => Some(tab.key().to_string()),
			Self::SetSubFilter(filter) => Some(filter.key().to_string()),
			Self::OpenClient(id) | Self::OpenPremise(id) | Self::OpenEditReport(id) => Some(id.to_string()),
			Self::UpdateStatus { report_id, status } => Some(format!("{report_id}{STATUS_SEPARATOR}{status}")),
			Self::OpenModal(modal) | Self::CloseModal(modal) => Some(modal.key().to_string()),
			Self::RunMaintenance(tool) => Some(tool.key().to_string()),
			_ => None,
		}
	}
}

/// Separates the report id from the new status in `update-status` arguments.
pub const STATUS_SEPARATOR: char = ':';

type ActionParser = fn(Option<&str>) -> PortalResult<Action>;

/// Registry of every action name.
pub struct ActionTable {
	parsers: HashMap<&'static str, ActionParser>,
}

impl Default for ActionTable {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for ActionTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ActionTable")
			.field("actions", &self.names())
			.finish()
	}
}

fn required<'a>(action: &'static str, argument: Option<&'a str>) -> PortalResult<&'a str> {
	argument
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.ok_or(PortalError::MissingArgument { action })
}

fn bad(action: &'static str, value: &str) -> PortalError {
	PortalError::BadArgument {
		action,
		value: value.to_string(),
	}
}

fn modal_argument(action: &'static str, argument: Option<&str>) -> PortalResult<Modal> {
	let value = required(action, argument)?;
	Modal::parse(value).ok_or_else(|| bad(action, value))
}

impl ActionTable {
	pub fn new() -> Self {
		let mut table = Self {
			parsers: HashMap::new(),
		};
		table.register("switch-admin-tab", |argument| {
			let value = required("switch-admin-tab", argument)?;
			AdminTab::parse(value)
				.map(Action::SwitchAdminTab)
				.ok_or_else(|| bad("switch-admin-tab", value))
		});
		table.register("set-sub-filter", |argument| {
			let value = required("set-sub-filter", argument)?;
			SubFilter::parse(value)
				.map(Action::SetSubFilter)
				.ok_or_else(|| bad("set-sub-filter", value))
		});
		table.register("open-client", |argument| {
			required("open-client", argument).map(|id| Action::OpenClient(RecordId::from(id)))
		});
		table.register("open-premise", |argument| {
			required("open-premise", argument).map(|id| Action::OpenPremise(RecordId::from(id)))
		});
		table.register("update-status", |argument| {
			let value = required("update-status", argument)?;
			let (id, status) = value
				.split_once(STATUS_SEPARATOR)
				.filter(|(id, status)| !id.trim().is_empty() && !status.trim().is_empty())
				.ok_or_else(|| bad("update-status", value))?;
			Ok(Action::UpdateStatus {
				report_id: RecordId::from(id.trim()),
				status: status.trim().to_string(),
			})
		});
		table.register("open-edit-report", |argument| {
			required("open-edit-report", argument).map(|id| Action::OpenEditReport(RecordId::from(id)))
		});
		table.register("next-image", |_| Ok(Action::NextImage));
		table.register("prev-image", |_| Ok(Action::PrevImage));
		table.register("close-detail", |_| Ok(Action::CloseDetail));
		table.register("back-to-admin", |_| Ok(Action::BackToAdmin));
		table.register("logout", |_| Ok(Action::Logout));
		table.register("open-modal", |argument| {
			modal_argument("open-modal", argument).map(Action::OpenModal)
		});
		table.register("close-modal", |argument| {
			modal_argument("close-modal", argument).map(Action::CloseModal)
		});
		table.register("toggle-map-style", |_| Ok(Action::ToggleMapStyle));
		table.register("run-maintenance", |argument| {
			let value = required("run-maintenance", argument)?;
			MaintenanceTool::parse(value)
				.map(Action::RunMaintenance)
				.ok_or_else(|| bad("run-maintenance", value))
		});
		table.register("open-video", |_| Ok(Action::OpenVideo));
		table.register("map-loaded", |_| Ok(Action::MapLoaded));
		table
	}

	fn register(&mut self, name: &'static str, parser: ActionParser) {
		self.parsers.insert(name, parser);
	}

	/// Turns a rendered `(name, argument)` pair into an action.
	pub fn parse(&self, name: &str, argument: Option<&str>) -> PortalResult<Action> {
		let parser = self
			.parsers
			.get(name.trim())
			.ok_or_else(|| PortalError::UnknownAction(name.to_string()))?;
		parser(argument)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.parsers.contains_key(name)
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<&'static str> = self.parsers.keys().copied().collect();
		names.sort_unstable();
		names
	}
}
