//! Administrator maintenance panel on the map.
//!
//! Three bulk tools share one panel. While a tool runs every button is
//! disabled; the moment it finishes the buttons come back. A success message
//! is cleared by [`MaintenancePanel::tick`] after the configured delay, a
//! failure message stays until the next run.

use crate::error::{PortalError, PortalResult};
use indexmap::IndexMap;
use portal_core::Client;
use portal_gateway::{Gateway, Geocoder, StoredObject};
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenanceTool {
	/// Match logo files to clients by name.
	SyncLogos,
	/// Group cover images by the job number at the start of the file name.
	SyncCovers,
	/// Geocode premises that have no coordinates yet.
	FixCoordinates,
}

impl MaintenanceTool {
	pub const ALL: [MaintenanceTool; 3] = [Self::SyncLogos, Self::SyncCovers, Self::FixCoordinates];

	pub fn key(self) -> &'static str {
		match self {
			Self::SyncLogos => "sync-logos",
			Self::SyncCovers => "sync-covers",
			Self::FixCoordinates => "fix-coordinates",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|tool| tool.key() == value.trim())
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::SyncLogos => "Sync Client Logos",
			Self::SyncCovers => "Sync Report Covers",
			Self::FixCoordinates => "Fix Missing Coordinates",
		}
	}

	pub fn start_message(self) -> &'static str {
		match self {
			Self::SyncLogos => "Syncing Logos...",
			Self::SyncCovers => "Syncing Storage...",
			Self::FixCoordinates => "Fixing Coordinates...",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
	#[default]
	Idle,
	Running {
		tool: MaintenanceTool,
		message: String,
	},
	Succeeded {
		tool: MaintenanceTool,
		message: String,
		finished_at: DateTime<Utc>,
	},
	Failed {
		tool: MaintenanceTool,
		message: String,
	},
}

/// One tool button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolButton {
	pub tool: MaintenanceTool,
	pub title: &'static str,
	pub enabled: bool,
	/// Shows the loading icon.
	pub busy: bool,
}

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceView {
	pub buttons: Vec<ToolButton>,
	pub status: Option<String>,
	pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct MaintenancePanel {
	state: PanelState,
	dismiss_after: TimeDelta,
}

impl MaintenancePanel {
	pub fn new(dismiss_after: Duration) -> Self {
		Self {
			state: PanelState::Idle,
			dismiss_after: TimeDelta::from_std(dismiss_after).unwrap_or(TimeDelta::MAX),
		}
	}

	pub fn state(&self) -> &PanelState {
		&self.state
	}

	pub fn is_running(&self) -> bool {
		matches!(self.state, PanelState::Running { .. })
	}

	/// Starts `tool`, unless another run is in progress.
	pub fn begin(&mut self, tool: MaintenanceTool) -> PortalResult<()> {
		if let PanelState::Running { tool: current, .. } = &self.state {
			return Err(PortalError::Busy(current.title()));
		}
		self.state = PanelState::Running {
			tool,
			message: tool.start_message().to_string(),
		};
		Ok(())
	}

	/// Replaces the message of the running tool.
	pub fn progress(&mut self, text: impl Into<String>) {
		if let PanelState::Running { message, .. } = &mut self.state {
			*message = text.into();
		}
	}

	pub fn succeed(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
		if let PanelState::Running { tool, .. } = self.state {
			self.state = PanelState::Succeeded {
				tool,
				message: message.into(),
				finished_at: now,
			};
		}
	}

	pub fn fail(&mut self, message: impl Into<String>) {
		if let PanelState::Running { tool, .. } = self.state {
			self.state = PanelState::Failed {
				tool,
				message: message.into(),
			};
		}
	}

	/// Clears an expired success message. Returns whether anything changed.
	pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
		match &self.state {
			PanelState::Succeeded { finished_at, .. }
				if now.signed_duration_since(*finished_at) >= self.dismiss_after =>
			{
				self.state = PanelState::Idle;
				true
			}
			_ => false,
		}
	}

	pub fn view(&self) -> MaintenanceView {
		let running = match &self.state {
			PanelState::Running { tool, .. } => Some(*tool),
			_ => None,
		};
		let (status, failed) = match &self.state {
			PanelState::Idle => (None, false),
			PanelState::Running { message, .. } | PanelState::Succeeded { message, .. } => {
				(Some(message.clone()), false)
			}
			PanelState::Failed { message, .. } => (Some(message.clone()), true),
		};
		MaintenanceView {
			buttons: MaintenanceTool::ALL
				.into_iter()
				.map(|tool| ToolButton {
					tool,
					title: tool.title(),
					enabled: running.is_none(),
					busy: running == Some(tool),
				})
				.collect(),
			status,
			failed,
		}
	}
}

/// Stored logo for `client_name`: the file whose name before the first `.`
/// equals the client name, ignoring case and surrounding whitespace.
pub fn match_logo<'a>(files: &'a [StoredObject], client_name: &str) -> Option<&'a StoredObject> {
	let wanted = client_name.trim().to_lowercase();
	if wanted.is_empty() {
		return None;
	}
	files.iter().find(|file| {
		file.name
			.split('.')
			.next()
			.is_some_and(|stem| stem.trim().to_lowercase() == wanted)
	})
}

/// Groups file names by their leading run of digits, in listing order.
/// Names that do not start with a digit are skipped.
pub fn group_cover_files<'a>(names: impl IntoIterator<Item = &'a str>) -> IndexMap<String, Vec<String>> {
	let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
	for name in names {
		let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
		if digits.is_empty() {
			continue;
		}
		groups.entry(digits).or_default().push(name.to_string());
	}
	groups
}

/// Points every client at its stored logo. Returns the result message.
pub async fn sync_logos(
	gateway: &dyn Gateway,
	bucket: &str,
	limit: usize,
	clients: &[Client],
) -> portal_gateway::Result<String> {
	let files = gateway.list_objects(bucket, limit).await?;
	let mut count = 0;
	for client in clients {
		let Some(file) = match_logo(&files, &client.name) else {
			continue;
		};
		let url = gateway.public_url(bucket, &file.name);
		if client.logo_url.as_deref() == Some(url.as_str()) {
			continue;
		}
		gateway.update_client_logo(&client.id, &url).await?;
		tracing::debug!(client = %client.id, file = %file.name, "linked client logo");
		count += 1;
	}
	Ok(format!("Synced {count} logos."))
}

/// Replaces the image list of every job that has cover files.
pub async fn sync_covers(gateway: &dyn Gateway, bucket: &str, limit: usize) -> portal_gateway::Result<String> {
	let files = gateway.list_objects(bucket, limit).await?;
	let groups = group_cover_files(files.iter().map(|file| file.name.as_str()));
	let mut count = 0;
	for (job_number, names) in &groups {
		let urls: Vec<String> = names.iter().map(|name| gateway.public_url(bucket, name)).collect();
		gateway.update_report_images_for_job(job_number, &urls).await?;
		count += 1;
	}
	Ok(format!("Synced images for {count} reports."))
}

/// Geocodes premises without coordinates.
///
/// `on_progress(fixed, total)` runs after each stored match. A lookup error
/// aborts the run; a lookup without a match skips the premise.
pub async fn fix_coordinates<F>(
	gateway: &dyn Gateway,
	geocoder: &dyn Geocoder,
	mut on_progress: F,
) -> portal_gateway::Result<String>
where
	F: FnMut(usize, usize) + Send,
{
	let missing = gateway.fetch_premises_missing_coordinates().await?;
	if missing.is_empty() {
		return Ok("All Coordinates Found!".to_string());
	}
	let total = missing.len();
	let mut fixed = 0;
	for premise in &missing {
		match geocoder.geocode(&premise.address).await? {
			Some(coordinates) => {
				gateway.update_premise_coordinates(&premise.id, coordinates).await?;
				fixed += 1;
				on_progress(fixed, total);
			}
			None => tracing::info!(premise = %premise.id, address = %premise.address, "no geocoding match"),
		}
	}
	Ok("Update Complete!".to_string())
}
