//! Screen and event shell.
//!
//! [`Portal`] owns the application state, the map adapter and the maintenance
//! panel, and routes every user action to the gateway and back to the
//! [`Surface`]. Handlers return a [`PortalResult`] so callers can observe the
//! outcome, but each failure is already reported to the user through a notice
//! or an alert by the time it is returned.
//!
//! Locks are only taken between suspension points; no guard is held across an
//! `.await`.

mod actions;
mod session;
mod submit;


use crate::dispatch::ActionTable;
use crate::error::PortalResult;
use crate::map::{MaintenancePanel, MapAdapter, MapContainer, MapFactory};
use crate::render::{
	admin_list, dashboard_view, filter_options, gallery_view, open_detail, premise_list, screen_chrome,
};
use crate::surface::{Notice, Surface};
use parking_lot::Mutex;
use portal_conf::{AuthSettings, MapSettings, PortalSettings, StorageSettings, UiSettings};
use portal_core::{AppState, Clock, Screen, SystemClock};
use portal_gateway::{Gateway, Geocoder};
use std::sync::Arc;
use std::time::Duration;

/// The running portal.
pub struct Portal {
	gateway: Arc<dyn Gateway>,
	geocoder: Arc<dyn Geocoder>,
	surface: Arc<dyn Surface>,
	clock: Arc<dyn Clock>,
	auth: AuthSettings,
	storage: StorageSettings,
	ui: UiSettings,
	state: Mutex<AppState>,
	map: Mutex<MapAdapter>,
	maintenance: Mutex<MaintenancePanel>,
	actions: ActionTable,
}

/// Wires a [`Portal`] from its collaborators and settings.
pub struct PortalBuilder {
	gateway: Arc<dyn Gateway>,
	geocoder: Arc<dyn Geocoder>,
	surface: Arc<dyn Surface>,
	maps: Arc<dyn MapFactory>,
	clock: Arc<dyn Clock>,
	auth: AuthSettings,
	storage: StorageSettings,
	map: MapSettings,
	ui: UiSettings,
}

impl PortalBuilder {
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	pub fn auth(mut self, auth: AuthSettings) -> Self {
		self.auth = auth;
		self
	}

	pub fn storage(mut self, storage: StorageSettings) -> Self {
		self.storage = storage;
		self
	}

	pub fn map(mut self, map: MapSettings) -> Self {
		self.map = map;
		self
	}

	pub fn ui(mut self, ui: UiSettings) -> Self {
		self.ui = ui;
		self
	}

	/// Takes every section the shell uses from loaded settings.
	pub fn settings(self, settings: &PortalSettings) -> Self {
		self.auth(settings.auth.clone())
			.storage(settings.storage.clone())
			.map(settings.map.clone())
			.ui(settings.ui.clone())
	}

	pub fn build(self) -> Portal {
		let dismiss = Duration::from_millis(self.ui.maintenance_dismiss_ms);
		Portal {
			gateway: self.gateway,
			geocoder: self.geocoder,
			surface: self.surface,
			clock: self.clock,
			auth: self.auth,
			storage: self.storage,
			ui: self.ui,
			state: Mutex::new(AppState::new()),
			map: Mutex::new(MapAdapter::new(self.maps, self.map)),
			maintenance: Mutex::new(MaintenancePanel::new(dismiss)),
			actions: ActionTable::new(),
		}
	}
}

impl Portal {
	pub fn builder(
		gateway: Arc<dyn Gateway>,
		geocoder: Arc<dyn Geocoder>,
		surface: Arc<dyn Surface>,
		maps: Arc<dyn MapFactory>,
	) -> PortalBuilder {
		PortalBuilder {
			gateway,
			geocoder,
			surface,
			maps,
			clock: Arc::new(SystemClock),
			auth: AuthSettings::default(),
			storage: StorageSettings::default(),
			map: MapSettings::default(),
			ui: UiSettings::default(),
		}
	}

	/// Copy of the current state.
	pub fn snapshot(&self) -> AppState {
		self.state.lock().clone()
	}

	pub fn actions(&self) -> &ActionTable {
		&self.actions
	}

	/// Clears an expired maintenance success message.
	pub fn tick(&self) {
		let now = self.clock.now();
		let view = {
			let mut panel = self.maintenance.lock();
			if !panel.tick(now) {
				return;
			}
			panel.view()
		};
		self.surface.render_maintenance(&view);
	}

	fn info(&self, message: impl Into<String>) {
		let delay = Duration::from_millis(self.ui.notice_dismiss_ms);
		self.surface.notify(Notice::info(message, delay));
	}

	fn error(&self, message: impl Into<String>) {
		self.surface.notify(Notice::error(message));
	}

	/// Activates `screen`, mounts its map and places the loaded premises.
	fn show_screen(&self, screen: Screen) {
		let (chrome, style, admin, has_premises) = {
			let mut state = self.state.lock();
			state.view.screen = screen;
			(
				screen_chrome(&state.session, screen),
				state.view.map_style,
				state.session.is_admin(),
				!state.premises.is_empty(),
			)
		};
		self.surface.show_screen(screen, &chrome);

		let container = match screen {
			Screen::Login => MapContainer::LoginBackground,
			Screen::ClientList => MapContainer::Admin,
			Screen::Premises => MapContainer::Premises,
		};
		let with_maintenance = admin && screen != Screen::Login;
		let mounted = self.map.lock().mount(container, style, with_maintenance);
		if let Err(error) = mounted {
			tracing::error!(container = container.id(), %error, "map mount failed");
			self.error(error.to_string());
			return;
		}
		if with_maintenance {
			let view = self.maintenance.lock().view();
			self.surface.render_maintenance(&view);
		}
		if has_premises && screen != Screen::Login {
			self.place_markers();
		}
	}

	fn place_markers(&self) {
		let state = self.state.lock();
		self.map.lock().place_markers(&state.premises, &state.reports);
	}

	fn render_admin(&self) {
		let today = self.clock.today();
		let (list, options) = {
			let state = self.state.lock();
			(
				admin_list(&state, today),
				filter_options(state.view.admin_tab, state.view.sub_filter),
			)
		};
		self.surface.render_filter_options(&options);
		self.surface.render_admin_list(&list);
	}

	fn render_premises(&self) {
		let list = premise_list(&self.state.lock(), &self.ui.card_placeholder);
		self.surface.render_premises(&list);
	}

	/// Re-renders whichever list the current screen shows.
	fn render_lists(&self) {
		let screen = self.state.lock().view.screen;
		match screen {
			Screen::ClientList => self.render_admin(),
			Screen::Premises => self.render_premises(),
			Screen::Login => {}
		}
	}

	fn show_dashboard(&self, visible: bool) {
		if !visible {
			self.surface.render_dashboard(None);
			return;
		}
		let dashboard = dashboard_view(&self.state.lock(), self.clock.today());
		self.surface.render_dashboard(Some(&dashboard));
	}

	fn render_detail(&self) {
		let detail = open_detail(&self.state.lock(), self.clock.today());
		self.surface.render_detail(detail.as_ref());
	}

	fn render_gallery(&self) {
		let gallery = gallery_view(&self.state.lock().view.gallery);
		self.surface.render_gallery(&gallery);
	}

	fn require_admin(&self, what: &'static str) -> PortalResult<()> {
		if self.state.lock().session.can_edit() {
			return Ok(());
		}
		tracing::warn!(action = what, "rejected write affordance for non-admin session");
		Err(crate::error::PortalError::Forbidden(what))
	}
}

impl std::fmt::Debug for Portal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Portal")
			.field("screen", &self.state.lock().view.screen)
			.field("map", &*self.map.lock())
			.field("actions", &self.actions)
			.finish_non_exhaustive()
	}
}
