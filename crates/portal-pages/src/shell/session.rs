//! Boot, login, data loading and impersonation.

use super::Portal;
use crate::error::{PortalError, PortalResult};
use crate::map::{MaintenancePanel, MapContainer};
use crate::surface::{Control, ControlState};
use portal_core::{AdminSession, AdminTab, RecordId, Screen, Session};
use portal_gateway::fetch_admin_bundle;
use std::time::Duration;

impl Portal {
	/// Mounts the login background and wakes the backend.
	pub async fn boot(&self) -> PortalResult<()> {
		self.info("System starting...");
		self.show_screen(Screen::Login);
		match self.gateway.ping().await {
			Ok(()) => {
				tracing::info!("backend reachable");
				self.info("System Ready.");
				Ok(())
			}
			Err(error) => {
				tracing::error!(%error, "backend ping failed");
				self.error(format!("DB Error: {error}"));
				Err(error.into())
			}
		}
	}

	/// Signs in and opens the administrator lists or the client portfolio.
	pub async fn login(&self, username: &str, password: &str) -> PortalResult<()> {
		self.surface.set_control(Control::Login, ControlState::busy(Control::Login));
		let result = self.sign_in(username.trim(), password).await;
		self.surface.set_control(Control::Login, ControlState::idle(Control::Login));
		if let Err(error) = &result {
			tracing::warn!(%error, "login failed");
			self.error(format!("Login Error: {error}"));
			self.surface.alert(&error.to_string());
		}
		result
	}

	async fn sign_in(&self, username: &str, password: &str) -> PortalResult<()> {
		let identity = self.gateway.authenticate(username, password).await?;
		if self.auth.is_admin(identity.as_str()) {
			tracing::info!(identity = %identity, "administrator signed in");
			self.state.lock().session =
				Session::Admin(AdminSession::new(identity, self.auth.admin_display_name.clone()));
			// A failed refresh is reported by the refresh itself; the lists still open.
			let _ = self.refresh_admin_data().await;
			self.show_screen(Screen::ClientList);
			self.switch_admin_tab(AdminTab::Clients);
		} else {
			let client = self.gateway.fetch_client(&identity).await?;
			tracing::info!(client = %client.id, "client signed in");
			self.state.lock().session = Session::Client(client);
			let _ = self.load_client_portfolio(&identity).await;
			self.show_screen(Screen::Premises);
			self.render_premises();
		}
		Ok(())
	}

	/// Discards the session and returns to the login screen.
	pub fn logout(&self) {
		self.state.lock().reset();
		self.map.lock().unmount();
		*self.maintenance.lock() =
			MaintenancePanel::new(Duration::from_millis(self.ui.maintenance_dismiss_ms));
		self.surface.render_detail(None);
		self.surface.render_dashboard(None);
		self.show_screen(Screen::Login);
		tracing::info!(container = MapContainer::LoginBackground.id(), "signed out");
	}

	/// Reloads clients, reports and premises.
	///
	/// While the administrator views a client, that client's premises are
	/// reloaded too so the premise list keeps its scope. Nothing is committed
	/// unless every fetch succeeds.
	pub async fn refresh_admin_data(&self) -> PortalResult<()> {
		self.info("Fetching data...");
		let viewed = self.state.lock().session.viewing_as().map(|client| client.id.clone());

		let fetched: portal_gateway::Result<_> = async {
			let bundle = fetch_admin_bundle(self.gateway.as_ref()).await?;
			let scoped = match &viewed {
				Some(client_id) => Some(self.gateway.fetch_premises_for_client(client_id).await?),
				None => None,
			};
			Ok((bundle, scoped))
		}
		.await;
		let (bundle, scoped) = match fetched {
			Ok(data) => data,
			Err(error) => {
				tracing::error!(%error, "admin data refresh failed");
				self.error(format!("Fetch Error: {error}"));
				return Err(error.into());
			}
		};

		let show_dashboard = {
			let mut state = self.state.lock();
			match scoped {
				Some(premises) => state.commit_impersonated(bundle, premises),
				None => state.commit_admin_bundle(bundle),
			}
			tracing::debug!(
				clients = state.clients.len(),
				reports = state.reports.len(),
				premises = state.premises.len(),
				"admin data committed"
			);
			state.session.is_admin() && !state.session.is_impersonating()
		};
		if show_dashboard {
			self.show_dashboard(true);
		}
		self.place_markers();
		self.render_lists();
		self.info("Data Loaded successfully!");
		Ok(())
	}

	/// Loads the portfolio of `client_id` into the premise scope.
	pub async fn load_client_portfolio(&self, client_id: &RecordId) -> PortalResult<()> {
		self.info("Fetching client portfolio...");
		match self.gateway.fetch_premises_for_client(client_id).await {
			Ok(premises) => {
				tracing::debug!(client = %client_id, premises = premises.len(), "portfolio loaded");
				self.state.lock().commit_client_premises(premises);
				self.place_markers();
				self.info("Portfolio ready.");
				Ok(())
			}
			Err(error) => {
				tracing::error!(client = %client_id, %error, "portfolio fetch failed");
				self.error(format!("Error: {error}"));
				Err(error.into())
			}
		}
	}

	/// Administrator opens a client's portfolio as that client sees it.
	pub(super) async fn view_as_client(&self, client_id: &RecordId) -> PortalResult<()> {
		self.require_admin("view a client portfolio")?;
		let client = self.state.lock().find_client(client_id).cloned();
		let Some(client) = client else {
			self.error(format!("Error: client {client_id} is not loaded"));
			return Err(PortalError::not_found("client", client_id));
		};
		self.show_dashboard(false);
		tracing::info!(client = %client.id, "viewing portfolio as client");
		self.state.lock().session.start_viewing(client);
		let _ = self.load_client_portfolio(client_id).await;
		self.show_screen(Screen::Premises);
		self.render_premises();
		Ok(())
	}

	/// Ends impersonation and returns to the administrator lists.
	pub(super) async fn back_to_admin(&self) -> PortalResult<()> {
		{
			let mut state = self.state.lock();
			state.session.stop_viewing();
			state.view.close_detail();
			state.view.admin_search.clear();
		}
		self.surface.render_detail(None);
		let _ = self.refresh_admin_data().await;
		self.show_screen(Screen::ClientList);
		self.switch_admin_tab(AdminTab::Clients);
		Ok(())
	}
}
