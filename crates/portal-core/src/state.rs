//! The application context object.

use crate::ids::RecordId;
use crate::models::{Client, Premise, Report};
use crate::session::Session;
use crate::view::ViewState;

/// The three collections loaded for the administrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminBundle {
	pub clients: Vec<Client>,
	pub reports: Vec<Report>,
	pub premises: Vec<Premise>,
}

/// Single source of truth for the running portal.
///
/// Handlers read it to render and replace whole collections after a successful
/// fetch. A failed fetch commits nothing, so the last rendered data stays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
	pub session: Session,
	pub clients: Vec<Client>,
	pub reports: Vec<Report>,
	/// Premises in scope: all premises for the admin lists, or one client's
	/// portfolio on the premises screen.
	pub premises: Vec<Premise>,
	pub view: ViewState,
}

impl AppState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn commit_admin_bundle(&mut self, bundle: AdminBundle) {
		let AdminBundle {
			clients,
			reports,
			premises,
		} = bundle;
		self.clients = clients;
		self.reports = reports;
		self.premises = premises;
	}

	pub fn commit_client_premises(&mut self, premises: Vec<Premise>) {
		self.premises = premises;
	}

	/// Admin lists from `bundle`, premise scope from the viewed client.
	pub fn commit_impersonated(&mut self, bundle: AdminBundle, premises: Vec<Premise>) {
		self.clients = bundle.clients;
		self.reports = bundle.reports;
		self.premises = premises;
	}

	pub fn find_client(&self, id: &RecordId) -> Option<&Client> {
		self.clients.iter().find(|client| &client.id == id)
	}

	pub fn find_premise(&self, id: &RecordId) -> Option<&Premise> {
		self.premises.iter().find(|premise| &premise.id == id)
	}

	/// Looks in the loaded reports, then in the open premise's joined reports.
	pub fn find_report(&self, id: &RecordId) -> Option<&Report> {
		self.reports.iter().find(|report| &report.id == id).or_else(|| {
			self.open_premise()
				.and_then(|premise| premise.reports.as_deref())
				.and_then(|reports| reports.iter().find(|report| &report.id == id))
		})
	}

	pub fn open_premise(&self) -> Option<&Premise> {
		self.view
			.open_premise
			.as_ref()
			.and_then(|id| self.find_premise(id))
	}

	/// Back to the unauthenticated, empty state.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}
