//! The authenticated identity.

use crate::ids::RecordId;
use crate::models::Client;

/// The administrator identity, optionally viewing the portal as a client.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession {
	pub id: RecordId,
	pub display_name: String,
	/// Client whose portfolio is currently shown. Changes the premise scope
	/// only; write affordances stay those of the administrator.
	pub viewing_as: Option<Client>,
}

impl AdminSession {
	pub fn new(id: RecordId, display_name: impl Into<String>) -> Self {
		Self {
			id,
			display_name: display_name.into(),
			viewing_as: None,
		}
	}
}

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
	#[default]
	Anonymous,
	Admin(AdminSession),
	Client(Client),
}

impl Session {
	pub fn is_authenticated(&self) -> bool {
		!matches!(self, Self::Anonymous)
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, Self::Admin(_))
	}

	/// Whether status selects, edit buttons and maintenance tools are offered.
	pub fn can_edit(&self) -> bool {
		self.is_admin()
	}

	pub fn admin(&self) -> Option<&AdminSession> {
		match self {
			Self::Admin(admin) => Some(admin),
			_ => None,
		}
	}

	/// Client being impersonated by the administrator, if any.
	pub fn viewing_as(&self) -> Option<&Client> {
		self.admin().and_then(|admin| admin.viewing_as.as_ref())
	}

	pub fn is_impersonating(&self) -> bool {
		self.viewing_as().is_some()
	}

	/// Client whose branding and portfolio the premises screen shows.
	pub fn display_client(&self) -> Option<&Client> {
		match self {
			Self::Admin(admin) => admin.viewing_as.as_ref(),
			Self::Client(client) => Some(client),
			Self::Anonymous => None,
		}
	}

	/// Name shown in the header.
	pub fn display_name(&self) -> &str {
		match self {
			Self::Admin(admin) => admin
				.viewing_as
				.as_ref()
				.map_or(admin.display_name.as_str(), |client| client.name.as_str()),
			Self::Client(client) => &client.name,
			Self::Anonymous => "",
		}
	}

	/// Starts viewing as `client`. Ignored for non-admin sessions.
	pub fn start_viewing(&mut self, client: Client) {
		if let Self::Admin(admin) = self {
			admin.viewing_as = Some(client);
		}
	}

	pub fn stop_viewing(&mut self) {
		if let Self::Admin(admin) = self {
			admin.viewing_as = None;
		}
	}
}
