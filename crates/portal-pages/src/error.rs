//! Shell errors.

use portal_gateway::GatewayError;

/// Result alias for shell handlers.
pub type PortalResult<T> = std::result::Result<T, PortalError>;

/// Everything a handler can fail with.
///
/// The shell turns these into notices and alerts; none of them escape a
/// handler boundary.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
	#[error(transparent)]
	Gateway(#[from] GatewayError),

	#[error("Map Init Error: {0}")]
	Map(String),

	#[error("{what} not found: {id}")]
	NotFound { what: &'static str, id: String },

	/// A form field failed validation.
	#[error("{message}")]
	Invalid { field: &'static str, message: String },

	#[error("Not permitted: {0}")]
	Forbidden(&'static str),

	/// A maintenance task is already running.
	#[error("{0} is already running")]
	Busy(&'static str),

	#[error("Unknown action: {0}")]
	UnknownAction(String),

	#[error("Action {action} needs an argument")]
	MissingArgument { action: &'static str },

	#[error("Invalid argument for {action}: {value}")]
	BadArgument { action: &'static str, value: String },
}

impl PortalError {
	pub fn not_found(what: &'static str, id: impl ToString) -> Self {
		Self::NotFound {
			what,
			id: id.to_string(),
		}
	}

	pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
		Self::Invalid {
			field,
			message: message.into(),
		}
	}
}
