//! Gateway errors.

/// Result alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures of backend, storage and geocoding calls.
///
/// Messages are what the user sees. Backend detail is kept for fetches,
/// mutations and uploads, but never for authentication.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	/// Any rejected login.
	#[error("Incorrect Username or Password")]
	Auth,

	#[error("{message}")]
	Fetch { resource: &'static str, message: String },

	#[error("{message}")]
	Mutation { operation: &'static str, message: String },

	#[error("Failed to upload {file}: {message}")]
	Upload { file: String, message: String },

	#[error("Geocoding failed: {0}")]
	Geocode(String),

	#[error("Invalid gateway configuration: {0}")]
	Config(String),
}

impl GatewayError {
	pub fn fetch(resource: &'static str, message: impl Into<String>) -> Self {
		Self::Fetch {
			resource,
			message: message.into(),
		}
	}

	pub fn mutation(operation: &'static str, message: impl Into<String>) -> Self {
		Self::Mutation {
			operation,
			message: message.into(),
		}
	}

	pub fn upload(file: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Upload {
			file: file.into(),
			message: message.into(),
		}
	}
}
