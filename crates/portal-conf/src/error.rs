//! Settings errors.

use crate::sources::SourceError;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, ConfError>;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings structure: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid setting `{key}`: {message}")]
	Invalid { key: &'static str, message: String },
}

impl ConfError {
	pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
		Self::Invalid {
			key,
			message: message.into(),
		}
	}
}
