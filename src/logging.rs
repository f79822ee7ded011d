//! Tracing subscriber setup.

use portal_conf::LoggingSettings;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("Invalid log filter {directive:?}: {message}")]
	Filter { directive: String, message: String },

	#[error("Failed to install tracing subscriber: {0}")]
	Install(String),
}

/// Filter from `RUST_LOG` when it is set, else from `directive`.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return Ok(filter);
	}
	EnvFilter::try_new(directive).map_err(|error| LoggingError::Filter {
		directive: directive.to_string(),
		message: error.to_string(),
	})
}

/// Installs the global subscriber.
///
/// Fails when a subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), LoggingError> {
	let filter = build_filter(&settings.filter)?;
	let registry = tracing_subscriber::registry().with(filter);
	let installed = if settings.json {
		registry.with(fmt::layer().json()).try_init()
	} else {
		registry.with(fmt::layer().with_target(false)).try_init()
	};
	installed.map_err(|error| LoggingError::Install(error.to_string()))
}
