//! Merging sources into typed settings.

use crate::error::{ConfError, Result};
use crate::settings::PortalSettings;
use crate::sources::{ConfigSource, EnvSource, TomlFileSource, deep_merge};
use serde_json::{Map, Value};
use std::path::Path;

/// Collects configuration sources and merges them by priority.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merged raw configuration, lowest priority first.
	pub fn merged(&self) -> Result<Value> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|source| &**source).collect();
		ordered.sort_by_key(|source| source.priority());

		let mut merged = Value::Object(Map::new());
		for source in ordered {
			let values = source.load().map_err(|error| ConfError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "merged settings source");
			deep_merge(&mut merged, Value::Object(values.into_iter().collect()));
		}
		Ok(merged)
	}

	/// Builds and validates the settings.
	pub fn build(self) -> Result<PortalSettings> {
		let settings: PortalSettings = serde_json::from_value(self.merged()?)?;
		settings.validate()?;
		Ok(settings)
	}
}

impl PortalSettings {
	/// Defaults, then the optional TOML file, then `PORTAL_` environment variables.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut builder = SettingsBuilder::new();
		if let Some(path) = path {
			builder = builder.add_source(TomlFileSource::new(path));
		}
		builder.add_source(EnvSource::new()).build()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::DefaultSource;
	use rstest::rstest;
	use secrecy::ExposeSecret;
	use serde_json::json;
	use serial_test::serial;
	use std::fs;
	use tempfile::TempDir;

	#[rstest]
	fn test_higher_priority_source_wins() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("portal.toml");
		fs::write(
			&path,
			"[backend]\nurl = \"https://file.example.test\"\n[auth]\nadmin_id = \"from-file\"\n",
		)
		.unwrap();

		// Act
		let settings = SettingsBuilder::new()
			.add_source(TomlFileSource::new(&path))
			.add_source(
				DefaultSource::new()
					.with_value("backend.url", json!("https://default.example.test"))
					.with_value("ui.notice_dismiss_ms", json!(10)),
			)
			.build()
			.unwrap();

		// Assert
		assert_eq!(settings.backend.url, "https://file.example.test");
		assert_eq!(settings.auth.admin_id, "from-file");
		assert_eq!(settings.ui.notice_dismiss_ms, 10);
	}

	#[rstest]
	fn test_invalid_toml_names_the_source() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("broken.toml");
		fs::write(&path, "[backend\nurl = ").unwrap();

		let result = SettingsBuilder::new().add_source(TomlFileSource::new(&path)).build();

		match result {
			Err(ConfError::Source { source_name, .. }) => assert!(source_name.contains("broken.toml")),
			other => panic!("expected source error, got {other:?}"),
		}
	}

	#[rstest]
	#[serial(portal_env)]
	fn test_environment_overrides_file() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("portal.toml");
		fs::write(
			&path,
			"[backend]\nurl = \"https://file.example.test\"\n[auth]\nadmin_id = \"from-file\"\n",
		)
		.unwrap();
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("PORTAL_BACKEND__ANON_KEY", "env-anon");
			std::env::set_var("PORTAL_AUTH__ADMIN_ID", "from-env");
		}

		// Act
		let result = PortalSettings::load(Some(&path));

		// SAFETY: see above.
		unsafe {
			std::env::remove_var("PORTAL_BACKEND__ANON_KEY");
			std::env::remove_var("PORTAL_AUTH__ADMIN_ID");
		}

		// Assert
		let settings = result.unwrap();
		assert_eq!(settings.backend.url, "https://file.example.test");
		assert_eq!(settings.backend.anon_key.expose_secret(), "env-anon");
		assert_eq!(settings.auth.admin_id, "from-env");
	}
}
