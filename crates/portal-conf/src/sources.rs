//! Configuration sources merged into [`PortalSettings`](crate::PortalSettings).
//!
//! Sources are merged in ascending priority: explicit defaults, then the TOML
//! file, then `PORTAL_`-prefixed environment variables. Nested keys are written
//! as tables in TOML and with a double underscore in the environment
//! (`PORTAL_BACKEND__URL` sets `backend.url`).

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Environment variable prefix read by [`EnvSource`].
pub const ENV_PREFIX: &str = "PORTAL_";

/// Separator between nested key segments in environment variable names.
pub const ENV_NESTING: &str = "__";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Explicit values, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a value at a dotted path such as `"ui.notice_dismiss_ms"`.
	pub fn with_value(mut self, path: &str, value: Value) -> Self {
		let segments: Vec<String> = path.split('.').map(str::to_string).collect();
		insert_path(&mut self.values, &segments, value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source. A missing file contributes nothing.
#[derive(Debug)]
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		let json_str = serde_json::to_string(&toml_value)?;
		let json_value: Value = serde_json::from_str(&json_str)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable configuration source
#[derive(Debug)]
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	fn load_from(&self, vars: impl IntoIterator<Item = (String, String)>) -> IndexMap<String, Value> {
		let mut config = IndexMap::new();
		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let segments: Vec<String> = clean_key
				.split(ENV_NESTING)
				.map(str::to_lowercase)
				.collect();
			if segments.iter().any(String::is_empty) {
				tracing::warn!(variable = %key, "ignoring malformed settings variable");
				continue;
			}
			insert_path(&mut config, &segments, Value::String(value));
		}
		config
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.load_from(std::env::vars()))
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

fn insert_path(map: &mut IndexMap<String, Value>, segments: &[String], value: Value) {
	let Some((first, rest)) = segments.split_first() else {
		return;
	};
	let nested = rest.iter().rev().fold(value, |inner, segment| {
		let mut table = Map::new();
		table.insert(segment.clone(), inner);
		Value::Object(table)
	});
	match map.get_mut(first) {
		Some(existing) => deep_merge(existing, nested),
		None => {
			map.insert(first.clone(), nested);
		}
	}
}

/// Recursively merges `overlay` into `base`; tables merge, everything else
/// is replaced.
pub fn deep_merge(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base), Value::Object(overlay)) => {
			for (key, value) in overlay {
				match base.get_mut(&key) {
					Some(existing) => deep_merge(existing, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use crate::PortalSettings;
	use std::io::Write;
	use tempfile::TempDir;

	#[rstest]
	fn test_env_source_nests_on_double_underscore() {
		// Arrange
		let source = EnvSource::new();
		let vars = [
			("PORTAL_BACKEND__URL", "http://127.0.0.1:54321"),
			("PORTAL_UI__NOTICE_DISMISS_MS", "1000"),
			("PORTAL_LOGGING__JSON", "true"),
			("OTHER_VALUE", "ignored"),
		]
		.map(|(k, v)| (k.to_string(), v.to_string()));

		// Act
		let config = source.load_from(vars);

		// Assert
		assert_eq!(config.get("backend"), Some(&json!({"url": "http://127.0.0.1:54321"})));
		assert_eq!(config.get("ui"), Some(&json!({"notice_dismiss_ms": "1000"})));
		assert_eq!(config.get("logging"), Some(&json!({"json": "true"})));
		assert!(!config.contains_key("other_value"));
	}

	#[rstest]
	fn test_env_values_keep_their_text() {
		// Arrange
		let source = EnvSource::new();
		let vars = [
			("PORTAL_AUTH__ADMIN_ID", "0123"),
			("PORTAL_AUTH__ADMIN_DISPLAY_NAME", "Yes"),
			("PORTAL_STORAGE__IMAGES", "1e5"),
			("PORTAL_UI__NOTICE_DISMISS_MS", "1000"),
			("PORTAL_GEOCODING__LIMIT", " 2 "),
			("PORTAL_MAP__DETAIL_ZOOM", "15.5"),
			("PORTAL_LOGGING__JSON", "on"),
		]
		.map(|(k, v)| (k.to_string(), v.to_string()));

		// Act
		let config = source.load_from(vars);
		let settings: PortalSettings = serde_json::from_value(Value::Object(config.into_iter().collect())).unwrap();

		// Assert
		assert_eq!(settings.auth.admin_id, "0123");
		assert_eq!(settings.auth.admin_display_name, "Yes");
		assert_eq!(settings.storage.images, "1e5");
		assert_eq!(settings.ui.notice_dismiss_ms, 1000);
		assert_eq!(settings.geocoding.limit, 2);
		assert_eq!(settings.map.detail_zoom, 15.5);
		assert!(settings.logging.json);
	}

	#[rstest]
	fn test_env_source_skips_empty_segments() {
		let source = EnvSource::new();

		let config = source.load_from([("PORTAL_BACKEND____URL".to_string(), "x".to_string())]);

		assert!(config.is_empty());
	}

	#[rstest]
	fn test_toml_source() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("portal.toml");
		let mut file = fs::File::create(&config_path).unwrap();
		writeln!(
			file,
			r#"
[backend]
url = "https://db.example.test"

[storage]
job_covers = "covers"
"#
		)
		.unwrap();

		// Act
		let config = TomlFileSource::new(&config_path).load().unwrap();

		// Assert
		assert_eq!(config.get("backend"), Some(&json!({"url": "https://db.example.test"})));
		assert_eq!(config.get("storage"), Some(&json!({"job_covers": "covers"})));
	}

	#[rstest]
	fn test_missing_toml_file_is_empty() {
		let temp_dir = TempDir::new().unwrap();

		let config = TomlFileSource::new(temp_dir.path().join("absent.toml"))
			.load()
			.unwrap();

		assert!(config.is_empty());
	}

	#[rstest]
	fn test_deep_merge_keeps_sibling_keys() {
		// Arrange
		let mut base = json!({"map": {"detail_zoom": 16, "overview_zoom": 14}, "ui": {"notice_dismiss_ms": 2500}});

		// Act
		deep_merge(&mut base, json!({"map": {"detail_zoom": 17}}));

		// Assert
		assert_eq!(
			base,
			json!({"map": {"detail_zoom": 17, "overview_zoom": 14}, "ui": {"notice_dismiss_ms": 2500}})
		);
	}

	#[rstest]
	fn test_source_priority() {
		assert!(DefaultSource::new().priority() < TomlFileSource::new("x").priority());
		assert!(TomlFileSource::new("x").priority() < EnvSource::new().priority());
	}
}
