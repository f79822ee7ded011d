//! Typed portal settings.

use crate::error::{ConfError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

/// Root settings object.
///
/// Every section has defaults, so a partial TOML file or a handful of
/// environment variables is enough. [`PortalSettings::validate`] rejects the
/// values that have no sensible default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
	pub backend: BackendSettings,
	pub auth: AuthSettings,
	pub storage: StorageSettings,
	pub map: MapSettings,
	pub geocoding: GeocodingSettings,
	pub ui: UiSettings,
	pub logging: LoggingSettings,
}

impl PortalSettings {
	/// Checks the settings that must be provided by the deployment.
	pub fn validate(&self) -> Result<()> {
		if self.backend.url.trim().is_empty() {
			return Err(ConfError::invalid("backend.url", "must not be empty"));
		}
		if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
			return Err(ConfError::invalid("backend.url", "must be an http(s) URL"));
		}
		if self.auth.admin_id.trim().is_empty() {
			return Err(ConfError::invalid("auth.admin_id", "must not be empty"));
		}
		if self.auth.email_domain.trim().is_empty() {
			return Err(ConfError::invalid("auth.email_domain", "must not be empty"));
		}
		if self.geocoding.limit == 0 {
			return Err(ConfError::invalid("geocoding.limit", "must be at least 1"));
		}
		Ok(())
	}
}

/// Hosted backend endpoint.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
	pub url: String,
	#[serde(deserialize_with = "deserialize_secret")]
	pub anon_key: SecretString,
}

impl Default for BackendSettings {
	fn default() -> Self {
		Self {
			url: "http://127.0.0.1:54321".to_string(),
			anon_key: SecretString::from(String::new()),
		}
	}
}

impl BackendSettings {
	pub fn has_anon_key(&self) -> bool {
		!self.anon_key.expose_secret().is_empty()
	}
}

/// Login identity mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
	/// Domain appended to the username to form the login email.
	pub email_domain: String,
	/// Identity id of the administrator account.
	#[serde(deserialize_with = "deserialize_string_like")]
	pub admin_id: String,
	pub admin_display_name: String,
}

impl Default for AuthSettings {
	fn default() -> Self {
		Self {
			email_domain: "inspections.local".to_string(),
			admin_id: String::new(),
			admin_display_name: "Portal Admin".to_string(),
		}
	}
}

impl AuthSettings {
	/// Synthetic login email for a username.
	pub fn login_email(&self, username: &str) -> String {
		format!("{}@{}", username, self.email_domain)
	}

	pub fn is_admin(&self, identity_id: &str) -> bool {
		!self.admin_id.is_empty() && self.admin_id == identity_id
	}
}

/// Object storage buckets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
	/// Property images and client logos.
	pub images: String,
	pub job_covers: String,
	pub request_attachments: String,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub logo_list_limit: usize,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub cover_list_limit: usize,
}

impl Default for StorageSettings {
	fn default() -> Self {
		Self {
			images: "GEOMAP-Images".to_string(),
			job_covers: "GEOMAP-JOB Covers".to_string(),
			request_attachments: "report_requests".to_string(),
			logo_list_limit: 1000,
			cover_list_limit: 3000,
		}
	}
}

/// Initial camera of a map container.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
	/// `[lng, lat]`.
	pub center: [f64; 2],
	#[serde(deserialize_with = "deserialize_lenient")]
	pub zoom: f64,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub pitch: f64,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub bearing: f64,
}

impl Default for CameraSettings {
	fn default() -> Self {
		Self {
			center: [174.7633, -36.8485],
			zoom: 13.0,
			pitch: 60.0,
			bearing: -17.6,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSettings {
	pub custom_style: String,
	pub satellite_style: String,
	pub login_camera: CameraSettings,
	pub app_camera: CameraSettings,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub detail_zoom: f64,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub detail_pitch: f64,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub overview_zoom: f64,
}

impl Default for MapSettings {
	fn default() -> Self {
		Self {
			custom_style: "mapbox://styles/mapbox/light-v11".to_string(),
			satellite_style: "mapbox://styles/mapbox/satellite-streets-v12".to_string(),
			login_camera: CameraSettings {
				center: [173.0, -41.2],
				zoom: 4.8,
				pitch: 0.0,
				bearing: 0.0,
			},
			app_camera: CameraSettings::default(),
			detail_zoom: 16.0,
			detail_pitch: 60.0,
			overview_zoom: 14.0,
		}
	}
}

/// Address lookup service.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeocodingSettings {
	pub endpoint: String,
	#[serde(deserialize_with = "deserialize_secret")]
	pub access_token: SecretString,
	/// ISO country code the lookup is restricted to.
	pub country: String,
	#[serde(deserialize_with = "deserialize_lenient")]
	pub limit: u32,
}

impl Default for GeocodingSettings {
	fn default() -> Self {
		Self {
			endpoint: "https://api.mapbox.com/geocoding/v5/mapbox.places".to_string(),
			access_token: SecretString::from(String::new()),
			country: "nz".to_string(),
			limit: 1,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
	/// How long an informational notice stays visible.
	#[serde(deserialize_with = "deserialize_lenient")]
	pub notice_dismiss_ms: u64,
	/// How long a maintenance success message stays visible.
	#[serde(deserialize_with = "deserialize_lenient")]
	pub maintenance_dismiss_ms: u64,
	pub gallery_placeholder: String,
	pub card_placeholder: String,
}

impl Default for UiSettings {
	fn default() -> Self {
		Self {
			notice_dismiss_ms: 2500,
			maintenance_dismiss_ms: 4000,
			gallery_placeholder: "https://via.placeholder.com/450x360?text=No+Image".to_string(),
			card_placeholder: "https://via.placeholder.com/400x300?text=No+Image".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `EnvFilter` directive, e.g. `"info,portal_gateway=debug"`.
	pub filter: String,
	#[serde(deserialize_with = "deserialize_flag")]
	pub json: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			json: false,
		}
	}
}

fn value_to_string(value: Value) -> String {
	match value {
		Value::String(text) => text,
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<SecretString, D::Error> {
	Ok(SecretString::from(value_to_string(Value::deserialize(deserializer)?)))
}

/// Numbers arrive as text from the environment and as numbers from TOML.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: FromStr + DeserializeOwned,
	T::Err: Display,
{
	match Value::deserialize(deserializer)? {
		Value::String(text) => text
			.trim()
			.parse()
			.map_err(|e| D::Error::custom(format!("invalid value {text:?}: {e}"))),
		other => T::deserialize(other).map_err(D::Error::custom),
	}
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
	match Value::deserialize(deserializer)? {
		Value::Bool(flag) => Ok(flag),
		Value::String(text) => match text.trim().to_lowercase().as_str() {
			"true" | "yes" | "on" | "1" => Ok(true),
			"false" | "no" | "off" | "0" | "" => Ok(false),
			_ => Err(D::Error::custom(format!("invalid flag {text:?}"))),
		},
		Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
		other => Err(D::Error::custom(format!("invalid flag {other}"))),
	}
}

fn deserialize_string_like<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
	Ok(value_to_string(Value::deserialize(deserializer)?))
}
