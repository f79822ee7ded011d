//! # portal-conf
//!
//! Layered settings for the inspection portal: backend endpoint and key,
//! administrator identity, storage buckets, map presets, geocoding, UI timings
//! and logging.
//!
//! ## Example
//!
//! ```rust
//! use portal_conf::{SettingsBuilder, sources::DefaultSource};
//! use serde_json::json;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(
//!         DefaultSource::new()
//!             .with_value("backend.url", json!("https://db.example.test"))
//!             .with_value("auth.admin_id", json!("admin")),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(settings.storage.cover_list_limit, 3000);
//! ```

pub mod builder;
pub mod error;
pub mod settings;
pub mod sources;

pub use builder::SettingsBuilder;
pub use error::{ConfError, Result};
pub use settings::{
	AuthSettings, BackendSettings, CameraSettings, GeocodingSettings, LoggingSettings, MapSettings,
	PortalSettings, StorageSettings, UiSettings,
};
pub use sources::{ConfigSource, SourceError};
