//! # Inspection Portal
//!
//! Property inspection reports for commercial clients, organized around a
//! map of their premises.
//!
//! Administrators manage clients, premises and inspection jobs, track each
//! job through its status workflow and can view the portal as any client.
//! Clients browse their own portfolio, open a premise's report history and
//! request new inspections.
//!
//! This crate re-exports the workspace members:
//!
//! - [`core`]: data model, application state and list projections
//! - [`conf`]: layered settings
//! - [`gateway`]: backend rows, object storage and geocoding
//! - [`pages`]: the shell, map adapter and forms
//!
//! ## Feature Flags
//!
//! - `logging` (default): [`init_tracing`] installs a tracing-subscriber
//!   formatter configured from [`LoggingSettings`]
//! - `testing`: mockall doubles of the gateway traits
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use inspection_portal::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::new("portal.toml"))
//!     .add_source(EnvSource::new().with_prefix("PORTAL_"))
//!     .build()?;
//! init_tracing(&settings.logging)?;
//!
//! let gateway = Arc::new(RestGateway::from_settings(&settings)?);
//! let geocoder = Arc::new(MapboxGeocoder::from_settings(&settings.geocoding)?);
//! let portal = Portal::builder(gateway, geocoder, surface, maps)
//!     .settings(&settings)
//!     .build();
//! portal.boot().await?;
//! ```

#[cfg(feature = "logging")]
pub mod logging;

pub use portal_conf as conf;
pub use portal_core as core;
pub use portal_gateway as gateway;
pub use portal_pages as pages;

pub use portal_conf::{LoggingSettings, PortalSettings, SettingsBuilder};
pub use portal_core::{AppState, Client, Premise, RecordId, Report, Session, Status};
pub use portal_gateway::{Gateway, GatewayError, Geocoder, MapboxGeocoder, RestGateway};
pub use portal_pages::{Action, Portal, PortalBuilder, PortalError, PortalResult, Surface};

#[cfg(feature = "logging")]
pub use logging::{LoggingError, init_tracing};

/// Everything an embedding front end usually needs.
pub mod prelude {
	pub use portal_conf::sources::{DefaultSource, EnvSource, TomlFileSource};
	pub use portal_conf::{PortalSettings, SettingsBuilder};
	pub use portal_core::{AppState, Clock, RecordId, Screen, Session, SystemClock};
	pub use portal_gateway::{Gateway, Geocoder, MapboxGeocoder, RestGateway, UploadFile};
	pub use portal_pages::forms::{
		CreateClientForm, CreatePremiseForm, CreateReportForm, EditReportForm, RequestReportForm,
	};
	pub use portal_pages::map::{MaintenanceTool, MapFactory, MapWidget};
	pub use portal_pages::{Action, Modal, Portal, PortalError, PortalResult, Surface};

	#[cfg(feature = "logging")]
	pub use crate::logging::init_tracing;
}
