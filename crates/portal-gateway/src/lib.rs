//! # portal-gateway
//!
//! Clients for everything the portal talks to over the network: the hosted
//! backend's row API, its object storage and the geocoding service.
//!
//! The shell only ever sees the [`Gateway`] and [`Geocoder`] traits;
//! [`RestGateway`] and [`MapboxGeocoder`] are the production implementations.
//!
//! ## Feature Flags
//!
//! - `testing`: exposes mockall doubles in [`testing`]

pub mod error;
pub mod gateway;
pub mod geocode;
pub mod rest;
pub mod storage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{GatewayError, Result};
pub use gateway::{Gateway, fetch_admin_bundle};
pub use geocode::{Geocoder, MapboxGeocoder, lookup_url};
pub use rest::RestGateway;
pub use storage::{
	StoredObject, UploadFile, logo_object_path, object_path, sanitize_file_name, upload_files,
	upload_logo,
};
