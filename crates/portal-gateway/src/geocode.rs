//! Address to coordinates lookup.

use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use portal_conf::GeocodingSettings;
use portal_core::Coordinates;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Resolves a free-text address.
#[async_trait]
pub trait Geocoder: Send + Sync {
	/// `Ok(None)` when the service knows no match for the address.
	async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
	#[serde(default)]
	features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
	/// `[lng, lat]`.
	center: [f64; 2],
}

/// Forward geocoding against a Mapbox-style places endpoint.
pub struct MapboxGeocoder {
	endpoint: String,
	access_token: SecretString,
	country: String,
	limit: u32,
	client: reqwest::Client,
}

impl MapboxGeocoder {
	pub fn new(
		endpoint: impl Into<String>,
		access_token: SecretString,
		country: impl Into<String>,
		limit: u32,
	) -> Result<Self> {
		let client = reqwest::Client::builder()
			.build()
			.map_err(|e| GatewayError::Config(format!("Failed to create client: {}", e)))?;
		Ok(Self {
			endpoint: endpoint.into().trim_end_matches('/').to_string(),
			access_token,
			country: country.into(),
			limit,
			client,
		})
	}

	pub fn from_settings(settings: &GeocodingSettings) -> Result<Self> {
		Self::new(
			settings.endpoint.clone(),
			SecretString::from(settings.access_token.expose_secret().to_string()),
			settings.country.clone(),
			settings.limit,
		)
	}

	/// Lookup URL without the access token.
	pub fn lookup_url(&self, address: &str) -> String {
		lookup_url(&self.endpoint, address, &self.country, self.limit)
	}
}

/// `<endpoint>/<encoded address>.json?country=..&limit=..`
pub fn lookup_url(endpoint: &str, address: &str, country: &str, limit: u32) -> String {
	format!(
		"{}/{}.json?country={}&limit={}",
		endpoint.trim_end_matches('/'),
		urlencoding::encode(address.trim()),
		urlencoding::encode(country),
		limit
	)
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
	async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
		if address.trim().is_empty() {
			return Ok(None);
		}
		let url = format!(
			"{}&access_token={}",
			self.lookup_url(address),
			urlencoding::encode(self.access_token.expose_secret())
		);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| GatewayError::Geocode(format!("Request failed: {}", e)))?;
		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			return Err(GatewayError::Geocode(format!("{} {}", status, text.trim())));
		}
		let body: FeatureCollection = response
			.json()
			.await
			.map_err(|e| GatewayError::Geocode(format!("Failed to parse response: {}", e)))?;
		let found = body
			.features
			.first()
			.map(|feature| Coordinates::new(feature.center[1], feature.center[0]));
		if found.is_none() {
			tracing::debug!(address, "no geocoding match");
		}
		Ok(found)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_lookup_url_encodes_address() {
		let url = lookup_url(
			"https://api.mapbox.com/geocoding/v5/mapbox.places/",
			" 12 Queen St, Auckland ",
			"nz",
			1,
		);

		assert_eq!(
			url,
			"https://api.mapbox.com/geocoding/v5/mapbox.places/12%20Queen%20St%2C%20Auckland.json?country=nz&limit=1"
		);
	}
}
