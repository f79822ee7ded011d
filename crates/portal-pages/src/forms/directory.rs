//! Client and premise creation.

use super::{optional_text, optional_trimmed, required};
use crate::error::PortalResult;
use portal_conf::StorageSettings;
use portal_core::{Client, NewClient, NewPremise, Premise};
use portal_gateway::{Gateway, Geocoder, UploadFile, upload_logo};

#[derive(Debug, Clone, Default)]
pub struct CreateClientForm {
	pub name: String,
	pub access_code: String,
	pub logo: Option<UploadFile>,
}

impl CreateClientForm {
	pub fn validate(&self) -> PortalResult<()> {
		required("name", "Client name", &self.name).map(|_| ())
	}

	pub fn record(&self, logo_url: Option<String>) -> NewClient {
		NewClient {
			name: self.name.trim().to_string(),
			access_code: optional_trimmed(&self.access_code),
			logo_url,
		}
	}

	/// Stores the logo (replacing one of the same name) and inserts the client.
	pub async fn submit(&self, gateway: &dyn Gateway, storage: &StorageSettings) -> PortalResult<Client> {
		let name = required("name", "Client name", &self.name)?;
		let logo_url = match &self.logo {
			Some(file) => Some(upload_logo(gateway, &storage.images, name, file).await?),
			None => None,
		};
		let client = gateway.insert_client(&self.record(logo_url)).await?;
		tracing::info!(client = %client.id, name = %client.name, "client created");
		Ok(client)
	}
}

#[derive(Debug, Clone, Default)]
pub struct CreatePremiseForm {
	pub name: String,
	pub address: String,
	pub sector: String,
	pub floor_area: String,
	pub site_area: String,
	pub year_built: String,
}

impl CreatePremiseForm {
	pub fn validate(&self) -> PortalResult<()> {
		required("name", "Premise name", &self.name)?;
		required("address", "Address", &self.address)?;
		Ok(())
	}

	pub fn record(&self) -> NewPremise {
		NewPremise {
			name: self.name.trim().to_string(),
			address: self.address.trim().to_string(),
			lat: None,
			lng: None,
			sector: optional_text(&self.sector),
			floor_area: optional_trimmed(&self.floor_area),
			site_area: optional_trimmed(&self.site_area),
			year_built: parse_year(&self.year_built),
		}
	}

	/// Geocodes the address and inserts the premise.
	///
	/// A failed lookup is logged and saved like a miss, without coordinates.
	pub async fn submit(&self, gateway: &dyn Gateway, geocoder: &dyn Geocoder) -> PortalResult<Premise> {
		self.validate()?;
		let mut record = self.record();
		let coordinates = match geocoder.geocode(&record.address).await {
			Ok(found) => found,
			Err(error) => {
				tracing::warn!(address = %record.address, %error, "geocoding failed");
				None
			}
		};
		record.set_coordinates(coordinates);
		let premise = gateway.insert_premise(&record).await?;
		tracing::info!(premise = %premise.id, located = coordinates.is_some(), "premise created");
		Ok(premise)
	}
}

/// Leading integer of `value`; `None` when there is none or it is zero.
pub fn parse_year(value: &str) -> Option<i32> {
	let value = value.trim_start();
	let sign_len = usize::from(value.starts_with(['+', '-']));
	let digits = value[sign_len..]
		.find(|c: char| !c.is_ascii_digit())
		.map_or(value.len(), |end| end + sign_len);
	value[..digits].parse::<i32>().ok().filter(|year| *year != 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use portal_core::{Coordinates, RecordId};
	use portal_gateway::GatewayError;
	use portal_gateway::testing::{MockGeocoder, gateway_with_memory_urls};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("1995", Some(1995))]
	#[case(" 1987 ", Some(1987))]
	#[case("1960s", Some(1960))]
	#[case("", None)]
	#[case("circa 1950", None)]
	#[case("0", None)]
	#[case("-", None)]
	fn test_parse_year(#[case] raw: &str, #[case] expected: Option<i32>) {
		assert_eq!(parse_year(raw), expected);
	}

	#[rstest]
	fn test_client_record_trims_name_and_blanks_code() {
		let form = CreateClientForm {
			name: "  Harbour Holdings ".to_string(),
			access_code: " ".to_string(),
			logo: None,
		};

		let record = form.record(None);

		assert_eq!(record.name, "Harbour Holdings");
		assert_eq!(record.access_code, None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_client_logo_is_upserted_under_client_name() {
		// Arrange
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|bucket, path, _, upsert| bucket == "GEOMAP-Images" && path == "Harbour  Co.png" && *upsert)
			.times(1)
			.returning(|_, _, _, _| Ok(()));
		gateway
			.expect_insert_client()
			.withf(|client| client.logo_url.as_deref() == Some("mem://GEOMAP-Images/Harbour  Co.png"))
			.times(1)
			.returning(|client| {
				Ok(Client {
					id: RecordId::from("31"),
					name: client.name.clone(),
					logo_url: client.logo_url.clone(),
					access_code: None,
				})
			});
		let form = CreateClientForm {
			name: "Harbour & Co".to_string(),
			access_code: String::new(),
			logo: Some(UploadFile::new("logo.final.png", "image/png", vec![1])),
		};

		// Act
		let client = form.submit(&gateway, &StorageSettings::default()).await.unwrap();

		// Assert
		assert_eq!(client.id, RecordId::from("31"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_client_without_name_is_rejected_before_any_call() {
		let gateway = gateway_with_memory_urls();
		let form = CreateClientForm::default();

		let error = form.submit(&gateway, &StorageSettings::default()).await.unwrap_err();

		assert_eq!(error.to_string(), "Client name is required");
	}

	fn inserted(premise: &NewPremise) -> Premise {
		serde_json::from_value(json!({
			"id": 77,
			"name": premise.name,
			"address": premise.address,
			"lat": premise.lat,
			"lng": premise.lng
		}))
		.unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_premise_with_resolvable_address_gets_coordinates() {
		// Arrange
		let mut geocoder = MockGeocoder::new();
		geocoder
			.expect_geocode()
			.withf(|address| address == "1 Quay St, Auckland")
			.returning(|_| Ok(Some(Coordinates::new(-36.84, 174.77))));
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_insert_premise()
			.withf(|premise| premise.lat == Some(-36.84) && premise.lng == Some(174.77) && premise.year_built == Some(1995))
			.times(1)
			.returning(|premise| Ok(inserted(premise)));
		let form = CreatePremiseForm {
			name: "Depot".to_string(),
			address: " 1 Quay St, Auckland ".to_string(),
			year_built: "1995".to_string(),
			..CreatePremiseForm::default()
		};

		// Act
		let premise = form.submit(&gateway, &geocoder).await.unwrap();

		// Assert
		assert_eq!(premise.coordinates, Some(Coordinates::new(-36.84, 174.77)));
	}

	#[rstest]
	#[case(Ok(None))]
	#[case(Err(GatewayError::Geocode("503".to_string())))]
	#[tokio::test]
	async fn test_premise_saves_without_coordinates_on_miss(
		#[case] lookup: portal_gateway::Result<Option<Coordinates>>,
	) {
		let mut geocoder = MockGeocoder::new();
		geocoder.expect_geocode().return_once(move |_| lookup);
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_insert_premise()
			.withf(|premise| premise.lat.is_none() && premise.lng.is_none())
			.times(1)
			.returning(|premise| Ok(inserted(premise)));
		let form = CreatePremiseForm {
			name: "Nowhere".to_string(),
			address: "Unknown Rd".to_string(),
			..CreatePremiseForm::default()
		};

		let premise = form.submit(&gateway, &geocoder).await.unwrap();

		assert!(premise.coordinates.is_none());
	}
}
