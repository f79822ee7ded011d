//! Backend records and write payloads.
//!
//! Read types normalize the loosely-typed rows the backend returns: blank text
//! becomes `None`, numeric columns may arrive as numbers or numeric text, and a
//! premise's coordinates exist only when both latitude and longitude do.
//!
//! Write types are separate so that the exact JSON sent on insert/update is
//! explicit. Optional text serializes as `null`; uploaded-file lists are omitted
//! when empty so an update never clears what is already stored.

use crate::ids::{self, RecordId};
use crate::images::ImageList;
use crate::job::JobNumber;
use crate::status::Status;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A client organisation that owns a portfolio of premises.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Client {
	pub id: RecordId,
	#[serde(default, deserialize_with = "lenient::required_text")]
	pub name: String,
	#[serde(default, deserialize_with = "lenient::text")]
	pub logo_url: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub access_code: Option<String>,
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
	pub lat: f64,
	pub lng: f64,
}

impl Coordinates {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	/// Both halves present, or nothing.
	pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
		match (lat, lng) {
			(Some(lat), Some(lng)) => Some(Self { lat, lng }),
			_ => None,
		}
	}

	/// `[lng, lat]` order used by map widgets and geocoders.
	pub fn lng_lat(&self) -> [f64; 2] {
		[self.lng, self.lat]
	}
}

/// A physical property tracked in a portfolio.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PremiseRow")]
pub struct Premise {
	pub id: RecordId,
	pub name: String,
	pub address: String,
	pub coordinates: Option<Coordinates>,
	pub sector: Option<String>,
	pub floor_area: Option<String>,
	pub site_area: Option<String>,
	pub year_built: Option<i32>,
	pub condition: Option<String>,
	pub created_at: Option<String>,
	/// Reports joined server-side by the client portfolio query.
	pub reports: Option<Vec<Report>>,
}

#[derive(Deserialize)]
struct PremiseRow {
	id: RecordId,
	#[serde(default, deserialize_with = "lenient::required_text")]
	name: String,
	#[serde(default, deserialize_with = "lenient::required_text")]
	address: String,
	#[serde(default, deserialize_with = "lenient::number")]
	lat: Option<f64>,
	#[serde(default, deserialize_with = "lenient::number")]
	lng: Option<f64>,
	#[serde(default, deserialize_with = "lenient::text")]
	sector: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	floor_area: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	site_area: Option<String>,
	#[serde(default, deserialize_with = "lenient::number")]
	year_built: Option<f64>,
	#[serde(default, deserialize_with = "lenient::text")]
	condition: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	created_at: Option<String>,
	#[serde(default)]
	reports: Option<Vec<Report>>,
}

impl From<PremiseRow> for Premise {
	fn from(row: PremiseRow) -> Self {
		Self {
			id: row.id,
			name: row.name,
			address: row.address,
			coordinates: Coordinates::from_parts(row.lat, row.lng),
			sector: row.sector,
			floor_area: row.floor_area,
			site_area: row.site_area,
			year_built: row.year_built.and_then(whole_year),
			condition: row.condition,
			created_at: row.created_at,
			reports: row.reports,
		}
	}
}

/// Only whole numbers inside the `i32` range count as a year.
fn whole_year(value: f64) -> Option<i32> {
	if !value.is_finite() || value.fract() != 0.0 {
		return None;
	}
	if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
		return None;
	}
	Some(value as i32)
}

/// An inspection record attached to a premise and a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Report {
	pub id: RecordId,
	#[serde(default, deserialize_with = "ids::deserialize_optional")]
	pub client_id: Option<RecordId>,
	#[serde(default, deserialize_with = "ids::deserialize_optional")]
	pub premise_id: Option<RecordId>,
	#[serde(default)]
	pub job_number: JobNumber,
	#[serde(default, deserialize_with = "lenient::text")]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub report_type: Option<String>,
	#[serde(default)]
	pub status: Status,
	#[serde(default, deserialize_with = "lenient::text")]
	pub condition: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub surveyed_by: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub inspection_date: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub delivery_date: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub pdf_url: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub info_url: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub invoice_url: Option<String>,
	#[serde(default, deserialize_with = "lenient::text")]
	pub video_url: Option<String>,
	#[serde(default, rename = "image_url")]
	pub images: ImageList,
	#[serde(default, deserialize_with = "lenient::text")]
	pub created_at: Option<String>,
}

impl Report {
	pub fn belongs_to_client(&self, client_id: &RecordId) -> bool {
		self.client_id.as_ref() == Some(client_id)
	}

	pub fn belongs_to_premise(&self, premise_id: &RecordId) -> bool {
		self.premise_id.as_ref() == Some(premise_id)
	}
}

/// Insert payload for `reports`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
	pub client_id: RecordId,
	pub premise_id: RecordId,
	pub job_number: String,
	pub name: String,
	pub report_type: String,
	pub status: String,
	pub condition: Option<String>,
	pub surveyed_by: Option<String>,
	pub inspection_date: Option<String>,
	pub delivery_date: Option<String>,
	pub pdf_url: Option<String>,
	pub info_url: Option<String>,
	pub invoice_url: Option<String>,
	pub video_url: Option<String>,
	#[serde(rename = "image_url", skip_serializing_if = "ImageList::is_empty")]
	pub images: ImageList,
}

/// Update payload for the editable columns of `reports`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReportUpdate {
	pub condition: Option<String>,
	pub surveyed_by: Option<String>,
	pub inspection_date: Option<String>,
	pub delivery_date: Option<String>,
	pub pdf_url: Option<String>,
	pub info_url: Option<String>,
	pub invoice_url: Option<String>,
	pub video_url: Option<String>,
	#[serde(rename = "image_url", skip_serializing_if = "ImageList::is_empty")]
	pub images: ImageList,
}

/// Insert payload for `clients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClient {
	pub name: String,
	pub access_code: Option<String>,
	pub logo_url: Option<String>,
}

/// Insert payload for `premises`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPremise {
	pub name: String,
	pub address: String,
	pub lat: Option<f64>,
	pub lng: Option<f64>,
	pub sector: Option<String>,
	pub floor_area: Option<String>,
	pub site_area: Option<String>,
	pub year_built: Option<i32>,
}

impl NewPremise {
	pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
		self.lat = coordinates.map(|c| c.lat);
		self.lng = coordinates.map(|c| c.lng);
	}
}

/// Insert payload for `report_requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReportRequest {
	pub client_name: String,
	pub property_manager: String,
	pub property_manager_email: String,
	pub address: String,
	pub report_type: String,
	pub delivery_deadline: String,
	pub status: String,
	pub request_date: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub lease_url: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub plan_url: Vec<String>,
}

/// Lenient deserializers for loosely-typed columns.
mod lenient {
	use super::*;

	fn text_of(value: Value) -> Option<String> {
		match value {
			Value::String(text) if text.trim().is_empty() => None,
			Value::String(text) => Some(text),
			Value::Number(n) => Some(n.to_string()),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}

	pub(super) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
		Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_of))
	}

	pub(super) fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
		Ok(text(deserializer)?.unwrap_or_default())
	}

	pub(super) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
		Ok(match Option::<Value>::deserialize(deserializer)? {
			Some(Value::Number(n)) => n.as_f64(),
			Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
			_ => None,
		})
	}
}
