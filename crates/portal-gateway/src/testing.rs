//! mockall doubles of the gateway traits.
//!
//! Compiled for this crate's tests and, with the `testing` feature, for
//! downstream crates.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::geocode::Geocoder;
use crate::storage::{StoredObject, UploadFile};
use mockall::mock;
use portal_core::{
	Client, Coordinates, NewClient, NewPremise, NewReport, NewReportRequest, Premise, RecordId,
	Report, ReportUpdate,
};

mock! {
	/// Mock of [`Gateway`]. Expectations are verified on drop.
	pub Gateway {}

	#[async_trait::async_trait]
	impl Gateway for Gateway {
		async fn authenticate(&self, username: &str, password: &str) -> Result<RecordId>;
		async fn ping(&self) -> Result<()>;
		async fn fetch_clients(&self) -> Result<Vec<Client>>;
		async fn fetch_reports(&self) -> Result<Vec<Report>>;
		async fn fetch_premises(&self) -> Result<Vec<Premise>>;
		async fn fetch_premises_for_client(&self, client_id: &RecordId) -> Result<Vec<Premise>>;
		async fn fetch_client(&self, id: &RecordId) -> Result<Client>;
		async fn update_report_status(&self, id: &RecordId, status: &str) -> Result<()>;
		async fn insert_report(&self, report: &NewReport) -> Result<()>;
		async fn update_report(&self, id: &RecordId, update: &ReportUpdate) -> Result<()>;
		async fn insert_client(&self, client: &NewClient) -> Result<Client>;
		async fn insert_premise(&self, premise: &NewPremise) -> Result<Premise>;
		async fn insert_report_request(&self, request: &NewReportRequest) -> Result<()>;
		async fn upload_object(
			&self,
			bucket: &str,
			path: &str,
			file: &UploadFile,
			upsert: bool,
		) -> Result<()>;
		fn public_url(&self, bucket: &str, path: &str) -> String;
		async fn list_objects(&self, bucket: &str, limit: usize) -> Result<Vec<StoredObject>>;
		async fn update_client_logo(&self, id: &RecordId, logo_url: &str) -> Result<()>;
		async fn update_report_images_for_job(&self, job_number: &str, images: &[String]) -> Result<()>;
		async fn fetch_premises_missing_coordinates(&self) -> Result<Vec<Premise>>;
		async fn update_premise_coordinates(&self, id: &RecordId, coordinates: Coordinates) -> Result<()>;
	}
}

mock! {
	/// Mock of [`Geocoder`].
	pub Geocoder {}

	#[async_trait::async_trait]
	impl Geocoder for Geocoder {
		async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
	}
}

/// A gateway whose public URLs are `mem://<bucket>/<path>`.
pub fn gateway_with_memory_urls() -> MockGateway {
	let mut gateway = MockGateway::new();
	gateway
		.expect_public_url()
		.returning(|bucket, path| format!("mem://{bucket}/{path}"));
	gateway
}
