//! The backend seam.

use crate::error::Result;
use crate::storage::{StoredObject, UploadFile};
use async_trait::async_trait;
use portal_core::{
	AdminBundle, Client, Coordinates, NewClient, NewPremise, NewReport, NewReportRequest, Premise,
	RecordId, Report, ReportUpdate,
};

/// Reads and writes against the hosted backend.
///
/// One call per backend request; no retries and no caching. Errors carry the
/// backend's message unchanged, except for authentication.
#[async_trait]
pub trait Gateway: Send + Sync {
	/// Password login for a username; returns the identity id.
	async fn authenticate(&self, username: &str, password: &str) -> Result<RecordId>;

	/// Cheap request that wakes the backend.
	async fn ping(&self) -> Result<()>;

	async fn fetch_clients(&self) -> Result<Vec<Client>>;

	async fn fetch_reports(&self) -> Result<Vec<Report>>;

	async fn fetch_premises(&self) -> Result<Vec<Premise>>;

	/// Premises with at least one report of `client_id`, each carrying those
	/// reports.
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

	/// Public URL of a stored object. Does not check that it exists.
	fn public_url(&self, bucket: &str, path: &str) -> String;

	async fn list_objects(&self, bucket: &str, limit: usize) -> Result<Vec<StoredObject>>;

	async fn update_client_logo(&self, id: &RecordId, logo_url: &str) -> Result<()>;

	/// Replaces the image list of every report with `job_number`.
	async fn update_report_images_for_job(&self, job_number: &str, images: &[String]) -> Result<()>;

	async fn fetch_premises_missing_coordinates(&self) -> Result<Vec<Premise>>;

	async fn update_premise_coordinates(&self, id: &RecordId, coordinates: Coordinates) -> Result<()>;
}

/// Fetches clients, reports and premises concurrently.
///
/// Fails with the first error; nothing is returned unless all three succeed.
pub async fn fetch_admin_bundle(gateway: &dyn Gateway) -> Result<AdminBundle> {
	let (clients, reports, premises) = tokio::try_join!(
		gateway.fetch_clients(),
		gateway.fetch_reports(),
		gateway.fetch_premises(),
	)?;
	tracing::debug!(
		clients = clients.len(),
		reports = reports.len(),
		premises = premises.len(),
		"fetched admin bundle"
	);
	Ok(AdminBundle {
		clients,
		reports,
		premises,
	})
}
