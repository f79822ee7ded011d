//! Report request, report creation and report editing.

use super::{optional_text, optional_trimmed, required};
use crate::error::PortalResult;
use crate::surface::EditFormValues;
use chrono::SecondsFormat;
use portal_conf::StorageSettings;
use portal_core::projection::UNKNOWN_PROPERTY;
use portal_core::{
	Clock, EditTarget, ImageList, NewReport, NewReportRequest, Premise, RecordId, Report, ReportUpdate,
	Session,
};
use portal_gateway::{Gateway, UploadFile, upload_files};

/// Client name recorded when the session has none to offer.
pub const UNKNOWN_CLIENT: &str = "Unknown Client";

/// The "request a report" modal shown to clients.
#[derive(Debug, Clone, Default)]
pub struct RequestReportForm {
	pub property_manager: String,
	pub property_manager_email: String,
	pub address: String,
	pub report_type: String,
	pub delivery_deadline: String,
	pub lease_files: Vec<UploadFile>,
	pub plan_files: Vec<UploadFile>,
}

impl RequestReportForm {
	/// Client name stored with the request.
	pub fn client_name(session: &Session) -> String {
		if let Some(client) = session.display_client() {
			return client.name.clone();
		}
		match session.display_name() {
			"" => UNKNOWN_CLIENT.to_string(),
			name => name.to_string(),
		}
	}

	pub fn record(
		&self,
		client_name: impl Into<String>,
		request_date: impl Into<String>,
		lease_url: Vec<String>,
		plan_url: Vec<String>,
	) -> NewReportRequest {
		NewReportRequest {
			client_name: client_name.into(),
			property_manager: self.property_manager.clone(),
			property_manager_email: self.property_manager_email.clone(),
			address: self.address.clone(),
			report_type: self.report_type.clone(),
			delivery_deadline: self.delivery_deadline.clone(),
			status: "Pending".to_string(),
			request_date: request_date.into(),
			lease_url,
			plan_url,
		}
	}

	/// Uploads the lease and plan files, then stores the request.
	pub async fn submit(
		&self,
		gateway: &dyn Gateway,
		storage: &StorageSettings,
		clock: &dyn Clock,
		client_name: &str,
	) -> PortalResult<()> {
		let bucket = storage.request_attachments.as_str();
		let lease_url = upload_files(gateway, &self.lease_files, bucket, "leases", "", clock).await?;
		let plan_url = upload_files(gateway, &self.plan_files, bucket, "plans", "", clock).await?;
		let request_date = clock.now().to_rfc3339_opts(SecondsFormat::Millis, true);
		let record = self.record(client_name, request_date, lease_url, plan_url);
		gateway.insert_report_request(&record).await?;
		tracing::info!(client = %record.client_name, address = %record.address, "report request stored");
		Ok(())
	}
}

/// The administrator's "create report" modal.
#[derive(Debug, Clone, Default)]
pub struct CreateReportForm {
	pub client_id: String,
	pub premise_id: String,
	pub job_number: String,
	pub name: String,
	pub report_type: String,
	pub status: String,
	pub condition: String,
	pub surveyed_by: String,
	pub inspection_date: String,
	pub delivery_date: String,
	pub pdf_url: String,
	pub info_url: String,
	pub invoice_url: String,
	pub video_url: String,
	pub images: Vec<UploadFile>,
}

impl CreateReportForm {
	pub fn validate(&self) -> PortalResult<()> {
		required("client_id", "Client", &self.client_id)?;
		required("premise_id", "Premise", &self.premise_id)?;
		required("job_number", "Job number", &self.job_number)?;
		Ok(())
	}

	/// Prefix of uploaded cover images, so they group under the job number.
	pub fn cover_prefix(&self) -> String {
		format!("{} - ", self.job_number.trim())
	}

	/// Report name, else the selected premise's name.
	pub fn report_name(&self, premises: &[Premise]) -> String {
		let name = self.name.trim();
		if !name.is_empty() {
			return name.to_string();
		}
		let premise_id = RecordId::from(self.premise_id.trim());
		premises
			.iter()
			.find(|premise| premise.id == premise_id)
			.map_or_else(|| UNKNOWN_PROPERTY.to_string(), |premise| premise.name.clone())
	}

	pub fn record(&self, premises: &[Premise], images: ImageList) -> NewReport {
		let status = self.status.trim();
		NewReport {
			client_id: RecordId::from(self.client_id.trim()),
			premise_id: RecordId::from(self.premise_id.trim()),
			job_number: self.job_number.trim().to_string(),
			name: self.report_name(premises),
			report_type: self.report_type.clone(),
			status: if status.is_empty() { "New" } else { status }.to_string(),
			condition: optional_text(&self.condition),
			surveyed_by: optional_text(&self.surveyed_by),
			inspection_date: optional_text(&self.inspection_date),
			delivery_date: optional_text(&self.delivery_date),
			pdf_url: optional_trimmed(&self.pdf_url),
			info_url: optional_trimmed(&self.info_url),
			invoice_url: optional_trimmed(&self.invoice_url),
			video_url: optional_trimmed(&self.video_url),
			images,
		}
	}

	pub async fn submit(
		&self,
		gateway: &dyn Gateway,
		storage: &StorageSettings,
		clock: &dyn Clock,
		premises: &[Premise],
	) -> PortalResult<()> {
		self.validate()?;
		let urls = upload_files(
			gateway,
			&self.images,
			&storage.job_covers,
			"",
			&self.cover_prefix(),
			clock,
		)
		.await?;
		let record = self.record(premises, ImageList::from_urls(urls));
		gateway.insert_report(&record).await?;
		tracing::info!(job_number = %record.job_number, images = record.images.len(), "report created");
		Ok(())
	}
}

/// The administrator's "edit report" modal.
#[derive(Debug, Clone, Default)]
pub struct EditReportForm {
	pub condition: String,
	pub surveyed_by: String,
	pub inspection_date: String,
	pub delivery_date: String,
	pub pdf_url: String,
	pub info_url: String,
	pub invoice_url: String,
	pub video_url: String,
	pub images: Vec<UploadFile>,
}

impl EditReportForm {
	/// Form prefilled from a stored report, with no new images.
	pub fn from_report(report: &Report) -> Self {
		let text = |value: &Option<String>| value.clone().unwrap_or_default();
		Self {
			condition: text(&report.condition),
			surveyed_by: text(&report.surveyed_by),
			inspection_date: text(&report.inspection_date),
			delivery_date: text(&report.delivery_date),
			pdf_url: text(&report.pdf_url),
			info_url: text(&report.info_url),
			invoice_url: text(&report.invoice_url),
			video_url: text(&report.video_url),
			images: Vec::new(),
		}
	}

	pub fn values(&self) -> EditFormValues {
		EditFormValues {
			condition: self.condition.clone(),
			surveyed_by: self.surveyed_by.clone(),
			inspection_date: self.inspection_date.clone(),
			delivery_date: self.delivery_date.clone(),
			pdf_url: self.pdf_url.clone(),
			info_url: self.info_url.clone(),
			invoice_url: self.invoice_url.clone(),
			video_url: self.video_url.clone(),
		}
	}

	/// Update payload with `new_images` appended to the stored list.
	pub fn update(&self, existing: &ImageList, new_images: Vec<String>) -> ReportUpdate {
		let mut images = existing.clone();
		images.extend(new_images);
		ReportUpdate {
			condition: optional_text(&self.condition),
			surveyed_by: optional_text(&self.surveyed_by),
			inspection_date: optional_text(&self.inspection_date),
			delivery_date: optional_text(&self.delivery_date),
			pdf_url: optional_trimmed(&self.pdf_url),
			info_url: optional_trimmed(&self.info_url),
			invoice_url: optional_trimmed(&self.invoice_url),
			video_url: optional_trimmed(&self.video_url),
			images,
		}
	}

	pub async fn submit(
		&self,
		gateway: &dyn Gateway,
		storage: &StorageSettings,
		clock: &dyn Clock,
		target: &EditTarget,
		existing: &ImageList,
	) -> PortalResult<()> {
		let prefix = format!("{} - ", target.job_number);
		let urls = upload_files(gateway, &self.images, &storage.job_covers, "", &prefix, clock).await?;
		let update = self.update(existing, urls);
		gateway.update_report(&target.report_id, &update).await?;
		tracing::info!(report_id = %target.report_id, images = update.images.len(), "report updated");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use portal_core::{AdminSession, Client, FixedClock, JobNumber};
	use portal_gateway::GatewayError;
	use portal_gateway::testing::gateway_with_memory_urls;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn storage() -> StorageSettings {
		StorageSettings::default()
	}

	#[fixture]
	fn clock() -> FixedClock {
		FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
	}

	fn premises() -> Vec<Premise> {
		serde_json::from_value(json!([{"id": 5, "name": "Harbour Depot", "address": "1 Quay St"}])).unwrap()
	}

	fn client(name: &str) -> Client {
		Client {
			id: RecordId::from("c1"),
			name: name.to_string(),
			logo_url: None,
			access_code: None,
		}
	}

	#[rstest]
	fn test_request_client_name_prefers_displayed_client() {
		let mut admin = Session::Admin(AdminSession::new(RecordId::from("a"), "Portal Admin"));
		assert_eq!(RequestReportForm::client_name(&admin), "Portal Admin");

		admin.start_viewing(client("Harbour Holdings"));
		assert_eq!(RequestReportForm::client_name(&admin), "Harbour Holdings");
		assert_eq!(RequestReportForm::client_name(&Session::Anonymous), UNKNOWN_CLIENT);
	}

	#[rstest]
	#[tokio::test]
	async fn test_request_uploads_attachments_then_inserts(storage: StorageSettings, clock: FixedClock) {
		// Arrange
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|bucket, path, _, upsert| {
				bucket == "report_requests" && path == "leases/1735689600000_lease_2025.pdf" && !upsert
			})
			.times(1)
			.returning(|_, _, _, _| Ok(()));
		gateway
			.expect_insert_report_request()
			.withf(|request| {
				request.client_name == "Harbour Holdings"
					&& request.status == "Pending"
					&& request.request_date == "2025-01-01T00:00:00.000Z"
					&& request.lease_url == ["mem://report_requests/leases/1735689600000_lease_2025.pdf"]
					&& request.plan_url.is_empty()
			})
			.times(1)
			.returning(|_| Ok(()));
		let form = RequestReportForm {
			address: "1 Quay St".to_string(),
			lease_files: vec![UploadFile::new("lease 2025.pdf", "application/pdf", b"%PDF".to_vec())],
			..RequestReportForm::default()
		};

		// Act
		let result = form.submit(&gateway, &storage, &clock, "Harbour Holdings").await;

		// Assert
		assert!(result.is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_request_upload_failure_skips_insert(storage: StorageSettings, clock: FixedClock) {
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.returning(|_, _, file, _| Err(GatewayError::upload(file.name.clone(), "Payload too large")));
		gateway.expect_insert_report_request().never();
		let form = RequestReportForm {
			plan_files: vec![UploadFile::new("plan.png", "image/png", vec![0u8; 4])],
			..RequestReportForm::default()
		};

		let error = form.submit(&gateway, &storage, &clock, "Acme").await.unwrap_err();

		assert_eq!(error.to_string(), "Failed to upload plan.png: Payload too large");
	}

	#[rstest]
	#[case("", "Harbour Depot")]
	#[case("  Roof survey ", "Roof survey")]
	fn test_report_name_fallback(#[case] name: &str, #[case] expected: &str) {
		let form = CreateReportForm {
			premise_id: "5".to_string(),
			name: name.to_string(),
			..CreateReportForm::default()
		};

		assert_eq!(form.report_name(&premises()), expected);
	}

	#[rstest]
	fn test_report_name_for_unknown_premise() {
		let form = CreateReportForm {
			premise_id: "404".to_string(),
			..CreateReportForm::default()
		};

		assert_eq!(form.report_name(&premises()), "Unknown Property");
	}

	#[rstest]
	fn test_create_record_normalizes_blank_fields() {
		let form = CreateReportForm {
			client_id: "1".to_string(),
			premise_id: "5".to_string(),
			job_number: " 1042 ".to_string(),
			status: "Inspection".to_string(),
			condition: String::new(),
			pdf_url: "  https://files.test/1042.pdf ".to_string(),
			..CreateReportForm::default()
		};

		let record = form.record(&premises(), ImageList::default());

		assert_eq!(record.job_number, "1042");
		assert_eq!(record.condition, None);
		assert_eq!(record.pdf_url.as_deref(), Some("https://files.test/1042.pdf"));
		assert_eq!(record.status, "Inspection");
		assert_eq!(form.cover_prefix(), "1042 - ");
	}

	#[rstest]
	#[case(CreateReportForm { premise_id: "5".into(), job_number: "1".into(), ..Default::default() }, "Client is required")]
	#[case(CreateReportForm { client_id: "1".into(), job_number: "1".into(), ..Default::default() }, "Premise is required")]
	#[case(CreateReportForm { client_id: "1".into(), premise_id: "5".into(), job_number: " ".into(), ..Default::default() }, "Job number is required")]
	fn test_create_validation(#[case] form: CreateReportForm, #[case] message: &str) {
		assert_eq!(form.validate().unwrap_err().to_string(), message);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_uploads_covers_under_job_prefix(storage: StorageSettings, clock: FixedClock) {
		// Arrange
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|bucket, path, _, _| bucket == "GEOMAP-JOB Covers" && path == "1042 - 1735689600000_front.jpg")
			.times(1)
			.returning(|_, _, _, _| Ok(()));
		gateway
			.expect_insert_report()
			.withf(|report| {
				report.name == "Harbour Depot"
					&& report.images.as_slice() == ["mem://GEOMAP-JOB Covers/1042 - 1735689600000_front.jpg"]
			})
			.times(1)
			.returning(|_| Ok(()));
		let form = CreateReportForm {
			client_id: "1".to_string(),
			premise_id: "5".to_string(),
			job_number: "1042".to_string(),
			images: vec![UploadFile::new("front.jpg", "image/jpeg", vec![1, 2, 3])],
			..CreateReportForm::default()
		};

		// Act
		let result = form.submit(&gateway, &storage, &clock, &premises()).await;

		// Assert
		assert!(result.is_ok());
	}

	#[rstest]
	fn test_edit_form_prefills_blank_for_missing_fields() {
		let report: Report = serde_json::from_value(json!({
			"id": 9,
			"job_number": 1042,
			"condition": "Good",
			"video_url": "https://video.test/1042"
		}))
		.unwrap();

		let values = EditReportForm::from_report(&report).values();

		assert_eq!(values.condition, "Good");
		assert_eq!(values.surveyed_by, "");
		assert_eq!(values.video_url, "https://video.test/1042");
	}

	#[rstest]
	fn test_edit_update_appends_to_legacy_list() {
		// Arrange
		let existing = ImageList::parse_text("a.jpg, b.jpg");
		let form = EditReportForm::default();

		// Act
		let update = form.update(&existing, vec!["c.jpg".to_string(), "a.jpg".to_string()]);

		// Assert
		assert_eq!(update.images.as_slice(), ["a.jpg", "b.jpg", "c.jpg"]);
		assert_eq!(update.condition, None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_edit_uses_stored_job_number_prefix(storage: StorageSettings, clock: FixedClock) {
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|_, path, _, _| path == "0042 - 1735689600000_roof.jpg")
			.times(1)
			.returning(|_, _, _, _| Ok(()));
		gateway
			.expect_update_report()
			.withf(|id, update| id.as_str() == "9" && update.images.len() == 2)
			.times(1)
			.returning(|_, _| Ok(()));
		let target = EditTarget {
			report_id: RecordId::from("9"),
			job_number: JobNumber::new("0042"),
		};
		let form = EditReportForm {
			images: vec![UploadFile::new("roof.jpg", "image/jpeg", vec![7])],
			..EditReportForm::default()
		};

		let result = form
			.submit(&gateway, &storage, &clock, &target, &ImageList::from_urls(["old.jpg"]))
			.await;

		assert!(result.is_ok());
	}
}
