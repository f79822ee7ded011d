//! Object storage helpers.

use crate::error::Result;
use crate::gateway::Gateway;
use portal_core::Clock;
use serde::Deserialize;

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
	pub name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

impl UploadFile {
	pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			name: name.into(),
			content_type: content_type.into(),
			bytes: bytes.into(),
		}
	}

	/// Text after the last `.`, or the whole name when there is none.
	pub fn extension(&self) -> &str {
		self.name.rsplit('.').next().unwrap_or(&self.name)
	}
}

/// An entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredObject {
	pub name: String,
}

impl StoredObject {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
	name.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
				c
			} else {
				'_'
			}
		})
		.collect()
}

/// `<folder>/<prefix><millis>_<sanitized name>`, without the folder part when
/// `folder` is empty.
pub fn object_path(folder: &str, prefix: &str, millis: i64, file_name: &str) -> String {
	let name = format!("{prefix}{millis}_{}", sanitize_file_name(file_name));
	if folder.is_empty() {
		name
	} else {
		format!("{folder}/{name}")
	}
}

/// `<client name>.<ext>`, keeping only `[A-Za-z0-9._- ]` of the client name.
pub fn logo_object_path(client_name: &str, file: &UploadFile) -> String {
	let safe: String = client_name
		.chars()
		.filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
		.collect();
	format!("{safe}.{}", file.extension())
}

/// Uploads `files` one after another and returns their public URLs in order.
///
/// The first failure aborts the batch; files already stored stay stored.
pub async fn upload_files(
	gateway: &dyn Gateway,
	files: &[UploadFile],
	bucket: &str,
	folder: &str,
	prefix: &str,
	clock: &dyn Clock,
) -> Result<Vec<String>> {
	let mut urls = Vec::with_capacity(files.len());
	for file in files {
		let path = object_path(folder, prefix, clock.now().timestamp_millis(), &file.name);
		gateway.upload_object(bucket, &path, file, false).await?;
		tracing::debug!(bucket, path = %path, bytes = file.bytes.len(), "uploaded object");
		urls.push(gateway.public_url(bucket, &path));
	}
	Ok(urls)
}

/// Stores a client logo under the client's name, replacing any previous one.
pub async fn upload_logo(
	gateway: &dyn Gateway,
	bucket: &str,
	client_name: &str,
	file: &UploadFile,
) -> Result<String> {
	let path = logo_object_path(client_name, file);
	gateway.upload_object(bucket, &path, file, true).await?;
	Ok(gateway.public_url(bucket, &path))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::GatewayError;
	use crate::testing::gateway_with_memory_urls;
	use chrono::NaiveDate;
	use portal_core::FixedClock;
	use rstest::rstest;

	fn clock() -> FixedClock {
		FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
	}

	#[rstest]
	#[case("Lease v2 (final).pdf", "Lease_v2__final_.pdf")]
	#[case("plan-1_A.png", "plan-1_A.png")]
	#[case("café.jpg", "caf_.jpg")]
	fn test_sanitize_file_name(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(sanitize_file_name(raw), expected);
	}

	#[rstest]
	#[case("leases", "", "leases/1700000000000_a_b.pdf")]
	#[case("", "1042 - ", "1042 - 1700000000000_a_b.pdf")]
	fn test_object_path(#[case] folder: &str, #[case] prefix: &str, #[case] expected: &str) {
		assert_eq!(object_path(folder, prefix, 1_700_000_000_000, "a b.pdf"), expected);
	}

	#[rstest]
	fn test_logo_path_keeps_spaces() {
		let file = UploadFile::new("logo.final.PNG", "image/png", vec![1]);

		assert_eq!(logo_object_path("Harbour & Co. Ltd", &file), "Harbour  Co. Ltd.PNG");
	}

	#[rstest]
	fn test_extension_without_dot_is_whole_name() {
		let file = UploadFile::new("README", "text/plain", Vec::new());

		assert_eq!(file.extension(), "README");
	}

	#[rstest]
	#[tokio::test]
	async fn test_upload_files_returns_urls_in_order() {
		// Arrange
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|bucket, _, _, upsert| bucket == "report_requests" && !*upsert)
			.times(2)
			.returning(|_, _, _, _| Ok(()));
		let files = [
			UploadFile::new("lease.pdf", "application/pdf", vec![1]),
			UploadFile::new("plan 2.png", "image/png", vec![2]),
		];

		// Act
		let urls = upload_files(&gateway, &files, "report_requests", "leases", "", &clock())
			.await
			.unwrap();

		// Assert
		assert_eq!(
			urls,
			[
				"mem://report_requests/leases/1735689600000_lease.pdf",
				"mem://report_requests/leases/1735689600000_plan_2.png",
			]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_upload_files_stops_at_first_failure() {
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.times(1)
			.returning(|_, _, file, _| Err(GatewayError::upload(file.name.clone(), "Payload too large")));
		let files = [
			UploadFile::new("a.jpg", "image/jpeg", vec![1]),
			UploadFile::new("b.jpg", "image/jpeg", vec![2]),
		];

		let error = upload_files(&gateway, &files, "images", "", "", &clock())
			.await
			.unwrap_err();

		assert_eq!(error.to_string(), "Failed to upload a.jpg: Payload too large");
	}

	#[rstest]
	#[tokio::test]
	async fn test_logo_upload_overwrites() {
		let mut gateway = gateway_with_memory_urls();
		gateway
			.expect_upload_object()
			.withf(|_, path, _, upsert| path == "Acme.png" && *upsert)
			.times(1)
			.returning(|_, _, _, _| Ok(()));
		let file = UploadFile::new("logo.png", "image/png", vec![1]);

		let url = upload_logo(&gateway, "GEOMAP-Images", "Acme", &file).await.unwrap();

		assert_eq!(url, "mem://GEOMAP-Images/Acme.png");
	}
}
