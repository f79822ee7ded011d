//! REST client for the hosted backend.
//!
//! Talks to the backend's three HTTP surfaces: `auth/v1` for password login,
//! `rest/v1/<table>` for row access with PostgREST filters, and
//! `storage/v1/object` for buckets. The anon key is always sent as `apikey`;
//! the bearer token is the session token after login, else the anon key.

use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;
use crate::storage::{StoredObject, UploadFile};
use async_trait::async_trait;
use parking_lot::RwLock;
use portal_conf::{AuthSettings, PortalSettings};
use portal_core::{
	Client, Coordinates, NewClient, NewPremise, NewReport, NewReportRequest, Premise, RecordId,
	Report, ReportUpdate,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
	id: RecordId,
}

/// [`Gateway`] over the backend's HTTP API.
pub struct RestGateway {
	base_url: String,
	anon_key: SecretString,
	auth: AuthSettings,
	client: reqwest::Client,
	access_token: RwLock<Option<SecretString>>,
}

impl RestGateway {
	pub fn new(
		base_url: impl Into<String>,
		anon_key: SecretString,
		email_domain: impl Into<String>,
	) -> Result<Self> {
		let base_url = base_url.into();
		if base_url.trim().is_empty() {
			return Err(GatewayError::Config("backend url is empty".to_string()));
		}
		let client = reqwest::Client::builder()
			.build()
			.map_err(|e| GatewayError::Config(format!("Failed to create client: {}", e)))?;
		Ok(Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			anon_key,
			auth: AuthSettings {
				email_domain: email_domain.into(),
				..AuthSettings::default()
			},
			client,
			access_token: RwLock::new(None),
		})
	}

	pub fn from_settings(settings: &PortalSettings) -> Result<Self> {
		if !settings.backend.has_anon_key() {
			tracing::warn!(url = %settings.backend.url, "backend anon key is empty, requests will be unauthenticated");
		}
		let mut gateway = Self::new(
			settings.backend.url.clone(),
			SecretString::from(settings.backend.anon_key.expose_secret().to_string()),
			settings.auth.email_domain.clone(),
		)?;
		gateway.auth = settings.auth.clone();
		Ok(gateway)
	}

	/// Forgets the session token; later calls use the anon key.
	pub fn sign_out(&self) {
		*self.access_token.write() = None;
	}

	fn build_url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	fn table_url(&self, table: &str, query: &str) -> String {
		if query.is_empty() {
			self.build_url(&format!("rest/v1/{table}"))
		} else {
			self.build_url(&format!("rest/v1/{table}?{query}"))
		}
	}

	fn object_url(&self, bucket: &str, path: &str) -> String {
		self.build_url(&format!("storage/v1/object/{}", encode_object_path(bucket, path)))
	}

	fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
		let bearer = match self.access_token.read().as_ref() {
			Some(token) => token.expose_secret().to_string(),
			None => self.anon_key.expose_secret().to_string(),
		};
		self.client
			.request(method, url)
			.header("apikey", self.anon_key.expose_secret())
			.bearer_auth(bearer)
	}

	/// Sends and returns the successful response, or the backend's message.
	async fn send(&self, request: reqwest::RequestBuilder) -> std::result::Result<reqwest::Response, String> {
		let response = request
			.send()
			.await
			.map_err(|e| format!("Request failed: {}", e))?;
		if response.status().is_success() {
			Ok(response)
		} else {
			Err(error_message(response).await)
		}
	}

	async fn select<T: DeserializeOwned>(&self, resource: &'static str, query: &str) -> Result<Vec<T>> {
		let url = self.table_url(resource, query);
		let response = self
			.send(self.request(reqwest::Method::GET, &url))
			.await
			.map_err(|message| GatewayError::fetch(resource, message))?;
		response
			.json()
			.await
			.map_err(|e| GatewayError::fetch(resource, format!("Failed to parse response: {}", e)))
	}

	async fn insert_returning<T: DeserializeOwned>(
		&self,
		operation: &'static str,
		table: &str,
		body: Value,
	) -> Result<T> {
		let url = self.table_url(table, "select=*");
		let response = self
			.send(
				self.request(reqwest::Method::POST, &url)
					.header("Prefer", "return=representation")
					.json(&json!([body])),
			)
			.await
			.map_err(|message| GatewayError::mutation(operation, message))?;
		let mut rows: Vec<T> = response
			.json()
			.await
			.map_err(|e| GatewayError::mutation(operation, format!("Failed to parse response: {}", e)))?;
		if rows.is_empty() {
			return Err(GatewayError::mutation(operation, "No row returned"));
		}
		Ok(rows.swap_remove(0))
	}

	async fn write(
		&self,
		operation: &'static str,
		method: reqwest::Method,
		table: &str,
		filter: &str,
		body: Value,
	) -> Result<()> {
		let url = self.table_url(table, filter);
		self.send(
			self.request(method, &url)
				.header("Prefer", "return=minimal")
				.json(&body),
		)
		.await
		.map_err(|message| GatewayError::mutation(operation, message))?;
		tracing::debug!(operation, table, "backend write succeeded");
		Ok(())
	}
}

fn eq_filter(column: &str, value: &str) -> String {
	format!("{column}=eq.{}", urlencoding::encode(value))
}

fn encode_object_path(bucket: &str, path: &str) -> String {
	std::iter::once(bucket)
		.chain(path.split('/'))
		.map(|segment| urlencoding::encode(segment).into_owned())
		.collect::<Vec<_>>()
		.join("/")
}

async fn error_message(response: reqwest::Response) -> String {
	let status = response.status();
	let text = response.text().await.unwrap_or_default();
	serde_json::from_str::<Value>(&text)
		.ok()
		.and_then(|body| {
			["message", "error_description", "msg", "error"]
				.iter()
				.find_map(|key| body.get(*key).and_then(Value::as_str).map(str::to_string))
		})
		.or_else(|| (!text.trim().is_empty()).then(|| text.clone()))
		.unwrap_or_else(|| format!("Request failed with status {}", status))
}

#[async_trait]
impl Gateway for RestGateway {
	async fn authenticate(&self, username: &str, password: &str) -> Result<RecordId> {
		let url = self.build_url("auth/v1/token?grant_type=password");
		let email = self.auth.login_email(username);
		let response = self
			.send(
				self.client
					.post(&url)
					.header("apikey", self.anon_key.expose_secret())
					.json(&json!({ "email": email, "password": password })),
			)
			.await
			.map_err(|message| {
				tracing::warn!(%message, "login rejected");
				GatewayError::Auth
			})?;
		let token: TokenResponse = response.json().await.map_err(|_| GatewayError::Auth)?;
		*self.access_token.write() = Some(SecretString::from(token.access_token));
		tracing::info!(identity = %token.user.id, "authenticated");
		Ok(token.user.id)
	}

	async fn ping(&self) -> Result<()> {
		let url = self.table_url("clients", "select=id");
		self.send(self.request(reqwest::Method::HEAD, &url).header("Prefer", "count=exact"))
			.await
			.map_err(|message| GatewayError::fetch("clients", message))?;
		Ok(())
	}

	async fn fetch_clients(&self) -> Result<Vec<Client>> {
		self.select("clients", "select=*").await
	}

	async fn fetch_reports(&self) -> Result<Vec<Report>> {
		self.select("reports", "select=*").await
	}

	async fn fetch_premises(&self) -> Result<Vec<Premise>> {
		self.select("premises", "select=*").await
	}

	async fn fetch_premises_for_client(&self, client_id: &RecordId) -> Result<Vec<Premise>> {
		let query = format!(
			"select=*,reports!inner(*)&{}",
			eq_filter("reports.client_id", client_id.as_str())
		);
		self.select("premises", &query).await
	}

	async fn fetch_client(&self, id: &RecordId) -> Result<Client> {
		let query = format!("select=*&{}", eq_filter("id", id.as_str()));
		let mut rows: Vec<Client> = self.select("clients", &query).await?;
		if rows.is_empty() {
			return Err(GatewayError::fetch("clients", format!("Client {} not found", id)));
		}
		Ok(rows.swap_remove(0))
	}

	async fn update_report_status(&self, id: &RecordId, status: &str) -> Result<()> {
		self.write(
			"update report status",
			reqwest::Method::PATCH,
			"reports",
			&eq_filter("id", id.as_str()),
			json!({ "status": status }),
		)
		.await
	}

	async fn insert_report(&self, report: &NewReport) -> Result<()> {
		let body = serde_json::to_value(report)
			.map_err(|e| GatewayError::mutation("insert report", e.to_string()))?;
		self.write("insert report", reqwest::Method::POST, "reports", "", json!([body]))
			.await
	}

	async fn update_report(&self, id: &RecordId, update: &ReportUpdate) -> Result<()> {
		let body = serde_json::to_value(update)
			.map_err(|e| GatewayError::mutation("update report", e.to_string()))?;
		self.write(
			"update report",
			reqwest::Method::PATCH,
			"reports",
			&eq_filter("id", id.as_str()),
			body,
		)
		.await
	}

	async fn insert_client(&self, client: &NewClient) -> Result<Client> {
		let body = serde_json::to_value(client)
			.map_err(|e| GatewayError::mutation("insert client", e.to_string()))?;
		self.insert_returning("insert client", "clients", body).await
	}

	async fn insert_premise(&self, premise: &NewPremise) -> Result<Premise> {
		let body = serde_json::to_value(premise)
			.map_err(|e| GatewayError::mutation("insert premise", e.to_string()))?;
		self.insert_returning("insert premise", "premises", body).await
	}

	async fn insert_report_request(&self, request: &NewReportRequest) -> Result<()> {
		let body = serde_json::to_value(request)
			.map_err(|e| GatewayError::mutation("insert report request", e.to_string()))?;
		self.write(
			"insert report request",
			reqwest::Method::POST,
			"report_requests",
			"",
			json!([body]),
		)
		.await
	}

	async fn upload_object(
		&self,
		bucket: &str,
		path: &str,
		file: &UploadFile,
		upsert: bool,
	) -> Result<()> {
		let url = self.object_url(bucket, path);
		self.send(
			self.request(reqwest::Method::POST, &url)
				.header(reqwest::header::CONTENT_TYPE, file.content_type.as_str())
				.header("x-upsert", if upsert { "true" } else { "false" })
				.body(file.bytes.clone()),
		)
		.await
		.map_err(|message| GatewayError::upload(file.name.clone(), message))?;
		Ok(())
	}

	fn public_url(&self, bucket: &str, path: &str) -> String {
		self.build_url(&format!(
			"storage/v1/object/public/{}",
			encode_object_path(bucket, path)
		))
	}

	async fn list_objects(&self, bucket: &str, limit: usize) -> Result<Vec<StoredObject>> {
		let url = self.build_url(&format!(
			"storage/v1/object/list/{}",
			urlencoding::encode(bucket)
		));
		let body = json!({
			"prefix": "",
			"limit": limit,
			"offset": 0,
			"sortBy": { "column": "name", "order": "asc" },
		});
		let response = self
			.send(self.request(reqwest::Method::POST, &url).json(&body))
			.await
			.map_err(|message| GatewayError::fetch("storage objects", message))?;
		response
			.json()
			.await
			.map_err(|e| GatewayError::fetch("storage objects", format!("Failed to parse response: {}", e)))
	}

	async fn update_client_logo(&self, id: &RecordId, logo_url: &str) -> Result<()> {
		self.write(
			"update client logo",
			reqwest::Method::PATCH,
			"clients",
			&eq_filter("id", id.as_str()),
			json!({ "logo_url": logo_url }),
		)
		.await
	}

	async fn update_report_images_for_job(&self, job_number: &str, images: &[String]) -> Result<()> {
		self.write(
			"update report images",
			reqwest::Method::PATCH,
			"reports",
			&eq_filter("job_number", job_number),
			json!({ "image_url": images }),
		)
		.await
	}

	async fn fetch_premises_missing_coordinates(&self) -> Result<Vec<Premise>> {
		self.select("premises", "select=*&lat=is.null").await
	}

	async fn update_premise_coordinates(&self, id: &RecordId, coordinates: Coordinates) -> Result<()> {
		self.write(
			"update premise coordinates",
			reqwest::Method::PATCH,
			"premises",
			&eq_filter("id", id.as_str()),
			json!({ "lat": coordinates.lat, "lng": coordinates.lng }),
		)
		.await
	}
}
