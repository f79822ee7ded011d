//! Form submissions and maintenance runs.

use super::Portal;
use crate::error::{PortalError, PortalResult};
use crate::forms::{
	CreateClientForm, CreatePremiseForm, CreateReportForm, EditReportForm, RequestReportForm,
};
use crate::map::{MaintenanceTool, fix_coordinates, sync_covers, sync_logos};
use crate::render::{client_options, premise_options};
use crate::surface::{ControlState, Modal, SelectField};
use std::future::Future;

/// Log label and alert heading of a failed submission.
fn failure_text(modal: Modal) -> (&'static str, &'static str) {
	match modal {
		Modal::RequestReport => ("Request Error", "Failed to submit request:"),
		Modal::CreateReport => ("Create Report Error", "Failed to create report:"),
		Modal::EditReport => ("Edit Report Error", "Failed to update report:"),
		Modal::CreateClient => ("Create Client Error", "Failed to create client:"),
		Modal::CreatePremise => ("Create Premise Error", "Failed to create premise:"),
	}
}

impl Portal {
	/// Runs one submission with the modal's submit control busy.
	///
	/// On failure the modal stays open, the error is logged and alerted, and
	/// the control is restored either way.
	async fn submit_modal<T>(&self, modal: Modal, work: impl Future<Output = PortalResult<T>>) -> PortalResult<T> {
		let control = modal.submit_control();
		self.surface.set_control(control, ControlState::busy(control));
		let result = work.await;
		self.surface.set_control(control, ControlState::idle(control));
		if let Err(error) = &result {
			let (label, heading) = failure_text(modal);
			tracing::error!(modal = modal.key(), %error, "submission failed");
			self.error(format!("{label}: {error}"));
			self.surface.alert(&format!("{heading}\n{error}"));
		}
		result
	}

	pub async fn submit_request(&self, form: &RequestReportForm) -> PortalResult<()> {
		let client_name = RequestReportForm::client_name(&self.state.lock().session);
		self.submit_modal(Modal::RequestReport, async {
			self.info("Packaging request and uploading files...");
			form.submit(self.gateway.as_ref(), &self.storage, self.clock.as_ref(), &client_name)
				.await?;
			self.info("Report request sent successfully!");
			self.surface.alert("Success! Your report request has been sent.");
			self.close_modal(Modal::RequestReport);
			Ok(())
		})
		.await
	}

	pub async fn submit_create_report(&self, form: &CreateReportForm) -> PortalResult<()> {
		self.submit_modal(Modal::CreateReport, async {
			self.require_admin("create a report")?;
			let premises = self.state.lock().premises.clone();
			form.submit(self.gateway.as_ref(), &self.storage, self.clock.as_ref(), &premises)
				.await?;
			self.info("Report created successfully!");
			self.close_modal(Modal::CreateReport);
			let _ = self.refresh_admin_data().await;
			Ok(())
		})
		.await
	}

	pub async fn submit_edit_report(&self, form: &EditReportForm) -> PortalResult<()> {
		self.submit_modal(Modal::EditReport, async {
			self.require_admin("edit a report")?;
			let (target, existing) = {
				let state = self.state.lock();
				let target = state
					.view
					.edit_target
					.clone()
					.ok_or_else(|| PortalError::not_found("report", "none selected"))?;
				let existing = state
					.find_report(&target.report_id)
					.map(|report| report.images.clone())
					.unwrap_or_default();
				(target, existing)
			};
			form.submit(
				self.gateway.as_ref(),
				&self.storage,
				self.clock.as_ref(),
				&target,
				&existing,
			)
			.await?;
			self.info("Report updated successfully!");
			self.close_modal(Modal::EditReport);
			let _ = self.refresh_admin_data().await;
			self.reopen_detail();
			Ok(())
		})
		.await
	}

	pub async fn submit_create_client(&self, form: &CreateClientForm) -> PortalResult<()> {
		self.submit_modal(Modal::CreateClient, async {
			self.require_admin("create a client")?;
			let client = form.submit(self.gateway.as_ref(), &self.storage).await?;
			self.info("Client created successfully!");
			let _ = self.refresh_admin_data().await;
			let options = client_options(&self.state.lock().clients, Some(&client.id));
			self.surface.populate_select(SelectField::ReportClient, &options);
			self.close_modal(Modal::CreateClient);
			Ok(())
		})
		.await
	}

	pub async fn submit_create_premise(&self, form: &CreatePremiseForm) -> PortalResult<()> {
		self.submit_modal(Modal::CreatePremise, async {
			self.require_admin("create a premise")?;
			let premise = form.submit(self.gateway.as_ref(), self.geocoder.as_ref()).await?;
			self.info("Premise created successfully!");
			let _ = self.refresh_admin_data().await;
			let options = premise_options(&self.state.lock().premises, Some(&premise.id));
			self.surface.populate_select(SelectField::ReportPremise, &options);
			self.close_modal(Modal::CreatePremise);
			Ok(())
		})
		.await
	}

	/// Runs one maintenance tool.
	///
	/// Panel controls are disabled until the tool finishes. A successful run
	/// reloads the admin data.
	pub async fn run_maintenance(&self, tool: MaintenanceTool) -> PortalResult<()> {
		self.require_admin("run maintenance tools")?;
		let started = {
			let mut panel = self.maintenance.lock();
			panel.begin(tool).map(|()| panel.view())
		};
		let view = match started {
			Ok(view) => view,
			Err(error) => {
				tracing::warn!(tool = tool.key(), %error, "maintenance run rejected");
				return Err(error);
			}
		};
		self.surface.render_maintenance(&view);
		self.info(tool.start_message());
		tracing::info!(tool = tool.key(), "maintenance started");

		let outcome = match tool {
			MaintenanceTool::SyncLogos => {
				let clients = self.state.lock().clients.clone();
				sync_logos(
					self.gateway.as_ref(),
					&self.storage.images,
					self.storage.logo_list_limit,
					&clients,
				)
				.await
			}
			MaintenanceTool::SyncCovers => {
				sync_covers(
					self.gateway.as_ref(),
					&self.storage.job_covers,
					self.storage.cover_list_limit,
				)
				.await
			}
			MaintenanceTool::FixCoordinates => {
				fix_coordinates(self.gateway.as_ref(), self.geocoder.as_ref(), |fixed, total| {
					let view = {
						let mut panel = self.maintenance.lock();
						panel.progress(format!("Fixed {fixed}/{total}"));
						panel.view()
					};
					self.surface.render_maintenance(&view);
				})
				.await
			}
		};

		match outcome {
			Ok(message) => {
				tracing::info!(tool = tool.key(), result = %message, "maintenance finished");
				let finished_at = self.clock.now();
				let view = {
					let mut panel = self.maintenance.lock();
					panel.succeed(message.clone(), finished_at);
					panel.view()
				};
				self.surface.render_maintenance(&view);
				self.info(message);
				let _ = self.refresh_admin_data().await;
				Ok(())
			}
			Err(error) => {
				tracing::error!(tool = tool.key(), %error, "maintenance failed");
				let view = {
					let mut panel = self.maintenance.lock();
					panel.fail(error.to_string());
					panel.view()
				};
				self.surface.render_maintenance(&view);
				self.error(format!("Tool Error: {error}"));
				Err(error.into())
			}
		}
	}
}
