//! Action dispatch and view-only handlers.

use super::Portal;
use crate::dispatch::Action;
use crate::error::{PortalError, PortalResult};
use crate::forms::EditReportForm;
use crate::render::{client_options, premise_options};
use crate::surface::{Modal, SelectField};
use portal_core::projection::project_premise;
use portal_core::{AdminTab, EditTarget, Gallery, RecordId, Screen, SubFilter};

impl Portal {
	/// Parses and runs a `(name, argument)` pair from rendered markup.
	pub async fn handle(&self, name: &str, argument: Option<&str>) -> PortalResult<()> {
		let action = match self.actions.parse(name, argument) {
			Ok(action) => action,
			Err(error) => {
				tracing::warn!(action = name, ?argument, %error, "rejected action");
				self.error(error.to_string());
				return Err(error);
			}
		};
		self.dispatch(action).await
	}

	pub async fn dispatch(&self, action: Action) -> PortalResult<()> {
		tracing::debug!(action = action.name(), argument = ?action.argument(), "dispatch");
		match action {
			Action::SwitchAdminTab(tab) => self.switch_admin_tab(tab),
			Action::SetSubFilter(filter) => self.set_sub_filter(filter),
			Action::OpenClient(id) => return self.view_as_client(&id).await,
			Action::OpenPremise(id) => return self.open_premise(&id),
			Action::UpdateStatus { report_id, status } => return self.update_status(&report_id, &status).await,
			Action::OpenEditReport(id) => return self.open_edit_report(&id),
			Action::NextImage => {
				self.state.lock().view.gallery.next();
				self.render_gallery();
			}
			Action::PrevImage => {
				self.state.lock().view.gallery.prev();
				self.render_gallery();
			}
			Action::CloseDetail => self.close_detail(),
			Action::BackToAdmin => return self.back_to_admin().await,
			Action::Logout => self.logout(),
			Action::OpenModal(modal) => return self.open_modal(modal),
			Action::CloseModal(modal) => self.close_modal(modal),
			Action::ToggleMapStyle => self.toggle_map_style(),
			Action::RunMaintenance(tool) => return self.run_maintenance(tool).await,
			Action::OpenVideo => self.open_video(),
			Action::MapLoaded => self.map.lock().on_loaded(),
		}
		Ok(())
	}

	/// Activates `tab` and resets its sub-filter.
	pub fn switch_admin_tab(&self, tab: AdminTab) {
		self.state.lock().view.switch_tab(tab);
		self.render_admin();
	}

	pub fn set_sub_filter(&self, filter: SubFilter) {
		self.state.lock().view.sub_filter = filter;
		self.render_admin();
	}

	pub fn set_admin_search(&self, text: &str) {
		self.state.lock().view.admin_search = text.to_string();
		self.render_admin();
	}

	pub fn clear_admin_search(&self) {
		self.set_admin_search("");
	}

	pub fn set_client_search(&self, text: &str) {
		self.state.lock().view.client_search = text.to_string();
		self.render_premises();
	}

	pub fn clear_client_search(&self) {
		self.set_client_search("");
	}

	/// Opens the detail panel of a loaded premise and flies the map to it.
	pub fn open_premise(&self, id: &RecordId) -> PortalResult<()> {
		let opened = {
			let mut state = self.state.lock();
			let found = state.find_premise(id).map(|premise| {
				let images = project_premise(premise, &state.reports).images;
				(premise.coordinates, Gallery::open(&images, &self.ui.gallery_placeholder))
			});
			found.map(|(coordinates, gallery)| {
				state.view.gallery = gallery;
				state.view.open_premise = Some(id.clone());
				coordinates
			})
		};
		let Some(coordinates) = opened else {
			tracing::warn!(premise = %id, "premise is not loaded");
			return Err(PortalError::not_found("premise", id));
		};
		self.show_dashboard(false);
		self.render_detail();
		self.render_gallery();
		if let Some(coordinates) = coordinates {
			self.map.lock().focus_premise(coordinates);
		}
		Ok(())
	}

	/// Re-opens the detail panel after its data was reloaded.
	pub(super) fn reopen_detail(&self) {
		let open = self.state.lock().view.open_premise.clone();
		if let Some(id) = open {
			if self.open_premise(&id).is_err() {
				self.state.lock().view.close_detail();
				self.surface.render_detail(None);
			}
		}
	}

	pub fn close_detail(&self) {
		let screen = {
			let mut state = self.state.lock();
			state.view.close_detail();
			state.view.screen
		};
		self.surface.render_detail(None);
		self.map.lock().overview();
		if screen == Screen::ClientList {
			self.show_dashboard(true);
		}
	}

	/// Administrator changes the status of a report.
	pub async fn update_status(&self, report_id: &RecordId, status: &str) -> PortalResult<()> {
		self.require_admin("update report status")?;
		match self.gateway.update_report_status(report_id, status).await {
			Ok(()) => {
				tracing::info!(report_id = %report_id, status, "report status updated");
				self.info(format!("Status updated to {status}"));
				let _ = self.refresh_admin_data().await;
				self.reopen_detail();
				Ok(())
			}
			Err(error) => {
				tracing::error!(report_id = %report_id, %error, "status update failed");
				self.error(format!("Update failed: {error}"));
				self.surface.alert(&format!("Update failed: {error}"));
				self.render_detail();
				Err(error.into())
			}
		}
	}

	/// Opens the edit modal prefilled from a loaded report.
	pub fn open_edit_report(&self, id: &RecordId) -> PortalResult<()> {
		self.require_admin("edit a report")?;
		let found = {
			let mut state = self.state.lock();
			let found = state.find_report(id).map(|report| {
				let target = EditTarget {
					report_id: report.id.clone(),
					job_number: report.job_number.clone(),
				};
				(target, EditReportForm::from_report(report))
			});
			found.map(|(target, form)| {
				state.view.edit_target = Some(target);
				form
			})
		};
		let Some(form) = found else {
			tracing::warn!(report_id = %id, "report is not loaded");
			self.error("Error: Report not found in memory.");
			return Err(PortalError::not_found("report", id));
		};
		self.surface.fill_edit_form(&form.values());
		self.surface.show_modal(Modal::EditReport, true);
		Ok(())
	}

	pub fn open_modal(&self, modal: Modal) -> PortalResult<()> {
		match modal {
			Modal::RequestReport => {}
			Modal::EditReport => {
				let target = self.state.lock().view.edit_target.clone();
				let Some(target) = target else {
					return Err(PortalError::not_found("report", "none selected"));
				};
				return self.open_edit_report(&target.report_id);
			}
			Modal::CreateReport => {
				self.require_admin("create a report")?;
				let (clients, premises) = {
					let state = self.state.lock();
					(client_options(&state.clients, None), premise_options(&state.premises, None))
				};
				self.surface.populate_select(SelectField::ReportClient, &clients);
				self.surface.populate_select(SelectField::ReportPremise, &premises);
			}
			Modal::CreateClient => self.require_admin("create a client")?,
			Modal::CreatePremise => self.require_admin("create a premise")?,
		}
		self.surface.show_modal(modal, true);
		Ok(())
	}

	pub fn close_modal(&self, modal: Modal) {
		if modal == Modal::EditReport {
			self.state.lock().view.edit_target = None;
		}
		self.surface.show_modal(modal, false);
	}

	pub fn toggle_map_style(&self) {
		let style = {
			let mut state = self.state.lock();
			state.view.map_style = state.view.map_style.toggled();
			state.view.map_style
		};
		self.map.lock().set_style(style);
	}

	/// Opens the walkthrough video of the open premise's latest report.
	pub fn open_video(&self) {
		let url = {
			let state = self.state.lock();
			state.open_premise().and_then(|premise| {
				project_premise(premise, &state.reports)
					.latest()
					.and_then(|report| report.video_url.clone())
			})
		};
		match url {
			Some(url) => self.surface.open_url(&url),
			None => tracing::debug!("open premise has no video"),
		}
	}
}
