//! Modal form controllers.
//!
//! Each form holds the raw field text and attached files of one modal. A
//! controller validates the minimum it needs, uploads attachments, builds one
//! write payload and issues exactly one insert or update. Upload and backend
//! failures abort the submission unchanged; the shell reports them and keeps
//! the modal open for another try.

mod directory;
mod report;

pub use directory::{CreateClientForm, CreatePremiseForm, parse_year};
pub use report::{CreateReportForm, EditReportForm, RequestReportForm, UNKNOWN_CLIENT};

use crate::error::{PortalError, PortalResult};

/// `None` for blank input, the untouched text otherwise.
pub(crate) fn optional_text(value: &str) -> Option<String> {
	if value.trim().is_empty() {
		None
	} else {
		Some(value.to_string())
	}
}

/// Trimmed text, `None` when blank.
pub(crate) fn optional_trimmed(value: &str) -> Option<String> {
	let trimmed = value.trim();
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed value of a field that must not be blank.
pub(crate) fn required<'a>(field: &'static str, label: &str, value: &'a str) -> PortalResult<&'a str> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err(PortalError::invalid(field, format!("{label} is required")));
	}
	Ok(trimmed)
}
