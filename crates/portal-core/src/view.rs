//! UI selections that survive re-renders.

use crate::ids::RecordId;
use crate::images::ImageList;
use crate::job::JobNumber;
use crate::status::StatusKind;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
	#[default]
	Login,
	/// Administrator client and report lists.
	ClientList,
	/// A client portfolio, for the client or an impersonating admin.
	Premises,
}

/// Tabs of the admin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
	#[default]
	Clients,
	Reports,
}

impl AdminTab {
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim() {
			"clients" => Some(Self::Clients),
			"reports" => Some(Self::Reports),
			_ => None,
		}
	}

	pub fn key(self) -> &'static str {
		match self {
			Self::Clients => "clients",
			Self::Reports => "reports",
		}
	}
}

/// Secondary filter within the active admin tab.
///
/// `Active`/`Inactive` apply to the clients tab; `Status` to the reports tab.
/// On the reports tab every non-`All` filter is matched against the normalized
/// status text by [`SubFilter::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubFilter {
	#[default]
	All,
	Active,
	Inactive,
	Status(StatusKind),
}

impl SubFilter {
	pub fn parse(value: &str) -> Option<Self> {
		let key = value.trim().to_lowercase();
		match key.as_str() {
			"all" => Some(Self::All),
			"active" => Some(Self::Active),
			"inactive" => Some(Self::Inactive),
			other => StatusKind::from_key(other).map(Self::Status),
		}
	}

	pub fn key(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Active => "active",
			Self::Inactive => "inactive",
			Self::Status(kind) => kind.key(),
		}
	}
}

/// Preset visual styles of the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
	#[default]
	Custom,
	Satellite,
}

impl MapStyle {
	pub fn toggled(self) -> Self {
		match self {
			Self::Custom => Self::Satellite,
			Self::Satellite => Self::Custom,
		}
	}
}

/// Image cursor of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
	images: Vec<String>,
	index: usize,
}

impl Gallery {
	/// Opens at the first image, or at `placeholder` when there are none.
	pub fn open(images: &ImageList, placeholder: &str) -> Self {
		let images = if images.is_empty() {
			vec![placeholder.to_string()]
		} else {
			images.as_slice().to_vec()
		};
		Self { images, index: 0 }
	}

	pub fn next(&mut self) {
		if !self.images.is_empty() {
			self.index = (self.index + 1) % self.images.len();
		}
	}

	pub fn prev(&mut self) {
		if !self.images.is_empty() {
			self.index = (self.index + self.images.len() - 1) % self.images.len();
		}
	}

	pub fn current(&self) -> Option<&str> {
		self.images.get(self.index).map(String::as_str)
	}

	/// One-based position and total, as shown in the "i / n" counter.
	pub fn position(&self) -> (usize, usize) {
		(self.index + 1, self.images.len())
	}

	/// Previous/next buttons are shown only with more than one image.
	pub fn has_navigation(&self) -> bool {
		self.images.len() > 1
	}

	pub fn images(&self) -> &[String] {
		&self.images
	}
}

/// Report open in the edit modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
	pub report_id: RecordId,
	/// Stored job number, used as the cover-image file prefix.
	pub job_number: JobNumber,
}

/// Current UI selections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
	pub screen: Screen,
	pub admin_tab: AdminTab,
	pub sub_filter: SubFilter,
	pub admin_search: String,
	pub client_search: String,
	pub gallery: Gallery,
	pub open_premise: Option<RecordId>,
	pub map_style: MapStyle,
	pub edit_target: Option<EditTarget>,
}

impl ViewState {
	/// Activates `tab`; the sub-filter always resets to `All`.
	pub fn switch_tab(&mut self, tab: AdminTab) {
		self.admin_tab = tab;
		self.sub_filter = SubFilter::All;
	}

	pub fn close_detail(&mut self) {
		self.open_premise = None;
	}
}
