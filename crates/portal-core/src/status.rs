//! Report lifecycle status.
//!
//! Statuses are stored as free text. The portal normalizes them case-insensitively
//! for lookups and CSS class tokens while keeping the stored text for display.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Rank given to statuses outside the canonical set, so they sort last.
pub const UNKNOWN_RANK: u8 = 99;

/// Display text of the canonical statuses, in lifecycle order.
pub const STATUS_OPTIONS: [&str; 7] = [
	"New",
	"Inspection",
	"Report",
	"Advice",
	"Invoice",
	"Pending",
	"Complete",
];

/// The seven canonical report statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
	New,
	Inspection,
	Report,
	Advice,
	Invoice,
	Pending,
	Complete,
}

impl StatusKind {
	/// All statuses in lifecycle order.
	pub const ALL: [StatusKind; 7] = [
		Self::New,
		Self::Inspection,
		Self::Report,
		Self::Advice,
		Self::Invoice,
		Self::Pending,
		Self::Complete,
	];

	/// Parses a normalized (trimmed, lowercase) status key.
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"new" => Some(Self::New),
			"inspection" => Some(Self::Inspection),
			"report" => Some(Self::Report),
			"advice" => Some(Self::Advice),
			"invoice" => Some(Self::Invoice),
			"pending" => Some(Self::Pending),
			"complete" => Some(Self::Complete),
			_ => None,
		}
	}

	/// Normalized key, also used as the CSS class token.
	pub fn key(self) -> &'static str {
		match self {
			Self::New => "new",
			Self::Inspection => "inspection",
			Self::Report => "report",
			Self::Advice => "advice",
			Self::Invoice => "invoice",
			Self::Pending => "pending",
			Self::Complete => "complete",
		}
	}

	/// Canonical display label.
	pub fn label(self) -> &'static str {
		STATUS_OPTIONS[self.rank() as usize - 1]
	}

	/// Position in the fixed status ordering, 1 (new) through 7 (complete).
	pub fn rank(self) -> u8 {
		match self {
			Self::New => 1,
			Self::Inspection => 2,
			Self::Report => 3,
			Self::Advice => 4,
			Self::Invoice => 5,
			Self::Pending => 6,
			Self::Complete => 7,
		}
	}

	/// Whether a report in this status still counts as an active job.
	pub fn is_active(self) -> bool {
		!matches!(self, Self::Complete | Self::Invoice | Self::Pending)
	}
}

/// Trims and lowercases a stored status.
pub fn normalize_status(raw: &str) -> String {
	raw.trim().to_lowercase()
}

/// A stored report status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
	raw: String,
}

impl Status {
	/// Wraps stored status text.
	pub fn new(raw: impl Into<String>) -> Self {
		Self { raw: raw.into() }
	}

	/// Stored text with its original casing.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Trimmed lowercase key.
	pub fn key(&self) -> String {
		normalize_status(&self.raw)
	}

	/// Canonical kind, if the stored text names one.
	pub fn kind(&self) -> Option<StatusKind> {
		StatusKind::from_key(&self.key())
	}

	/// Ordering rank; unknown statuses sort last.
	pub fn rank(&self) -> u8 {
		self.kind().map_or(UNKNOWN_RANK, StatusKind::rank)
	}

	/// Active unless the status is complete, invoice or pending.
	///
	/// Unknown and empty statuses count as active.
	pub fn is_active(&self) -> bool {
		self.kind().is_none_or(StatusKind::is_active)
	}

	pub fn is_empty(&self) -> bool {
		self.raw.trim().is_empty()
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl From<StatusKind> for Status {
	fn from(kind: StatusKind) -> Self {
		Self::new(kind.label())
	}
}

impl Serialize for Status {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.raw)
	}
}

impl<'de> Deserialize<'de> for Status {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Self::new(
			Option::<String>::deserialize(deserializer)?.unwrap_or_default(),
		))
	}
}
