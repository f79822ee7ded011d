//! # portal-core
//!
//! Data model, application state and the view projection engine of the
//! inspection portal.
//!
//! Everything in this crate is synchronous and free of I/O. Backend rows are
//! normalized once when they are deserialized (ids, job numbers, statuses and the
//! legacy `image_url` encodings), so the projection functions only ever see
//! well-typed values.
//!
//! ## Modules
//!
//! - [`models`]: clients, premises, reports, report requests and write payloads
//! - [`state`]: the [`AppState`] context object owned by the shell
//! - [`session`] / [`view`]: identity and UI selections
//! - [`projection`]: filtering, ordering and display derivation for every list
//!
//! ## Example
//!
//! ```rust
//! use portal_core::projection::{SearchQuery, filter_reports};
//! use portal_core::view::SubFilter;
//!
//! let rows = filter_reports(&[], &[], &SearchQuery::new(""), &SubFilter::All);
//! assert!(rows.is_empty());
//! ```

pub mod clock;
pub mod dates;
pub mod ids;
pub mod images;
pub mod job;
pub mod models;
pub mod projection;
pub mod session;
pub mod state;
pub mod status;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::RecordId;
pub use images::ImageList;
pub use job::JobNumber;
pub use models::{
	Client, Coordinates, NewClient, NewPremise, NewReport, NewReportRequest, Premise, Report,
	ReportUpdate,
};
pub use session::{AdminSession, Session};
pub use state::{AdminBundle, AppState};
pub use status::{STATUS_OPTIONS, Status, StatusKind};
pub use view::{AdminTab, EditTarget, Gallery, MapStyle, Screen, SubFilter, ViewState};
