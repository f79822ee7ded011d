//! # portal-pages
//!
//! The interactive half of the inspection portal: the screen shell, the map
//! adapter with its maintenance tools, and the modal form controllers.
//!
//! [`Portal`] is driven by user actions and draws through a [`Surface`]. It
//! never talks to the network directly; every backend call goes through the
//! [`Gateway`](portal_gateway::Gateway) it was built with.
//!
//! ## Modules
//!
//! - [`shell`]: session flow, data loading and every action handler
//! - [`render`]: view models derived from [`AppState`](portal_core::AppState)
//! - [`map`]: widget lifecycle, markers and bulk maintenance
//! - [`forms`]: the five modal forms
//! - [`dispatch`]: action names carried by rendered markup
//! - [`surface`]: the rendering seam

pub mod dispatch;
pub mod error;
pub mod forms;
pub mod map;
pub mod render;
pub mod shell;
pub mod surface;

pub use dispatch::{Action, ActionTable};
pub use error::{PortalError, PortalResult};
pub use forms::{
	CreateClientForm, CreatePremiseForm, CreateReportForm, EditReportForm, RequestReportForm,
};
pub use map::{MaintenancePanel, MaintenanceTool, MapAdapter, MapContainer, MapFactory, MapWidget};
pub use shell::{Portal, PortalBuilder};
pub use surface::{Control, ControlState, Modal, Notice, NoticeLevel, SelectField, Surface};
