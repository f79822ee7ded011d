//! Map adapter.
//!
//! The third-party map widget is reached through [`MapWidget`] and
//! [`MapFactory`]. [`MapAdapter`] keeps at most one live widget, rebuilds it
//! when the screen needs a different container, and queues markers until the
//! widget reports that it has loaded.

pub mod maintenance;

pub use maintenance::{
	MaintenancePanel, MaintenanceTool, MaintenanceView, PanelState, fix_coordinates,
	group_cover_files, match_logo, sync_covers, sync_logos,
};

use crate::error::PortalResult;
use portal_conf::{CameraSettings, MapSettings};
use portal_core::projection::project_premise;
use portal_core::{Coordinates, MapStyle, Premise, RecordId, Report};
use std::sync::Arc;

/// DOM containers a map can be mounted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapContainer {
	LoginBackground,
	Admin,
	Premises,
}

impl MapContainer {
	pub fn id(self) -> &'static str {
		match self {
			Self::LoginBackground => "loginMapBackground",
			Self::Admin => "adminMap",
			Self::Premises => "premisesMap",
		}
	}
}

/// On-map controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapControl {
	Navigation { show_zoom: bool },
	StyleToggle,
	/// Bulk maintenance tools, administrator only.
	Maintenance,
}

/// Everything needed to construct a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
	pub container: MapContainer,
	pub style: String,
	pub camera: CameraSettings,
	pub controls: Vec<MapControl>,
}

/// A camera transition; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraMove {
	/// `[lng, lat]`.
	pub center: Option<[f64; 2]>,
	pub zoom: Option<f64>,
	pub pitch: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
	/// Image marker. The widget falls back to a dot when the image fails to load.
	Thumbnail(String),
	Dot,
}

/// A premise marker. Clicking it dispatches `open-premise` with `premise_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
	pub premise_id: RecordId,
	/// `[lng, lat]`.
	pub position: [f64; 2],
	pub kind: MarkerKind,
}

/// A live map widget instance.
pub trait MapWidget: Send {
	fn container(&self) -> MapContainer;

	/// Whether the style has finished loading.
	fn is_loaded(&self) -> bool;

	fn clear_markers(&mut self);

	fn add_marker(&mut self, marker: Marker);

	fn fly_to(&mut self, camera: CameraMove);

	fn set_style(&mut self, style: &str);

	/// Detaches from the container and releases the widget.
	fn remove(&mut self);
}

/// Builds widgets.
pub trait MapFactory: Send + Sync {
	fn create(&self, options: &MapOptions) -> PortalResult<Box<dyn MapWidget>>;
}

/// Markers for every premise with known coordinates, thumbnails from the
/// premise's newest image.
pub fn markers_for(premises: &[Premise], all_reports: &[Report]) -> Vec<Marker> {
	premises
		.iter()
		.filter_map(|premise| {
			let position = premise.coordinates?.lng_lat();
			let view = project_premise(premise, all_reports);
			let kind = view
				.display_image()
				.map_or(MarkerKind::Dot, |image| MarkerKind::Thumbnail(image.to_string()));
			Some(Marker {
				premise_id: premise.id.clone(),
				position,
				kind,
			})
		})
		.collect()
}

/// Owns the single live widget.
pub struct MapAdapter {
	factory: Arc<dyn MapFactory>,
	settings: MapSettings,
	widget: Option<Box<dyn MapWidget>>,
	pending: Option<PendingMarkers>,
}

struct PendingMarkers {
	markers: Vec<Marker>,
	/// Camera target once the markers are placed.
	focus: Option<[f64; 2]>,
}

impl MapAdapter {
	pub fn new(factory: Arc<dyn MapFactory>, settings: MapSettings) -> Self {
		Self {
			factory,
			settings,
			widget: None,
			pending: None,
		}
	}

	pub fn style_url(&self, style: MapStyle) -> &str {
		match style {
			MapStyle::Custom => &self.settings.custom_style,
			MapStyle::Satellite => &self.settings.satellite_style,
		}
	}

	pub fn container(&self) -> Option<MapContainer> {
		self.widget.as_ref().map(|widget| widget.container())
	}

	#[cfg(test)]
	fn is_mounted(&self) -> bool {
		self.widget.is_some()
	}

	#[cfg(test)]
	fn has_pending_markers(&self) -> bool {
		self.pending.is_some()
	}

	/// Mounts a widget in `container`.
	///
	/// A widget already in that container is kept; one in another container
	/// is removed first.
	pub fn mount(&mut self, container: MapContainer, style: MapStyle, with_maintenance: bool) -> PortalResult<()> {
		if self.container() == Some(container) {
			return Ok(());
		}
		self.unmount();
		let options = self.options(container, style, with_maintenance);
		let widget = self.factory.create(&options)?;
		tracing::debug!(container = container.id(), "mounted map widget");
		self.widget = Some(widget);
		Ok(())
	}

	fn options(&self, container: MapContainer, style: MapStyle, with_maintenance: bool) -> MapOptions {
		let (camera, controls) = match container {
			MapContainer::LoginBackground => (self.settings.login_camera, Vec::new()),
			MapContainer::Admin | MapContainer::Premises => {
				let mut controls = vec![
					MapControl::Navigation { show_zoom: false },
					MapControl::StyleToggle,
				];
				if with_maintenance {
					controls.push(MapControl::Maintenance);
				}
				(self.settings.app_camera, controls)
			}
		};
		MapOptions {
			container,
			style: self.style_url(style).to_string(),
			camera,
			controls,
		}
	}

	/// Removes the live widget and drops queued markers.
	pub fn unmount(&mut self) {
		if let Some(mut widget) = self.widget.take() {
			widget.remove();
		}
		self.pending = None;
	}

	/// Replaces all markers, or queues them until the widget has loaded.
	pub fn place_markers(&mut self, premises: &[Premise], all_reports: &[Report]) {
		let pending = PendingMarkers {
			markers: markers_for(premises, all_reports),
			focus: premises
				.first()
				.and_then(|premise| premise.coordinates)
				.map(|coordinates| coordinates.lng_lat()),
		};
		match self.widget.as_mut() {
			Some(widget) if widget.is_loaded() => {
				Self::apply(&mut **widget, pending, self.settings.overview_zoom);
			}
			Some(_) => self.pending = Some(pending),
			None => {}
		}
	}

	/// Flushes markers queued before the widget loaded.
	pub fn on_loaded(&mut self) {
		if let (Some(widget), Some(pending)) = (self.widget.as_mut(), self.pending.take()) {
			Self::apply(&mut **widget, pending, self.settings.overview_zoom);
		}
	}

	fn apply(widget: &mut dyn MapWidget, pending: PendingMarkers, zoom: f64) {
		widget.clear_markers();
		let count = pending.markers.len();
		for marker in pending.markers {
			widget.add_marker(marker);
		}
		if let Some(center) = pending.focus {
			widget.fly_to(CameraMove {
				center: Some(center),
				zoom: Some(zoom),
				pitch: None,
			});
		}
		tracing::debug!(markers = count, "placed map markers");
	}

	/// Close-up of an opened premise.
	pub fn focus_premise(&mut self, coordinates: Coordinates) {
		let camera = CameraMove {
			center: Some(coordinates.lng_lat()),
			zoom: Some(self.settings.detail_zoom),
			pitch: Some(self.settings.detail_pitch),
		};
		if let Some(widget) = self.widget.as_mut() {
			widget.fly_to(camera);
		}
	}

	/// Back to the overview after the detail panel closes.
	pub fn overview(&mut self) {
		let camera = CameraMove {
			center: None,
			zoom: Some(self.settings.overview_zoom),
			pitch: Some(0.0),
		};
		if let Some(widget) = self.widget.as_mut() {
			widget.fly_to(camera);
		}
	}

	pub fn set_style(&mut self, style: MapStyle) {
		let url = self.style_url(style).to_string();
		if let Some(widget) = self.widget.as_mut() {
			widget.set_style(&url);
		}
	}
}

impl std::fmt::Debug for MapAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MapAdapter")
			.field("container", &self.container())
			.field("pending", &self.pending.as_ref().map(|p| p.markers.len()))
			.finish()
	}
}


#[cfg(test)]
mod tests {
	use super::fake::{FakeMaps, MapEvent};
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn premises() -> Vec<Premise> {
		serde_json::from_value(json!([
			{"id": 1, "name": "Wharf", "address": "1 Quay St", "lat": -36.84, "lng": 174.76},
			{"id": 2, "name": "Depot", "address": "9 Rail Rd"},
			{"id": 3, "name": "Mall", "address": "5 High St", "lat": -36.9, "lng": 174.8}
		]))
		.unwrap()
	}

	fn reports() -> Vec<Report> {
		serde_json::from_value(json!([
			{"id": 10, "premise_id": 3, "job_number": "5", "image_url": "https://cdn.test/mall.jpg"}
		]))
		.unwrap()
	}

	fn adapter(maps: &Arc<FakeMaps>) -> MapAdapter {
		MapAdapter::new(maps.clone(), MapSettings::default())
	}

	#[rstest]
	fn test_same_container_keeps_widget() {
		// Arrange
		let maps = Arc::new(FakeMaps::loaded());
		let mut adapter = adapter(&maps);

		// Act
		adapter.mount(MapContainer::Admin, MapStyle::Custom, true).unwrap();
		adapter.mount(MapContainer::Admin, MapStyle::Custom, true).unwrap();
		adapter.mount(MapContainer::Premises, MapStyle::Satellite, false).unwrap();

		// Assert
		let events = maps.events();
		assert_eq!(events.len(), 3);
		assert!(matches!(&events[0], MapEvent::Created(options) if options.controls.contains(&MapControl::Maintenance)));
		assert_eq!(events[1], MapEvent::Removed(MapContainer::Admin));
		let MapEvent::Created(options) = &events[2] else {
			panic!("expected a created widget");
		};
		assert_eq!(options.style, "mapbox://styles/mapbox/satellite-streets-v12");
		assert!(!options.controls.contains(&MapControl::Maintenance));
		assert_eq!(options.camera.pitch, 60.0);
	}

	#[rstest]
	fn test_login_background_has_no_controls() {
		let maps = Arc::new(FakeMaps::loaded());
		let mut adapter = adapter(&maps);

		adapter.mount(MapContainer::LoginBackground, MapStyle::Custom, false).unwrap();

		let MapEvent::Created(options) = &maps.events()[0] else {
			panic!("expected a created widget");
		};
		assert!(options.controls.is_empty());
		assert_eq!(options.camera.zoom, 4.8);
		assert_eq!(options.camera.bearing, 0.0);
	}

	#[rstest]
	fn test_markers_skip_premises_without_coordinates() {
		let markers = markers_for(&premises(), &reports());

		assert_eq!(markers.len(), 2);
		assert_eq!(markers[0].kind, MarkerKind::Dot);
		assert_eq!(markers[0].position, [174.76, -36.84]);
		assert_eq!(markers[1].kind, MarkerKind::Thumbnail("https://cdn.test/mall.jpg".to_string()));
	}

	#[rstest]
	fn test_markers_wait_for_load() {
		// Arrange
		let maps = Arc::new(FakeMaps::default());
		let mut adapter = adapter(&maps);
		adapter.mount(MapContainer::Premises, MapStyle::Custom, false).unwrap();

		// Act
		adapter.place_markers(&premises(), &reports());
		let before = maps.events().len();
		adapter.on_loaded();

		// Assert
		assert_eq!(before, 1);
		let events = maps.events();
		assert_eq!(events[1], MapEvent::Cleared(MapContainer::Premises));
		assert_eq!(
			events.last(),
			Some(&MapEvent::FlyTo(CameraMove {
				center: Some([174.76, -36.84]),
				zoom: Some(14.0),
				pitch: None,
			}))
		);
		assert!(!adapter.has_pending_markers());
	}

	#[rstest]
	fn test_no_fly_when_first_premise_has_no_coordinates() {
		let maps = Arc::new(FakeMaps::loaded());
		let mut adapter = adapter(&maps);
		adapter.mount(MapContainer::Admin, MapStyle::Custom, false).unwrap();
		let mut list = premises();
		list.swap(0, 1);

		adapter.place_markers(&list, &[]);

		assert!(!maps.events().iter().any(|event| matches!(event, MapEvent::FlyTo(_))));
	}

	#[rstest]
	fn test_detail_camera_moves() {
		let maps = Arc::new(FakeMaps::loaded());
		let mut adapter = adapter(&maps);
		adapter.mount(MapContainer::Premises, MapStyle::Custom, false).unwrap();

		adapter.focus_premise(Coordinates::new(-36.84, 174.76));
		adapter.overview();

		let events = maps.events();
		assert_eq!(
			events[1],
			MapEvent::FlyTo(CameraMove {
				center: Some([174.76, -36.84]),
				zoom: Some(16.0),
				pitch: Some(60.0),
			})
		);
		assert_eq!(
			events[2],
			MapEvent::FlyTo(CameraMove {
				center: None,
				zoom: Some(14.0),
				pitch: Some(0.0),
			})
		);
	}

	#[rstest]
	fn test_unmount_drops_queued_markers() {
		let maps = Arc::new(FakeMaps::default());
		let mut adapter = adapter(&maps);
		adapter.mount(MapContainer::Premises, MapStyle::Custom, false).unwrap();
		adapter.place_markers(&premises(), &[]);

		adapter.unmount();

		assert!(!adapter.is_mounted());
		assert!(!adapter.has_pending_markers());
	}
}
