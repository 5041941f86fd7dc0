//! In-memory `MapProvider` that records every call. Used by tests and by
//! the `dwl` CLI to dry-run a page's map without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::RecordId;

use crate::error::MapError;
use crate::provider::{FlyTo, MapOptions, MapProvider, MarkerSpec, RouteSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    CreateMap { container: String },
    AddControls,
    AddMarker(RecordId),
    AddRoute(String),
    MarkerOpacity(RecordId, f32),
    RouteOpacity(String, f32),
    FlyTo(FlyTo),
    RemoveMap { markers: usize },
}

/// Shared call log; stays readable after the provider is dropped.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<ProviderCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&ProviderCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn maps_created(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::CreateMap { .. }))
    }

    pub fn markers_created(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::AddMarker(_)))
    }

    pub fn maps_removed(&self) -> usize {
        self.count(|c| matches!(c, ProviderCall::RemoveMap { .. }))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: ProviderCall) {
        self.0.borrow_mut().push(call);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMap {
    pub options: MapOptions,
    pub routes: Vec<String>,
    pub camera: Option<FlyTo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMarker {
    pub record: RecordId,
    pub opacity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    log: CallLog,
    fail_create: bool,
    reject_markers: Vec<RecordId>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Map construction fails, like a library that rejects the token.
    pub fn failing(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn rejecting(mut self, record: RecordId) -> Self {
        self.reject_markers.push(record);
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl MapProvider for RecordingProvider {
    type Map = RecordedMap;
    type Marker = RecordedMarker;

    fn create_map(&mut self, options: &MapOptions) -> Result<RecordedMap, MapError> {
        self.log.push(ProviderCall::CreateMap {
            container: options.container_id.clone(),
        });
        if self.fail_create {
            return Err(MapError::Provider("401 Unauthorized".into()));
        }
        Ok(RecordedMap {
            options: options.clone(),
            routes: Vec::new(),
            camera: None,
        })
    }

    fn add_controls(&mut self, _map: &mut RecordedMap) {
        self.log.push(ProviderCall::AddControls);
    }

    fn add_marker(&mut self, _map: &mut RecordedMap, spec: &MarkerSpec) -> Result<RecordedMarker, MapError> {
        if self.reject_markers.contains(&spec.record) {
            return Err(MapError::MarkerRejected {
                record: spec.record,
                reason: "rejected".into(),
            });
        }
        self.log.push(ProviderCall::AddMarker(spec.record));
        Ok(RecordedMarker {
            record: spec.record,
            opacity: spec.style.active_opacity,
        })
    }

    fn add_route(&mut self, map: &mut RecordedMap, route: &RouteSpec) -> Result<(), MapError> {
        self.log.push(ProviderCall::AddRoute(route.id.clone()));
        map.routes.push(route.layer_id());
        Ok(())
    }

    fn set_marker_opacity(&mut self, marker: &mut RecordedMarker, opacity: f32) {
        self.log.push(ProviderCall::MarkerOpacity(marker.record, opacity));
        marker.opacity = opacity;
    }

    fn set_route_opacity(&mut self, _map: &mut RecordedMap, route: &RouteSpec, opacity: f32) {
        self.log.push(ProviderCall::RouteOpacity(route.id.clone(), opacity));
    }

    fn fly_to(&mut self, map: &mut RecordedMap, target: &FlyTo) {
        self.log.push(ProviderCall::FlyTo(*target));
        map.camera = Some(*target);
    }

    fn remove_map(&mut self, _map: RecordedMap, markers: Vec<RecordedMarker>) {
        self.log.push(ProviderCall::RemoveMap {
            markers: markers.len(),
        });
    }
}
