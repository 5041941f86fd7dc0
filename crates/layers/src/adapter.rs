use foundation::RecordId;
use runtime::{Generation, LatestSlot, LoadState, MountScope, UnavailableReason};
use scene::Filter;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::markers::MapContent;
use crate::placeholder::Placeholder;
use crate::provider::{FlyTo, LoadRequest, MapOptions, MapProvider};

pub const FLY_DURATION_MS: u32 = 1_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    /// Waiting for the map library script.
    LoadingLibrary,
    /// Map constructed, waiting for its style to load.
    Initializing,
    Ready,
    Unavailable(UnavailableReason),
    Unmounted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// `updated` markers changed opacity; the rest were already right.
    Applied { updated: usize },
    /// Held until the map is ready; a later filter replaces it.
    Queued,
    /// The map will never be ready.
    Ignored,
}

struct LiveMarker<M> {
    handle: M,
    opacity: f32,
}

struct LiveMap<P: MapProvider> {
    provider: P,
    map: P::Map,
    /// Parallel to `MapContent::markers`; `None` where the provider refused.
    markers: Vec<Option<LiveMarker<P::Marker>>>,
    routes: Vec<Option<f32>>,
    loaded: bool,
}

/// Owns one page's map for the lifetime of a mount.
///
/// The map library is late-bound: the host loads it after `begin_load`, then
/// reports back through `library_loaded`/`library_failed` and
/// `map_loaded`/`map_failed`, each tagged with the generation it was started
/// under. Completions from a
/// previous mount, or arriving after `unmount`, are ignored.
///
/// Filter and camera requests made before the map is ready are held in
/// latest-value slots and applied once on ready. After that a filter change
/// only adjusts marker opacity; markers are created exactly once.
///
/// Without a valid credential the adapter starts, and stays, unavailable.
pub struct MapAdapter<P: MapProvider, T> {
    options: MapOptions,
    load: Option<LoadRequest>,
    content: MapContent<T>,
    state: LoadState<LiveMap<P>>,
    scope: MountScope,
    generation: Generation,
    /// Filter currently reflected by the markers.
    filter: Filter<T>,
    pending_filter: LatestSlot<Filter<T>>,
    pending_fly: LatestSlot<FlyTo>,
}

impl<P: MapProvider, T: Clone + PartialEq + std::fmt::Debug> MapAdapter<P, T> {
    pub fn new(container_id: impl Into<String>, config: &MapConfig, content: MapContent<T>) -> Self {
        let mut scope = MountScope::new();
        let generation = scope.mount();
        let options = MapOptions {
            container_id: container_id.into(),
            style_url: config.style_url.clone(),
            viewpoint: content.viewpoint,
        };
        let (state, load) = match &config.credential {
            Ok(token) => (
                LoadState::Loading,
                Some(LoadRequest {
                    script_url: config.script_url(),
                    stylesheet_url: config.stylesheet_url(),
                    token: token.as_str().to_string(),
                }),
            ),
            Err(e) => {
                info!(container = %options.container_id, reason = %e, "map disabled");
                (
                    LoadState::Unavailable(UnavailableReason::Unconfigured(e.to_string())),
                    None,
                )
            }
        };
        Self {
            options,
            load,
            content,
            state,
            scope,
            generation,
            filter: Filter::All,
            pending_filter: LatestSlot::new(),
            pending_fly: LatestSlot::new(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn container_id(&self) -> &str {
        &self.options.container_id
    }

    pub fn content(&self) -> &MapContent<T> {
        &self.content
    }

    /// What the host must fetch. Returned once; `None` when unconfigured.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.scope.is_mounted() && self.state.is_loading() {
            self.load.take()
        } else {
            None
        }
    }

    /// The library script is available; construct the map.
    ///
    /// Returns `false` when the completion is stale, the map already exists,
    /// or construction failed (the adapter is then unavailable).
    pub fn library_loaded(&mut self, generation: Generation, mut provider: P) -> bool {
        if !self.scope.is_current(generation) {
            debug!(?generation, "ignoring library load for a previous mount");
            return false;
        }
        if !self.state.is_loading() {
            warn!(container = %self.options.container_id, "map already initialized, ignoring second init");
            return false;
        }
        match provider.create_map(&self.options) {
            Ok(map) => {
                debug!(container = %self.options.container_id, "map constructed");
                self.state = LoadState::Ready(LiveMap {
                    provider,
                    map,
                    markers: Vec::new(),
                    routes: Vec::new(),
                    loaded: false,
                });
                true
            }
            Err(e) => {
                warn!(container = %self.options.container_id, error = %e, "map construction failed");
                self.state = LoadState::Unavailable(UnavailableReason::Failed(e.to_string()));
                false
            }
        }
    }

    pub fn library_failed(&mut self, generation: Generation, reason: impl Into<String>) -> bool {
        if !self.scope.is_current(generation) || !self.state.is_loading() {
            return false;
        }
        let reason = reason.into();
        warn!(container = %self.options.container_id, %reason, "map library failed to load");
        self.state = LoadState::Unavailable(UnavailableReason::Failed(reason));
        true
    }

    /// The constructed map gave up before its `load` event (rejected token,
    /// unreachable style). Releases the map and shows the placeholder.
    pub fn map_failed(&mut self, generation: Generation, reason: impl Into<String>) -> bool {
        if !self.scope.is_current(generation) {
            return false;
        }
        if !matches!(&self.state, LoadState::Ready(live) if !live.loaded) {
            return false;
        }
        let reason = reason.into();
        warn!(container = %self.options.container_id, %reason, "map failed to load");
        self.pending_filter.clear();
        self.pending_fly.clear();
        if let Some(mut live) = self.state.fail(UnavailableReason::Failed(reason)) {
            live.provider.remove_map(live.map, Vec::new());
        }
        true
    }

    /// The map's style finished loading: add controls, markers and routes,
    /// then apply whatever filter and camera move arrived in the meantime.
    pub fn map_loaded(&mut self, generation: Generation) -> bool {
        if !self.scope.is_current(generation) {
            return false;
        }
        let Some(live) = self.state.ready_mut() else {
            return false;
        };
        if live.loaded {
            debug!("duplicate map load event ignored");
            return false;
        }

        live.provider.add_controls(&mut live.map);
        for source in &self.content.markers {
            let slot = match live.provider.add_marker(&mut live.map, &source.spec) {
                Ok(handle) => Some(LiveMarker {
                    handle,
                    opacity: source.spec.style.active_opacity,
                }),
                Err(e) => {
                    warn!(error = %e, "marker skipped");
                    None
                }
            };
            live.markers.push(slot);
        }
        for source in &self.content.routes {
            let slot = match live.provider.add_route(&mut live.map, &source.spec) {
                Ok(()) => Some(source.spec.style.active_opacity),
                Err(e) => {
                    warn!(error = %e, "route skipped");
                    None
                }
            };
            live.routes.push(slot);
        }
        live.loaded = true;

        if let Some(filter) = self.pending_filter.take() {
            self.filter = filter;
        }
        let dimmed = apply_filter(live, &self.content, &self.filter);
        if let Some(target) = self.pending_fly.take() {
            live.provider.fly_to(&mut live.map, &target);
        }
        info!(
            container = %self.options.container_id,
            markers = live.markers.iter().flatten().count(),
            routes = live.routes.iter().flatten().count(),
            dimmed,
            "map ready"
        );
        true
    }

    pub fn set_filter(&mut self, filter: Filter<T>) -> FilterOutcome {
        match &mut self.state {
            LoadState::Ready(live) if live.loaded => {
                let updated = apply_filter(live, &self.content, &filter);
                self.filter = filter;
                FilterOutcome::Applied { updated }
            }
            LoadState::Unavailable(_) => {
                self.filter = filter;
                FilterOutcome::Ignored
            }
            _ => {
                self.pending_filter.put(filter);
                FilterOutcome::Queued
            }
        }
    }

    /// Latest requested filter, applied or not.
    pub fn filter(&self) -> &Filter<T> {
        self.pending_filter.peek().unwrap_or(&self.filter)
    }

    /// Filter the markers currently show.
    pub fn applied_filter(&self) -> &Filter<T> {
        &self.filter
    }

    /// Moves the camera to `record`'s marker, now or once the map is ready.
    /// `false` if the record has no marker or the map is unavailable.
    pub fn fly_to(&mut self, record: RecordId) -> bool {
        let Some(marker) = self.content.marker(record) else {
            return false;
        };
        let view = self.content.viewpoint;
        let target = FlyTo {
            center: marker.spec.position,
            zoom: view.clamp_zoom(view.focus_zoom),
            duration_ms: FLY_DURATION_MS,
        };
        match &mut self.state {
            LoadState::Ready(live) if live.loaded => {
                live.provider.fly_to(&mut live.map, &target);
                true
            }
            LoadState::Unavailable(_) => false,
            _ => {
                self.pending_fly.put(target);
                true
            }
        }
    }

    pub fn status(&self) -> MapStatus {
        if !self.scope.is_mounted() {
            return MapStatus::Unmounted;
        }
        match &self.state {
            LoadState::Loading => MapStatus::LoadingLibrary,
            LoadState::Ready(live) if live.loaded => MapStatus::Ready,
            LoadState::Ready(_) => MapStatus::Initializing,
            LoadState::Unavailable(reason) => MapStatus::Unavailable(reason.clone()),
        }
    }

    /// What to show in the map region instead of the map, if anything.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self.status() {
            MapStatus::Ready => None,
            MapStatus::LoadingLibrary | MapStatus::Initializing => Some(Placeholder::Loading),
            MapStatus::Unavailable(_) | MapStatus::Unmounted => Some(Placeholder::Unavailable),
        }
    }

    pub fn provider(&self) -> Option<&P> {
        self.state.ready().map(|live| &live.provider)
    }
}

impl<P: MapProvider, T> MapAdapter<P, T> {
    /// Removes the map and markers. Later completions are ignored.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.scope.is_mounted() {
            return;
        }
        self.scope.unmount();
        self.load = None;
        self.pending_filter.clear();
        self.pending_fly.clear();
        if let Some(mut live) = self.state.fail(UnavailableReason::Cancelled) {
            let markers = live.markers.into_iter().flatten().map(|m| m.handle).collect();
            live.provider.remove_map(live.map, markers);
            info!(container = %self.options.container_id, "map removed");
        }
    }
}

impl<P: MapProvider, T> Drop for MapAdapter<P, T> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<P: MapProvider, T: std::fmt::Debug> std::fmt::Debug for MapAdapter<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapAdapter")
            .field("container", &self.options.container_id)
            .field("generation", &self.generation)
            .field("mounted", &self.scope.is_mounted())
            .field("filter", &self.filter)
            .field("markers", &self.content.markers.len())
            .finish_non_exhaustive()
    }
}

fn apply_filter<P: MapProvider, T: PartialEq>(
    live: &mut LiveMap<P>,
    content: &MapContent<T>,
    filter: &Filter<T>,
) -> usize {
    let mut updated = 0;
    for (source, slot) in content.markers.iter().zip(live.markers.iter_mut()) {
        let Some(marker) = slot else {
            continue;
        };
        let opacity = source.spec.style.opacity(filter.matches(&source.tag));
        if marker.opacity != opacity {
            live.provider.set_marker_opacity(&mut marker.handle, opacity);
            marker.opacity = opacity;
            updated += 1;
        }
    }
    for (source, slot) in content.routes.iter().zip(live.routes.iter_mut()) {
        let Some(current) = slot else {
            continue;
        };
        let matched = source.tag.as_ref().is_none_or(|t| filter.matches(t));
        let opacity = source.spec.style.opacity(matched);
        if *current != opacity {
            live.provider.set_route_opacity(&mut live.map, &source.spec, opacity);
            *current = opacity;
        }
    }
    updated
}
