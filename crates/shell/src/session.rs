use std::sync::Arc;

use catalog::{Page, TagKey};
use foundation::RecordId;
use foundation::time::CivilDate;
use layers::{MapAdapter, MapConfig, MapProvider, MapStatus, Placeholder};
use runtime::EventBus;
use scene::visibility::{BlockId, ObserverSupport, RevealSet, RevealStyle};
use scene::{PageState, Record, Transition, changed_count};
use tracing::debug;

use crate::region::{Block, Region};
use crate::view::PageView;

/// One user or viewport event, as decoded from the DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SelectFilter(String),
    ToggleExpand(RecordId),
    Hover(RecordId),
    Unhover,
    Viewport { block: BlockId, ratio: f32 },
}

impl UiEvent {
    /// Decodes a `data-action` / `data-arg` pair. Unknown actions and
    /// unparsable ids yield `None`.
    pub fn from_action(action: &str, arg: &str) -> Option<Self> {
        match action {
            "filter" => Some(UiEvent::SelectFilter(arg.to_string())),
            "toggle" => arg.parse().ok().map(UiEvent::ToggleExpand),
            "hover" => arg.parse().ok().map(UiEvent::Hover),
            "unhover" => Some(UiEvent::Unhover),
            _ => None,
        }
    }
}

/// What the host must patch after a dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    /// Regions to re-render, in page order. Never contains `Region::Map`.
    pub regions: Vec<Region>,
    /// Inline styles to set on `[data-reveal]` blocks.
    pub restyle: Vec<(BlockId, String)>,
}

impl Update {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.restyle.is_empty()
    }

    fn regions(regions: &[Region]) -> Self {
        let mut regions = regions.to_vec();
        regions.sort();
        regions.dedup();
        Self {
            regions,
            restyle: Vec::new(),
        }
    }
}

/// Everything one mounted page owns.
pub struct PageSession<P: MapProvider> {
    page: Arc<Page>,
    state: PageState<TagKey>,
    reveal: RevealSet,
    map: Option<MapAdapter<P, TagKey>>,
    today: Option<CivilDate>,
    events: EventBus,
    mounted: bool,
}

impl<P: MapProvider> PageSession<P> {
    pub fn new(
        page: Arc<Page>,
        config: &MapConfig,
        observer: ObserverSupport,
        today: Option<CivilDate>,
    ) -> Self {
        let mut reveal = RevealSet::new(observer);
        for block in Block::ALL {
            if block != Block::Map || page.has_map() {
                reveal.register(block.id());
            }
        }
        let map = page
            .map_content()
            .map(|content| MapAdapter::new(page.map_container_id(), config, content));
        let mut events = EventBus::new();
        events.emit("mount", page.slug.clone());
        Self {
            page,
            state: PageState::new(),
            reveal,
            map,
            today,
            events,
            mounted: true,
        }
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    pub fn state(&self) -> &PageState<TagKey> {
        &self.state
    }

    pub fn reveal(&self) -> &RevealSet {
        &self.reveal
    }

    pub fn map(&self) -> Option<&MapAdapter<P, TagKey>> {
        self.map.as_ref()
    }

    /// The host drives map loading through this.
    pub fn map_mut(&mut self) -> Option<&mut MapAdapter<P, TagKey>> {
        self.map.as_mut()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn view(&self) -> PageView<'_> {
        PageView {
            page: &self.page,
            state: &self.state,
            reveal: &self.reveal,
            today: self.today,
            map_status: self.map_placeholder(),
        }
    }

    pub fn render(&self) -> String {
        self.view().render()
    }

    pub fn render_region(&self, region: Region) -> String {
        self.view().render_region(region)
    }

    /// Placeholder for the map region, or `None` when the map is live.
    pub fn map_placeholder(&self) -> Option<Placeholder> {
        match &self.map {
            Some(map) => map.placeholder(),
            None => None,
        }
    }

    /// Markup for the map's status slot (`[data-map-status]`).
    pub fn map_status_html(&self) -> String {
        self.map_placeholder().map(Placeholder::to_html).unwrap_or_default()
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Update {
        if !self.mounted {
            return Update::default();
        }
        debug!(slug = %self.page.slug, ?event, "dispatch");
        match event {
            UiEvent::SelectFilter(key) => self.select_filter(&key),
            UiEvent::ToggleExpand(id) => self.toggle_expand(id),
            UiEvent::Hover(id) => {
                if self.page.dataset().get(id).is_none() {
                    return Update::default();
                }
                match self.state.hover(id) {
                    Transition::Unchanged => Update::default(),
                    _ => Update::regions(&[Region::Records, Region::Diagram]),
                }
            }
            UiEvent::Unhover => match self.state.unhover() {
                Transition::Unchanged => Update::default(),
                _ => Update::regions(&[Region::Records, Region::Diagram]),
            },
            UiEvent::Viewport { block, ratio } => {
                if !self.reveal.observe(block, ratio) {
                    return Update::default();
                }
                self.events.emit("reveal", format!("block {}", block.0));
                let stagger = Block::from_id(block).map_or(0, Block::stagger_index);
                Update {
                    regions: Vec::new(),
                    restyle: vec![(block, RevealStyle::for_state(true, stagger).to_css())],
                }
            }
        }
    }

    fn select_filter(&mut self, key: &str) -> Update {
        let filter = self.page.legend().resolve_filter(key);
        let dataset = self.page.dataset();
        let before = self.state.filter().clone();
        let transition = self.state.select_filter(dataset, filter.clone());
        let Transition::FilterChanged { collapsed } = transition else {
            return Update::default();
        };
        let changed = changed_count(dataset, &before, &filter);
        debug!(filter = filter.key(), changed, "filter changed");
        self.events
            .emit("filter", format!("{} ({changed} records changed)", filter.key()));
        if let Some(map) = &mut self.map {
            let outcome = map.set_filter(filter);
            debug!(?outcome, "map filter");
        }
        let mut regions = vec![Region::Filters, Region::Diagram, Region::Records];
        if let Some(id) = collapsed {
            self.events.emit("collapse", id.to_string());
            regions.push(Region::Detail);
        }
        Update::regions(&regions)
    }

    fn toggle_expand(&mut self, id: RecordId) -> Update {
        let Some(entry) = self.page.dataset().get(id) else {
            debug!(%id, "toggle for unknown record ignored");
            return Update::default();
        };
        let has_coordinate = entry.coordinate().is_some();
        match self.state.toggle_expand(id) {
            Transition::Expanded { .. } => {
                self.events.emit("expand", id.to_string());
                if has_coordinate && let Some(map) = &mut self.map {
                    map.fly_to(id);
                }
            }
            Transition::Collapsed(_) => {
                self.events.emit("collapse", id.to_string());
            }
            _ => return Update::default(),
        }
        Update::regions(&[Region::Diagram, Region::Records, Region::Detail])
    }

    /// Tears down the map and stops accepting events. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if let Some(map) = &mut self.map {
            map.unmount();
        }
        self.events.emit("unmount", self.page.slug.clone());
    }

    pub fn map_status(&self) -> Option<MapStatus> {
        self.map.as_ref().map(MapAdapter::status)
    }
}

impl<P: MapProvider> Drop for PageSession<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::{PageSession, UiEvent, Update};
    use crate::region::{Block, Region};
    use catalog::Catalog;
    use foundation::RecordId;
    use layers::MapConfig;
    use layers::recording::RecordingProvider;
    use scene::visibility::ObserverSupport;

    fn session(slug: &str, observer: ObserverSupport) -> PageSession<RecordingProvider> {
        let catalog = Catalog::builtin().expect("catalog");
        let page = catalog.get(slug).expect("page").clone();
        PageSession::new(page, &MapConfig::with_token(None), observer, None)
    }

    #[test]
    fn decodes_dom_actions() {
        assert_eq!(
            UiEvent::from_action("toggle", "7"),
            Some(UiEvent::ToggleExpand(RecordId(7)))
        );
        assert_eq!(
            UiEvent::from_action("filter", "salt"),
            Some(UiEvent::SelectFilter("salt".into()))
        );
        assert_eq!(UiEvent::from_action("toggle", "seven"), None);
        assert_eq!(UiEvent::from_action("launch", "1"), None);
    }

    #[test]
    fn unknown_filter_key_falls_back_to_all() {
        let mut s = session("dynasties", ObserverSupport::Unavailable);
        s.dispatch(UiEvent::SelectFilter("modern".into()));
        let update = s.dispatch(UiEvent::SelectFilter("no-such-tag".into()));
        assert_eq!(update.regions, vec![Region::Filters, Region::Diagram, Region::Records]);
        assert!(s.state().filter().is_all());
        assert!(s.dispatch(UiEvent::SelectFilter("all".into())).is_empty());
        let last = s.events().events().back().expect("event");
        assert_eq!(last.message, "all (7 records changed)");
    }

    #[test]
    fn collapsing_filter_also_refreshes_detail() {
        let mut s = session("dynasties", ObserverSupport::Unavailable);
        s.dispatch(UiEvent::ToggleExpand(RecordId(6)));
        let update = s.dispatch(UiEvent::SelectFilter("modern".into()));
        assert!(update.regions.contains(&Region::Detail));
        assert_eq!(s.state().expanded(), None);
    }

    #[test]
    fn unknown_records_are_ignored() {
        let mut s = session("seven-saints", ObserverSupport::Unavailable);
        assert_eq!(s.dispatch(UiEvent::ToggleExpand(RecordId(99))), Update::default());
        assert_eq!(s.dispatch(UiEvent::Hover(RecordId(99))), Update::default());
        assert_eq!(s.state().expanded(), None);
    }

    #[test]
    fn viewport_reveals_each_block_once() {
        let mut s = session("lunar-month", ObserverSupport::Available);
        let update = s.dispatch(UiEvent::Viewport {
            block: Block::Section.id(),
            ratio: 0.4,
        });
        assert_eq!(update.restyle.len(), 1);
        assert!(update.restyle[0].1.starts_with("opacity:1;"));
        assert!(update.regions.is_empty());
        assert!(
            s.dispatch(UiEvent::Viewport {
                block: Block::Section.id(),
                ratio: 1.0
            })
            .is_empty()
        );
        assert!(s.reveal().is_revealed(Block::Section.id()));
        assert!(!s.reveal().is_revealed(Block::Hero.id()));
    }

    #[test]
    fn pages_without_a_map_have_no_adapter() {
        let s = session("seven-saints", ObserverSupport::Available);
        assert!(s.map().is_none());
        assert!(s.map_status_html().is_empty());
        assert!(!s.reveal().observing().contains(&Block::Map.id()));
    }

    #[test]
    fn unmounted_session_ignores_events() {
        let mut s = session("caravan-routes", ObserverSupport::Unavailable);
        s.unmount();
        s.unmount();
        assert!(!s.is_mounted());
        assert!(s.dispatch(UiEvent::ToggleExpand(RecordId(1))).is_empty());
        assert_eq!(s.events().kinds(), vec!["mount", "unmount"]);
    }
}
