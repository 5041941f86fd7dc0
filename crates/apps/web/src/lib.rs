//! Browser entry: mounts a page into a root element and wires the DOM to
//! its `PageSession`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use catalog::{Catalog, Route};
use foundation::time::CivilDate;
use layers::{LoadRequest, MapConfig};
use runtime::Generation;
use scene::visibility::{BlockId, DEFAULT_REVEAL_THRESHOLD, ObserverSupport};
use shell::{PageSession, UiEvent, Update, render_index, render_not_found};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Element, Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

mod mapbox;
use mapbox::{MapboxProvider, describe, load_library, log_error};

// Guard to prevent double-initialization (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static NEXT_HANDLE: AtomicU32 = AtomicU32::new(1);

/// DOM events the root listens to. Clicks drive filters and expansion,
/// pointer movement drives hover.
const LISTENED: [&str; 3] = ["click", "mouseover", "mouseleave"];

type Listener = Closure<dyn FnMut(Event)>;
type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Mounted {
    root: Element,
    /// `None` on the index and not-found pages, which have no state.
    session: Option<PageSession<MapboxProvider>>,
    listeners: Vec<(&'static str, Listener)>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
}

thread_local! {
    static CATALOG: Result<Catalog, String> = Catalog::builtin().map_err(|e| e.to_string());
    static MOUNTS: RefCell<BTreeMap<u32, Mounted>> = RefCell::new(BTreeMap::new());
}

fn with_mounts<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<BTreeMap<u32, Mounted>>) -> R,
    R: Default,
{
    MOUNTS.try_with(f).unwrap_or_default()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    Ok(())
}

/// A mounted page. Call `unmount` before mounting another page into the
/// same root.
#[wasm_bindgen]
pub struct PageHandle {
    id: u32,
}

#[wasm_bindgen]
impl PageHandle {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Removes listeners, disconnects the observer, removes the map and
    /// abandons any pending map load. Safe to call twice.
    pub fn unmount(&self) {
        unmount(self.id);
    }
}

/// Renders the page at `path` into the element `root_id`.
///
/// `token` overrides the access token baked in at build time.
#[wasm_bindgen]
pub fn mount_page(root_id: &str, path: &str, token: Option<String>) -> Result<PageHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{root_id}")))?;

    let (html, page) = CATALOG.with(|c| -> Result<_, JsValue> {
        let catalog = c.as_ref().map_err(|e| JsValue::from_str(e))?;
        Ok(match catalog.resolve(path) {
            Route::Index => (render_index(catalog), None),
            Route::NotFound(p) => (render_not_found(&p), None),
            Route::Page(page) => (String::new(), Some(page)),
        })
    })?;

    let id = NEXT_HANDLE.fetch_add(1, Ordering::SeqCst);
    let Some(page) = page else {
        root.set_inner_html(&html);
        MOUNTS.with(|m| {
            m.borrow_mut().insert(
                id,
                Mounted {
                    root,
                    session: None,
                    listeners: Vec::new(),
                    observer: None,
                },
            )
        });
        return Ok(PageHandle { id });
    };

    let config = match token.as_deref() {
        Some(raw) => MapConfig::with_token(Some(raw)),
        None => MapConfig::from_env(),
    };
    let support = if js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false)
    {
        ObserverSupport::Available
    } else {
        ObserverSupport::Unavailable
    };
    let mut session = PageSession::new(page, &config, support, today());
    root.set_inner_html(&session.render());

    let load = session
        .map_mut()
        .and_then(|map| map.begin_load().map(|request| (map.generation(), request)));

    let mut listeners = Vec::with_capacity(LISTENED.len());
    for kind in LISTENED {
        let listener: Listener = Closure::new(move |event: Event| {
            if let Some(ui) = decode_event(kind, &event) {
                dispatch(id, ui);
            }
        });
        root.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        listeners.push((kind, listener));
    }

    let observer = match support {
        ObserverSupport::Available => match observe_reveals(id, &root) {
            Ok(pair) => Some(pair),
            Err(e) => {
                // Blocks stay hidden without an observer, so show them all.
                log_error("intersection observer", &e);
                reveal_all(&root);
                None
            }
        },
        ObserverSupport::Unavailable => None,
    };

    MOUNTS.with(|m| {
        m.borrow_mut().insert(
            id,
            Mounted {
                root,
                session: Some(session),
                listeners,
                observer,
            },
        )
    });

    if let Some((generation, request)) = load {
        spawn_local(load_map(id, generation, request));
    }
    Ok(PageHandle { id })
}

fn unmount(id: u32) {
    let Some(mut mounted) = with_mounts(|m| m.borrow_mut().remove(&id)) else {
        return;
    };
    for (kind, listener) in &mounted.listeners {
        if let Err(e) = mounted
            .root
            .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
        {
            log_error("remove listener", &e);
        }
    }
    if let Some((observer, _)) = &mounted.observer {
        observer.disconnect();
    }
    if let Some(session) = mounted.session.as_mut() {
        session.unmount();
    }
    mounted.root.set_inner_html("");
    debug!(id, "page unmounted");
}

/// Applies one event to a mounted page and patches the DOM. Returns `true`
/// when anything changed.
fn dispatch(id: u32, event: UiEvent) -> bool {
    with_mounts(|m| {
        let mut mounts = m.borrow_mut();
        let Some(mounted) = mounts.get_mut(&id) else {
            return false;
        };
        let Some(session) = mounted.session.as_mut() else {
            return false;
        };
        let update = session.dispatch(event);
        if update.is_empty() {
            return false;
        }
        if let Err(e) = apply_update(&mounted.root, session, &update) {
            log_error("render", &e);
        }
        true
    })
}

fn decode_event(kind: &str, event: &Event) -> Option<UiEvent> {
    if kind == "mouseleave" {
        return Some(UiEvent::Unhover);
    }
    let target = event.target()?.dyn_into::<Element>().ok()?;
    match kind {
        "click" => {
            let el = target.closest("[data-action]").ok()??;
            let action = el.get_attribute("data-action")?;
            let arg = el.get_attribute("data-arg").unwrap_or_default();
            UiEvent::from_action(&action, &arg)
        }
        "mouseover" => match target.closest("[data-hover]").ok()? {
            Some(el) => el
                .get_attribute("data-hover")?
                .parse()
                .ok()
                .map(UiEvent::Hover),
            None => Some(UiEvent::Unhover),
        },
        _ => None,
    }
}

/// Re-renders the dirty regions and restyles revealed blocks. The map
/// region is never touched: the map library owns its DOM.
fn apply_update(
    root: &Element,
    session: &PageSession<MapboxProvider>,
    update: &Update,
) -> Result<(), JsValue> {
    for region in &update.regions {
        let selector = format!(r#"[data-region="{}"]"#, region.key());
        if let Some(el) = root.query_selector(&selector)? {
            el.set_inner_html(&session.render_region(*region));
        }
    }
    for (block, css) in &update.restyle {
        let selector = format!(r#"[data-reveal="{}"]"#, block.0);
        if let Some(el) = root.query_selector(&selector)? {
            el.set_attribute("style", css)?;
        }
    }
    Ok(())
}

fn observe_reveals(
    id: u32,
    root: &Element,
) -> Result<(IntersectionObserver, ObserverCallback), JsValue> {
    let callback: ObserverCallback = Closure::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(block) = target
                    .get_attribute("data-reveal")
                    .and_then(|v| v.parse().ok())
                    .map(BlockId)
                else {
                    continue;
                };
                let ratio = entry.intersection_ratio() as f32;
                if dispatch(id, UiEvent::Viewport { block, ratio }) {
                    observer.unobserve(&target);
                }
            }
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(f64::from(DEFAULT_REVEAL_THRESHOLD)));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    let blocks = root.query_selector_all("[data-reveal]")?;
    for i in 0..blocks.length() {
        if let Some(node) = blocks.item(i)
            && let Ok(el) = node.dyn_into::<Element>()
        {
            observer.observe(&el);
        }
    }
    Ok((observer, callback))
}

fn reveal_all(root: &Element) {
    let Ok(blocks) = root.query_selector_all("[data-reveal]") else {
        return;
    };
    for i in 0..blocks.length() {
        if let Some(node) = blocks.item(i)
            && let Ok(el) = node.dyn_into::<Element>()
        {
            let _ = el.remove_attribute("style");
        }
    }
}

fn refresh_map_status(root: &Element, session: &PageSession<MapboxProvider>) {
    if let Ok(Some(slot)) = root.query_selector("[data-map-status]") {
        slot.set_inner_html(&session.map_status_html());
    }
}

/// Loads the library, constructs the map, waits for its style, then adds
/// markers. Each step re-checks that the page is still mounted.
async fn load_map(id: u32, generation: Generation, request: LoadRequest) {
    let loaded = load_library(&request).await;

    let ready = with_mounts(|m| {
        let mut mounts = m.borrow_mut();
        let mounted = mounts.get_mut(&id)?;
        let session = mounted.session.as_mut()?;
        let map = session.map_mut()?;
        let ready = match &loaded {
            Ok(()) => {
                if map.library_loaded(generation, MapboxProvider::new(request.token.clone())) {
                    map.provider().and_then(MapboxProvider::ready)
                } else {
                    None
                }
            }
            Err(e) => {
                map.library_failed(generation, describe(e));
                None
            }
        };
        refresh_map_status(&mounted.root, session);
        ready
    });
    let Some(ready) = ready else {
        return;
    };

    let outcome = JsFuture::from(ready).await;
    if let Err(e) = &outcome {
        log_error("map load", e);
    }

    with_mounts(|m| {
        let mut mounts = m.borrow_mut();
        let Some(mounted) = mounts.get_mut(&id) else {
            return;
        };
        let Some(session) = mounted.session.as_mut() else {
            return;
        };
        if let Some(map) = session.map_mut() {
            match &outcome {
                Ok(_) => {
                    map.map_loaded(generation);
                }
                Err(e) => {
                    map.map_failed(generation, describe(e));
                }
            }
        }
        refresh_map_status(&mounted.root, session);
    });
}

/// Local calendar date of the browser.
fn today() -> Option<CivilDate> {
    let now = js_sys::Date::new_0();
    CivilDate::new(
        now.get_full_year() as i32,
        (now.get_month() + 1) as u8,
        now.get_date() as u8,
    )
    .ok()
}
