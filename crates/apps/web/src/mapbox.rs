//! `MapProvider` over mapbox-gl, loaded on demand from the CDN.

use js_sys::Promise;
use layers::{FlyTo, LoadRequest, MapError, MapOptions, MapProvider, MarkerSpec, RouteSpec};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "
let __dwl_script = null;

export function dwl_load_library(scriptUrl, cssUrl) {
    if (!document.querySelector('link[data-dwl-map-css]')) {
        const link = document.createElement('link');
        link.rel = 'stylesheet';
        link.href = cssUrl;
        link.setAttribute('data-dwl-map-css', '');
        document.head.appendChild(link);
    }
    if (window.mapboxgl) return Promise.resolve(true);
    if (!__dwl_script) {
        __dwl_script = new Promise((resolve, reject) => {
            const s = document.createElement('script');
            s.src = scriptUrl;
            s.async = true;
            s.onload = () => resolve(true);
            s.onerror = () => {
                __dwl_script = null;
                s.remove();
                reject(new Error('failed to load ' + scriptUrl));
            };
            document.head.appendChild(s);
        });
    }
    return __dwl_script;
}

export function dwl_map_create(optionsJson, token) {
    mapboxgl.accessToken = token;
    const map = new mapboxgl.Map(JSON.parse(optionsJson));
    map.__dwl_ready = new Promise((resolve, reject) => {
        let settled = false;
        map.once('load', () => {
            settled = true;
            resolve(true);
        });
        map.once('error', (event) => {
            if (settled) return;
            settled = true;
            reject(event && event.error ? event.error : new Error('map failed to load'));
        });
    });
    return map;
}

export function dwl_map_ready(map) {
    return map.__dwl_ready;
}

export function dwl_map_add_controls(map) {
    map.addControl(new mapboxgl.NavigationControl({ showCompass: false }), 'top-right');
    map.addControl(new mapboxgl.AttributionControl({ compact: true }), 'bottom-right');
    map.addControl(new mapboxgl.ScaleControl({ unit: 'metric' }));
}

export function dwl_map_add_marker(map, lng, lat, color, radius, label, popupHtml) {
    const el = document.createElement('div');
    el.className = 'dwl-marker';
    el.setAttribute('role', 'img');
    el.setAttribute('aria-label', label);
    el.style.cssText = `width:${radius * 2}px;height:${radius * 2}px;border-radius:50%;background:${color};` +
        'border:2px solid #fff;box-shadow:0 0 0 1px rgba(0,0,0,.3);cursor:pointer;transition:opacity .3s ease';
    const popup = new mapboxgl.Popup({ offset: radius + 4, closeButton: false }).setHTML(popupHtml);
    return new mapboxgl.Marker({ element: el }).setLngLat([lng, lat]).setPopup(popup).addTo(map);
}

export function dwl_marker_opacity(marker, opacity) {
    const el = marker.getElement();
    el.style.opacity = String(opacity);
    el.style.visibility = opacity === 0 ? 'hidden' : 'visible';
}

export function dwl_map_add_route(map, sourceId, layerId, geojson, paint) {
    map.addSource(sourceId, { type: 'geojson', data: JSON.parse(geojson) });
    map.addLayer({
        id: layerId,
        type: 'line',
        source: sourceId,
        layout: { 'line-join': 'round', 'line-cap': 'round' },
        paint: JSON.parse(paint),
    });
}

export function dwl_route_opacity(map, layerId, opacity) {
    if (map.getLayer(layerId)) map.setPaintProperty(layerId, 'line-opacity', opacity);
}

export function dwl_map_fly_to(map, json) {
    map.flyTo(JSON.parse(json));
}

export function dwl_map_remove(map, markers) {
    for (const m of markers) m.remove();
    map.remove();
}
")]
extern "C" {
    fn dwl_load_library(script_url: &str, css_url: &str) -> Promise;

    #[wasm_bindgen(catch)]
    fn dwl_map_create(options_json: &str, token: &str) -> Result<JsValue, JsValue>;

    fn dwl_map_ready(map: &JsValue) -> Promise;

    #[wasm_bindgen(catch)]
    fn dwl_map_add_controls(map: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn dwl_map_add_marker(
        map: &JsValue,
        lng: f64,
        lat: f64,
        color: &str,
        radius: f32,
        label: &str,
        popup_html: &str,
    ) -> Result<JsValue, JsValue>;

    fn dwl_marker_opacity(marker: &JsValue, opacity: f32);

    #[wasm_bindgen(catch)]
    fn dwl_map_add_route(
        map: &JsValue,
        source_id: &str,
        layer_id: &str,
        geojson: &str,
        paint: &str,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn dwl_route_opacity(map: &JsValue, layer_id: &str, opacity: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn dwl_map_fly_to(map: &JsValue, json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn dwl_map_remove(map: &JsValue, markers: js_sys::Array) -> Result<(), JsValue>;
}

/// Injects the stylesheet and script once per document.
pub async fn load_library(request: &LoadRequest) -> Result<(), JsValue> {
    JsFuture::from(dwl_load_library(&request.script_url, &request.stylesheet_url)).await?;
    Ok(())
}

pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

pub(crate) fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{context}: {}", describe(err))));
}

#[derive(Debug)]
pub struct MapboxProvider {
    token: String,
    /// Resolves on the map's `load` event, rejects on an `error` before it.
    ready: Option<Promise>,
}

impl MapboxProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ready: None,
        }
    }

    pub fn ready(&self) -> Option<Promise> {
        self.ready.clone()
    }
}

impl MapProvider for MapboxProvider {
    type Map = JsValue;
    type Marker = JsValue;

    fn create_map(&mut self, options: &MapOptions) -> Result<JsValue, MapError> {
        let map = dwl_map_create(&options.to_json().to_string(), &self.token)
            .map_err(|e| MapError::Provider(describe(&e)))?;
        self.ready = Some(dwl_map_ready(&map));
        Ok(map)
    }

    fn add_controls(&mut self, map: &mut JsValue) {
        if let Err(e) = dwl_map_add_controls(map) {
            log_error("map controls", &e);
        }
    }

    fn add_marker(&mut self, map: &mut JsValue, spec: &MarkerSpec) -> Result<JsValue, MapError> {
        dwl_map_add_marker(
            map,
            spec.position.lng,
            spec.position.lat,
            &spec.style.color.to_css(),
            spec.style.radius_px,
            &spec.label,
            &spec.popup_html,
        )
        .map_err(|e| MapError::MarkerRejected {
            record: spec.record,
            reason: describe(&e),
        })
    }

    fn add_route(&mut self, map: &mut JsValue, route: &RouteSpec) -> Result<(), MapError> {
        dwl_map_add_route(
            map,
            &route.source_id(),
            &route.layer_id(),
            &route.to_geojson().to_string(),
            &route.paint_json(route.style.active_opacity).to_string(),
        )
        .map_err(|e| MapError::RouteRejected {
            route: route.id.clone(),
            reason: describe(&e),
        })
    }

    fn set_marker_opacity(&mut self, marker: &mut JsValue, opacity: f32) {
        dwl_marker_opacity(marker, opacity);
    }

    fn set_route_opacity(&mut self, map: &mut JsValue, route: &RouteSpec, opacity: f32) {
        if let Err(e) = dwl_route_opacity(map, &route.layer_id(), opacity) {
            log_error("route opacity", &e);
        }
    }

    fn fly_to(&mut self, map: &mut JsValue, target: &FlyTo) {
        if let Err(e) = dwl_map_fly_to(map, &target.to_json().to_string()) {
            log_error("fly to", &e);
        }
    }

    fn remove_map(&mut self, map: JsValue, markers: Vec<JsValue>) {
        let markers: js_sys::Array = markers.into_iter().collect();
        if let Err(e) = dwl_map_remove(&map, markers) {
            log_error("map remove", &e);
        }
        self.ready = None;
    }
}
