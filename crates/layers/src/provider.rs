use foundation::RecordId;
use foundation::math::{LngLat, path_length_m};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::MapError;
use crate::symbology::{MarkerStyle, RouteStyle};

/// Initial camera of a map page.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub center: LngLat,
    pub zoom: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Zoom used when flying to a single record.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: f64,
}

fn default_min_zoom() -> f64 {
    1.0
}

fn default_max_zoom() -> f64 {
    12.0
}

fn default_focus_zoom() -> f64 {
    6.0
}

impl Viewpoint {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            focus_zoom: default_focus_zoom(),
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom.max(self.min_zoom))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub container_id: String,
    pub style_url: String,
    pub viewpoint: Viewpoint,
}

impl MapOptions {
    /// Constructor options object for the map library.
    pub fn to_json(&self) -> Value {
        json!({
            "container": self.container_id,
            "style": self.style_url,
            "center": self.viewpoint.center.to_array(),
            "zoom": self.viewpoint.clamp_zoom(self.viewpoint.zoom),
            "minZoom": self.viewpoint.min_zoom,
            "maxZoom": self.viewpoint.max_zoom,
            // `add_controls` installs a compact attribution control instead.
            "attributionControl": false,
            "cooperativeGestures": true,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub record: RecordId,
    pub position: LngLat,
    pub label: String,
    /// Pre-escaped HTML shown in the marker popup.
    pub popup_html: String,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec {
    pub id: String,
    pub label: String,
    pub path: Vec<LngLat>,
    pub style: RouteStyle,
}

impl RouteSpec {
    pub fn source_id(&self) -> String {
        format!("route-src-{}", self.id)
    }

    pub fn layer_id(&self) -> String {
        format!("route-{}", self.id)
    }

    pub fn length_m(&self) -> f64 {
        path_length_m(&self.path)
    }

    pub fn to_geojson(&self) -> Value {
        let coordinates: Vec<[f64; 2]> = self.path.iter().map(|p| p.to_array()).collect();
        json!({
            "type": "Feature",
            "properties": { "id": self.id, "label": self.label },
            "geometry": { "type": "LineString", "coordinates": coordinates },
        })
    }

    /// Paint properties of the line layer at the given opacity.
    pub fn paint_json(&self, opacity: f32) -> Value {
        let mut paint = json!({
            "line-color": self.style.color.to_css(),
            "line-width": self.style.width_px,
            "line-opacity": opacity,
        });
        if self.style.dashed {
            paint["line-dasharray"] = json!([2, 2]);
        }
        paint
    }
}

/// Camera move to one place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub center: LngLat,
    pub zoom: f64,
    pub duration_ms: u32,
}

impl FlyTo {
    pub fn to_json(&self) -> Value {
        json!({
            "center": self.center.to_array(),
            "zoom": self.zoom,
            "duration": self.duration_ms,
            "essential": true,
        })
    }
}

/// What the host must fetch before the map library can be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub script_url: String,
    pub stylesheet_url: String,
    pub token: String,
}

/// The third-party map library, seen from the adapter.
///
/// Implementations wrap one concrete library. All calls happen on the UI
/// thread; errors are reported, never thrown across the boundary.
pub trait MapProvider {
    type Map;
    type Marker;

    fn create_map(&mut self, options: &MapOptions) -> Result<Self::Map, MapError>;

    /// Navigation and attribution controls.
    fn add_controls(&mut self, map: &mut Self::Map);

    fn add_marker(&mut self, map: &mut Self::Map, spec: &MarkerSpec) -> Result<Self::Marker, MapError>;

    fn add_route(&mut self, map: &mut Self::Map, route: &RouteSpec) -> Result<(), MapError>;

    fn set_marker_opacity(&mut self, marker: &mut Self::Marker, opacity: f32);

    fn set_route_opacity(&mut self, map: &mut Self::Map, route: &RouteSpec, opacity: f32);

    fn fly_to(&mut self, map: &mut Self::Map, target: &FlyTo);

    /// Releases the map and every marker on it.
    fn remove_map(&mut self, map: Self::Map, markers: Vec<Self::Marker>);
}

#[cfg(test)]
mod tests {
    use super::{MapOptions, RouteSpec, Viewpoint};
    use crate::symbology::RouteStyle;
    use foundation::math::LngLat;

    #[test]
    fn viewpoint_defaults_fill_missing_fields() {
        let v: Viewpoint =
            serde_json::from_str(r#"{"center":{"lng":10.0,"lat":20.0},"zoom":3.5}"#).expect("json");
        assert_eq!(v, Viewpoint::new(LngLat::new(10.0, 20.0), 3.5));
        assert_eq!(v.clamp_zoom(40.0), 12.0);
        assert_eq!(v.clamp_zoom(0.0), 1.0);
    }

    #[test]
    fn options_json_uses_library_names() {
        let opts = MapOptions {
            container_id: "map-caravans".into(),
            style_url: "mapbox://styles/mapbox/light-v11".into(),
            viewpoint: Viewpoint::new(LngLat::new(-5.0, 30.0), 4.0),
        };
        let v = opts.to_json();
        assert_eq!(v["container"], "map-caravans");
        assert_eq!(v["center"][0], -5.0);
        assert_eq!(v["minZoom"], 1.0);
        assert_eq!(v["attributionControl"], false);
    }

    #[test]
    fn route_geojson_is_a_line_string() {
        let r = RouteSpec {
            id: "salt".into(),
            label: "Salt road".into(),
            path: vec![LngLat::new(-4.0, 31.0), LngLat::new(-3.0, 16.7)],
            style: RouteStyle {
                dashed: true,
                ..RouteStyle::default()
            },
        };
        let g = r.to_geojson();
        assert_eq!(g["geometry"]["type"], "LineString");
        assert_eq!(g["geometry"]["coordinates"][1][1], 16.7);
        assert_eq!(r.layer_id(), "route-salt");
        assert!(r.paint_json(0.5).get("line-dasharray").is_some());
        assert!(r.length_m() > 1_500_000.0);
    }
}
