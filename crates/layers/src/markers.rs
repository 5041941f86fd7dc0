use foundation::RecordId;
use foundation::bounds::Aabb2;
use foundation::math::LngLat;
use foundation::text::{escape_html, summary};
use scene::{Dataset, Legend, Record};
use tracing::warn;

use crate::provider::{MarkerSpec, RouteSpec, Viewpoint};
use crate::symbology::{MarkerStyle, RouteStyle};

const POPUP_SUMMARY_CHARS: usize = 140;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSource<T> {
    pub tag: T,
    pub spec: MarkerSpec,
}

/// A route belongs to one tag, or to none (then it is never dimmed).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSource<T> {
    pub tag: Option<T>,
    pub spec: RouteSpec,
}

/// Everything drawn on one page's map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapContent<T> {
    pub viewpoint: Viewpoint,
    pub markers: Vec<MarkerSource<T>>,
    pub routes: Vec<RouteSource<T>>,
}

impl<T> MapContent<T> {
    pub fn new(viewpoint: Viewpoint) -> Self {
        Self {
            viewpoint,
            markers: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn marker(&self, record: RecordId) -> Option<&MarkerSource<T>> {
        self.markers.iter().find(|m| m.spec.record == record)
    }

    /// Box around every marker and route vertex.
    pub fn bounds(&self) -> Option<Aabb2> {
        let markers = self.markers.iter().map(|m| m.spec.position.to_array());
        let routes = self
            .routes
            .iter()
            .flat_map(|r| r.spec.path.iter().map(|p| p.to_array()));
        Aabb2::from_points(markers.chain(routes))
    }
}

pub fn popup_html(label: &str, detail: &str) -> String {
    format!(
        "<strong>{}</strong><p>{}</p>",
        escape_html(label),
        escape_html(&summary(detail, POPUP_SUMMARY_CHARS))
    )
}

/// One marker per record with a valid coordinate, coloured from the legend.
/// Records with an out-of-range coordinate get no marker.
pub fn marker_sources<R: Record>(
    dataset: &Dataset<R>,
    legend: &Legend<R::Tag>,
    base: MarkerStyle,
) -> Vec<MarkerSource<R::Tag>> {
    let mut out = Vec::new();
    for r in dataset {
        let Some(position) = r.coordinate() else {
            continue;
        };
        if let Err(e) = position.check() {
            warn!(record = %r.id(), error = %e, "skipping marker with invalid coordinate");
            continue;
        }
        out.push(MarkerSource {
            tag: r.tag().clone(),
            spec: MarkerSpec {
                record: r.id(),
                position,
                label: r.label().to_string(),
                popup_html: popup_html(r.label(), r.detail()),
                style: base.with_color(legend.color_for(r.tag())),
            },
        });
    }
    out
}

/// Path through the coordinates of `stops`, in the given order.
///
/// Stops that are unknown or have no valid coordinate are skipped; a route
/// with fewer than two usable stops is `None`.
pub fn route_through<R: Record>(dataset: &Dataset<R>, stops: &[RecordId]) -> Option<Vec<LngLat>> {
    let path: Vec<LngLat> = stops
        .iter()
        .filter_map(|id| {
            let c = dataset.get(*id).and_then(|r| r.coordinate());
            if c.is_none_or(|c| !c.is_valid()) {
                warn!(stop = %id, "route stop has no usable coordinate");
            }
            c.filter(LngLat::is_valid)
        })
        .collect();
    (path.len() >= 2).then_some(path)
}

pub fn route_source<R: Record>(
    dataset: &Dataset<R>,
    legend: &Legend<R::Tag>,
    id: &str,
    label: &str,
    stops: &[RecordId],
    tag: Option<R::Tag>,
    style: RouteStyle,
) -> Option<RouteSource<R::Tag>> {
    let path = route_through(dataset, stops)?;
    let color = tag.as_ref().map_or(style.color, |t| legend.color_for(t));
    Some(RouteSource {
        tag,
        spec: RouteSpec {
            id: id.to_string(),
            label: label.to_string(),
            path,
            style: RouteStyle { color, ..style },
        },
    })
}
