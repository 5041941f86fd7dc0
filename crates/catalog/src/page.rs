use foundation::RecordId;
use layers::markers::{MapContent, marker_sources, route_source};
use layers::symbology::{FilteredOut, MarkerStyle, RouteStyle};
use layers::Viewpoint;
use scene::{Color, Dataset, Legend, LegendEntry};
use serde::{Deserialize, Serialize};

use crate::check::{PageIssue, check_page};
use crate::entry::{Entry, TagKey};
use crate::registry::{CatalogError, DATA_PREFIX, content_hash};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendItem {
    pub tag: TagKey,
    pub label: String,
    pub color: Color,
}

/// One figure of the stat strip under the hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Source {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
}

fn default_arc_start() -> f64 {
    180.0
}

fn default_arc_end() -> f64 {
    360.0
}

/// How the interactive section lays out its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum Diagram {
    /// Records on a horizontal axis by `order` (a year).
    Timeline {
        #[serde(default)]
        axis_label: Option<String>,
    },
    /// Records evenly spaced on an arc, angles in SVG degrees.
    Arc {
        #[serde(default = "default_arc_start")]
        start_deg: f64,
        #[serde(default = "default_arc_end")]
        end_deg: f64,
    },
    Circle,
    /// One bar per record, length from `value`.
    Bars { unit: String },
    /// The map is the interactive section.
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDef {
    pub id: String,
    pub label: String,
    /// Record ids, in travel order.
    pub stops: Vec<RecordId>,
    #[serde(default)]
    pub tag: Option<TagKey>,
    #[serde(default)]
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSection {
    pub viewpoint: Viewpoint,
    #[serde(default)]
    pub routes: Vec<RouteDef>,
    #[serde(default)]
    pub filtered_out: FilteredOut,
}

/// A page file exactly as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageFile {
    pub slug: String,
    pub title: String,
    pub kicker: String,
    pub lede: String,
    /// Heading of the interactive section.
    pub section: String,
    #[serde(default)]
    pub stats: Vec<Stat>,
    pub legend: Vec<LegendItem>,
    pub diagram: Diagram,
    #[serde(default)]
    pub map: Option<MapSection>,
    pub records: Vec<Entry>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A loaded page: metadata plus its sorted dataset and legend.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub kicker: String,
    pub lede: String,
    pub section: String,
    pub diagram: Diagram,
    pub map: Option<MapSection>,
    pub sources: Vec<Source>,
    stats: Vec<Stat>,
    dataset: Dataset<Entry>,
    legend: Legend<TagKey>,
    content_hash: String,
}

pub(crate) fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl Page {
    /// Parses one page file. `name` only labels errors.
    pub fn from_json(name: &str, raw: &str) -> Result<Self, CatalogError> {
        let file: PageFile = serde_json::from_str(raw).map_err(|e| CatalogError::Parse {
            file: name.to_string(),
            message: e.to_string(),
        })?;
        Self::from_file(file, content_hash(raw.as_bytes()))
    }

    pub fn from_file(file: PageFile, content_hash: String) -> Result<Self, CatalogError> {
        if !is_valid_slug(&file.slug) {
            return Err(CatalogError::InvalidSlug(file.slug));
        }
        if file.diagram == Diagram::Map && file.map.is_none() {
            return Err(CatalogError::InvalidPage {
                slug: file.slug,
                message: "map diagram without a map section".into(),
            });
        }
        let legend = Legend::new(
            file.legend
                .into_iter()
                .map(|i| LegendEntry::new(i.tag, i.label, i.color))
                .collect(),
        );
        let dataset = Dataset::new(file.records).map_err(|e| CatalogError::InvalidPage {
            slug: file.slug.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            slug: file.slug,
            title: file.title,
            kicker: file.kicker,
            lede: file.lede,
            section: file.section,
            diagram: file.diagram,
            map: file.map,
            sources: file.sources,
            stats: file.stats,
            dataset,
            legend,
            content_hash,
        })
    }

    pub fn dataset(&self) -> &Dataset<Entry> {
        &self.dataset
    }

    pub fn legend(&self) -> &Legend<TagKey> {
        &self.legend
    }

    /// blake3 of the page file, hex.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn path(&self) -> String {
        format!("{DATA_PREFIX}/{}", self.slug)
    }

    pub fn map_container_id(&self) -> String {
        format!("map-{}", self.slug)
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    /// Markers and routes for the map section, if the page has one.
    pub fn map_content(&self) -> Option<MapContent<TagKey>> {
        let section = self.map.as_ref()?;
        let mut content = MapContent::new(section.viewpoint);
        let base = MarkerStyle {
            filtered_out: section.filtered_out,
            ..MarkerStyle::default()
        };
        content.markers = marker_sources(&self.dataset, &self.legend, base);
        content.routes = section
            .routes
            .iter()
            .filter_map(|r| {
                let style = RouteStyle {
                    dashed: r.dashed,
                    ..RouteStyle::default()
                };
                route_source(&self.dataset, &self.legend, &r.id, &r.label, &r.stops, r.tag.clone(), style)
            })
            .collect();
        Some(content)
    }

    /// Great-circle length of every route, in kilometres.
    pub fn route_length_km(&self) -> Option<f64> {
        let content = self.map_content()?;
        if content.routes.is_empty() {
            return None;
        }
        let metres: f64 = content.routes.iter().map(|r| r.spec.length_m()).sum();
        Some(metres / 1000.0)
    }

    /// Authored stats, then the derived route length on pages with routes.
    pub fn stats(&self) -> Vec<Stat> {
        let mut out = self.stats.clone();
        if let Some(km) = self.route_length_km() {
            out.push(Stat {
                value: format!("{} km", group_thousands(km.round() as i64)),
                label: "of mapped routes".into(),
            });
        }
        out
    }

    /// Largest bar value, for scaling.
    pub fn max_value(&self) -> f64 {
        self.dataset
            .iter()
            .filter_map(|e| e.value)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn check(&self) -> Vec<PageIssue> {
        check_page(self)
    }

    /// Dims-or-hides policy of the map section; `Dim` without a map.
    pub fn filtered_out(&self) -> FilteredOut {
        self.map.as_ref().map(|m| m.filtered_out).unwrap_or_default()
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Diagram, Page, group_thousands, is_valid_slug};
    use crate::registry::CatalogError;
    use foundation::RecordId;
    use pretty_assertions::assert_eq;
    use scene::Record;

    const ROUTE_PAGE: &str = r##"{
        "slug": "test-routes",
        "title": "Routes",
        "kicker": "Test",
        "lede": "Two towns.",
        "section": "Map",
        "stats": [{"value": "2", "label": "towns"}],
        "legend": [{"tag": "city", "label": "City", "color": "#c25b3a"}],
        "diagram": {"kind": "map"},
        "map": {
            "viewpoint": {"center": {"lng": -5.0, "lat": 30.0}, "zoom": 4.0},
            "routes": [{"id": "r", "label": "Road", "stops": [2, 1]}]
        },
        "records": [
            {"id": 2, "order": 2, "tag": "city", "label": "Fez", "coordinate": {"lng": -5.0, "lat": 34.0}},
            {"id": 1, "order": 1, "tag": "city", "label": "Marrakesh", "coordinate": {"lng": -8.0, "lat": 31.6}}
        ]
    }"##;

    #[test]
    fn parses_and_sorts_records() {
        let page = Page::from_json("test.json", ROUTE_PAGE).expect("page");
        let ids: Vec<RecordId> = page.dataset().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(2)]);
        assert_eq!(page.path(), "/data/test-routes");
        assert_eq!(page.diagram, Diagram::Map);
        assert_eq!(page.content_hash().len(), 64);
    }

    #[test]
    fn derives_route_length_stat() {
        let page = Page::from_json("test.json", ROUTE_PAGE).expect("page");
        let km = page.route_length_km().expect("route");
        assert!((350.0..420.0).contains(&km), "km={km}");
        let stats = page.stats();
        assert_eq!(stats.len(), 2);
        assert!(stats[1].value.ends_with(" km"));
        let content = page.map_content().expect("map");
        assert_eq!(content.markers.len(), 2);
        assert_eq!(content.routes.len(), 1);
    }

    #[test]
    fn rejects_bad_slugs_and_duplicate_ids() {
        let bad_slug = ROUTE_PAGE.replace("test-routes", "Test Routes");
        assert!(matches!(
            Page::from_json("t.json", &bad_slug),
            Err(CatalogError::InvalidSlug(_))
        ));
        let dup = ROUTE_PAGE.replace(r#""id": 1,"#, r#""id": 2,"#);
        assert!(matches!(
            Page::from_json("t.json", &dup),
            Err(CatalogError::InvalidPage { .. })
        ));
        let no_map = ROUTE_PAGE.replace(r#""map": {"#, r#""unused": {"#);
        assert!(matches!(
            Page::from_json("t.json", &no_map),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn map_diagram_requires_a_map_section() {
        let start = ROUTE_PAGE.find(r#""map": {"#).expect("map");
        let end = ROUTE_PAGE.find(r#""records""#).expect("records");
        let raw = format!("{}{}", &ROUTE_PAGE[..start], &ROUTE_PAGE[end..]);
        assert!(matches!(
            Page::from_json("t.json", &raw),
            Err(CatalogError::InvalidPage { .. })
        ));
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("seven-saints"));
        assert!(is_valid_slug("route66"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-x"));
        assert!(!is_valid_slug("a/b"));
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(6140), "6,140");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-4200), "-4,200");
    }
}
