use std::collections::BTreeSet;

use foundation::RecordId;
use scene::Record;
use scene::validate::{ValidationIssue, validate};

use crate::entry::TagKey;
use crate::page::{Diagram, Page};

/// Authoring defect in a page file.
#[derive(Debug, Clone, PartialEq)]
pub enum PageIssue {
    Record(ValidationIssue<TagKey>),
    UnknownRouteStop { route: String, stop: RecordId },
    StopWithoutCoordinate { route: String, stop: RecordId },
    /// Fewer than two stops with a usable coordinate.
    RouteTooShort { route: String },
    UnknownRouteTag { route: String, tag: TagKey },
    DuplicateRoute(String),
    /// A bar diagram record with no (or a non-finite) value.
    MissingValue { record: RecordId },
}

impl PageIssue {
    pub fn is_error(&self) -> bool {
        match self {
            PageIssue::Record(issue) => issue.is_error(),
            _ => true,
        }
    }
}

impl std::fmt::Display for PageIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageIssue::Record(issue) => write!(f, "{issue}"),
            PageIssue::UnknownRouteStop { route, stop } => {
                write!(f, "route {route}: stop {stop} is not a record of this page")
            }
            PageIssue::StopWithoutCoordinate { route, stop } => {
                write!(f, "route {route}: stop {stop} has no valid coordinate")
            }
            PageIssue::RouteTooShort { route } => {
                write!(f, "route {route}: needs at least two mappable stops")
            }
            PageIssue::UnknownRouteTag { route, tag } => {
                write!(f, "route {route}: tag {tag} has no legend entry")
            }
            PageIssue::DuplicateRoute(route) => write!(f, "route id {route} is used twice"),
            PageIssue::MissingValue { record } => write!(f, "record {record}: bar diagram needs a value"),
        }
    }
}

/// Record checks (orphan tags, coordinates, labels, unused legend entries)
/// followed by route and diagram checks.
pub fn check_page(page: &Page) -> Vec<PageIssue> {
    let dataset = page.dataset();
    let mut out: Vec<PageIssue> = validate(dataset, page.legend())
        .into_iter()
        .map(PageIssue::Record)
        .collect();

    if let Some(map) = &page.map {
        let mut seen = BTreeSet::new();
        for route in &map.routes {
            if !seen.insert(route.id.as_str()) {
                out.push(PageIssue::DuplicateRoute(route.id.clone()));
            }
            if let Some(tag) = &route.tag
                && !page.legend().contains(tag)
            {
                out.push(PageIssue::UnknownRouteTag {
                    route: route.id.clone(),
                    tag: tag.clone(),
                });
            }
            let mut usable = 0;
            for &stop in &route.stops {
                match dataset.get(stop) {
                    None => out.push(PageIssue::UnknownRouteStop {
                        route: route.id.clone(),
                        stop,
                    }),
                    Some(r) if r.coordinate().is_some_and(|c| c.is_valid()) => usable += 1,
                    Some(_) => out.push(PageIssue::StopWithoutCoordinate {
                        route: route.id.clone(),
                        stop,
                    }),
                }
            }
            if usable < 2 {
                out.push(PageIssue::RouteTooShort {
                    route: route.id.clone(),
                });
            }
        }
    }

    if matches!(page.diagram, Diagram::Bars { .. }) {
        for e in dataset {
            if !e.value.is_some_and(f64::is_finite) {
                out.push(PageIssue::MissingValue { record: e.id() });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{PageIssue, check_page};
    use crate::entry::TagKey;
    use crate::page::Page;
    use foundation::RecordId;
    use scene::validate::ValidationIssue;

    fn page(records: &str, routes: &str) -> Page {
        let raw = format!(
            r##"{{
                "slug": "t", "title": "T", "kicker": "K", "lede": "L", "section": "S",
                "legend": [
                    {{"tag": "city", "label": "City", "color": "#c25b3a"}},
                    {{"tag": "port", "label": "Port", "color": "#2f6f8f"}}
                ],
                "diagram": {{"kind": "bars", "unit": "k"}},
                "map": {{
                    "viewpoint": {{"center": {{"lng": 0.0, "lat": 0.0}}, "zoom": 3.0}},
                    "routes": [{routes}]
                }},
                "records": [{records}]
            }}"##
        );
        Page::from_json("t.json", &raw).expect("page")
    }

    #[test]
    fn clean_page_has_only_unused_legend_warning() {
        let p = page(
            r#"{"id": 1, "order": 1, "tag": "city", "label": "A", "value": 3, "coordinate": {"lng": 1.0, "lat": 1.0}},
               {"id": 2, "order": 2, "tag": "city", "label": "B", "value": 4, "coordinate": {"lng": 2.0, "lat": 2.0}}"#,
            r#"{"id": "r", "label": "R", "stops": [1, 2]}"#,
        );
        let issues = check_page(&p);
        assert_eq!(
            issues,
            vec![PageIssue::Record(ValidationIssue::UnusedLegendEntry {
                tag: TagKey::from("port")
            })]
        );
        assert!(!issues[0].is_error());
    }

    #[test]
    fn reports_route_and_value_defects() {
        let p = page(
            r#"{"id": 1, "order": 1, "tag": "city", "label": "A", "coordinate": {"lng": 1.0, "lat": 1.0}},
               {"id": 2, "order": 2, "tag": "port", "label": "B", "value": 4}"#,
            r#"{"id": "r", "label": "R", "stops": [1, 2, 9], "tag": "lake"},
               {"id": "r", "label": "R2", "stops": [1]}"#,
        );
        let issues = check_page(&p);
        assert!(issues.contains(&PageIssue::MissingValue { record: RecordId(1) }));
        assert!(issues.contains(&PageIssue::UnknownRouteStop {
            route: "r".into(),
            stop: RecordId(9)
        }));
        assert!(issues.contains(&PageIssue::StopWithoutCoordinate {
            route: "r".into(),
            stop: RecordId(2)
        }));
        assert!(issues.contains(&PageIssue::UnknownRouteTag {
            route: "r".into(),
            tag: TagKey::from("lake")
        }));
        assert!(issues.contains(&PageIssue::DuplicateRoute("r".into())));
        assert_eq!(
            issues
                .iter()
                .filter(|i| matches!(i, PageIssue::RouteTooShort { .. }))
                .count(),
            2
        );
        assert!(issues.iter().all(PageIssue::is_error));
    }
}
