use std::sync::Arc;

use tracing::debug;

use crate::check::PageIssue;
use crate::page::Page;

/// Every page lives under this path.
pub const DATA_PREFIX: &str = "/data";

/// Page files compiled into the binary, in index order.
const PAGE_FILES: &[(&str, &str)] = &[
    ("dynasties.json", include_str!("../assets/dynasties.json")),
    ("imperial-cities.json", include_str!("../assets/imperial-cities.json")),
    ("caravan-routes.json", include_str!("../assets/caravan-routes.json")),
    ("seven-saints.json", include_str!("../assets/seven-saints.json")),
    ("lunar-month.json", include_str!("../assets/lunar-month.json")),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse { file: String, message: String },
    InvalidSlug(String),
    InvalidPage { slug: String, message: String },
    DuplicateSlug(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse { file, message } => write!(f, "{file}: {message}"),
            CatalogError::InvalidSlug(slug) => {
                write!(f, "invalid slug {slug:?} (lowercase letters, digits and '-')")
            }
            CatalogError::InvalidPage { slug, message } => write!(f, "page {slug}: {message}"),
            CatalogError::DuplicateSlug(slug) => write!(f, "two pages use the slug {slug:?}"),
        }
    }
}

impl std::error::Error for CatalogError {}

pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// What a path points at.
#[derive(Debug, Clone)]
pub enum Route {
    Index,
    Page(Arc<Page>),
    NotFound(String),
}

/// All pages of the site. Pages are immutable and shared.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pages: Vec<Arc<Page>>,
}

impl Catalog {
    /// The pages compiled into this build.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_sources(PAGE_FILES.iter().copied())
    }

    pub fn from_sources<'a, I>(files: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pages: Vec<Arc<Page>> = Vec::new();
        for (name, raw) in files {
            let page = Page::from_json(name, raw)?;
            if pages.iter().any(|p| p.slug == page.slug) {
                return Err(CatalogError::DuplicateSlug(page.slug));
            }
            pages.push(Arc::new(page));
        }
        debug!(pages = pages.len(), "catalog loaded");
        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<Page>> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Maps a location path to a page. Query strings and fragments carry no
    /// state and are ignored, as is a trailing slash.
    pub fn resolve(&self, path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        if path.is_empty() || path == DATA_PREFIX {
            return Route::Index;
        }
        let slug = path
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|s| !s.contains('/'));
        match slug.and_then(|s| self.get(s)) {
            Some(page) => Route::Page(Arc::clone(page)),
            None => Route::NotFound(path.to_string()),
        }
    }

    /// Issues of every page, pages without issues omitted.
    pub fn check_all(&self) -> Vec<(Arc<Page>, Vec<PageIssue>)> {
        self.pages
            .iter()
            .filter_map(|p| {
                let issues = p.check();
                (!issues.is_empty()).then(|| (Arc::clone(p), issues))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, Route, content_hash};
    use crate::page::Diagram;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("builtin catalog")
    }

    #[test]
    fn builtin_pages_load() {
        let c = catalog();
        assert_eq!(c.len(), 5);
        for p in c.pages() {
            assert!(!p.dataset().is_empty(), "{} has no records", p.slug);
            assert_eq!(p.content_hash().len(), 64);
        }
        assert!(matches!(
            c.get("caravan-routes").map(|p| &p.diagram),
            Some(Diagram::Map)
        ));
    }

    #[test]
    fn builtin_pages_have_no_authoring_errors() {
        for p in catalog().pages() {
            let errors: Vec<String> = p
                .check()
                .iter()
                .filter(|i| i.is_error())
                .map(ToString::to_string)
                .collect();
            assert!(errors.is_empty(), "{}: {errors:?}", p.slug);
        }
    }

    #[test]
    fn every_record_tag_has_a_legend_entry() {
        for p in catalog().pages() {
            for e in p.dataset() {
                assert!(
                    p.legend().contains(&e.tag),
                    "{}: record {} uses orphan tag {}",
                    p.slug,
                    e.id,
                    e.tag
                );
            }
        }
    }

    #[test]
    fn every_coordinate_is_in_range() {
        for p in catalog().pages() {
            for e in p.dataset() {
                if let Some(c) = e.coordinate {
                    assert!(c.is_valid(), "{}: record {} at {c:?}", p.slug, e.id);
                }
            }
        }
    }

    #[test]
    fn resolves_paths() {
        let c = catalog();
        assert!(matches!(c.resolve("/"), Route::Index));
        assert!(matches!(c.resolve(""), Route::Index));
        assert!(matches!(c.resolve("/data/"), Route::Index));
        match c.resolve("/data/seven-saints/?filter=sufi#top") {
            Route::Page(p) => assert_eq!(p.slug, "seven-saints"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(c.resolve("/data/atlantis"), Route::NotFound(p) if p == "/data/atlantis"));
        assert!(matches!(c.resolve("/data/seven-saints/extra"), Route::NotFound(_)));
        assert!(matches!(c.resolve("/about"), Route::NotFound(_)));
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let raw = include_str!("../assets/seven-saints.json");
        assert_eq!(
            Catalog::from_sources([("a.json", raw), ("b.json", raw)]).map(|c| c.len()),
            Err(CatalogError::DuplicateSlug("seven-saints".into()))
        );
    }

    #[test]
    fn hashes_are_stable_hex() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }
}
