use crate::dataset::Dataset;
use crate::legend::Legend;
use crate::record::Record;

/// Key of the "show everything" filter in markup and URLs of filter buttons.
pub const ALL_KEY: &str = "all";

/// Current filter of a page: everything, or one tag of the page's closed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, tag: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(t) => t == tag,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl<T: AsRef<str>> Filter<T> {
    /// Stable string form used in `data-arg` attributes.
    pub fn key(&self) -> &str {
        match self {
            Filter::All => ALL_KEY,
            Filter::Only(t) => t.as_ref(),
        }
    }
}

impl<T> Legend<T>
where
    T: Clone + Eq + Ord + std::fmt::Debug + AsRef<str>,
{
    /// Resolves a filter key coming from the UI.
    ///
    /// `"all"` and any key that is not in the legend resolve to `Filter::All`,
    /// so the page can never end up filtered by a tag it does not define.
    pub fn resolve_filter(&self, key: &str) -> Filter<T> {
        self.entries()
            .iter()
            .find(|e| e.tag.as_ref() == key)
            .map(|e| Filter::Only(e.tag.clone()))
            .unwrap_or(Filter::All)
    }
}

/// Records matching `filter`, in dataset order.
///
/// Pure projection: the dataset is untouched and calling this twice with the
/// same filter yields the same records in the same order.
pub fn derive<'a, R: Record>(dataset: &'a Dataset<R>, filter: &Filter<R::Tag>) -> Vec<&'a R> {
    dataset.iter().filter(|r| filter.matches(r.tag())).collect()
}

/// Number of records that match exactly one of `before` and `after`, i.e.
/// whose appearance changes when the filter switches.
pub fn changed_count<R: Record>(
    dataset: &Dataset<R>,
    before: &Filter<R::Tag>,
    after: &Filter<R::Tag>,
) -> usize {
    dataset
        .iter()
        .filter(|r| before.matches(r.tag()) != after.matches(r.tag()))
        .count()
}
