use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use foundation::RecordId;
use foundation::math::LngLat;

use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    DuplicateId(RecordId),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::DuplicateId(id) => write!(f, "duplicate record id {id}"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Immutable, ordered list of records shared by every view of a page.
///
/// Ordering contract:
/// - Records are sorted by `Record::order_key` once, at construction.
/// - The sort is stable, so equal keys keep authoring order.
/// - Nothing reorders or mutates the records afterwards; clones share storage.
#[derive(Debug)]
pub struct Dataset<R> {
    records: Arc<[R]>,
}

impl<R> Clone for Dataset<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: Record> Dataset<R> {
    pub fn new(mut records: Vec<R>) -> Result<Self, DatasetError> {
        let mut seen = BTreeSet::new();
        for r in &records {
            if !seen.insert(r.id()) {
                return Err(DatasetError::DuplicateId(r.id()));
            }
        }
        records.sort_by_key(|r| r.order_key());
        Ok(Self {
            records: records.into(),
        })
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Position of `id` in display order.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Number of records per tag, keyed in tag order.
    pub fn count_by_tag(&self) -> BTreeMap<R::Tag, usize> {
        let mut out = BTreeMap::new();
        for r in self.records.iter() {
            *out.entry(r.tag().clone()).or_insert(0) += 1;
        }
        out
    }

    /// First and last ordering keys, e.g. the year span of a timeline.
    pub fn order_span(&self) -> Option<(i64, i64)> {
        let first = self.records.first()?.order_key();
        let last = self.records.last()?.order_key();
        Some((first, last))
    }

    /// Records that carry a valid coordinate, with their display position.
    ///
    /// Records with an out-of-range coordinate are skipped; validation
    /// reports them.
    pub fn geographic(&self) -> impl Iterator<Item = (usize, &R, LngLat)> + '_ {
        self.records.iter().enumerate().filter_map(|(idx, r)| {
            let c = r.coordinate()?;
            c.is_valid().then_some((idx, r, c))
        })
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
