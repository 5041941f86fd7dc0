use foundation::RecordId;
use foundation::math::CoordinateError;

use crate::dataset::Dataset;
use crate::legend::Legend;
use crate::record::Record;

/// Authoring defect found in a page's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue<T> {
    /// A record uses a tag the legend does not define.
    OrphanTag { record: RecordId, tag: T },
    InvalidCoordinate {
        record: RecordId,
        error: CoordinateError,
    },
    EmptyLabel { record: RecordId },
    /// A legend entry no record uses. Reported, but not an error.
    UnusedLegendEntry { tag: T },
}

impl<T> ValidationIssue<T> {
    pub fn is_error(&self) -> bool {
        !matches!(self, ValidationIssue::UnusedLegendEntry { .. })
    }
}

impl<T: std::fmt::Debug> std::fmt::Display for ValidationIssue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::OrphanTag { record, tag } => {
                write!(f, "record {record}: tag {tag:?} has no legend entry")
            }
            ValidationIssue::InvalidCoordinate { record, error } => {
                write!(f, "record {record}: {error}")
            }
            ValidationIssue::EmptyLabel { record } => write!(f, "record {record}: empty label"),
            ValidationIssue::UnusedLegendEntry { tag } => {
                write!(f, "legend entry {tag:?} is not used by any record")
            }
        }
    }
}

/// Checks a dataset against its legend. Issues are listed in dataset order,
/// followed by unused legend entries in legend order.
pub fn validate<R: Record>(dataset: &Dataset<R>, legend: &Legend<R::Tag>) -> Vec<ValidationIssue<R::Tag>> {
    let mut out = Vec::new();

    for r in dataset {
        if !legend.contains(r.tag()) {
            out.push(ValidationIssue::OrphanTag {
                record: r.id(),
                tag: r.tag().clone(),
            });
        }
        if let Some(c) = r.coordinate()
            && let Err(error) = c.check()
        {
            out.push(ValidationIssue::InvalidCoordinate {
                record: r.id(),
                error,
            });
        }
        if r.label().trim().is_empty() {
            out.push(ValidationIssue::EmptyLabel { record: r.id() });
        }
    }

    for entry in legend.entries() {
        if !dataset.iter().any(|r| r.tag() == &entry.tag) {
            out.push(ValidationIssue::UnusedLegendEntry {
                tag: entry.tag.clone(),
            });
        }
    }

    out
}
