use foundation::time::CivilDate;

use crate::dataset::Dataset;
use crate::record::Record;

/// The record associated with `today`'s weekday, if any.
///
/// `today` is passed in rather than read from the clock so that rendering
/// stays a pure function of its inputs. When several records share a weekday
/// the first in display order wins.
pub fn todays_record<R: Record>(dataset: &Dataset<R>, today: CivilDate) -> Option<&R> {
    let weekday = today.weekday();
    dataset.iter().find(|r| r.weekday() == Some(weekday))
}
