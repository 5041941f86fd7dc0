use foundation::RecordId;
use foundation::math::LngLat;
use foundation::time::Weekday;

/// One entry of a page's static content.
///
/// Pages differ in what a record is (an event, a site, a saint, a lunar day)
/// but they all share this shape: an ordering key, one categorical tag from a
/// small closed set, a short label and a longer detail body.
pub trait Record {
    type Tag: Clone + Eq + Ord + std::fmt::Debug;

    fn id(&self) -> RecordId;

    /// Default display order (year, day index, …). Ties keep authoring order.
    fn order_key(&self) -> i64;

    fn tag(&self) -> &Self::Tag;

    fn label(&self) -> &str;

    /// Shown only after the user expands the record.
    fn detail(&self) -> &str;

    fn coordinate(&self) -> Option<LngLat> {
        None
    }

    /// Day of the week this record is associated with, for "today" highlighting.
    fn weekday(&self) -> Option<Weekday> {
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Record;
    use foundation::RecordId;
    use foundation::math::LngLat;
    use foundation::time::Weekday;

    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Era {
        A,
        B,
        C,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Event {
        pub id: u32,
        pub year: i64,
        pub era: Era,
        pub label: String,
        pub coordinate: Option<LngLat>,
        pub weekday: Option<Weekday>,
    }

    impl Event {
        pub fn new(id: u32, year: i64, era: Era) -> Self {
            Self {
                id,
                year,
                era,
                label: format!("event {id}"),
                coordinate: None,
                weekday: None,
            }
        }
    }

    impl Record for Event {
        type Tag = Era;

        fn id(&self) -> RecordId {
            RecordId(self.id)
        }

        fn order_key(&self) -> i64 {
            self.year
        }

        fn tag(&self) -> &Era {
            &self.era
        }

        fn label(&self) -> &str {
            &self.label
        }

        fn detail(&self) -> &str {
            "detail"
        }

        fn coordinate(&self) -> Option<LngLat> {
            self.coordinate
        }

        fn weekday(&self) -> Option<Weekday> {
            self.weekday
        }
    }
}
