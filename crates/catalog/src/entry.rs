use foundation::RecordId;
use foundation::math::LngLat;
use foundation::time::Weekday;
use scene::Record;
use serde::{Deserialize, Serialize};

/// Category key as authored in a page file (`"berber-empires"`, `"salt"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagKey(pub String);

impl TagKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl AsRef<str> for TagKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// One record of a page file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub id: RecordId,
    /// Year, day index or position; sorts the page.
    pub order: i64,
    pub tag: TagKey,
    pub label: String,
    /// Short line under the label ("1040–1147", "Day 14").
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub coordinate: Option<LngLat>,
    #[serde(default)]
    pub weekday: Option<Weekday>,
    /// Magnitude for bar diagrams.
    #[serde(default)]
    pub value: Option<f64>,
}

impl Record for Entry {
    type Tag = TagKey;

    fn id(&self) -> RecordId {
        self.id
    }

    fn order_key(&self) -> i64 {
        self.order
    }

    fn tag(&self) -> &TagKey {
        &self.tag
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn detail(&self) -> &str {
        &self.detail
    }

    fn coordinate(&self) -> Option<LngLat> {
        self.coordinate
    }

    fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }
}
