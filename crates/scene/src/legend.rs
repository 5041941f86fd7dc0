use serde::{Deserialize, Serialize};

use crate::filter::Filter;

/// sRGB colour with alpha, authored as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError(pub String);

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid colour {:?} (expected #rrggbb or #rrggbbaa)", self.0)
    }
}

impl std::error::Error for ColorError {}

impl Color {
    /// Used for any tag that has no legend entry.
    pub const NEUTRAL: Color = Color::rgb(0x8a, 0x84, 0x7a);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub fn parse_hex(raw: &str) -> Result<Self, ColorError> {
        let err = || ColorError(raw.to_string());
        let hex = raw.trim().strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { byte(6)? } else { 0xff };
        Ok(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a,
        })
    }

    /// CSS colour string: `#rrggbb` when opaque, otherwise `rgba(...)`.
    pub fn to_css(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&raw)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        if c.a == 0xff {
            c.to_css()
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry<T> {
    pub tag: T,
    pub label: String,
    pub color: Color,
}

impl<T> LegendEntry<T> {
    pub fn new(tag: T, label: impl Into<String>, color: Color) -> Self {
        Self {
            tag,
            label: label.into(),
            color,
        }
    }
}

/// The closed set of tags a page may use, with their display label and the
/// colour shared by chart, legend and map marker.
///
/// Entry order is display order (filter buttons, legend swatches). A tag
/// listed twice keeps its first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend<T> {
    entries: Vec<LegendEntry<T>>,
}

impl<T: Clone + Eq + Ord + std::fmt::Debug> Legend<T> {
    pub fn new(entries: Vec<LegendEntry<T>>) -> Self {
        let mut out: Vec<LegendEntry<T>> = Vec::with_capacity(entries.len());
        for e in entries {
            if !out.iter().any(|o| o.tag == e.tag) {
                out.push(e);
            }
        }
        Self { entries: out }
    }

    pub fn entries(&self) -> &[LegendEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, tag: &T) -> Option<&LegendEntry<T>> {
        self.entries.iter().find(|e| &e.tag == tag)
    }

    pub fn contains(&self, tag: &T) -> bool {
        self.entry(tag).is_some()
    }

    /// Colour for `tag`, falling back to `Color::NEUTRAL` for unknown tags.
    pub fn color_for(&self, tag: &T) -> Color {
        self.entry(tag).map(|e| e.color).unwrap_or(Color::NEUTRAL)
    }

    pub fn label_for(&self, tag: &T) -> Option<&str> {
        self.entry(tag).map(|e| e.label.as_str())
    }

    /// Every valid filter for this page: `All` first, then one per entry.
    pub fn filters(&self) -> Vec<Filter<T>> {
        std::iter::once(Filter::All)
            .chain(self.entries.iter().map(|e| Filter::Only(e.tag.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Legend, LegendEntry};
    use crate::filter::Filter;
    use crate::record::testing::Era;

    fn legend() -> Legend<Era> {
        Legend::new(vec![
            LegendEntry::new(Era::A, "Berber dynasties", Color::rgb(0xc2, 0x5b, 0x3a)),
            LegendEntry::new(Era::B, "Sharifian dynasties", Color::rgb(0x2f, 0x6f, 0x8f)),
            LegendEntry::new(Era::A, "duplicate", Color::rgb(0, 0, 0)),
        ])
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(Color::parse_hex("#c25b3a"), Ok(Color::rgb(0xc2, 0x5b, 0x3a)));
        let translucent = Color::parse_hex("#00000080").expect("rgba");
        assert_eq!(translucent.a, 0x80);
        assert_eq!(translucent.to_css(), "rgba(0, 0, 0, 0.502)");
        assert!(Color::parse_hex("c25b3a").is_err());
        assert!(Color::parse_hex("#c25b3").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn serde_round_trips_through_hex() {
        let c: Color = serde_json::from_str("\"#2f6f8f\"").expect("json");
        assert_eq!(c, Color::rgb(0x2f, 0x6f, 0x8f));
        assert_eq!(serde_json::to_string(&c).expect("json"), "\"#2f6f8f\"");
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }

    #[test]
    fn unknown_tags_fall_back_to_neutral() {
        let l = legend();
        assert_eq!(l.color_for(&Era::A), Color::rgb(0xc2, 0x5b, 0x3a));
        assert_eq!(l.color_for(&Era::C), Color::NEUTRAL);
        assert_eq!(l.label_for(&Era::C), None);
    }

    #[test]
    fn duplicate_entries_keep_the_first() {
        let l = legend();
        assert_eq!(l.len(), 2);
        assert_eq!(l.label_for(&Era::A), Some("Berber dynasties"));
    }

    #[test]
    fn filters_start_with_all() {
        assert_eq!(
            legend().filters(),
            vec![Filter::All, Filter::Only(Era::A), Filter::Only(Era::B)]
        );
    }
}
