/// What the map region shows while there is no usable map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    /// Missing credential, load failure or unmounted map.
    Unavailable,
}

impl Placeholder {
    pub fn text(self) -> &'static str {
        match self {
            Placeholder::Loading => "Loading map…",
            Placeholder::Unavailable => "Map unavailable. The rest of this page still works.",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Placeholder::Loading => "loading",
            Placeholder::Unavailable => "unavailable",
        }
    }

    pub fn to_html(self) -> String {
        format!(
            r#"<div class="map-placeholder map-placeholder--{key}" data-placeholder="{key}" role="status">{text}</div>"#,
            key = self.key(),
            text = self.text(),
        )
    }
}
