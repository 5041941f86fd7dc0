use scene::Color;
use serde::{Deserialize, Serialize};

/// How a marker whose tag does not match the current filter is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilteredOut {
    #[default]
    Dim,
    Hide,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    pub radius_px: f32,
    pub active_opacity: f32,
    pub dimmed_opacity: f32,
    #[serde(default)]
    pub filtered_out: FilteredOut,
}

impl MarkerStyle {
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            radius_px: 7.0,
            active_opacity: 1.0,
            dimmed_opacity: 0.2,
            filtered_out: FilteredOut::Dim,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn opacity(&self, matched: bool) -> f32 {
        match (matched, self.filtered_out) {
            (true, _) => self.active_opacity,
            (false, FilteredOut::Dim) => self.dimmed_opacity,
            (false, FilteredOut::Hide) => 0.0,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::new(Color::NEUTRAL)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub color: Color,
    pub width_px: f32,
    pub dashed: bool,
    pub active_opacity: f32,
    pub dimmed_opacity: f32,
}

impl RouteStyle {
    pub fn opacity(&self, matched: bool) -> f32 {
        if matched {
            self.active_opacity
        } else {
            self.dimmed_opacity
        }
    }
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: Color::NEUTRAL,
            width_px: 3.0,
            dashed: false,
            active_opacity: 0.85,
            dimmed_opacity: 0.15,
        }
    }
}
