use std::env;

use crate::credential::{AccessToken, CredentialError, token_from_env};

/// Pinned map library release; the script and stylesheet URLs derive from it.
pub const MAPBOX_GL_VERSION: &str = "v3.4.0";

pub const STYLE_ENV: &str = "DWL_MAP_STYLE";
pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/light-v11";

/// Everything the map adapter needs from the outside world.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub credential: Result<AccessToken, CredentialError>,
    pub style_url: String,
}

impl MapConfig {
    pub fn from_env() -> Self {
        Self {
            credential: token_from_env(),
            style_url: env::var(STYLE_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STYLE_URL.to_string()),
        }
    }

    /// Config with an explicit token (or none), default style.
    pub fn with_token(raw: Option<&str>) -> Self {
        Self {
            credential: raw
                .map(AccessToken::parse)
                .unwrap_or(Err(CredentialError::Missing)),
            style_url: DEFAULT_STYLE_URL.to_string(),
        }
    }

    pub fn script_url(&self) -> String {
        format!("https://api.mapbox.com/mapbox-gl-js/{MAPBOX_GL_VERSION}/mapbox-gl.js")
    }

    pub fn stylesheet_url(&self) -> String {
        format!("https://api.mapbox.com/mapbox-gl-js/{MAPBOX_GL_VERSION}/mapbox-gl.css")
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::with_token(None)
    }
}
