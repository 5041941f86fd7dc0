use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// IUGG mean Earth radius (meters), used for great-circle distances.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic coordinate in degrees.
///
/// Field order mirrors what slippy-map libraries expect (`[lng, lat]`).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CoordinateError {
    NotFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::NotFinite => write!(f, "coordinate is not finite"),
            CoordinateError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {lat} outside [-90, 90]")
            }
            CoordinateError::LongitudeOutOfRange(lng) => {
                write!(f, "longitude {lng} outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

impl LngLat {
    /// Unchecked constructor; see `try_new` for the validating one.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn try_new(lng: f64, lat: f64) -> Result<Self, CoordinateError> {
        let p = Self::new(lng, lat);
        p.check()?;
        Ok(p)
    }

    pub fn check(&self) -> Result<(), CoordinateError> {
        if !self.lng.is_finite() || !self.lat.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoordinateError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(CoordinateError::LongitudeOutOfRange(self.lng));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Great-circle distance in meters (haversine on a sphere).
    pub fn haversine_m(self, other: Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        MEAN_EARTH_RADIUS_M * c
    }
}

/// Sum of great-circle legs along `path` (meters). Fewer than two points is 0.
pub fn path_length_m(path: &[LngLat]) -> f64 {
    path.windows(2).map(|w| w[0].haversine_m(w[1])).sum()
}
