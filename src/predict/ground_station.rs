use crate::predict::error::PredictError;

// WGS-84
const SEMI_MAJOR_AXIS_KM: f64 = 6378.137;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const ECCENTRICITY_SQ: f64 = FLATTENING * (2.0 - FLATTENING);

/// Fixed geodetic position of the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSite {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
}

impl ObserverSite {
    /// Longitude may be given in either -180..180 or 0..360; it is stored in [-180, 180).
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, PredictError> {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() || !altitude_m.is_finite() {
            return Err(PredictError::InvalidSite(format!(
                "non-finite coordinates ({latitude_deg}, {longitude_deg}, {altitude_m})"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(PredictError::InvalidSite(format!(
                "latitude {latitude_deg} outside [-90, 90]"
            )));
        }
        if !(-180.0..=360.0).contains(&longitude_deg) {
            return Err(PredictError::InvalidSite(format!(
                "longitude {longitude_deg} outside [-180, 360]"
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg: (longitude_deg + 180.0).rem_euclid(360.0) - 180.0,
            altitude_m,
        })
    }

    /// Parses `"lat, lon"` as written in the station config.
    pub fn from_coordinates(
        coordinates: &str,
        altitude_m: Option<f64>,
    ) -> Result<Self, PredictError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(PredictError::InvalidSite(format!(
                "expected \"lat, lon\", got {coordinates:?}"
            )));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| PredictError::InvalidSite(format!("{s:?}: {e}")))
        };
        Self::new(parse(parts[0])?, parse(parts[1])?, altitude_m.unwrap_or(0.0))
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Earth-fixed position on the oblate ellipsoid, in kilometers.
    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = SEMI_MAJOR_AXIS_KM / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - ECCENTRICITY_SQ) + alt_km) * sin_lat;
        [x, y, z]
    }
}
