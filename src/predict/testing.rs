//! Synthetic propagators for engine tests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::ObserverSite;
use crate::predict::propagation::{Propagator, TemePosition};
use crate::predict::topocentric::{from_horizon, Horizon};
use crate::predict::types::{ElementSet, SatelliteRecord};

type Profile = Box<dyn Fn(DateTime<Utc>) -> Option<(f64, f64)> + Send + Sync>;

/// Places each satellite at look angles chosen by a per-satellite profile.
/// A profile returning `None` simulates a propagation failure.
pub struct ScriptedPropagator {
    site: ObserverSite,
    profiles: HashMap<u32, Profile>,
}

impl ScriptedPropagator {
    pub fn new(site: ObserverSite) -> Self {
        Self {
            site,
            profiles: HashMap::new(),
        }
    }

    /// `profile` maps an instant to `(elevation_deg, azimuth_deg)`.
    pub fn with(
        mut self,
        catalog_number: u32,
        profile: impl Fn(DateTime<Utc>) -> Option<(f64, f64)> + Send + Sync + 'static,
    ) -> Self {
        self.profiles.insert(catalog_number, Box::new(profile));
        self
    }
}

impl Propagator for ScriptedPropagator {
    fn position(
        &self,
        satellite: &SatelliteRecord,
        instant: DateTime<Utc>,
    ) -> Result<TemePosition, PredictError> {
        let failure = || PredictError::Propagation {
            catalog_number: satellite.catalog_number,
            message: "scripted failure".into(),
        };
        let profile = self.profiles.get(&satellite.catalog_number).ok_or_else(failure)?;
        let (elevation_deg, azimuth_deg) = profile(instant).ok_or_else(failure)?;
        let horizon = Horizon {
            elevation_deg,
            azimuth_deg,
            range_km: 1_000.0,
        };
        Ok(from_horizon(&self.site, horizon, instant))
    }
}

pub fn site() -> ObserverSite {
    ObserverSite::new(32.7837, -96.7838, 145.0).unwrap()
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 14, 18, 30, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    epoch() + Duration::seconds(secs)
}

pub fn seconds_since_epoch(instant: DateTime<Utc>) -> i64 {
    (instant - epoch()).num_seconds()
}

pub fn record(catalog_number: u32, name: &str) -> SatelliteRecord {
    SatelliteRecord {
        catalog_number,
        name: name.into(),
        elements: ElementSet {
            line1: format!("1 {catalog_number:05}U"),
            line2: format!("2 {catalog_number:05}"),
        },
    }
}
