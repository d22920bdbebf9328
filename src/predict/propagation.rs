use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::{ElementSet, SatelliteRecord};

/// Position in the TEME inertial frame, kilometers.
pub type TemePosition = [f64; 3];

/// Anything that can place a satellite at an instant.
pub trait Propagator: Sync {
    fn position(
        &self,
        satellite: &SatelliteRecord,
        instant: DateTime<Utc>,
    ) -> Result<TemePosition, PredictError>;
}

struct Orbit {
    elements: Elements,
    constants: Constants,
}

/// SGP4/SDP4 through the `sgp4` crate.
///
/// Element sets are parsed once up front; a set that fails to parse keeps its
/// error and reports it on every call for that satellite.
pub struct Sgp4Propagator {
    orbits: HashMap<ElementSet, Result<Orbit, String>>,
}

impl Sgp4Propagator {
    pub fn new(catalog: &[SatelliteRecord]) -> Self {
        let mut orbits = HashMap::with_capacity(catalog.len());
        for satellite in catalog {
            orbits
                .entry(satellite.elements.clone())
                .or_insert_with(|| Self::prepare(satellite));
        }
        let invalid = orbits.values().filter(|o| o.is_err()).count();
        if invalid > 0 {
            log::warn!("{} element sets could not be initialized", invalid);
        }
        Self { orbits }
    }

    fn prepare(satellite: &SatelliteRecord) -> Result<Orbit, String> {
        let elements = Elements::from_tle(
            Some(satellite.name.clone()),
            satellite.elements.line1.as_bytes(),
            satellite.elements.line2.as_bytes(),
        )
        .map_err(|e| e.to_string())?;
        let constants = Constants::from_elements(&elements).map_err(|e| e.to_string())?;
        Ok(Orbit {
            elements,
            constants,
        })
    }

    fn propagate(
        orbit: &Orbit,
        satellite: &SatelliteRecord,
        instant: DateTime<Utc>,
    ) -> Result<TemePosition, PredictError> {
        let propagation_error = |message: String| PredictError::Propagation {
            catalog_number: satellite.catalog_number,
            message,
        };

        let minutes = orbit
            .elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map_err(|e| propagation_error(e.to_string()))?;

        let prediction = orbit
            .constants
            .propagate(minutes)
            .map_err(|e| propagation_error(e.to_string()))?;

        Ok(prediction.position)
    }
}

impl Propagator for Sgp4Propagator {
    fn position(
        &self,
        satellite: &SatelliteRecord,
        instant: DateTime<Utc>,
    ) -> Result<TemePosition, PredictError> {
        let invalid = |message: String| PredictError::InvalidElements {
            catalog_number: satellite.catalog_number,
            message,
        };

        match self.orbits.get(&satellite.elements) {
            Some(Ok(orbit)) => Self::propagate(orbit, satellite, instant),
            Some(Err(message)) => Err(invalid(message.clone())),
            None => {
                let orbit = Self::prepare(satellite).map_err(invalid)?;
                Self::propagate(&orbit, satellite, instant)
            }
        }
    }
}
