use std::thread;

use crate::predict::ground_station::ObserverSite;
use crate::predict::propagation::Propagator;
use crate::predict::topocentric::to_horizon;
use crate::predict::types::{
    FailurePolicy, PredictSettings, SatelliteRecord, TimeWindow, VisibilitySample,
};

/// Retained samples of one satellite, time-ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteSamples<'a> {
    pub satellite: &'a SatelliteRecord,
    pub samples: Vec<VisibilitySample>,
}

pub struct Sampler<'p, P: Propagator> {
    propagator: &'p P,
    min_elevation_deg: f64,
    failure_policy: FailurePolicy,
    workers: usize,
}

impl<'p, P: Propagator> Sampler<'p, P> {
    pub fn new(propagator: &'p P, settings: &PredictSettings) -> Self {
        Self {
            propagator,
            min_elevation_deg: settings.min_elevation_deg,
            failure_policy: settings.failure_policy,
            workers: settings.workers.max(1),
        }
    }

    /// One entry per satellite in catalog order. Satellites excluded by
    /// [`FailurePolicy::DropSatellite`] are absent.
    pub fn sample<'a>(
        &self,
        catalog: &'a [SatelliteRecord],
        site: &ObserverSite,
        window: &TimeWindow,
    ) -> Vec<SatelliteSamples<'a>> {
        let workers = self.workers.min(catalog.len());
        if workers <= 1 {
            return catalog
                .iter()
                .filter_map(|satellite| self.sample_satellite(satellite, site, window))
                .collect();
        }

        let chunk_size = catalog.len().div_ceil(workers);
        log::debug!(
            "Sampling {} satellites on {} workers",
            catalog.len(),
            workers
        );

        thread::scope(|scope| {
            let handles: Vec<_> = catalog
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .filter_map(|satellite| self.sample_satellite(satellite, site, window))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    fn sample_satellite<'a>(
        &self,
        satellite: &'a SatelliteRecord,
        site: &ObserverSite,
        window: &TimeWindow,
    ) -> Option<SatelliteSamples<'a>> {
        let mut samples = Vec::new();
        let mut failures = 0usize;

        for time in window.instants() {
            let position = match self.propagator.position(satellite, time) {
                Ok(position) => position,
                Err(e) => {
                    if self.failure_policy == FailurePolicy::DropSatellite {
                        log::warn!(
                            "Excluding {} ({}): {}",
                            satellite.name,
                            satellite.catalog_number,
                            e
                        );
                        return None;
                    }
                    if failures == 0 {
                        log::warn!(
                            "Skipping failed instants for {} ({}): {}",
                            satellite.name,
                            satellite.catalog_number,
                            e
                        );
                    } else {
                        log::debug!("{} at {}: {}", satellite.catalog_number, time, e);
                    }
                    failures += 1;
                    continue;
                }
            };

            let horizon = to_horizon(site, position, time);
            if horizon.elevation_deg >= self.min_elevation_deg {
                samples.push(VisibilitySample {
                    time,
                    elevation_deg: horizon.elevation_deg,
                    azimuth_deg: horizon.azimuth_deg,
                    range_km: horizon.range_km,
                });
            }
        }

        if failures > 0 {
            log::debug!(
                "{} ({}): {} instants failed to propagate",
                satellite.name,
                satellite.catalog_number,
                failures
            );
        }

        Some(SatelliteSamples { satellite, samples })
    }
}
