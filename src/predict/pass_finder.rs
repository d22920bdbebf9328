use crate::predict::ground_station::ObserverSite;
use crate::predict::propagation::Propagator;
use crate::predict::ranker::rank;
use crate::predict::sampler::Sampler;
use crate::predict::segmenter::segment;
use crate::predict::types::{Pass, PredictSettings, SatelliteRecord, TimeWindow};

/// Find every pass over `site` during `window`, highest peak first.
pub fn find_passes<'a, P: Propagator>(
    catalog: &'a [SatelliteRecord],
    site: &ObserverSite,
    window: &TimeWindow,
    settings: &PredictSettings,
    propagator: &P,
) -> Vec<Pass<'a>> {
    if catalog.is_empty() {
        return Vec::new();
    }

    let tracks = Sampler::new(propagator, settings).sample(catalog, site, window);
    let passes: Vec<_> = tracks
        .into_iter()
        .flat_map(|track| segment(track.satellite, track.samples, settings.gap_tolerance))
        .collect();

    log::debug!(
        "{} passes from {} satellites above {}°",
        passes.len(),
        catalog.len(),
        settings.min_elevation_deg
    );

    rank(passes)
}
