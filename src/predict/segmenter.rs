use chrono::Duration;

use crate::predict::types::{Pass, SatelliteRecord, VisibilitySample};

/// Split one satellite's time-ordered samples into passes.
///
/// A new pass begins when a sample trails its predecessor by strictly more
/// than `gap_tolerance`; a gap of exactly the tolerance keeps the pass open.
pub fn segment<'a>(
    satellite: &'a SatelliteRecord,
    samples: Vec<VisibilitySample>,
    gap_tolerance: Duration,
) -> Vec<Pass<'a>> {
    let mut passes = Vec::new();
    let mut current: Vec<VisibilitySample> = Vec::new();

    for sample in samples {
        if let Some(prev) = current.last() {
            if sample.time - prev.time > gap_tolerance {
                passes.extend(Pass::new(satellite, std::mem::take(&mut current)));
            }
        }
        current.push(sample);
    }
    passes.extend(Pass::new(satellite, current));

    passes
}
