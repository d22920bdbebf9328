use crate::predict::types::Pass;

/// Highest peak first. Equal peaks go by ascending catalog number, then by start time.
pub fn rank(mut passes: Vec<Pass<'_>>) -> Vec<Pass<'_>> {
    passes.sort_by(|a, b| {
        b.peak_elevation_deg()
            .total_cmp(&a.peak_elevation_deg())
            .then_with(|| a.satellite.catalog_number.cmp(&b.satellite.catalog_number))
            .then_with(|| a.start_time().cmp(&b.start_time()))
    });
    passes
}
