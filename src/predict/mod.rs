mod error;
mod ground_station;
mod pass_finder;
mod propagation;
mod ranker;
mod sampler;
mod segmenter;
mod tle_loader;
mod topocentric;
mod types;

#[cfg(test)]
mod testing;

pub use error::PredictError;
pub use ground_station::ObserverSite;
pub use pass_finder::find_passes;
pub use propagation::Sgp4Propagator;
pub use tle_loader::load_catalog;
pub use types::{FailurePolicy, Pass, PredictSettings, TimeWindow};

#[cfg(test)]
pub use tle_loader::parse_catalog;
#[cfg(test)]
pub use types::{SatelliteRecord, VisibilitySample};
