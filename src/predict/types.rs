use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::predict::error::PredictError;

/// The two fixed-column lines of an element set, kept verbatim for the propagator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatelliteRecord {
    pub catalog_number: u32,
    pub name: String,
    pub elements: ElementSet,
}

/// Closed sampling window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl TimeWindow {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<Self, PredictError> {
        if start > end {
            return Err(PredictError::InvalidWindow(format!(
                "start {start} is after end {end}"
            )));
        }
        if step <= Duration::zero() {
            return Err(PredictError::InvalidWindow(format!(
                "step must be positive, got {}s",
                step.num_seconds()
            )));
        }
        Ok(Self { start, end, step })
    }

    /// Window of `duration` centered on `mid`.
    pub fn centered(
        mid: DateTime<Utc>,
        duration: Duration,
        step: Duration,
    ) -> Result<Self, PredictError> {
        let half = duration / 2;
        match (mid.checked_sub_signed(half), mid.checked_add_signed(half)) {
            (Some(start), Some(end)) => Self::new(start, end, step),
            _ => Err(PredictError::InvalidWindow(format!(
                "{}s around {mid} is out of range",
                duration.num_seconds()
            ))),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// `start, start + step, ...` up to and including the last instant `<= end`.
    pub fn instants(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let step = self.step;
        let end = self.end;
        std::iter::successors(Some(self.start), move |t| t.checked_add_signed(step))
            .take_while(move |t| *t <= end)
    }
}

/// Observation of one satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilitySample {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Maximal contiguous visibility interval of one satellite. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass<'a> {
    pub satellite: &'a SatelliteRecord,
    samples: Vec<VisibilitySample>,
}

impl<'a> Pass<'a> {
    pub fn new(satellite: &'a SatelliteRecord, samples: Vec<VisibilitySample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        Some(Self { satellite, samples })
    }

    pub fn samples(&self) -> &[VisibilitySample] {
        &self.samples
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.samples[0].time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.samples[self.samples.len() - 1].time
    }

    pub fn duration(&self) -> Duration {
        self.end_time() - self.start_time()
    }

    /// Highest sample; the earliest one wins on equal elevation.
    pub fn peak(&self) -> &VisibilitySample {
        self.samples[1..].iter().fold(&self.samples[0], |best, s| {
            if s.elevation_deg > best.elevation_deg {
                s
            } else {
                best
            }
        })
    }

    pub fn peak_elevation_deg(&self) -> f64 {
        self.peak().elevation_deg
    }

    pub fn peak_time(&self) -> DateTime<Utc> {
        self.peak().time
    }

    pub fn azimuth_at_peak_deg(&self) -> f64 {
        self.peak().azimuth_deg
    }
}

/// What to do with a satellite whose propagation fails.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FailurePolicy {
    /// Drop the failing instant and keep sampling the satellite.
    #[default]
    SkipInstant,
    /// Exclude the satellite on its first failure.
    DropSatellite,
}

/// Engine knobs that are not part of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictSettings {
    pub min_elevation_deg: f64,
    pub gap_tolerance: Duration,
    pub failure_policy: FailurePolicy,
    pub workers: usize,
}

impl Default for PredictSettings {
    fn default() -> Self {
        Self {
            min_elevation_deg: 10.0,
            gap_tolerance: Duration::seconds(180),
            failure_policy: FailurePolicy::default(),
            workers: 1,
        }
    }
}
