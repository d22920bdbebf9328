use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Config, PredictConfig};
use crate::device::{DeviceError, Location};
use crate::predict::{FailurePolicy, ObserverSite, PredictSettings, TimeWindow};
use crate::window::{parse_duration, parse_instant};

const MIN_NOW_DURATION: Duration = Duration::minutes(1);

#[derive(Parser, Debug)]
#[command(name = "sat-o-pass")]
#[command(about = "List satellite passes over a location and time window")]
pub struct Cli {
    /// Element catalog (name / line 1 / line 2 groups)
    #[arg(long)]
    pub tle_file: PathBuf,

    /// Window centered on the current UTC time
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub now: bool,

    /// Window length for --now
    #[arg(long, default_value = "15m", value_parser = parse_duration)]
    pub duration: Duration,

    /// Window start (RFC 3339, or now[+-]<duration>)
    #[arg(long)]
    pub start: Option<String>,

    /// Window end (RFC 3339, or now[+-]<duration>)
    #[arg(long)]
    pub end: Option<String>,

    /// Latitude (deg, N+)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude (deg, E+)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Altitude above the ellipsoid (m)
    #[arg(long, allow_negative_numbers = true)]
    pub alt: Option<f64>,

    /// Fetch the location from a Starlink dish through grpcurl
    #[arg(long)]
    pub from_dish: bool,

    /// Minimum elevation (deg)
    #[arg(long, allow_negative_numbers = true)]
    pub min_el: Option<f64>,

    /// Sampling step (seconds or a duration such as 30s)
    #[arg(long, value_parser = parse_seconds)]
    pub step: Option<Duration>,

    /// Largest gap between samples of one pass
    #[arg(long, value_parser = parse_seconds)]
    pub gap: Option<Duration>,

    /// What to do when a satellite fails to propagate
    #[arg(long, value_enum)]
    pub policy: Option<FailurePolicy>,

    /// Sampling threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print passes as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Request that cannot be satisfied as given.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SiteSource {
    Dish,
    Explicit,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    match s.trim().parse::<u32>() {
        Ok(secs) => Ok(Duration::seconds(i64::from(secs))),
        Err(_) => parse_duration(s),
    }
}

/// Engine settings and sampling step, command line over config file.
pub fn resolve_settings(
    cli: &Cli,
    config: &PredictConfig,
) -> Result<(PredictSettings, Duration), UsageError> {
    let from_std = |d: std::time::Duration| {
        Duration::from_std(d).map_err(|e| UsageError(format!("duration out of range: {e}")))
    };

    let settings = PredictSettings {
        min_elevation_deg: cli.min_el.unwrap_or(config.min_elevation_deg),
        gap_tolerance: match cli.gap {
            Some(gap) => gap,
            None => from_std(config.gap_tolerance)?,
        },
        failure_policy: cli.policy.unwrap_or(config.failure_policy),
        workers: cli.workers.unwrap_or(config.workers).max(1),
    };
    let step = match cli.step {
        Some(step) => step,
        None => from_std(config.step)?,
    };

    if !(-90.0..=90.0).contains(&settings.min_elevation_deg) {
        return Err(UsageError(format!(
            "minimum elevation {} outside [-90, 90]",
            settings.min_elevation_deg
        )));
    }
    if settings.gap_tolerance < Duration::zero() {
        return Err(UsageError("gap tolerance must not be negative".into()));
    }

    Ok((settings, step))
}

pub fn resolve_window(
    cli: &Cli,
    step: Duration,
    now: DateTime<Utc>,
) -> Result<TimeWindow, UsageError> {
    let window = if cli.now {
        TimeWindow::centered(now, cli.duration.max(MIN_NOW_DURATION), step)
    } else {
        let (Some(start), Some(end)) = (&cli.start, &cli.end) else {
            return Err(UsageError("provide --now or both --start and --end".into()));
        };
        let start = parse_instant(start, now).map_err(|e| UsageError(format!("--start {e}")))?;
        let end = parse_instant(end, now).map_err(|e| UsageError(format!("--end {e}")))?;
        TimeWindow::new(start, end, step)
    };
    window.map_err(|e| UsageError(e.to_string()))
}

/// Coordinates given on the command line, else the config file's station.
pub fn explicit_site(cli: &Cli, config: &Config) -> Result<Option<ObserverSite>, UsageError> {
    let site = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => ObserverSite::new(lat, lon, cli.alt.unwrap_or(0.0)),
        (None, None) => match &config.station {
            Some(station) => ObserverSite::from_coordinates(
                &station.coordinates,
                Some(cli.alt.unwrap_or(station.altitude_m)),
            ),
            None => return Ok(None),
        },
        _ => return Err(UsageError("--lat and --lon must be given together".into())),
    };
    site.map(Some).map_err(|e| UsageError(e.to_string()))
}

/// Pick the observer: the dish when asked for and reachable, else explicit coordinates.
pub fn resolve_site<F>(
    from_dish: bool,
    explicit: Option<ObserverSite>,
    fetch: F,
) -> Result<(ObserverSite, SiteSource), UsageError>
where
    F: FnOnce() -> Result<Location, DeviceError>,
{
    if from_dish {
        let fetched = fetch().and_then(|l| {
            log::info!(
                "Dish location: {:.6}, {:.6}, {:.1} m",
                l.latitude_deg,
                l.longitude_deg,
                l.altitude_m
            );
            ObserverSite::new(l.latitude_deg, l.longitude_deg, l.altitude_m)
                .map_err(|_| DeviceError::NoLocation)
        });
        match fetched {
            Ok(site) => return Ok((site, SiteSource::Dish)),
            Err(e) => {
                log::warn!("from-dish failed: {}", e);
                if explicit.is_none() {
                    return Err(UsageError("need --lat/--lon if --from-dish fails".into()));
                }
            }
        }
    }

    explicit
        .map(|site| (site, SiteSource::Explicit))
        .ok_or_else(|| UsageError("need --lat/--lon, a station in --config, or --from-dish".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["sat-o-pass", "--tle-file", "starlink.tle"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 14, 18, 0, 0).unwrap()
    }

    fn dish_ok() -> Result<Location, DeviceError> {
        Ok(Location {
            latitude_deg: 47.6,
            longitude_deg: -122.3,
            altitude_m: 50.0,
        })
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let cli = parse(&["--now"]);
        let (settings, step) = resolve_settings(&cli, &PredictConfig::default()).unwrap();
        assert_eq!(settings.min_elevation_deg, 10.0);
        assert_eq!(settings.gap_tolerance, Duration::seconds(180));
        assert_eq!(settings.failure_policy, FailurePolicy::SkipInstant);
        assert_eq!(step, Duration::seconds(30));
        assert_eq!(cli.duration, Duration::minutes(15));
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&["--now", "--min-el", "25", "--step", "10", "--gap", "2m", "--policy", "drop-satellite"]);
        let (settings, step) = resolve_settings(&cli, &PredictConfig::default()).unwrap();
        assert_eq!(settings.min_elevation_deg, 25.0);
        assert_eq!(settings.gap_tolerance, Duration::minutes(2));
        assert_eq!(settings.failure_policy, FailurePolicy::DropSatellite);
        assert_eq!(step, Duration::seconds(10));
    }

    #[test]
    fn now_window_is_centered_with_minimum() {
        let cli = parse(&["--now", "--duration", "10m"]);
        let window = resolve_window(&cli, Duration::seconds(30), now()).unwrap();
        assert_eq!(window.start(), now() - Duration::minutes(5));
        assert_eq!(window.end(), now() + Duration::minutes(5));

        let cli = parse(&["--now", "--duration", "5s"]);
        let window = resolve_window(&cli, Duration::seconds(30), now()).unwrap();
        assert_eq!(window.end() - window.start(), Duration::minutes(1));
    }

    #[test]
    fn explicit_window() {
        let cli = parse(&["--start", "2025-09-14T18:30:00Z", "--end", "2025-09-14T18:45:00Z"]);
        let window = resolve_window(&cli, Duration::seconds(30), now()).unwrap();
        assert_eq!(window.start(), now() + Duration::minutes(30));
        assert_eq!(window.instants().count(), 31);
    }

    #[test]
    fn window_usage_errors() {
        let cli = parse(&["--start", "2025-09-14T18:30:00Z"]);
        assert!(resolve_window(&cli, Duration::seconds(30), now()).is_err());

        let cli = parse(&["--start", "2025-09-14T18:45:00Z", "--end", "2025-09-14T18:30:00Z"]);
        assert!(resolve_window(&cli, Duration::seconds(30), now()).is_err());

        let cli = parse(&["--start", "now", "--end", "now+1h"]);
        assert!(resolve_window(&cli, Duration::zero(), now()).is_err());

        let argv = ["sat-o-pass", "--tle-file", "x", "--now", "--start", "now"];
        assert!(Cli::try_parse_from(argv).is_err());

        let cli = parse(&["--start", "now", "--end", "now+300000years"]);
        assert!(resolve_window(&cli, Duration::seconds(30), now()).is_err());

        let cli = parse(&["--start", "now-300000years", "--end", "now"]);
        assert!(resolve_window(&cli, Duration::seconds(30), now()).is_err());

        let cli = parse(&["--now", "--duration", "600000years"]);
        assert!(resolve_window(&cli, Duration::seconds(30), now()).is_err());

        let cli = parse(&["--start", "now", "--end", "now+1h"]);
        let window = resolve_window(&cli, Duration::MAX, now()).unwrap();
        assert_eq!(window.instants().count(), 1);
    }

    #[test]
    fn explicit_site_sources() {
        let config = Config::from_str("station:\n  coordinates: \"32.9880, -96.5925\"\n  altitude_m: 145\n").unwrap();

        let cli = parse(&["--now", "--lat", "-33.86", "--lon", "151.21", "--alt", "58"]);
        let site = explicit_site(&cli, &config).unwrap().unwrap();
        assert_eq!(site.latitude_deg(), -33.86);
        assert_eq!(site.altitude_m(), 58.0);

        let cli = parse(&["--now"]);
        let site = explicit_site(&cli, &config).unwrap().unwrap();
        assert_eq!(site.latitude_deg(), 32.988);
        assert_eq!(site.altitude_m(), 145.0);

        assert!(explicit_site(&cli, &Config::default()).unwrap().is_none());

        let cli = parse(&["--now", "--lat", "10"]);
        assert!(explicit_site(&cli, &config).is_err());

        let cli = parse(&["--now", "--lat", "95", "--lon", "0"]);
        assert!(explicit_site(&cli, &Config::default()).is_err());
    }

    #[test]
    fn dish_location_wins_when_available() {
        let fallback = ObserverSite::new(1.0, 2.0, 3.0).ok();
        let (site, source) = resolve_site(true, fallback, dish_ok).unwrap();
        assert_eq!(source, SiteSource::Dish);
        assert_eq!(site.latitude_deg(), 47.6);
    }

    #[test]
    fn dish_failure_falls_back_to_explicit() {
        let fallback = ObserverSite::new(1.0, 2.0, 3.0).ok();
        let (site, source) = resolve_site(true, fallback, || Err(DeviceError::NoLocation)).unwrap();
        assert_eq!(source, SiteSource::Explicit);
        assert_eq!(site, fallback.unwrap());

        assert!(resolve_site(true, None, || Err(DeviceError::NoLocation)).is_err());
    }

    #[test]
    fn no_location_at_all_is_a_usage_error() {
        let err = resolve_site(false, None, dish_ok).unwrap_err();
        assert!(err.0.contains("--lat/--lon"));
    }

    #[test]
    fn dish_not_consulted_unless_asked() {
        let fallback = ObserverSite::new(1.0, 2.0, 3.0).ok();
        let (_, source) = resolve_site(false, fallback, || -> Result<Location, DeviceError> {
            panic!("dish should not be queried")
        })
        .unwrap();
        assert_eq!(source, SiteSource::Explicit);
    }
}
