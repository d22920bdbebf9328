use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::predict::FailurePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub station: Option<StationConfig>,
    pub predict: PredictConfig,
    pub dish: DishConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub min_elevation_deg: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub gap_tolerance: Duration,
    pub failure_policy: FailurePolicy,
    pub workers: usize,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: 10.0,
            step: Duration::from_secs(30),
            gap_tolerance: Duration::from_secs(180),
            failure_policy: FailurePolicy::default(),
            workers: 1,
        }
    }
}

/// How to reach the dish's local gRPC endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DishConfig {
    pub grpcurl: String,
    pub address: String,
    pub method: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for DishConfig {
    fn default() -> Self {
        Self {
            grpcurl: "grpcurl".to_string(),
            address: "192.168.100.1:9200".to_string(),
            method: "SpaceX.API.Device.Device/Handle".to_string(),
            timeout: Duration::from_secs(8),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_str("{}").unwrap();
        assert!(config.station.is_none());
        assert_eq!(config.predict.min_elevation_deg, 10.0);
        assert_eq!(config.predict.step, Duration::from_secs(30));
        assert_eq!(config.predict.gap_tolerance, Duration::from_secs(180));
        assert_eq!(config.predict.failure_policy, FailurePolicy::SkipInstant);
        assert_eq!(config.dish.address, "192.168.100.1:9200");
        assert_eq!(config.dish.timeout, Duration::from_secs(8));
    }

    #[test]
    fn full_file() {
        let yaml = r#"
station:
  name: Plano
  coordinates: "32.9880, -96.5925"
  altitude_m: 145
predict:
  min_elevation_deg: 25
  step: 10s
  gap_tolerance: 2m
  failure_policy: drop-satellite
  workers: 4
dish:
  grpcurl: /usr/local/bin/grpcurl
  timeout: 3s
"#;
        let config = Config::from_str(yaml).unwrap();
        let station = config.station.unwrap();
        assert_eq!(station.name.as_deref(), Some("Plano"));
        assert_eq!(station.coordinates, "32.9880, -96.5925");
        assert_eq!(station.altitude_m, 145.0);
        assert_eq!(config.predict.min_elevation_deg, 25.0);
        assert_eq!(config.predict.step, Duration::from_secs(10));
        assert_eq!(config.predict.gap_tolerance, Duration::from_secs(120));
        assert_eq!(config.predict.failure_policy, FailurePolicy::DropSatellite);
        assert_eq!(config.predict.workers, 4);
        assert_eq!(config.dish.grpcurl, "/usr/local/bin/grpcurl");
        assert_eq!(config.dish.method, "SpaceX.API.Device.Device/Handle");
        assert_eq!(config.dish.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_duration() {
        assert!(Config::from_str("predict:\n  step: soon\n").is_err());
    }
}
