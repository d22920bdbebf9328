use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} timed out after {:.1}s", .timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },
    #[error("{program} exited with code {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },
    #[error("invalid JSON from dish: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dish returned no lat/lon (is location sharing enabled in the Starlink app?)")]
    NoLocation,
}
