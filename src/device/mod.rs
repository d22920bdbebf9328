mod error;
mod location;
mod process;

pub use error::DeviceError;
pub use location::{parse_location, Location};

use crate::config::DishConfig;

const GET_LOCATION_REQUEST: &str = r#"{"get_location":{}}"#;

/// Ask the dish for its position through `grpcurl`.
pub fn fetch_dish_location(config: &DishConfig) -> Result<Location, DeviceError> {
    log::info!("Requesting location from dish at {}", config.address);
    let stdout = process::run_with_timeout(
        &config.grpcurl,
        &[
            "-plaintext",
            "-d",
            GET_LOCATION_REQUEST,
            config.address.as_str(),
            config.method.as_str(),
        ],
        config.timeout,
    )?;
    let response: serde_json::Value = serde_json::from_slice(&stdout)?;
    parse_location(&response)
}
