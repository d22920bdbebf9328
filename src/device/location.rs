use serde_json::Value;

use crate::device::DeviceError;

/// Position reported by the dish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Extract a location from a `get_location` response.
///
/// The documented `getLocation.lla` object is tried first. Older firmware
/// nests the coordinates elsewhere, so on a miss the whole document is
/// searched for the first object carrying `latitude`/`longitude` or `lat`/`lon`.
pub fn parse_location(response: &Value) -> Result<Location, DeviceError> {
    if let Some(location) = response.pointer("/getLocation/lla").and_then(from_lla) {
        return Ok(location);
    }

    log::debug!("No getLocation.lla in dish response, searching");
    find_coordinates(response)
        .and_then(from_named)
        .ok_or(DeviceError::NoLocation)
}

fn from_lla(lla: &Value) -> Option<Location> {
    Some(Location {
        latitude_deg: number(lla.get("lat")?)?,
        longitude_deg: number(lla.get("lon")?)?,
        altitude_m: number(lla.get("alt")?)?,
    })
}

fn from_named(object: &Value) -> Option<Location> {
    let field = |names: &[&str]| names.iter().find_map(|n| object.get(*n));
    let altitude_m = match field(&["altitudeM", "alt"]) {
        Some(v) => number(v)?,
        None => 0.0,
    };
    Some(Location {
        latitude_deg: number(field(&["latitude", "lat"])?)?,
        longitude_deg: number(field(&["longitude", "lon"])?)?,
        altitude_m,
    })
}

fn find_coordinates(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            let has = |a: &str, b: &str| map.contains_key(a) && map.contains_key(b);
            if has("latitude", "longitude") || has("lat", "lon") {
                return Some(value);
            }
            map.values().find_map(find_coordinates)
        }
        Value::Array(items) => items.iter().find_map(find_coordinates),
        _ => None,
    }
}

// grpcurl renders 64-bit fields as strings.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
