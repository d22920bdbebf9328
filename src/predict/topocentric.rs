use chrono::{DateTime, Utc};

use crate::predict::ground_station::ObserverSite;
use crate::predict::propagation::TemePosition;

/// Look angles from the observer to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizon {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Project a TEME position onto the observer's local horizon at `instant`.
pub fn to_horizon(site: &ObserverSite, position: TemePosition, instant: DateTime<Utc>) -> Horizon {
    let sat_ecef = teme_to_ecef_position(position, sidereal_angle(instant));
    let sta_ecef = site.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    if range_km == 0.0 {
        return Horizon {
            elevation_deg: 90.0,
            azimuth_deg: 0.0,
            range_km,
        };
    }

    let (east, north, up) = ecef_to_enu(dr, site.lat_rad(), site.lon_rad());
    Horizon {
        elevation_deg: up.atan2(east.hypot(north)).to_degrees(),
        azimuth_deg: normalize_azimuth(east.atan2(north).to_degrees()),
        range_km,
    }
}

/// Fold any angle into [0, 360). `rem_euclid` alone can return 360 for tiny negatives.
pub fn normalize_azimuth(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Greenwich sidereal angle in radians.
pub fn sidereal_angle(instant: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

#[cfg(test)]
pub fn ecef_to_teme_position(pos_ecef: [f64; 3], gmst: f64) -> [f64; 3] {
    teme_to_ecef_position(pos_ecef, -gmst)
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
pub fn enu_to_ecef(enu: (f64, f64, f64), lat_rad: f64, lon_rad: f64) -> [f64; 3] {
    let (east, north, up) = enu;
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    [
        -sin_lon * east - sin_lat * cos_lon * north + cos_lat * cos_lon * up,
        cos_lon * east - sin_lat * sin_lon * north + cos_lat * sin_lon * up,
        cos_lat * north + sin_lat * up,
    ]
}

#[cfg(test)]
/// Inverse of [`to_horizon`]: the TEME position seen at the given look angles.
pub fn from_horizon(site: &ObserverSite, horizon: Horizon, instant: DateTime<Utc>) -> TemePosition {
    let el = horizon.elevation_deg.to_radians();
    let az = horizon.azimuth_deg.to_radians();
    let enu = (
        horizon.range_km * el.cos() * az.sin(),
        horizon.range_km * el.cos() * az.cos(),
        horizon.range_km * el.sin(),
    );
    let dr = enu_to_ecef(enu, site.lat_rad(), site.lon_rad());
    let sta = site.position_ecef_km();
    ecef_to_teme_position(
        [sta[0] + dr[0], sta[1] + dr[1], sta[2] + dr[2]],
        sidereal_angle(instant),
    )
}
