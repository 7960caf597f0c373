use std::f64::consts::PI;

use crate::predict::types::SatellitePosition;

pub const EQUATORIAL_EARTH_RADIUS_KM: f64 = 6378.1370;
const D2R: f64 = PI / 180.0;

/// Ground location of the person looking up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Distance to the sub-satellite point along the surface
    pub fn distance_to_km(&self, position: &SatellitePosition) -> f64 {
        great_circle_distance_km(
            self.latitude_deg,
            self.longitude_deg,
            position.latitude_deg,
            position.longitude_deg,
        )
    }
}

/// Haversine distance on a sphere with the WGS-84 equatorial radius.
/// Inputs are degrees, output is kilometres.
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1) * D2R;
    let dlon = (lon2 - lon1) * D2R;
    let a = (dlat / 2.0).sin().powi(2)
        + (lat1 * D2R).cos() * (lat2 * D2R).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EQUATORIAL_EARTH_RADIUS_KM * c
}
