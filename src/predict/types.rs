use serde::Serialize;
use utoipa::ToSchema;

/// Sub-satellite point reported by the position service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitePosition {
    /// Unix epoch seconds
    pub timestamp: i64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// A naive pass estimate
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PassPrediction {
    /// Seconds-based estimate, not a calendar time
    pub risetime: f64,
    /// Always empty, pass durations are not computed
    pub duration: String,
}
