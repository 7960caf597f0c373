use crate::predict::geo::Observer;
use crate::predict::types::{PassPrediction, SatellitePosition};

/// Divisor turning a distance in km into the time base of the estimate
pub const SPEED_OF_ISS: f64 = 28000.0;
/// Spacing between consecutive estimates, one revolution
pub const ORBITAL_PERIOD_S: f64 = 5_152_500.0;

/// Build `count` pass estimates for an observer from the current satellite
/// position. This is a straight-line time-to-reach heuristic, not orbit
/// propagation: the first pass is the distance over [`SPEED_OF_ISS`] and each
/// later pass adds one [`ORBITAL_PERIOD_S`].
pub fn estimate_passes(
    observer: &Observer,
    position: &SatellitePosition,
    count: u32,
) -> Vec<PassPrediction> {
    let time = observer.distance_to_km(position) / SPEED_OF_ISS;

    (0..count)
        .map(|i| PassPrediction {
            risetime: time + f64::from(i) * ORBITAL_PERIOD_S,
            // TODO: derive a duration once a visibility window is modelled
            duration: String::new(),
        })
        .collect()
}
