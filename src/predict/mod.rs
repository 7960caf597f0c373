mod error;
mod estimator;
mod geo;
mod position;
mod types;

pub use error::PositionError;
pub use estimator::estimate_passes;
pub use geo::Observer;
pub use position::{OpenNotifyClient, PositionFuture, PositionSource};
pub use types::{PassPrediction, SatellitePosition};
