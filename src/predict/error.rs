use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("request to position service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("position service returned HTTP {0}")]
    Status(u16),
    #[error("invalid position payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("position payload is missing `{0}`")]
    MissingField(&'static str),
    #[error("invalid {field} in position payload: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("position service reported `{0}`")]
    Service(String),
}
