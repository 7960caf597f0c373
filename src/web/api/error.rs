use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::predict::PositionError;

use super::passes::ApiResponse;

pub const UPSTREAM_FAILURE_REASON: &str = "Unable to retrieve current satellite position";

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Upstream(PositionError),
}

impl ApiError {
    /// Human readable text placed in the `reason` field
    pub fn reason(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Upstream(_) => UPSTREAM_FAILURE_REASON.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// An [`ApiError`] on its way out. Failures are reported in the body and the
/// status stays 200 unless strict status codes are enabled.
pub struct ApiFailure {
    pub error: ApiError,
    pub strict_status: bool,
}

impl ApiFailure {
    pub fn new(error: ApiError, strict_status: bool) -> Self {
        Self {
            error,
            strict_status,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(e) = &self.error {
            log::debug!("Answering with upstream failure: {}", e);
        }
        let status = if self.strict_status {
            self.error.status()
        } else {
            StatusCode::OK
        };
        (status, Json(ApiResponse::failure(self.error.reason()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;
