use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::predict::{estimate_passes, Observer, PassPrediction};
use crate::web::api::error::{ApiError, ApiFailure, ApiResult};
use crate::web::state::AppState;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Message {
    Success,
    Failure,
}

/// Body of every `/iss-pass` reply
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Vec<PassPrediction>>,
}

impl ApiResponse {
    pub fn success(request: RequestEcho, passes: Vec<PassPrediction>) -> Self {
        ApiResponse {
            message: Message::Success,
            reason: None,
            request: Some(request),
            response: Some(passes),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        ApiResponse {
            message: Message::Failure,
            reason: Some(reason.into()),
            request: None,
            response: None,
        }
    }
}

/// The accepted parameters, as echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RequestEcho {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: i64,
    /// Time the request was served, Unix epoch milliseconds
    pub datetime: i64,
    pub passes: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassQuery {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub lat: Option<f64>,
    /// Longitude. Historically named `log`; `lon` is accepted as well.
    #[serde(
        rename = "log",
        alias = "lon",
        default,
        deserialize_with = "deserialize_optional"
    )]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub alt: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub n: Option<i64>,
}

/// Blank values (`?lat=`) count as missing
fn deserialize_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

const DEFAULT_ALTITUDE: i64 = 100;
const DEFAULT_PASS_COUNT: i64 = 5;

/// Validated request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Not used by the estimate, only echoed
    pub altitude: i64,
    pub count: i64,
}

impl PassQuery {
    /// Checks run in a fixed order and the first failure wins
    pub fn validate(&self, max_count: Option<u32>) -> Result<PassRequest, ApiError> {
        let latitude = self
            .lat
            .ok_or_else(|| ApiError::Validation("Latitude must be specified".into()))?;
        let longitude = self
            .lon
            .ok_or_else(|| ApiError::Validation("Longitude must be specified".into()))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::Validation(
                "Latitude must be number between -90.0 and 90.0".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::Validation(
                "Longitude must be number between -180.0 and 180.0".into(),
            ));
        }

        let count = self.n.unwrap_or(DEFAULT_PASS_COUNT);
        if let Some(max) = max_count {
            if count > i64::from(max) {
                return Err(ApiError::Validation(format!(
                    "Number of passes must not exceed {}",
                    max
                )));
            }
        }

        Ok(PassRequest {
            latitude,
            longitude,
            altitude: self.alt.unwrap_or(DEFAULT_ALTITUDE),
            count,
        })
    }
}

/// Validate the query, look up the satellite and build the estimate
pub async fn estimate(state: &AppState, query: &PassQuery) -> Result<ApiResponse, ApiError> {
    let request = query.validate(state.config.passes.max_count)?;

    let position = state.positions.current_position().await.map_err(|e| {
        log::error!("Failed to fetch current satellite position: {}", e);
        ApiError::Upstream(e)
    })?;
    log::debug!(
        "Satellite at {:.4}, {:.4} (t={})",
        position.latitude_deg,
        position.longitude_deg,
        position.timestamp
    );

    let observer = Observer::new(request.latitude, request.longitude);
    // Non-positive counts yield an empty list
    let count = u32::try_from(request.count.max(0)).unwrap_or(0);
    let passes = estimate_passes(&observer, &position, count);

    let echo = RequestEcho {
        latitude: request.latitude,
        longitude: request.longitude,
        altitude: request.altitude,
        datetime: chrono::Utc::now().timestamp_millis(),
        passes: request.count,
    };

    Ok(ApiResponse::success(echo, passes))
}

#[utoipa::path(
    post,
    path = "/iss-pass",
    tag = "passes",
    params(
        ("lat" = f64, Query, description = "Observer latitude in degrees, -90 to 90"),
        ("log" = f64, Query, description = "Observer longitude in degrees, -180 to 180 (alias `lon`)"),
        ("alt" = Option<i64>, Query, description = "Observer altitude in metres (default 100, echoed only)"),
        ("n" = Option<i64>, Query, description = "Number of passes to estimate (default 5)")
    ),
    responses(
        (status = 200, description = "Pass estimates, or a failure with a reason", body = ApiResponse),
        (status = 400, description = "Invalid parameters (strict status codes only)", body = ApiResponse),
        (status = 502, description = "Position service unavailable (strict status codes only)", body = ApiResponse)
    )
)]
pub async fn iss_pass(
    State(state): State<AppState>,
    query: Result<Query<PassQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let strict = state.config.web.strict_status_codes;

    let Query(query) = query.map_err(|rejection| {
        ApiFailure::new(
            ApiError::Validation(format!(
                "Invalid query parameters: {}",
                rejection.body_text()
            )),
            strict,
        )
    })?;

    match estimate(&state, &query).await {
        Ok(response) => {
            log::info!(
                "iss-pass lat={:?} lon={:?} n={:?}: {}",
                query.lat,
                query.lon,
                query.n,
                response.message
            );
            Ok(Json(response))
        }
        Err(error) => {
            log::info!(
                "iss-pass lat={:?} lon={:?} n={:?}: {} ({})",
                query.lat,
                query.lon,
                query.n,
                Message::Failure,
                error.reason()
            );
            Err(ApiFailure::new(error, strict))
        }
    }
}
