use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::predict::error::PositionError;
use crate::predict::types::SatellitePosition;

pub type PositionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SatellitePosition, PositionError>> + Send + 'a>>;

/// Anything that can tell where the satellite is right now
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> PositionFuture<'_>;
}

/// Client for the open-notify `iss-now.json` feed
pub struct OpenNotifyClient {
    client: reqwest::Client,
    url: String,
}

impl OpenNotifyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PositionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<SatellitePosition, PositionError> {
        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(PositionError::Status(status.as_u16()));
        }
        parse_position(&body)
    }
}

impl PositionSource for OpenNotifyClient {
    fn current_position(&self) -> PositionFuture<'_> {
        Box::pin(self.fetch())
    }
}

#[derive(Debug, Deserialize)]
struct IssNow {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    iss_position: Option<RawPosition>,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    #[serde(default)]
    latitude: Option<Coordinate>,
    #[serde(default)]
    longitude: Option<Coordinate>,
}

/// The feed sends coordinates as strings, but plain numbers are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn degrees(self, field: &'static str) -> Result<f64, PositionError> {
        match self {
            Coordinate::Number(value) => Ok(value),
            Coordinate::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| PositionError::InvalidField { field, value: text }),
        }
    }
}

fn parse_position(body: &str) -> Result<SatellitePosition, PositionError> {
    let now: IssNow = serde_json::from_str(body)?;

    if let Some(message) = now.message {
        if message != "success" {
            return Err(PositionError::Service(message));
        }
    }

    let timestamp = now
        .timestamp
        .ok_or(PositionError::MissingField("timestamp"))?;
    let position = now
        .iss_position
        .ok_or(PositionError::MissingField("iss_position"))?;
    let latitude_deg = position
        .latitude
        .ok_or(PositionError::MissingField("iss_position.latitude"))?
        .degrees("latitude")?;
    let longitude_deg = position
        .longitude
        .ok_or(PositionError::MissingField("iss_position.longitude"))?
        .degrees("longitude")?;

    Ok(SatellitePosition {
        timestamp,
        latitude_deg,
        longitude_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    const ISS_NOW: &str = r#"{"message": "success", "timestamp": 1700000000, "iss_position": {"latitude": "-12.3456", "longitude": "101.25"}}"#;

    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/iss-now.json", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/iss-now.json", addr)
    }

    fn client(url: String) -> OpenNotifyClient {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        OpenNotifyClient::with_client(client, url)
    }

    #[test]
    fn parses_string_coordinates() {
        let position = parse_position(ISS_NOW).unwrap();
        assert_eq!(position.timestamp, 1_700_000_000);
        assert_eq!(position.latitude_deg, -12.3456);
        assert_eq!(position.longitude_deg, 101.25);
    }

    #[test]
    fn parses_numeric_coordinates_without_message() {
        let body = r#"{"timestamp": 1000, "iss_position": {"latitude": 0.0, "longitude": 45}}"#;
        let position = parse_position(body).unwrap();
        assert_eq!(position.timestamp, 1000);
        assert_eq!(position.latitude_deg, 0.0);
        assert_eq!(position.longitude_deg, 45.0);
    }

    #[test]
    fn rejects_failure_message() {
        let body = r#"{"message": "failure"}"#;
        assert!(matches!(
            parse_position(body),
            Err(PositionError::Service(m)) if m == "failure"
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(matches!(
            parse_position(r#"{"message": "success", "iss_position": {}}"#),
            Err(PositionError::MissingField("timestamp"))
        ));
        assert!(matches!(
            parse_position(r#"{"timestamp": 1}"#),
            Err(PositionError::MissingField("iss_position"))
        ));
        assert!(matches!(
            parse_position(r#"{"timestamp": 1, "iss_position": {"latitude": "1.0"}}"#),
            Err(PositionError::MissingField("iss_position.longitude"))
        ));
    }

    #[test]
    fn rejects_unparseable_coordinate() {
        let body = r#"{"timestamp": 1, "iss_position": {"latitude": "north", "longitude": "2"}}"#;
        match parse_position(body) {
            Err(PositionError::InvalidField { field, value }) => {
                assert_eq!(field, "latitude");
                assert_eq!(value, "north");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_position("<html>busy</html>"),
            Err(PositionError::Json(_))
        ));
    }

    #[tokio::test]
    async fn fetches_from_live_endpoint() {
        let url = serve(StatusCode::OK, ISS_NOW).await;
        let position = client(url).current_position().await.unwrap();
        assert_eq!(position.latitude_deg, -12.3456);
        assert_eq!(position.longitude_deg, 101.25);
    }

    #[tokio::test]
    async fn reports_http_status() {
        let url = serve(StatusCode::SERVICE_UNAVAILABLE, "down").await;
        assert!(matches!(
            client(url).current_position().await,
            Err(PositionError::Status(503))
        ));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let app = Router::new().route(
            "/iss-now.json",
            get(|| async { std::future::pending::<&'static str>().await }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        let result = OpenNotifyClient::with_client(client, format!("http://{}/iss-now.json", addr))
            .current_position()
            .await;
        match result {
            Err(PositionError::Http(e)) => assert!(e.is_timeout(), "{e}"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn reports_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(format!("http://{}/iss-now.json", addr))
            .current_position()
            .await;
        assert!(matches!(result, Err(PositionError::Http(_))));
    }
}
