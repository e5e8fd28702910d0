use chrono::NaiveDateTime;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;

use crate::api::models::{NodeId, SensorDescriptor, SensorHistoryResult};
use crate::config::Config;
use crate::error::{DashboardError, DashboardResult, FetchFailure};

/// Format used for the `date_from` / `date_to` query parameters.
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parameters of one `GET /data` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub node_id: NodeId,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl HistoryQuery {
    /// Query-string pairs; unset bounds are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("nodeid", self.node_id.to_string())];
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format(QUERY_TIME_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format(QUERY_TIME_FORMAT).to_string()));
        }
        pairs
    }
}

/// The two reads the dashboard makes against the sensor data API.
pub trait SensorApi: Send + Sync {
    /// `GET /tagnames`
    fn fetch_catalog(&self) -> impl Future<Output = DashboardResult<Vec<SensorDescriptor>>> + Send;

    /// `GET /data?nodeid=..[&date_from=..][&date_to=..]`
    fn fetch_history(
        &self,
        query: &HistoryQuery,
    ) -> impl Future<Output = DashboardResult<SensorHistoryResult>> + Send;
}

pub struct HttpSensorApi {
    http_client: Client,
    base_url: String,
}

impl HttpSensorApi {
    /// Build a client for the API rooted at `config.api_base_url`.
    ///
    /// No timeout is applied unless `SENSOR_API_TIMEOUT_SECONDS` is set.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` if the TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.api_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchFailure> {
        let url = format!("{}/{path}", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body_preview = %body.chars().take(200).collect::<String>(),
                "Sensor API returned an error status"
            );
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(format!("failed to read body: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                url = %url,
                error = %e,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse sensor API response"
            );
            FetchFailure::Shape(format!("invalid JSON: {e}"))
        })
    }
}

impl SensorApi for HttpSensorApi {
    async fn fetch_catalog(&self) -> DashboardResult<Vec<SensorDescriptor>> {
        let body = self
            .get_json("tagnames", &[])
            .await
            .map_err(DashboardError::CatalogFetch)?;

        let sensors = decode_catalog(body).map_err(DashboardError::CatalogFetch)?;
        tracing::debug!(count = sensors.len(), "Sensor catalog fetched");
        Ok(sensors)
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> DashboardResult<SensorHistoryResult> {
        let body = self
            .get_json("data", &query.query_pairs())
            .await
            .map_err(DashboardError::HistoryFetch)?;

        let result = decode_history(body)?;
        tracing::debug!(
            node_id = %query.node_id,
            readings = result.history.len(),
            "Sensor history fetched"
        );
        Ok(result)
    }
}

/// Decode a `/tagnames` body. Anything but an array of well-formed
/// descriptors is rejected as a whole.
///
/// # Errors
///
/// Returns `FetchFailure::Shape` for non-array bodies or malformed entries.
pub fn decode_catalog(body: Value) -> Result<Vec<SensorDescriptor>, FetchFailure> {
    if !body.is_array() {
        return Err(FetchFailure::Shape(format!(
            "expected an array of sensors, got {}",
            json_kind(&body)
        )));
    }

    serde_json::from_value(body).map_err(|e| FetchFailure::Shape(e.to_string()))
}

/// Decode a `/data` body, keeping only the first element.
///
/// # Errors
///
/// Returns `DashboardError::EmptyResult` for an empty array and
/// `DashboardError::HistoryFetch` for any other unexpected shape.
pub fn decode_history(body: Value) -> DashboardResult<SensorHistoryResult> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            return Err(DashboardError::HistoryFetch(FetchFailure::Shape(format!(
                "expected an array, got {}",
                json_kind(&other)
            ))));
        }
    };

    let total = items.len();
    let Some(first) = items.into_iter().next() else {
        return Err(DashboardError::EmptyResult);
    };
    if total > 1 {
        tracing::debug!(ignored = total - 1, "Only the first history entry is displayed");
    }

    serde_json::from_value(first)
        .map_err(|e| DashboardError::HistoryFetch(FetchFailure::Shape(e.to_string())))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
