use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a request to the sensor data API did not produce usable data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Fetch-level errors. The `Display` text is what the dashboard shows the operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("Failed to load sensor list: {0}")]
    CatalogFetch(FetchFailure),

    #[error("Failed to load sensor data: {0}")]
    HistoryFetch(FetchFailure),

    #[error("No data for the selected period")]
    EmptyResult,
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A single record could not be rendered. Always recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("{field} holds {found}, expected {expected}")]
    Value {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("unparseable timestamp {0:?}")]
    Time(String),

    #[error("reading has no timestamp")]
    MissingTime,
}

/// Errors returned by the dashboard's own HTTP surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::BadRequest(msg) => {
                tracing::debug!("Bad request: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
