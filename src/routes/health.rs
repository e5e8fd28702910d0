use axum::http::StatusCode;

/// Health check endpoint
///
/// Returns 200 OK while the dashboard server is running, regardless of
/// whether the sensor data API is reachable.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
