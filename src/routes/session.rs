use axum::{extract::State, Json};
use chrono::NaiveDateTime;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::NodeId;
use crate::common::AppState;
use crate::controller::DashboardView;
use crate::error::{AppError, AppResult};

/// Layouts accepted for date bounds, as produced by `datetime-local` inputs.
const BOUND_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectionRequest {
    /// Sensor to show; `null` or an empty string clears the selection
    #[serde(default)]
    pub nodeid: Option<NodeId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RangeRequest {
    /// Lower bound, `YYYY-MM-DDTHH:MM[:SS]`; empty or `null` for none
    #[serde(default)]
    pub date_from: Option<String>,
    /// Upper bound, `YYYY-MM-DDTHH:MM[:SS]`; empty or `null` for none
    #[serde(default)]
    pub date_to: Option<String>,
}

/// Current dashboard state
#[utoipa::path(
    get,
    path = "/dashboard/state",
    responses(
        (status = 200, description = "Current view", body = DashboardView),
    ),
    tag = "dashboard"
)]
pub async fn get_state(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

/// Select a sensor and load its history
///
/// Responds once the history fetch has settled.
#[utoipa::path(
    post,
    path = "/dashboard/selection",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "View after the fetch settled", body = DashboardView),
    ),
    tag = "dashboard"
)]
pub async fn select_sensor(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Json<DashboardView> {
    let node_id = request
        .nodeid
        .filter(|id| !id.as_str().trim().is_empty());

    state.dashboard.select_sensor(node_id).await;
    Json(state.dashboard.view().await)
}

/// Set the date bounds used by the next fetch
///
/// Does not fetch anything by itself.
#[utoipa::path(
    put,
    path = "/dashboard/range",
    request_body = RangeRequest,
    responses(
        (status = 200, description = "Bounds stored", body = DashboardView),
        (status = 400, description = "Malformed date bound"),
    ),
    tag = "dashboard"
)]
pub async fn set_range(
    State(state): State<AppState>,
    Json(request): Json<RangeRequest>,
) -> AppResult<Json<DashboardView>> {
    let date_from = parse_bound("date_from", request.date_from.as_deref())?;
    let date_to = parse_bound("date_to", request.date_to.as_deref())?;

    state.dashboard.set_date_range(date_from, date_to).await;
    Ok(Json(state.dashboard.view().await))
}

/// Reload the history for the current selection and bounds
#[utoipa::path(
    post,
    path = "/dashboard/refresh",
    responses(
        (status = 200, description = "View after the fetch settled", body = DashboardView),
    ),
    tag = "dashboard"
)]
pub async fn refresh(State(state): State<AppState>) -> Json<DashboardView> {
    state.dashboard.refresh().await;
    Json(state.dashboard.view().await)
}

fn parse_bound(name: &str, raw: Option<&str>) -> AppResult<Option<NaiveDateTime>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    BOUND_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(Some)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid {name}: '{raw}'. Use YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS"
            ))
        })
}
