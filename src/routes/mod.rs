pub mod dashboard;
pub mod health;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::{NodeId, SensorDescriptor};
use crate::common::AppState;
use crate::controller::{ChartView, DashboardView, Phase, TableRow};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        session::get_state,
        session::select_sensor,
        session::set_range,
        session::refresh,
    ),
    components(
        schemas(
            DashboardView,
            ChartView,
            TableRow,
            Phase,
            NodeId,
            SensorDescriptor,
            session::SelectionRequest,
            session::RangeRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Dashboard session: selection, date range and refresh"),
    ),
    info(
        title = "Sensor Dashboard",
        description = "Sensor history dashboard for the industrial monitoring data API",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    tracing::info!(
        api_base_url = %state.config.api_base_url,
        display_offset = %state.config.display_offset(),
        "Dashboard routes configured"
    );

    let session_routes = Router::new()
        .route("/state", get(session::get_state))
        .route("/selection", post(session::select_sensor))
        .route("/range", put(session::set_range))
        .route("/refresh", post(session::refresh))
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    let health_routes = Router::new().route("/healthz", get(health::healthz));

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .nest("/dashboard", session_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
