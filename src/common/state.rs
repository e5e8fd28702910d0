use std::sync::Arc;

use crate::api::HttpSensorApi;
use crate::config::Config;
use crate::controller::{DashboardController, ViewSettings};

/// The dashboard controller backed by the real HTTP client.
pub type Dashboard = DashboardController<HttpSensorApi>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(config: Config, api: HttpSensorApi) -> Self {
        let settings = ViewSettings::from_config(&config);

        Self {
            config: Arc::new(config),
            dashboard: Arc::new(DashboardController::new(api, settings)),
        }
    }
}
