use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{NodeId, SensorDescriptor, SensorHistoryResult};

/// Fetch lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Error,
    Ready,
}

/// Everything one dashboard session knows. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    /// Filled once by the catalog fetch, never updated afterwards
    pub sensors: Vec<SensorDescriptor>,
    pub selected: Option<NodeId>,
    /// Upstream order, not yet sorted
    pub history: Option<SensorHistoryResult>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub phase: Phase,
    pub error_message: Option<String>,
}

impl FetchState {
    pub(crate) fn enter_loading(&mut self) {
        self.phase = Phase::Loading;
        self.error_message = None;
    }

    pub(crate) fn enter_error(&mut self, message: String) {
        self.phase = Phase::Error;
        self.error_message = Some(message);
    }
}
