use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::{HistoryQuery, NodeId, SensorApi};
use crate::controller::state::{FetchState, Phase};
use crate::controller::view::{DashboardView, ViewSettings};

/// Drives one dashboard session: owns the [`FetchState`], calls the sensor
/// API and decides which results are allowed to land.
///
/// Every trigger bumps a request generation. A fetch remembers the generation
/// it was started under and its result is applied only if no newer trigger
/// has happened since, so a slow response for an abandoned selection is
/// dropped without a trace. The state lock is never held across a network
/// call.
///
/// History fetches run on their own task. A caller that stops waiting, such
/// as an HTTP handler whose client disconnected, does not stop the result
/// from landing, so the session never stays stuck in `Loading`.
pub struct DashboardController<A> {
    api: A,
    settings: ViewSettings,
    session: Mutex<Session>,
}

#[derive(Default)]
struct Session {
    state: FetchState,
    generation: u64,
    catalog_requested: bool,
}

impl Session {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Move to `Loading` for the current selection and hand out the ticket
    /// its result must present.
    fn begin_history_fetch(&mut self) -> Option<(u64, HistoryQuery)> {
        let node_id = self.state.selected.clone()?;
        let generation = self.next_generation();
        self.state.enter_loading();

        Some((
            generation,
            HistoryQuery {
                node_id,
                date_from: self.state.date_from,
                date_to: self.state.date_to,
            },
        ))
    }
}

impl<A: SensorApi + 'static> DashboardController<A> {
    pub fn new(api: A, settings: ViewSettings) -> Self {
        Self {
            api,
            settings,
            session: Mutex::new(Session::default()),
        }
    }

    pub async fn snapshot(&self) -> FetchState {
        self.session.lock().await.state.clone()
    }

    pub async fn view(&self) -> DashboardView {
        let session = self.session.lock().await;
        DashboardView::from_state(&session.state, &self.settings)
    }

    /// Load the sensor catalog. Runs once per controller; later calls return
    /// immediately.
    pub async fn mount(&self) {
        let generation = {
            let mut session = self.session.lock().await;
            if session.catalog_requested {
                tracing::debug!("Sensor catalog already requested");
                return;
            }
            session.catalog_requested = true;
            session.state.enter_loading();
            session.next_generation()
        };

        let result = self.api.fetch_catalog().await;

        let mut session = self.session.lock().await;
        let current = session.generation == generation;
        match result {
            Ok(sensors) => {
                tracing::info!(count = sensors.len(), "Sensor catalog loaded");
                session.state.sensors = sensors;
                if current {
                    session.state.phase = Phase::Ready;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Sensor catalog fetch failed");
                session.state.sensors = Vec::new();
                if current {
                    session.state.enter_error(e.to_string());
                }
            }
        }
    }

    /// Change the selected sensor. A sensor id starts a history fetch with
    /// the current date bounds; `None` clears the history without any
    /// network call.
    pub async fn select_sensor(self: &Arc<Self>, node_id: Option<NodeId>) {
        let ticket = {
            let mut session = self.session.lock().await;
            match node_id {
                Some(id) => {
                    tracing::debug!(node_id = %id, "Sensor selected");
                    session.state.selected = Some(id);
                    session.begin_history_fetch()
                }
                None => {
                    session.next_generation();
                    session.state.selected = None;
                    session.state.history = None;
                    session.state.error_message = None;
                    session.state.phase = Phase::Idle;
                    None
                }
            }
        };

        if let Some((generation, query)) = ticket {
            self.spawn_history_fetch(generation, query).await;
        }
    }

    /// Store new date bounds. They are used by the next selection or refresh.
    pub async fn set_date_range(
        &self,
        date_from: Option<NaiveDateTime>,
        date_to: Option<NaiveDateTime>,
    ) {
        let mut session = self.session.lock().await;
        session.state.date_from = date_from;
        session.state.date_to = date_to;
    }

    /// Re-fetch the history for the current selection and bounds. Does
    /// nothing when no sensor is selected.
    pub async fn refresh(self: &Arc<Self>) {
        let ticket = self.session.lock().await.begin_history_fetch();

        match ticket {
            Some((generation, query)) => self.spawn_history_fetch(generation, query).await,
            None => tracing::debug!("Refresh ignored, no sensor selected"),
        }
    }

    /// Run the fetch detached and wait for it. Dropping the returned future
    /// only stops the waiting.
    async fn spawn_history_fetch(self: &Arc<Self>, generation: u64, query: HistoryQuery) {
        let controller = Arc::clone(self);
        let task =
            tokio::spawn(async move { controller.run_history_fetch(generation, query).await });

        if let Err(e) = task.await {
            tracing::error!(error = %e, generation, "History fetch task failed");
        }
    }

    async fn run_history_fetch(&self, generation: u64, query: HistoryQuery) {
        let result = self.api.fetch_history(&query).await;

        let mut session = self.session.lock().await;
        if session.generation != generation {
            tracing::debug!(
                node_id = %query.node_id,
                generation,
                current = session.generation,
                "Discarding superseded history response"
            );
            return;
        }

        match result {
            Ok(history) => {
                tracing::info!(
                    node_id = %query.node_id,
                    readings = history.history.len(),
                    "Sensor history loaded"
                );
                session.state.history = Some(history);
                session.state.phase = Phase::Ready;
            }
            Err(e) => {
                tracing::warn!(node_id = %query.node_id, error = %e, "Sensor history fetch failed");
                session.state.history = None;
                session.state.enter_error(e.to_string());
            }
        }
    }
}
