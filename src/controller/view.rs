use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::{NodeId, Reading, SensorDescriptor};
use crate::config::Config;
use crate::controller::state::{FetchState, Phase};
use crate::pipeline::{
    build_series, format_time_label, normalize, sort_history, ChartData, ValueLabels,
};

/// Message shown in place of a chart when the history holds no readings.
pub const NO_DATA_MESSAGE: &str = "No data to display";

/// Presentation settings shared by every view the controller renders.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub offset: FixedOffset,
    pub labels: ValueLabels,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            labels: ValueLabels::default(),
        }
    }
}

impl ViewSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            offset: config.display_offset(),
            labels: config.value_labels(),
        }
    }
}

/// Render-ready snapshot of the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub phase: Phase,
    /// The single error message currently shown, if any
    pub error: Option<String>,
    /// True while a fetch is running; inputs must not start another one
    pub controls_disabled: bool,
    pub sensors: Vec<SensorDescriptor>,
    pub selected: Option<NodeId>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub tag_name: Option<String>,
    /// Absent when there is no history to show
    pub chart: Option<ChartView>,
    /// Sorted like the chart
    pub table: Vec<TableRow>,
}

/// Chart contract: either an explicit empty state or parallel series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartView {
    NoData {
        message: String,
    },
    Series {
        label: String,
        /// `null` where a timestamp could not be rendered
        labels: Vec<Option<String>>,
        /// Numbers, strings, or `null` where a value could not be rendered
        #[schema(value_type = Vec<Object>)]
        values: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TableRow {
    /// Formatted time, or the raw upstream value if it could not be parsed
    pub time: String,
    pub value: String,
    pub quality: String,
    pub actual_time: Option<String>,
    pub record_type: Option<String>,
}

impl DashboardView {
    #[must_use]
    pub fn from_state(state: &FetchState, settings: &ViewSettings) -> Self {
        let shown = state
            .history
            .as_ref()
            .filter(|_| state.phase == Phase::Ready);

        let (tag_name, chart, table) = match shown {
            Some(result) => {
                let sorted = sort_history(&result.history, settings.offset);
                let chart = chart_view(
                    build_series(&sorted, &result.tag_name, settings.offset, |r| {
                        normalize(Some(r))
                    }),
                    &settings.labels,
                );
                let table = sorted
                    .iter()
                    .map(|reading| table_row(reading, settings))
                    .collect();
                (Some(result.tag_name.clone()), Some(chart), table)
            }
            None => (None, None, Vec::new()),
        };

        Self {
            phase: state.phase,
            error: state.error_message.clone(),
            controls_disabled: state.phase == Phase::Loading,
            sensors: state.sensors.clone(),
            selected: state.selected.clone(),
            date_from: state.date_from,
            date_to: state.date_to,
            tag_name,
            chart,
            table,
        }
    }
}

fn chart_view(data: ChartData, labels: &ValueLabels) -> ChartView {
    match data {
        ChartData::NoData => ChartView::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        },
        ChartData::Series(series) => ChartView::Series {
            label: series.label,
            labels: series.labels,
            values: series
                .values
                .iter()
                .map(|v| v.as_ref().map_or(Value::Null, |v| v.chart_point(labels)))
                .collect(),
        },
    }
}

fn table_row(reading: &Reading, settings: &ViewSettings) -> TableRow {
    TableRow {
        time: format_time_label(reading, settings.offset)
            .unwrap_or_else(|_| reading.time.clone().unwrap_or_default()),
        value: normalize(Some(reading))
            .map(|v| v.render(&settings.labels))
            .unwrap_or_default(),
        quality: reading.quality.clone().unwrap_or_default(),
        actual_time: reading.actualtime.clone(),
        record_type: reading.recordtype.clone(),
    }
}
