//! Pure transforms between a fetched history and what the view renders:
//! chronological ordering, value normalization and the chart series.

pub mod normalize;
pub mod series;
pub mod sort;

pub use normalize::{normalize, DisplayValue, Numeric, ValueLabels};
pub use series::{build_series, format_time_label, ChartData, ChartSeries, LABEL_FORMAT};
pub use sort::{parse_time, sort_history};
