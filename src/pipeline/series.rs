use chrono::FixedOffset;

use crate::api::Reading;
use crate::error::FormatError;
use crate::pipeline::normalize::DisplayValue;
use crate::pipeline::sort::parse_time;

/// Layout of chart labels, e.g. `01.01.2024, 00:00:00`.
pub const LABEL_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// What the chart renderer receives.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// The history had no readings at all
    NoData,
    Series(ChartSeries),
}

/// Parallel label/value sequences, one entry per reading.
///
/// `labels.len() == values.len()` always holds. `None` marks an element whose
/// time or value could not be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<Option<String>>,
    pub values: Vec<Option<DisplayValue>>,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Render a reading's time as a chart label in `offset`.
///
/// # Errors
///
/// Returns `FormatError::MissingTime` or `FormatError::Time` when there is no
/// parseable timestamp.
pub fn format_time_label(reading: &Reading, offset: FixedOffset) -> Result<String, FormatError> {
    let raw = reading.time.as_deref().ok_or(FormatError::MissingTime)?;
    let instant = parse_time(raw, offset).ok_or_else(|| FormatError::Time(raw.to_string()))?;
    Ok(instant.with_timezone(&offset).format(LABEL_FORMAT).to_string())
}

/// Turn an already sorted history into the chart's series.
///
/// A failure on one element only blanks that element.
pub fn build_series<F>(
    sorted_history: &[Reading],
    series_label: &str,
    offset: FixedOffset,
    normalize_fn: F,
) -> ChartData
where
    F: Fn(&Reading) -> Result<DisplayValue, FormatError>,
{
    if sorted_history.is_empty() {
        return ChartData::NoData;
    }

    let mut labels = Vec::with_capacity(sorted_history.len());
    let mut values = Vec::with_capacity(sorted_history.len());

    for (index, reading) in sorted_history.iter().enumerate() {
        labels.push(
            format_time_label(reading, offset)
                .inspect_err(|e| tracing::debug!(index, error = %e, "Chart label placeholder"))
                .ok(),
        );
        values.push(
            normalize_fn(reading)
                .inspect_err(|e| tracing::debug!(index, error = %e, "Chart value placeholder"))
                .ok(),
        );
    }

    ChartData::Series(ChartSeries {
        label: series_label.to_string(),
        labels,
        values,
    })
}
