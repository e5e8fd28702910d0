//! Resolution of a reading's polymorphic value slot.
//!
//! The data API carries each sample's value in one of five optional fields.
//! [`normalize`] collapses them into a single [`DisplayValue`] using the fixed
//! priority `valdouble > valint > valuint > valbool > valstring`; the first
//! populated field wins, and a reading with none populated is
//! [`DisplayValue::Absent`].

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::api::Reading;
use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Float(f64),
    Int(i64),
    Uint(u64),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    Number(Numeric),
    Boolean(bool),
    Text(String),
    /// No value field was populated
    Absent,
}

/// Text used when a value is shown as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueLabels {
    pub true_label: String,
    pub false_label: String,
    pub no_data: String,
}

impl Default for ValueLabels {
    fn default() -> Self {
        Self {
            true_label: "Yes".to_string(),
            false_label: "No".to_string(),
            no_data: "No data".to_string(),
        }
    }
}

impl DisplayValue {
    /// Human-readable form for the tabular view.
    #[must_use]
    pub fn render(&self, labels: &ValueLabels) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Boolean(true) => labels.true_label.clone(),
            Self::Boolean(false) => labels.false_label.clone(),
            Self::Text(s) => s.clone(),
            Self::Absent => labels.no_data.clone(),
        }
    }

    /// Point handed to the chart renderer: numbers stay numeric, everything
    /// else goes through [`DisplayValue::render`].
    #[must_use]
    pub fn chart_point(&self, labels: &ValueLabels) -> Value {
        match self {
            Self::Number(Numeric::Float(v)) => {
                serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
            }
            Self::Number(Numeric::Int(v)) => Value::from(*v),
            Self::Number(Numeric::Uint(v)) => Value::from(*v),
            other => Value::String(other.render(labels)),
        }
    }
}

/// Resolve the displayable value of a reading.
///
/// `None` stands for a missing record and yields [`DisplayValue::Absent`], as
/// does a record with every value field absent or null.
///
/// # Errors
///
/// Returns `FormatError::Value` when the winning field holds JSON of the wrong
/// type for its slot (e.g. `"valint": "abc"`).
pub fn normalize(reading: Option<&Reading>) -> Result<DisplayValue, FormatError> {
    let Some(reading) = reading else {
        return Ok(DisplayValue::Absent);
    };

    if let Some(v) = populated(reading.valdouble.as_ref()) {
        return v
            .as_f64()
            .map(|f| DisplayValue::Number(Numeric::Float(f)))
            .ok_or_else(|| mismatch("valdouble", "a number", v));
    }
    if let Some(v) = populated(reading.valint.as_ref()) {
        return v
            .as_i64()
            .map(|i| DisplayValue::Number(Numeric::Int(i)))
            .ok_or_else(|| mismatch("valint", "a signed integer", v));
    }
    if let Some(v) = populated(reading.valuint.as_ref()) {
        return v
            .as_u64()
            .map(|u| DisplayValue::Number(Numeric::Uint(u)))
            .ok_or_else(|| mismatch("valuint", "an unsigned integer", v));
    }
    if let Some(v) = populated(reading.valbool.as_ref()) {
        return v
            .as_bool()
            .map(DisplayValue::Boolean)
            .ok_or_else(|| mismatch("valbool", "a boolean", v));
    }
    if let Some(v) = populated(reading.valstring.as_ref()) {
        return v
            .as_str()
            .map(|s| DisplayValue::Text(s.to_string()))
            .ok_or_else(|| mismatch("valstring", "a string", v));
    }

    Ok(DisplayValue::Absent)
}

fn populated(field: Option<&Value>) -> Option<&Value> {
    field.filter(|v| !v.is_null())
}

fn mismatch(field: &'static str, expected: &'static str, found: &Value) -> FormatError {
    FormatError::Value {
        field,
        expected,
        found: found.to_string(),
    }
}
