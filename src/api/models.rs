use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;

/// Opaque sensor identifier.
///
/// The data API sends `nodeid` as an integer, but nothing here does arithmetic
/// on it, so numbers and strings are both accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(from = "RawNodeId")]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Number(n) => Self(n.to_string()),
            RawNodeId::Text(s) => Self(s),
        }
    }
}

/// Entry of `GET /tagnames`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SensorDescriptor {
    #[serde(rename = "nodeid")]
    pub node_id: NodeId,
    #[serde(rename = "tagname")]
    pub tag_name: String,
}

/// First element of the `GET /data` response array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorHistoryResult {
    #[serde(default, rename = "nodeid")]
    pub node_id: Option<NodeId>,
    #[serde(default, rename = "tagname")]
    pub tag_name: String,
    #[serde(default)]
    pub history: Vec<Reading>,
}

/// One sample as sent by the data API.
///
/// At most one of the `val*` slots is expected to be populated. They are kept
/// as raw JSON so that a single mistyped record cannot fail the whole response;
/// `pipeline::normalize` is the only place that interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default)]
    pub valdouble: Option<Value>,
    #[serde(default)]
    pub valint: Option<Value>,
    #[serde(default)]
    pub valuint: Option<Value>,
    #[serde(default)]
    pub valbool: Option<Value>,
    #[serde(default)]
    pub valstring: Option<Value>,
    /// Data-quality annotation; the source system uses numeric codes
    #[serde(default, deserialize_with = "lenient_text")]
    pub quality: Option<String>,
    /// Time the source system actually recorded the sample
    #[serde(default, deserialize_with = "lenient_text")]
    pub actualtime: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recordtype: Option<String>,
}

impl Reading {
    /// Reading with only a timestamp, used as a starting point by callers
    /// that fill in a single value slot.
    #[must_use]
    pub fn at(time: impl Into<String>) -> Self {
        Self {
            time: Some(time.into()),
            ..Self::default()
        }
    }
}

/// Accept any JSON scalar as text: strings as-is, numbers and booleans via
/// their JSON rendering, null as `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
