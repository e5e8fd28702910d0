pub mod client;
pub mod models;

pub use client::{HistoryQuery, HttpSensorApi, SensorApi};
pub use models::{NodeId, Reading, SensorDescriptor, SensorHistoryResult};
