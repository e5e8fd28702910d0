use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::time::Duration;

use crate::pipeline::ValueLabels;

/// Only production changes behaviour (JSON logs); every other value is local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Sensor data API
    pub api_base_url: String,
    pub api_timeout_seconds: Option<u64>,

    // Dashboard server
    pub host: String,
    pub port: u16,

    // Presentation
    pub display_utc_offset_minutes: i32,
    pub label_true: String,
    pub label_false: String,
    pub label_no_data: String,

    // Application metadata
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            api_timeout_seconds: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            display_utc_offset_minutes: 0,
            label_true: "Yes".to_string(),
            label_false: "No".to_string(),
            label_no_data: "No data".to_string(),
            deployment: Deployment::Local,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones fall back to [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            // Sensor data API
            api_base_url: env::var("SENSOR_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout_seconds: optional_var("SENSOR_API_TIMEOUT_SECONDS")?,

            // Dashboard server
            host: env::var("DASHBOARD_HOST").unwrap_or(defaults.host),
            port: optional_var("DASHBOARD_PORT")?.unwrap_or(defaults.port),

            // Presentation
            display_utc_offset_minutes: optional_var("DISPLAY_UTC_OFFSET_MINUTES")?
                .unwrap_or(defaults.display_utc_offset_minutes),
            label_true: env::var("LABEL_TRUE").unwrap_or(defaults.label_true),
            label_false: env::var("LABEL_FALSE").unwrap_or(defaults.label_false),
            label_no_data: env::var("LABEL_NO_DATA").unwrap_or(defaults.label_no_data),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn api_timeout(&self) -> Option<Duration> {
        self.api_timeout_seconds.map(Duration::from_secs)
    }

    /// Offset used to render timestamps and to interpret offset-less ones.
    ///
    /// Out-of-range values (beyond ±24h) fall back to UTC.
    #[must_use]
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display_utc_offset_minutes.saturating_mul(60))
            .unwrap_or(Utc.fix())
    }

    #[must_use]
    pub fn value_labels(&self) -> ValueLabels {
        ValueLabels {
            true_label: self.label_true.clone(),
            false_label: self.label_false.clone(),
            no_data: self.label_no_data.clone(),
        }
    }
}

fn optional_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
