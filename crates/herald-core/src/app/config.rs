//! EngineConfig - 設定
//!
//! Every field has a default, so `{}` is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// How long a settled notification stays up before it auto-dismisses.
pub const CLOSING_DURATION: Duration = Duration::from_secs(4);

/// Minimum spacing of progress updates per task.
pub const PROGRESS_THROTTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of retained notifications.
    pub capacity: usize,
    pub closing_duration_secs: u64,
    pub progress_throttle_ms: u64,
    /// Desktop notification title when a notification has no text message.
    pub app_name: String,
    /// Initial value of the desktop notification preference.
    pub desktop_notifications: bool,
    /// Base URL of the task event endpoint. Enables the HTTP transport.
    pub event_stream_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: crate::impls::MAX_NOTIFICATIONS,
            closing_duration_secs: CLOSING_DURATION.as_secs(),
            progress_throttle_ms: PROGRESS_THROTTLE.as_millis() as u64,
            app_name: "Dashboard".to_string(),
            desktop_notifications: false,
            event_stream_url: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.progress_throttle_ms == 0 {
            return Err(ConfigError::Invalid(
                "progress_throttle_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn closing_duration(&self) -> Duration {
        Duration::from_secs(self.closing_duration_secs)
    }

    pub fn progress_throttle(&self) -> Duration {
        Duration::from_millis(self.progress_throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.capacity, 100);
        assert_eq!(config.closing_duration(), Duration::from_secs(4));
        assert_eq!(config.progress_throttle(), Duration::from_millis(100));
    }

    #[test]
    fn partial_override() {
        let config = EngineConfig::from_json(
            r#"{"capacity": 5, "event_stream_url": "http://localhost:8080"}"#,
        )
        .unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.event_stream_url.as_deref(), Some("http://localhost:8080"));
        assert!(!config.desktop_notifications);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = EngineConfig::from_json(r#"{"capacity": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EngineConfig::from_json("{capacity").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
