//! Runner configuration
//!
//! Loaded from a JSON file. Every field is optional and falls back to its
//! default; the loaded value is validated before use.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{QueryError, QueryResult};
use crate::observability::{log_event, Event, Logger, Severity};

/// Query runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Records a stream may read ahead of the matcher (default 64)
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,

    /// Minimum log severity: trace, info, warn or error (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_stream_buffer() -> usize {
    64
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            stream_buffer: default_stream_buffer(),
            log_level: default_log_level(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: RunnerConfig = serde_json::from_str(&content)
            .map_err(|e| QueryError::InvalidConfig(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("stream_buffer", &config.stream_buffer.to_string()),
            ],
        );

        Ok(config)
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.stream_buffer == 0 {
            return Err(QueryError::InvalidConfig(
                "stream_buffer must be > 0".to_string(),
            ));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> QueryResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            QueryError::InvalidConfig(format!(
                "invalid log_level: '{}'. Expected trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    /// Install the log threshold process-wide
    pub fn apply(&self) -> QueryResult<()> {
        Logger::set_threshold(self.severity()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join("aeroquery.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({}));

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.stream_buffer, 64);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_config_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"stream_buffer": 4, "log_level": "trace"}));

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.stream_buffer, 4);
        assert_eq!(config.severity().unwrap(), Severity::Trace);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"stream_buffer": 0}));

        let err = RunnerConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "AERO_CONFIG_INVALID");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let config = RunnerConfig {
            log_level: "loud".to_string(),
            ..RunnerConfig::default()
        };
        assert!(matches!(config.validate(), Err(QueryError::InvalidConfig(_))));
        assert!(config.apply().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"buffer": 3}));
        assert!(RunnerConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RunnerConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
