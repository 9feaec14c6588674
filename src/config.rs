//! Configuration for paginators and job watchers
//!
//! Settings are loaded from YAML (or JSON) and converted into the runtime
//! [`RetryPolicy`] and [`PollingPolicy`].

use crate::error::{Error, Result};
use crate::pagination::RetryPolicy;
use crate::types::BackoffType;
use crate::watcher::PollingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KitConfig {
    /// Listing settings
    #[serde(default)]
    pub pagination: PaginationSettings,

    /// Job polling settings (no defaults, must be given to watch jobs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling: Option<PollingSettings>,
}

impl KitConfig {
    /// Retry policy for throttled page fetches
    pub fn retry_policy(&self) -> RetryPolicy {
        self.pagination.retry_policy()
    }

    /// Polling policy for job watchers
    pub fn polling_policy(&self) -> Result<PollingPolicy> {
        self.polling
            .as_ref()
            .ok_or_else(|| Error::missing_field("polling"))?
            .polling_policy()
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        if let Some(polling) = &self.polling {
            polling.polling_policy()?;
        }
        Ok(())
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Pagination settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Retries per page after a throttled response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff_type: BackoffType,

    /// First retry delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Retry delay cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Stop with an error after this many pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u64>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_type: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_pages: None,
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl PaginationSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
        .with_backoff_type(self.backoff_type)
    }

    fn validate(&self) -> Result<()> {
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(Error::invalid_value(
                "pagination.max_backoff_ms",
                format!(
                    "{} is less than initial_backoff_ms {}",
                    self.max_backoff_ms, self.initial_backoff_ms
                ),
            ));
        }
        if self.max_pages == Some(0) {
            return Err(Error::invalid_value(
                "pagination.max_pages",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Polling
// ============================================================================

/// Job polling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Wait before the second poll in milliseconds
    pub initial_delay_ms: u64,

    /// Longest wait between polls in milliseconds
    pub max_delay_ms: u64,

    /// Growth factor applied to each wait
    pub backoff_multiplier: f64,

    /// Give up after this many seconds
    pub max_total_wait_secs: u64,
}

impl PollingSettings {
    pub fn polling_policy(&self) -> Result<PollingPolicy> {
        PollingPolicy::new(
            Duration::from_millis(self.initial_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.backoff_multiplier,
            Duration::from_secs(self.max_total_wait_secs),
        )
        .map_err(|e| match e {
            Error::InvalidConfigValue { field, message } => Error::InvalidConfigValue {
                field: format!("polling.{field}"),
                message,
            },
            other => other,
        })
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file, JSON when the extension is `.json`, YAML otherwise
pub fn load_config(path: impl AsRef<Path>) -> Result<KitConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!("Config file '{}' not found", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let config: KitConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    } else {
        load_config_from_str(&content)
    }
}

/// Load a config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<KitConfig> {
    let config: KitConfig = if yaml.trim().is_empty() {
        KitConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_pagination_settings() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.pagination, PaginationSettings::default());
        assert!(config.polling.is_none());

        let policy = config.retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
pagination:
  max_retries: 5
  backoff_type: linear
  initial_backoff_ms: 250
  max_backoff_ms: 2000
  max_pages: 40
polling:
  initial_delay_ms: 1000
  max_delay_ms: 30000
  backoff_multiplier: 2.0
  max_total_wait_secs: 600
";

        let config = load_config_from_str(yaml).unwrap();
        let retry = config.retry_policy();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.backoff_type, BackoffType::Linear);
        assert_eq!(retry.initial_backoff, Duration::from_millis(250));
        assert_eq!(retry.max_backoff, Duration::from_secs(2));
        assert_eq!(config.pagination.max_pages, Some(40));

        let polling = config.polling_policy().unwrap();
        assert_eq!(polling.initial_delay(), Duration::from_secs(1));
        assert_eq!(polling.max_delay(), Duration::from_secs(30));
        assert_eq!(polling.max_total_wait(), Duration::from_secs(600));
    }

    #[test]
    fn test_missing_polling_section() {
        let config = load_config_from_str("pagination: {}").unwrap();
        let err = config.polling_policy().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "polling"));
    }

    #[test]
    fn test_polling_fields_are_required() {
        let yaml = r"
polling:
  initial_delay_ms: 1000
";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_rejects_multiplier_below_one() {
        let yaml = r"
polling:
  initial_delay_ms: 1000
  max_delay_ms: 5000
  backoff_multiplier: 0.5
  max_total_wait_secs: 60
";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "polling.backoff_multiplier")
        );
    }

    #[test]
    fn test_rejects_max_delay_below_initial() {
        let yaml = r"
polling:
  initial_delay_ms: 5000
  max_delay_ms: 1000
  backoff_multiplier: 2.0
  max_total_wait_secs: 60
";
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "polling.max_delay")
        );
    }

    #[test]
    fn test_rejects_inverted_backoff_bounds() {
        let yaml = r"
pagination:
  initial_backoff_ms: 5000
  max_backoff_ms: 100
";
        assert!(load_config_from_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_zero_max_pages() {
        assert!(load_config_from_str("pagination:\n  max_pages: 0").is_err());
    }

    #[test]
    fn test_rejects_unknown_backoff_type() {
        let err = load_config_from_str("pagination:\n  backoff_type: random").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "pagination:\n  max_retries: 1").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.pagination.max_retries, 1);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"polling": {{"initial_delay_ms": 500, "max_delay_ms": 500, "backoff_multiplier": 1.0, "max_total_wait_secs": 5}}}}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        let policy = config.polling_policy().unwrap();
        assert_eq!(policy.initial_delay(), Duration::from_millis(500));
        assert_eq!(policy.backoff_multiplier(), 1.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/marketplace.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_round_trip_keeps_optional_sections_out() {
        let value = serde_json::to_value(KitConfig::default()).unwrap();
        assert!(value.get("polling").is_none());
        assert!(value["pagination"].get("max_pages").is_none());
    }
}
