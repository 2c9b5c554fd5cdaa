//! Scan configuration types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Assumed encryption throughput when none is given, in MB/s.
pub const DEFAULT_ENCRYPTION_SPEED: f64 = 50.0;

/// How often the progress monitor samples the shared counters.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a single scan run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Assumed encryption throughput in MB/s.
    #[builder(default = "DEFAULT_ENCRYPTION_SPEED")]
    #[serde(default = "default_encryption_speed")]
    pub encryption_speed: f64,

    /// Interval between progress polls.
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Draw the progress bar (hidden draw target otherwise).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_encryption_speed() -> f64 {
    DEFAULT_ENCRYPTION_SPEED
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_true() -> bool {
    true
}

fn check_speed(speed: f64) -> Result<(), String> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(format!(
            "Encryption speed must be a positive number of MB/s, got {speed}"
        ));
    }
    Ok(())
}

fn check_interval(interval: Duration) -> Result<(), String> {
    if interval.is_zero() {
        return Err("Poll interval cannot be zero".to_string());
    }
    Ok(())
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        if let Some(speed) = self.encryption_speed {
            check_speed(speed)?;
        }
        if let Some(interval) = self.poll_interval {
            check_interval(interval)?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            encryption_speed: DEFAULT_ENCRYPTION_SPEED,
            poll_interval: DEFAULT_POLL_INTERVAL,
            show_progress: true,
        }
    }

    /// Re-check the invariants the builder enforces.
    ///
    /// Configs built with [`ScanConfig::new`] or deserialized from elsewhere
    /// skip the builder, so the session calls this before doing any work.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScanError::InvalidConfig {
                message: "Root path cannot be empty".to_string(),
            });
        }
        check_speed(self.encryption_speed)
            .and_then(|()| check_interval(self.poll_interval))
            .map_err(|message| ScanError::InvalidConfig { message })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .encryption_speed(60.0)
            .poll_interval(Duration::from_millis(20))
            .show_progress(false)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.encryption_speed, 60.0);
        assert_eq!(config.poll_interval, Duration::from_millis(20));
        assert!(!config.show_progress);
    }

    #[test]
    fn test_config_simple() {
        let config = ScanConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.encryption_speed, 50.0);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert!(config.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_requires_root() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_speed() {
        for speed in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = ScanConfig::builder()
                .root("/data")
                .encryption_speed(speed)
                .build();
            assert!(result.is_err(), "speed {speed} should be rejected");
        }
    }

    #[test]
    fn test_validate_catches_unbuilt_configs() {
        let mut config = ScanConfig::new("/data");
        config.encryption_speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ScanError::InvalidConfig { .. })
        ));

        let mut config = ScanConfig::new("/data");
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
