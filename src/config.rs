//! Playback timing configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Longest tick period a valid config may produce, at its slowest speed.
pub const MAX_PERIOD_MS: u64 = 60 * 60 * 1000;

/// Speed dial bounds and the mapping from speed to tick period.
///
/// `period = base_period_ms * reference_speed / speed`, so the default speed
/// of 50 advances one step per second and 100 doubles that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub base_period_ms: u64,
    pub reference_speed: u32,
    pub min_speed: u32,
    pub max_speed: u32,
    pub default_speed: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_period_ms: 1000,
            reference_speed: 50,
            min_speed: 10,
            max_speed: 100,
            default_speed: 50,
        }
    }
}

impl PlaybackConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, VizError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| VizError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VizError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VizError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), VizError> {
        if self.base_period_ms == 0 {
            return Err(VizError::Config("base_period_ms must be non-zero".into()));
        }
        if self.reference_speed == 0 {
            return Err(VizError::Config("reference_speed must be non-zero".into()));
        }
        if self.min_speed == 0 {
            return Err(VizError::Config("min_speed must be non-zero".into()));
        }
        if self.min_speed > self.max_speed {
            return Err(VizError::Config(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.default_speed) {
            return Err(VizError::Config(format!(
                "default_speed {} is outside {}..={}",
                self.default_speed, self.min_speed, self.max_speed
            )));
        }
        let slowest = self
            .base_period_ms
            .checked_mul(u64::from(self.reference_speed))
            .map(|scaled| scaled / u64::from(self.min_speed));
        match slowest {
            Some(ms) if ms <= MAX_PERIOD_MS => Ok(()),
            _ => Err(VizError::Config(format!(
                "base_period_ms {} at reference_speed {} exceeds {MAX_PERIOD_MS}ms per step",
                self.base_period_ms, self.reference_speed
            ))),
        }
    }

    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Tick period for a speed, after clamping it to the dial. Saturates on
    /// configs that skipped [`validate`](Self::validate).
    pub fn period_for(&self, speed: u32) -> Duration {
        let speed = u64::from(self.clamp_speed(speed).max(1));
        let scaled = self
            .base_period_ms
            .saturating_mul(u64::from(self.reference_speed));
        Duration::from_millis(scaled / speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = PlaybackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.period_for(50), Duration::from_secs(1));
        assert_eq!(config.period_for(100), Duration::from_millis(500));
        assert_eq!(config.period_for(10), Duration::from_secs(5));
    }

    #[test]
    fn test_period_is_monotonic_and_clamped() {
        let config = PlaybackConfig::default();
        let mut last = Duration::MAX;
        for speed in config.min_speed..=config.max_speed {
            let period = config.period_for(speed);
            assert!(period <= last, "speed {speed} slowed down");
            last = period;
        }
        assert_eq!(config.period_for(0), config.period_for(10));
        assert_eq!(config.period_for(1000), config.period_for(100));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlaybackConfig::from_json_str(r#"{"base_period_ms": 200}"#).unwrap();
        assert_eq!(config.base_period_ms, 200);
        assert_eq!(config.default_speed, 50);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err =
            PlaybackConfig::from_json_str(r#"{"min_speed": 80, "max_speed": 20}"#).unwrap_err();
        assert!(matches!(err, VizError::Config(_)), "Got: {err}");

        let err = PlaybackConfig::from_json_str(r#"{"default_speed": 5}"#).unwrap_err();
        assert!(err.to_string().contains("default_speed"), "Got: {err}");
    }

    #[test]
    fn test_rejects_periods_that_overflow() {
        let err = PlaybackConfig::from_json_str(r#"{"base_period_ms": 18446744073709551615}"#)
            .unwrap_err();
        assert!(err.to_string().contains("base_period_ms"), "Got: {err}");

        // 3.6s at speed 50 is 18s at speed 10, well inside the bound.
        assert!(PlaybackConfig::from_json_str(r#"{"base_period_ms": 3600}"#).is_ok());
        let err = PlaybackConfig::from_json_str(r#"{"base_period_ms": 800000}"#).unwrap_err();
        assert!(matches!(err, VizError::Config(_)), "Got: {err}");
    }

    #[test]
    fn test_period_saturates_without_validation() {
        let config = PlaybackConfig {
            base_period_ms: u64::MAX,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.period_for(50), Duration::from_millis(u64::MAX / 50));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"max_speed": 200, "default_speed": 150}}"#).unwrap();
        let config = PlaybackConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_speed, 200);
        assert_eq!(config.default_speed, 150);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlaybackConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, VizError::Config(_)));
        assert!(err.to_string().contains("absent.json"), "Got: {err}");
    }

    #[test]
    fn test_malformed_json() {
        assert!(PlaybackConfig::from_json_str("{not json").is_err());
    }
}
