//! Scanner configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "keystroke_gap_ms": 80, "camera_fps": 15 }
//! ```

use pharmascan_core::constants::{
    DEFAULT_CAMERA_FPS, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_KEYSTROKE_GAP_MS, DEFAULT_MIN_SCAN_LENGTH, MAX_CAMERA_FPS,
};
use pharmascan_core::{Error, Result};
use pharmascan_hardware::{CameraSettings, KeystrokeConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for scan detection and the scan flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Largest gap between keystrokes of one hardware scan, in milliseconds
    pub keystroke_gap_ms: u64,

    /// Shortest keystroke burst accepted as a scan
    pub min_scan_length: usize,

    /// Number of recent scans kept in history
    pub history_capacity: usize,

    /// Scans buffered between sources and the pipeline
    pub event_channel_capacity: usize,

    /// Camera frames decoded per second
    pub camera_fps: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            keystroke_gap_ms: DEFAULT_KEYSTROKE_GAP_MS,
            min_scan_length: DEFAULT_MIN_SCAN_LENGTH,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            camera_fps: DEFAULT_CAMERA_FPS,
        }
    }
}

impl ScannerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the keystroke gap threshold
    pub fn keystroke_gap_ms(mut self, gap_ms: u64) -> Self {
        self.keystroke_gap_ms = gap_ms;
        self
    }

    /// Set the minimum scan length
    pub fn min_scan_length(mut self, length: usize) -> Self {
        self.min_scan_length = length;
        self
    }

    /// Set the history capacity
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the event channel capacity
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Set the camera frame rate
    pub fn camera_fps(mut self, fps: u32) -> Self {
        self.camera_fps = fps;
        self
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.keystroke_gap_ms == 0 {
            return Err(Error::config("keystroke_gap_ms must be greater than 0"));
        }
        if self.min_scan_length == 0 {
            return Err(Error::config("min_scan_length must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(Error::config("history_capacity must be at least 1"));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config("event_channel_capacity must be at least 1"));
        }
        if self.camera_fps == 0 || self.camera_fps > MAX_CAMERA_FPS {
            return Err(Error::config(format!(
                "camera_fps must be between 1 and {MAX_CAMERA_FPS}"
            )));
        }
        Ok(())
    }

    /// Thresholds for the hardware scanner classifier.
    pub fn keystroke_config(&self) -> KeystrokeConfig {
        KeystrokeConfig {
            gap_threshold: Duration::from_millis(self.keystroke_gap_ms),
            min_length: self.min_scan_length,
        }
    }

    /// Capture settings for a camera session.
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            fps: self.camera_fps,
            ..CameraSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.keystroke_gap_ms, 50);
        assert_eq!(config.min_scan_length, 3);
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.event_channel_capacity, 32);
        assert_eq!(config.camera_fps, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = ScannerConfig::from_json_str(r#"{ "keystroke_gap_ms": 80 }"#).unwrap();
        assert_eq!(config.keystroke_gap_ms, 80);
        assert_eq!(config.min_scan_length, 3);
    }

    #[test]
    fn test_empty_json_object_is_default() {
        assert_eq!(ScannerConfig::from_json_str("{}").unwrap(), ScannerConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let result = ScannerConfig::from_json_str("{ keystroke_gap_ms: }");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[rstest]
    #[case(ScannerConfig::default().keystroke_gap_ms(0), "keystroke_gap_ms")]
    #[case(ScannerConfig::default().min_scan_length(0), "min_scan_length")]
    #[case(ScannerConfig::default().history_capacity(0), "history_capacity")]
    #[case(ScannerConfig::default().event_channel_capacity(0), "event_channel_capacity")]
    #[case(ScannerConfig::default().camera_fps(0), "camera_fps")]
    #[case(ScannerConfig::default().camera_fps(61), "camera_fps")]
    fn test_validate_rejects(#[case] config: ScannerConfig, #[case] field: &str) {
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains(field), "{error}");
    }

    #[test]
    fn test_invalid_value_in_json_is_rejected() {
        let result = ScannerConfig::from_json_str(r#"{ "min_scan_length": 0 }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ScannerConfig::from_json_file("/nonexistent/pharmascan.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_conversions() {
        let config = ScannerConfig::default()
            .keystroke_gap_ms(30)
            .min_scan_length(8)
            .camera_fps(24);

        let keystrokes = config.keystroke_config();
        assert_eq!(keystrokes.gap_threshold, Duration::from_millis(30));
        assert_eq!(keystrokes.min_length, 8);
        assert_eq!(config.camera_settings().fps, 24);
    }
}
