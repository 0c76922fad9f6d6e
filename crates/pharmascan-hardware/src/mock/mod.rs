//! Mock scan sources for testing and development.
//!
//! This module provides a simulated camera decoder and scripted keystroke
//! sequences that can be driven programmatically without real hardware.

pub mod camera;
pub mod keystrokes;

pub use camera::{MockCamera, MockCameraHandle, MockFrame};
pub use keystrokes::{HUMAN_KEY_INTERVAL, KeystrokeScript, SCANNER_KEY_INTERVAL};
