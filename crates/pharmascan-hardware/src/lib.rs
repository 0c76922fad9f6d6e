//! Scan sources for the pharmacy point of sale.
//!
//! A barcode reaches the application in one of three ways, and this crate
//! turns each of them into plain text:
//!
//! - **Camera**: an injected image decoder ([`camera::CameraDecoder`])
//!   driven by a [`CameraSession`] with an explicit start/stop/release
//!   lifecycle.
//! - **Hardware scanner**: a keyboard-wedge scanner "types" the barcode.
//!   [`ScanEventClassifier`] tells its bursts apart from human typing, and
//!   [`KeyboardHub`] hands out scoped subscriptions.
//! - **Manual entry**: text typed into a form and submitted.
//!
//! [`ScanSourceManager`] merges all three into one [`ScanEventStream`].
//!
//! # Hardware scanner detection
//!
//! ```
//! use pharmascan_hardware::{KeyboardHub, KeystrokeConfig};
//! use pharmascan_hardware::mock::KeystrokeScript;
//! use std::sync::{Arc, Mutex};
//!
//! let hub = KeyboardHub::new();
//! let scans = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&scans);
//!
//! let subscription = hub.subscribe(KeystrokeConfig::default(), move |text| {
//!     sink.lock().unwrap().push(text);
//! });
//!
//! for event in KeystrokeScript::scan("8851234567890") {
//!     hub.dispatch(&event);
//! }
//! drop(subscription);
//!
//! assert_eq!(*scans.lock().unwrap(), vec!["8851234567890".to_string()]);
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`][error::Result] with
//! [`HardwareError`]. Per-frame decode misses and short keystroke bursts
//! are not errors and never surface as one.

pub mod camera;
pub mod error;
pub mod keyboard;
pub mod listener;
pub mod manager;
pub mod mock;
pub mod scan_classifier;

pub use camera::{CameraDecoder, CameraSession, CameraSettings, CameraState, MountTarget};
pub use error::{HardwareError, Result};
pub use keyboard::{FocusTarget, Key, KeyEvent};
pub use listener::{KeyboardHub, ScanSubscription};
pub use manager::{ScanEvent, ScanEventSender, ScanEventStream, ScanSourceManager};
pub use scan_classifier::{
    KeystrokeConfig, KeystrokeOutcome, ScanBuffer, ScanEventClassifier, ScanState,
};
