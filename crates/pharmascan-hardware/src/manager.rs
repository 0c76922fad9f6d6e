//! Scan source manager.
//!
//! This module provides the [`ScanSourceManager`], which merges the three
//! ways a barcode reaches the application into one bounded event stream.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ Camera       │──────►┌─────────────────┐
//! │ Session      │       │                 │
//! └──────────────┘       │  Event Channel  │
//! ┌──────────────┐       │  (mpsc)         │──────► ScanEventStream
//! │ Keyboard Hub │──────►│                 │
//! └──────────────┘       │                 │
//! ┌──────────────┐       │                 │
//! │ Manual Entry │──────►└─────────────────┘
//! └──────────────┘
//! ```
//!
//! Camera and keyboard callbacks run synchronously on the caller's thread,
//! so they hand events over with `try_send`. A full channel drops the event
//! with a warning rather than blocking the decoder.
//!
//! # Examples
//!
//! ```
//! use pharmascan_core::ScanSource;
//! use pharmascan_hardware::ScanSourceManager;
//!
//! #[tokio::main]
//! async fn main() -> pharmascan_hardware::Result<()> {
//!     let mut manager = ScanSourceManager::new(32);
//!     let mut events = manager.take_events()?;
//!
//!     manager.submit_manual("8851234567890");
//!
//!     let event = events.recv().await.unwrap();
//!     assert_eq!(event.text, "8851234567890");
//!     assert_eq!(event.source, ScanSource::Manual);
//!     Ok(())
//! }
//! ```

use crate::camera::{CameraDecoder, CameraSession};
use crate::listener::{KeyboardHub, ScanSubscription};
use crate::scan_classifier::KeystrokeConfig;
use crate::{HardwareError, Result};
use chrono::{DateTime, Utc};
use pharmascan_core::ScanSource;
use pharmascan_core::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Raw text captured from one scan source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Text exactly as the source produced it.
    pub text: String,

    /// Where the text came from.
    pub source: ScanSource,

    /// When the text was received.
    pub received_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Create an event stamped with the current time.
    pub fn new(text: impl Into<String>, source: ScanSource) -> Self {
        Self {
            text: text.into(),
            source,
            received_at: Utc::now(),
        }
    }
}

/// Sending side bound to one scan source.
///
/// Cheap to clone; every clone feeds the same stream.
#[derive(Debug, Clone)]
pub struct ScanEventSender {
    tx: mpsc::Sender<ScanEvent>,
    source: ScanSource,
    dropped: Arc<AtomicU64>,
}

impl ScanEventSender {
    /// Queue text from this sender's source without waiting.
    ///
    /// Returns `false` if the event was dropped because the stream is full
    /// or closed.
    pub fn send(&self, text: impl Into<String>) -> bool {
        let event = ScanEvent::new(text, self.source);
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(source = %event.source, "scan event channel full, dropping scan");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(source = %self.source, "scan event stream closed");
                false
            }
        }
    }

    pub fn source(&self) -> ScanSource {
        self.source
    }
}

/// Receiving side of the merged scan stream.
///
/// Yields `None` once every sender (manager, keyboard subscriptions and
/// camera callbacks) has been dropped.
#[derive(Debug)]
pub struct ScanEventStream {
    rx: mpsc::Receiver<ScanEvent>,
}

impl ScanEventStream {
    /// Wait for the next scan.
    pub async fn recv(&mut self) -> Option<ScanEvent> {
        self.rx.recv().await
    }

    /// Take the next scan if one is already queued.
    pub fn try_recv(&mut self) -> Option<ScanEvent> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting new events; queued events can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Merges camera, hardware-scanner and manual input into one stream.
///
/// # Lifecycle
///
/// 1. Create the manager and take its [`ScanEventStream`]
/// 2. Attach sources: [`attach_keyboard`](Self::attach_keyboard),
///    [`start_camera`](Self::start_camera), [`submit_manual`](Self::submit_manual)
/// 3. Consume events from the stream
/// 4. Drop the manager and release sources; the stream then ends
pub struct ScanSourceManager {
    tx: mpsc::Sender<ScanEvent>,
    rx: Option<mpsc::Receiver<ScanEvent>>,
    dropped: Arc<AtomicU64>,
}

impl ScanSourceManager {
    /// Create a manager whose stream buffers up to `capacity` scans.
    ///
    /// A capacity of `0` is raised to `1`.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Some(rx),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Take the receiving side of the stream.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ConfigurationError`] if the stream was
    /// already taken.
    pub fn take_events(&mut self) -> Result<ScanEventStream> {
        self.rx
            .take()
            .map(|rx| ScanEventStream { rx })
            .ok_or_else(|| HardwareError::configuration("scan event stream already taken"))
    }

    /// A sender tagged with `source`.
    pub fn sender(&self, source: ScanSource) -> ScanEventSender {
        ScanEventSender {
            tx: self.tx.clone(),
            source,
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Route hardware-scanner input from `hub` into the stream.
    ///
    /// The subscription must be held for as long as the consuming view is
    /// active.
    pub fn attach_keyboard(&self, hub: &KeyboardHub, config: KeystrokeConfig) -> ScanSubscription {
        let sender = self.sender(ScanSource::HardwareScanner);
        hub.subscribe(config, move |text| {
            sender.send(text);
        })
    }

    /// Start `session` and route its decodes into the stream.
    ///
    /// # Errors
    ///
    /// Propagates the session's start error; the session is then in
    /// [`CameraState::Unavailable`](crate::camera::CameraState::Unavailable)
    /// or still running from an earlier start.
    pub async fn start_camera<D: CameraDecoder>(&self, session: &mut CameraSession<D>) -> Result<()> {
        let sender = self.sender(ScanSource::Camera);
        session
            .start(move |text| {
                sender.send(text);
            })
            .await
    }

    /// Submit manually entered text.
    ///
    /// Blank input is ignored. Returns `true` if the text was queued.
    pub fn submit_manual(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.sender(ScanSource::Manual).send(text)
    }

    /// Number of scans dropped because the stream was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for ScanSourceManager {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl std::fmt::Debug for ScanSourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSourceManager")
            .field("stream_taken", &self.rx.is_none())
            .field("dropped", &self.dropped_events())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{KeystrokeScript, MockCamera};
    use rstest::rstest;

    #[tokio::test]
    async fn test_manual_submission() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();

        assert!(manager.submit_manual("  8851234567890 "));
        let event = events.recv().await.unwrap();

        assert_eq!(event.text, "8851234567890");
        assert_eq!(event.source, ScanSource::Manual);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn test_blank_manual_submission_is_ignored(#[case] input: &str) {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();

        assert!(!manager.submit_manual(input));
        assert!(events.try_recv().is_none());
    }

    #[test]
    fn test_stream_can_be_taken_once() {
        let mut manager = ScanSourceManager::default();
        assert!(manager.take_events().is_ok());
        assert!(matches!(
            manager.take_events(),
            Err(HardwareError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_keyboard_scans_are_tagged() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();
        let hub = KeyboardHub::new();
        let _subscription = manager.attach_keyboard(&hub, KeystrokeConfig::default());

        for event in KeystrokeScript::scan("8851234567890") {
            hub.dispatch(&event);
        }

        let event = events.recv().await.unwrap();
        assert_eq!(event.text, "8851234567890");
        assert_eq!(event.source, ScanSource::HardwareScanner);
    }

    #[tokio::test]
    async fn test_camera_scans_are_tagged() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);

        manager.start_camera(&mut session).await.unwrap();
        handle.decode("(01)08851234567890");

        let event = events.recv().await.unwrap();
        assert_eq!(event.text, "(01)08851234567890");
        assert_eq!(event.source, ScanSource::Camera);
    }

    #[tokio::test]
    async fn test_full_channel_drops_and_counts() {
        let mut manager = ScanSourceManager::new(2);
        let mut events = manager.take_events().unwrap();

        assert!(manager.submit_manual("A1"));
        assert!(manager.submit_manual("A2"));
        assert!(!manager.submit_manual("A3"));
        assert_eq!(manager.dropped_events(), 1);

        assert_eq!(events.recv().await.unwrap().text, "A1");
        assert_eq!(events.recv().await.unwrap().text, "A2");
    }

    #[tokio::test]
    async fn test_stream_ends_when_sources_are_gone() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();
        let hub = KeyboardHub::new();
        let subscription = manager.attach_keyboard(&hub, KeystrokeConfig::default());

        manager.submit_manual("ABC");
        drop(manager);
        drop(subscription);

        assert_eq!(events.recv().await.unwrap().text, "ABC");
        assert!(events.recv().await.is_none());
    }

    #[test]
    fn test_send_after_stream_closed() {
        let mut manager = ScanSourceManager::default();
        let events = manager.take_events().unwrap();
        drop(events);

        assert!(!manager.submit_manual("ABC"));
        assert_eq!(manager.dropped_events(), 0);
    }
}
