//! Hardware scanner detection from keystroke timing.
//!
//! A keyboard-wedge scanner "types" the whole barcode in a burst, with
//! near-zero delay between characters, then presses Enter. A person typing
//! is far slower. [`ScanEventClassifier`] watches global key events and
//! separates the two by the gap between consecutive keystrokes.
//!
//! # States
//!
//! - `Idle`: the buffer is empty
//! - `Accumulating`: at least one character is buffered
//!
//! # Transitions
//!
//! - Focus on a text-entry element: the key is ignored entirely
//! - Gap since the previous keystroke above the threshold: buffer discarded,
//!   the key is then processed normally
//! - `Enter`: buffer emitted if it holds at least `min_length` characters,
//!   then cleared either way
//! - Printable character: appended
//! - Anything else: ignored, but still counts as the latest keystroke
//!
//! A person typing faster than the threshold and pressing Enter is reported
//! as a scan. That is accepted behavior.
//!
//! # Examples
//!
//! ```
//! use pharmascan_hardware::{Key, KeyEvent, KeystrokeOutcome, ScanEventClassifier};
//! use std::time::{Duration, Instant};
//!
//! let mut classifier = ScanEventClassifier::default();
//! let start = Instant::now();
//!
//! for (i, c) in "8851234567890".chars().enumerate() {
//!     let at = start + Duration::from_millis(5 * i as u64);
//!     classifier.handle(&KeyEvent::new(Key::Char(c), at));
//! }
//! let enter = KeyEvent::new(Key::Enter, start + Duration::from_millis(70));
//!
//! assert_eq!(
//!     classifier.handle(&enter),
//!     KeystrokeOutcome::Emitted("8851234567890".to_string())
//! );
//! ```

use crate::keyboard::KeyEvent;
use pharmascan_core::constants::{DEFAULT_KEYSTROKE_GAP_MS, DEFAULT_MIN_SCAN_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Timing and length thresholds for scan detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystrokeConfig {
    /// Largest gap between keystrokes that still belongs to one scan.
    pub gap_threshold: Duration,

    /// Shortest buffer that Enter turns into a scan.
    pub min_length: usize,
}

impl Default for KeystrokeConfig {
    fn default() -> Self {
        Self {
            gap_threshold: Duration::from_millis(DEFAULT_KEYSTROKE_GAP_MS),
            min_length: DEFAULT_MIN_SCAN_LENGTH,
        }
    }
}

/// Classifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    /// Nothing buffered.
    Idle,
    /// Characters buffered, waiting for more or for Enter.
    Accumulating,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Accumulating => write!(f, "Accumulating"),
        }
    }
}

/// What a single keystroke did to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// The keystroke did not touch the buffer.
    Ignored,
    /// A character was appended.
    Buffered,
    /// Enter completed a scan.
    Emitted(String),
    /// Enter arrived with too few characters; the buffer was cleared.
    Discarded,
}

impl KeystrokeOutcome {
    /// The completed scan text, if this outcome emitted one.
    pub fn into_scan(self) -> Option<String> {
        match self {
            Self::Emitted(text) => Some(text),
            _ => None,
        }
    }
}

/// Characters collected from one burst of keystrokes.
#[derive(Debug, Clone, Default)]
pub struct ScanBuffer {
    text: String,
    last_keystroke: Option<Instant>,
}

impl ScanBuffer {
    /// Buffered text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of buffered characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Time of the most recent accepted keystroke.
    pub fn last_keystroke(&self) -> Option<Instant> {
        self.last_keystroke
    }

    fn push(&mut self, c: char) {
        self.text.push(c);
    }

    fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

/// Detects barcode scans in a stream of global key events.
///
/// Owns the only state that survives between scans: the [`ScanBuffer`].
#[derive(Debug, Clone, Default)]
pub struct ScanEventClassifier {
    config: KeystrokeConfig,
    buffer: ScanBuffer,
}

impl ScanEventClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: KeystrokeConfig) -> Self {
        Self {
            config,
            buffer: ScanBuffer::default(),
        }
    }

    pub fn config(&self) -> &KeystrokeConfig {
        &self.config
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &ScanBuffer {
        &self.buffer
    }

    /// Current state, derived from the buffer.
    pub fn state(&self) -> ScanState {
        if self.buffer.is_empty() {
            ScanState::Idle
        } else {
            ScanState::Accumulating
        }
    }

    /// Feed one key event.
    ///
    /// # Returns
    ///
    /// What the event did: [`KeystrokeOutcome::Emitted`] carries a completed
    /// scan ready for format classification.
    pub fn handle(&mut self, event: &KeyEvent) -> KeystrokeOutcome {
        if event.focus.is_text_entry() {
            return KeystrokeOutcome::Ignored;
        }

        if let Some(previous) = self.buffer.last_keystroke {
            let gap = event.at.saturating_duration_since(previous);
            if gap > self.config.gap_threshold && !self.buffer.is_empty() {
                trace!(
                    gap_ms = gap.as_millis() as u64,
                    discarded = self.buffer.len(),
                    "keystroke gap exceeded, discarding buffer"
                );
                self.buffer.clear();
            }
        }
        self.buffer.last_keystroke = Some(event.at);

        if event.key.is_enter() {
            if self.buffer.len() >= self.config.min_length {
                let text = self.buffer.take();
                debug!(length = text.chars().count(), "hardware scan completed");
                return KeystrokeOutcome::Emitted(text);
            }
            if self.buffer.is_empty() {
                return KeystrokeOutcome::Ignored;
            }
            trace!(length = self.buffer.len(), "scan too short, discarding");
            self.buffer.clear();
            return KeystrokeOutcome::Discarded;
        }

        match event.key.printable() {
            Some(c) => {
                self.buffer.push(c);
                KeystrokeOutcome::Buffered
            }
            None => KeystrokeOutcome::Ignored,
        }
    }

    /// Drop any buffered characters and forget the last keystroke time.
    pub fn reset(&mut self) {
        self.buffer = ScanBuffer::default();
    }
}
