//! Scripted keystroke sequences.
//!
//! [`KeystrokeScript`] builds timed [`KeyEvent`] sequences the way a
//! keyboard-wedge scanner or a person would produce them, so timing-based
//! detection can be tested without a real clock.

use crate::keyboard::{FocusTarget, Key, KeyEvent};
use std::time::{Duration, Instant};

/// Inter-key delay of a typical keyboard-wedge scanner.
pub const SCANNER_KEY_INTERVAL: Duration = Duration::from_millis(5);

/// Inter-key delay of a fast human typist.
pub const HUMAN_KEY_INTERVAL: Duration = Duration::from_millis(150);

/// Builder for a timed sequence of key events.
///
/// Consecutive keys are `interval` apart unless a [`pause`](Self::pause)
/// replaces the next gap.
///
/// # Examples
///
/// ```
/// use pharmascan_hardware::mock::KeystrokeScript;
/// use std::time::Duration;
///
/// let events = KeystrokeScript::new()
///     .interval(Duration::from_millis(20))
///     .chars("ABCD")
///     .pause(Duration::from_millis(200))
///     .chars("1234")
///     .enter()
///     .build();
///
/// assert_eq!(events.len(), 9);
/// assert_eq!(events[4].at - events[3].at, Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct KeystrokeScript {
    clock: Instant,
    interval: Duration,
    pending_pause: Option<Duration>,
    focus: FocusTarget,
    events: Vec<KeyEvent>,
}

impl KeystrokeScript {
    /// Start a script at the current instant with scanner timing.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start a script at a fixed instant.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            clock: start,
            interval: SCANNER_KEY_INTERVAL,
            pending_pause: None,
            focus: FocusTarget::None,
            events: Vec::new(),
        }
    }

    /// A complete scanner burst: `text` followed by Enter.
    pub fn scan(text: &str) -> Vec<KeyEvent> {
        Self::new().chars(text).enter().build()
    }

    /// Set the delay between subsequent keys.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Use `gap` instead of the interval before the next key.
    pub fn pause(mut self, gap: Duration) -> Self {
        self.pending_pause = Some(gap);
        self
    }

    /// Set the focused element for subsequent keys.
    pub fn focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        if !self.events.is_empty() {
            self.clock += self.pending_pause.take().unwrap_or(self.interval);
        } else if let Some(gap) = self.pending_pause.take() {
            self.clock += gap;
        }
        self.events
            .push(KeyEvent::new(key, self.clock).with_focus(self.focus.clone()));
        self
    }

    /// One key per character of `text`.
    pub fn chars(self, text: &str) -> Self {
        text.chars().fold(self, |script, c| script.key(Key::Char(c)))
    }

    pub fn enter(self) -> Self {
        self.key(Key::Enter)
    }

    /// Time of the last scripted key.
    pub fn now(&self) -> Instant {
        self.clock
    }

    pub fn build(self) -> Vec<KeyEvent> {
        self.events
    }
}

impl Default for KeystrokeScript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_spaced_by_interval() {
        let start = Instant::now();
        let events = KeystrokeScript::starting_at(start)
            .interval(Duration::from_millis(20))
            .chars("ABC")
            .build();

        assert_eq!(events[0].at, start);
        assert_eq!(events[2].at - events[0].at, Duration::from_millis(40));
    }

    #[test]
    fn test_pause_replaces_one_gap() {
        let events = KeystrokeScript::new()
            .interval(Duration::from_millis(10))
            .chars("AB")
            .pause(Duration::from_millis(300))
            .chars("CD")
            .build();

        assert_eq!(events[2].at - events[1].at, Duration::from_millis(300));
        assert_eq!(events[3].at - events[2].at, Duration::from_millis(10));
    }

    #[test]
    fn test_scan_ends_with_enter() {
        let events = KeystrokeScript::scan("885");
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].key, Key::Enter);
        assert!(events.iter().all(|e| e.focus == FocusTarget::None));
    }

    #[test]
    fn test_focus_applies_to_following_keys() {
        let events = KeystrokeScript::new()
            .chars("A")
            .focus(FocusTarget::TextInput)
            .chars("B")
            .build();

        assert_eq!(events[0].focus, FocusTarget::None);
        assert_eq!(events[1].focus, FocusTarget::TextInput);
    }
}
