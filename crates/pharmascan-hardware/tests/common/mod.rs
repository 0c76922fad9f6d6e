//! Shared helpers for scan source integration tests.

#![allow(dead_code)]

use pharmascan_hardware::{KeyEvent, KeyboardHub, ScanEvent, ScanEventStream};
use std::time::Duration;

/// Keystroke spacing used by the timing scenarios.
pub const FAST: Duration = Duration::from_millis(20);

/// A gap long enough to split a burst.
pub const SLOW: Duration = Duration::from_millis(200);

/// Deliver every event to the hub in order.
pub fn dispatch_all(hub: &KeyboardHub, events: &[KeyEvent]) {
    for event in events {
        hub.dispatch(event);
    }
}

/// Collect everything already queued on the stream.
pub fn drain(stream: &mut ScanEventStream) -> Vec<ScanEvent> {
    std::iter::from_fn(|| stream.try_recv()).collect()
}

/// Texts of the drained events.
pub fn drain_texts(stream: &mut ScanEventStream) -> Vec<String> {
    drain(stream).into_iter().map(|e| e.text).collect()
}
