//! Scoped keyboard listeners.
//!
//! The host delivers every key press to one [`KeyboardHub`]. A view that
//! wants hardware scans calls [`KeyboardHub::subscribe`] when it becomes
//! active and gets a [`ScanSubscription`] back. Releasing the subscription,
//! explicitly or by dropping it, deregisters the listener, so switching
//! views never leaves stale listeners behind.
//!
//! ```
//! use pharmascan_hardware::{KeyboardHub, KeystrokeConfig};
//!
//! let hub = KeyboardHub::new();
//! {
//!     let _subscription = hub.subscribe(KeystrokeConfig::default(), |scan| {
//!         println!("scanned {scan}");
//!     });
//!     assert_eq!(hub.listener_count(), 1);
//! }
//! assert_eq!(hub.listener_count(), 0);
//! ```

use crate::keyboard::KeyEvent;
use crate::scan_classifier::{KeystrokeConfig, KeystrokeOutcome, ScanEventClassifier};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, info};

type Listener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Process-wide fan-out point for key events.
///
/// Cloning the hub is cheap and every clone refers to the same listener set.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Arc<Mutex<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a hardware-scan listener.
    ///
    /// Every dispatched key event is fed to a dedicated
    /// [`ScanEventClassifier`]; `on_scan` runs once per completed scan.
    /// The listener stays registered until the returned subscription is
    /// released or dropped.
    pub fn subscribe<F>(&self, config: KeystrokeConfig, on_scan: F) -> ScanSubscription
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let classifier = Mutex::new(ScanEventClassifier::new(config));
        let listener: Listener = Arc::new(move |event: &KeyEvent| {
            let outcome = classifier
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .handle(event);
            if let KeystrokeOutcome::Emitted(text) = outcome {
                info!(length = text.len(), "hardware scanner input detected");
                on_scan(text);
            }
        });

        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        debug!(id, listeners = inner.listeners.len(), "keyboard listener registered");

        ScanSubscription {
            hub: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Deliver a key event to every registered listener.
    ///
    /// Listeners run outside the hub lock, so a listener may itself
    /// subscribe or release without deadlocking.
    pub fn dispatch(&self, event: &KeyEvent) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl std::fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration handle returned by [`KeyboardHub::subscribe`].
///
/// Holds only a weak reference to the hub; a subscription outliving its hub
/// releases as a no-op.
#[derive(Debug)]
#[must_use = "dropping the subscription deregisters the listener immediately"]
pub struct ScanSubscription {
    hub: Weak<Mutex<HubInner>>,
    id: Option<u64>,
}

impl ScanSubscription {
    /// Deregister the listener. Calling it again does nothing.
    pub fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(hub) = self.hub.upgrade() {
            let mut inner = hub.lock().unwrap_or_else(|e| e.into_inner());
            inner.listeners.retain(|(listener_id, _)| *listener_id != id);
            debug!(id, listeners = inner.listeners.len(), "keyboard listener released");
        }
    }

    /// Returns `true` until the subscription has been released.
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.hub.strong_count() > 0
    }
}

impl Drop for ScanSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
