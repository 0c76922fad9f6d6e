//! Mock camera decoder for testing and development.
//!
//! This module provides a simulated image decoder that can be driven
//! programmatically: tests push decoded or unreadable frames through a
//! [`MockCameraHandle`] and inject start or stop failures.

use crate::camera::{
    CameraDecoder, CameraSettings, DecodedCallback, FrameErrorCallback, MountTarget,
};
use crate::{HardwareError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// A frame delivered by the mock decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFrame {
    /// A barcode was decoded to this text.
    Decoded(String),
    /// No barcode could be read from the frame.
    Unreadable(String),
}

/// Failure injected into the next `start` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartFailure {
    PermissionDenied,
    Unavailable,
}

#[derive(Default)]
struct Callbacks {
    on_decoded: Option<DecodedCallback>,
    on_frame_error: Option<FrameErrorCallback>,
}

#[derive(Default)]
struct Shared {
    callbacks: Mutex<Callbacks>,
    mounted_on: Mutex<Option<MountTarget>>,
    settings: Mutex<Option<CameraSettings>>,
    start_failure: Mutex<Option<StartFailure>>,
    fail_next_stop: AtomicBool,
    keep_callbacks: AtomicBool,
    running: AtomicBool,
    released: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
    releases: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Mock camera decoder.
///
/// Starts successfully unless a failure was injected, and invokes the
/// registered callbacks whenever the handle pushes a frame.
///
/// # Examples
///
/// ```
/// use pharmascan_hardware::camera::CameraSession;
/// use pharmascan_hardware::mock::MockCamera;
/// use std::sync::{Arc, Mutex};
///
/// #[tokio::main]
/// async fn main() -> pharmascan_hardware::Result<()> {
///     let (camera, handle) = MockCamera::new();
///     let mut session = CameraSession::new(camera);
///
///     let seen = Arc::new(Mutex::new(Vec::new()));
///     let sink = Arc::clone(&seen);
///     session.start(move |text| sink.lock().unwrap().push(text)).await?;
///
///     handle.decode("(01)08851234567890");
///     assert_eq!(seen.lock().unwrap().len(), 1);
///     Ok(())
/// }
/// ```
pub struct MockCamera {
    shared: Arc<Shared>,
}

impl MockCamera {
    /// Create a mock camera and the handle that drives it.
    pub fn new() -> (Self, MockCameraHandle) {
        let shared = Arc::new(Shared::default());
        let camera = Self {
            shared: Arc::clone(&shared),
        };
        (camera, MockCameraHandle { shared })
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new().0
    }
}

impl std::fmt::Debug for MockCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCamera")
            .field("running", &self.shared.running.load(Ordering::Acquire))
            .field("released", &self.shared.released.load(Ordering::Acquire))
            .finish()
    }
}

impl CameraDecoder for MockCamera {
    async fn start(
        &mut self,
        target: &MountTarget,
        settings: &CameraSettings,
        on_decoded: DecodedCallback,
        on_frame_error: FrameErrorCallback,
    ) -> Result<()> {
        self.shared.starts.fetch_add(1, Ordering::AcqRel);

        if let Some(failure) = lock(&self.shared.start_failure).take() {
            return Err(match failure {
                StartFailure::PermissionDenied => {
                    HardwareError::permission_denied("NotAllowedError: Permission denied")
                }
                StartFailure::Unavailable => {
                    HardwareError::camera_unavailable("Requested device not found")
                }
            });
        }

        *lock(&self.shared.callbacks) = Callbacks {
            on_decoded: Some(on_decoded),
            on_frame_error: Some(on_frame_error),
        };
        *lock(&self.shared.mounted_on) = Some(target.clone());
        *lock(&self.shared.settings) = Some(*settings);
        self.shared.released.store(false, Ordering::Release);
        self.shared.running.store(true, Ordering::Release);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.shared.stops.fetch_add(1, Ordering::AcqRel);
        self.shared.running.store(false, Ordering::Release);

        if self.shared.fail_next_stop.swap(false, Ordering::AcqRel) {
            return Err(HardwareError::stop_failed("Cannot stop, scanner is not running"));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.shared.releases.fetch_add(1, Ordering::AcqRel);
        self.shared.running.store(false, Ordering::Release);
        self.shared.released.store(true, Ordering::Release);
        *lock(&self.shared.mounted_on) = None;
        if !self.shared.keep_callbacks.load(Ordering::Acquire) {
            *lock(&self.shared.callbacks) = Callbacks::default();
        }
    }
}

/// Handle for driving a [`MockCamera`].
///
/// Can be cloned and shared across tasks.
#[derive(Clone)]
pub struct MockCameraHandle {
    shared: Arc<Shared>,
}

impl MockCameraHandle {
    /// Deliver a frame. Returns `true` if a callback received it.
    pub fn push_frame(&self, frame: MockFrame) -> bool {
        // Clone the callback out so it runs without the lock held
        let callbacks = lock(&self.shared.callbacks);
        match frame {
            MockFrame::Decoded(text) => {
                let Some(callback) = callbacks.on_decoded.clone() else {
                    return false;
                };
                drop(callbacks);
                callback(text);
                true
            }
            MockFrame::Unreadable(message) => {
                let Some(callback) = callbacks.on_frame_error.clone() else {
                    return false;
                };
                drop(callbacks);
                callback(message);
                true
            }
        }
    }

    /// Deliver a successfully decoded barcode.
    pub fn decode(&self, text: impl Into<String>) -> bool {
        self.push_frame(MockFrame::Decoded(text.into()))
    }

    /// Deliver a frame without a readable barcode.
    pub fn unreadable_frame(&self, message: impl Into<String>) -> bool {
        self.push_frame(MockFrame::Unreadable(message.into()))
    }

    /// Make the next `start` fail as if the user refused camera access.
    pub fn deny_permission(&self) {
        *lock(&self.shared.start_failure) = Some(StartFailure::PermissionDenied);
    }

    /// Make the next `start` fail as if no camera were attached.
    pub fn make_unavailable(&self) {
        *lock(&self.shared.start_failure) = Some(StartFailure::Unavailable);
    }

    /// Make the next `stop` fail.
    pub fn fail_next_stop(&self) {
        self.shared.fail_next_stop.store(true, Ordering::Release);
    }

    /// Keep callbacks registered after release, like a decoder that still
    /// delivers frames already in flight.
    pub fn keep_callbacks_after_release(&self) {
        self.shared.keep_callbacks.store(true, Ordering::Release);
    }

    /// Mount target passed to the last successful start, until release.
    pub fn mounted_on(&self) -> Option<MountTarget> {
        lock(&self.shared.mounted_on).clone()
    }

    /// Settings passed to the last successful start.
    pub fn settings(&self) -> Option<CameraSettings> {
        *lock(&self.shared.settings)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        self.shared.released.load(Ordering::Acquire)
    }

    pub fn start_count(&self) -> usize {
        self.shared.starts.load(Ordering::Acquire)
    }

    pub fn stop_count(&self) -> usize {
        self.shared.stops.load(Ordering::Acquire)
    }

    pub fn release_count(&self) -> usize {
        self.shared.releases.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MockCameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCameraHandle")
            .field("starts", &self.start_count())
            .field("stops", &self.stop_count())
            .field("releases", &self.release_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> DecodedCallback {
        Arc::new(|_| {})
    }

    #[tokio::test]
    async fn test_frames_without_start_are_not_delivered() {
        let (_camera, handle) = MockCamera::new();
        assert!(!handle.decode("8851234567890"));
        assert!(!handle.unreadable_frame("nothing"));
    }

    #[tokio::test]
    async fn test_start_records_target_and_settings() {
        let (mut camera, handle) = MockCamera::new();
        let target = MountTarget::generate();
        let settings = CameraSettings::default().with_fps(15).unwrap();

        camera.start(&target, &settings, noop(), noop()).await.unwrap();

        assert!(handle.is_running());
        assert_eq!(handle.mounted_on(), Some(target));
        assert_eq!(handle.settings().map(|s| s.fps), Some(15));
        assert_eq!(handle.start_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_start_failures() {
        let (mut camera, handle) = MockCamera::new();
        let target = MountTarget::generate();
        let settings = CameraSettings::default();

        handle.make_unavailable();
        let err = camera.start(&target, &settings, noop(), noop()).await.unwrap_err();
        assert!(matches!(err, HardwareError::CameraUnavailable { .. }));

        // failure is one-shot
        camera.start(&target, &settings, noop(), noop()).await.unwrap();
        assert!(handle.is_running());
    }

    #[tokio::test]
    async fn test_release_clears_callbacks() {
        let (mut camera, handle) = MockCamera::new();
        let target = MountTarget::generate();

        camera
            .start(&target, &CameraSettings::default(), noop(), noop())
            .await
            .unwrap();
        camera.stop().await.unwrap();
        camera.release();

        assert!(handle.is_released());
        assert!(handle.mounted_on().is_none());
        assert!(!handle.decode("late"));
    }

    #[tokio::test]
    async fn test_fail_next_stop_is_one_shot() {
        let (mut camera, handle) = MockCamera::new();
        handle.fail_next_stop();

        assert!(camera.stop().await.is_err());
        assert!(camera.stop().await.is_ok());
        assert_eq!(handle.stop_count(), 2);
    }
}
