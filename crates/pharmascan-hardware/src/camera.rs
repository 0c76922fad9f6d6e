//! Camera-based barcode decoding.
//!
//! The image decoder is an external capability injected by the embedding
//! application through the [`CameraDecoder`] trait. [`CameraSession`] owns
//! one decoder and enforces the lifecycle around it:
//!
//! - every session renders into its own [`MountTarget`]
//! - decodes that arrive after `stop` was requested are dropped
//! - a failing `stop` is logged and never prevents `release`
//! - permission and availability failures end in
//!   [`CameraState::Unavailable`] rather than a panic
//!
//! # Examples
//!
//! ```
//! use pharmascan_hardware::camera::{CameraSession, CameraState};
//! use pharmascan_hardware::mock::MockCamera;
//!
//! #[tokio::main]
//! async fn main() -> pharmascan_hardware::Result<()> {
//!     let (camera, handle) = MockCamera::new();
//!     let mut session = CameraSession::new(camera);
//!
//!     session.start(|text| println!("decoded {text}")).await?;
//!     assert_eq!(session.state(), &CameraState::Running);
//!
//!     handle.decode("8851234567890");
//!
//!     session.stop().await;
//!     assert!(handle.is_released());
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)]

use crate::{HardwareError, Result};
use pharmascan_core::constants::{DEFAULT_CAMERA_FPS, MAX_CAMERA_FPS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

/// Callback for successfully decoded text.
pub type DecodedCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Callback for a frame in which no barcode could be read.
///
/// Invoked for nearly every frame while nothing is in view; it is not an
/// error condition.
pub type FrameErrorCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Default edge length of the square scan region, in pixels.
pub const DEFAULT_SCAN_BOX: u32 = 250;

/// Identifier of the surface a decoder renders its preview into.
///
/// Unique per session so two scanners on screen never share a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountTarget(String);

impl MountTarget {
    /// Generate a fresh, unique target.
    pub fn generate() -> Self {
        Self(format!("scanner-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which camera to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Rear camera, pointed at the product.
    #[default]
    Environment,
    /// Front camera.
    User,
}

/// Capture settings handed to the decoder on start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Frames decoded per second.
    pub fps: u32,

    /// Edge length of the square scan region, in pixels.
    pub scan_box: u32,

    pub facing: CameraFacing,
}

impl CameraSettings {
    /// Set the frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ConfigurationError`] for `0` or a rate above
    /// [`MAX_CAMERA_FPS`].
    pub fn with_fps(mut self, fps: u32) -> Result<Self> {
        if fps == 0 || fps > MAX_CAMERA_FPS {
            return Err(HardwareError::configuration(format!(
                "camera fps must be between 1 and {MAX_CAMERA_FPS}, got {fps}"
            )));
        }
        self.fps = fps;
        Ok(self)
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_CAMERA_FPS,
            scan_box: DEFAULT_SCAN_BOX,
            facing: CameraFacing::Environment,
        }
    }
}

/// Lifecycle state of a [`CameraSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CameraState {
    /// Created, never started.
    Idle,
    /// `start` in progress.
    Starting,
    /// Frames are being decoded.
    Running,
    /// The camera cannot be used; `reason` is suitable for display.
    Unavailable { reason: String },
    /// Stopped and released.
    Stopped,
}

impl CameraState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// An image-based barcode decoder.
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// opaque futures. [`CameraSession`] is generic over the decoder instead.
pub trait CameraDecoder: Send + Sync {
    /// Open the camera and begin decoding into `target`.
    ///
    /// `on_decoded` runs for every successful decode, `on_frame_error` for
    /// every frame without a readable barcode.
    ///
    /// # Errors
    ///
    /// [`HardwareError::PermissionDenied`] or
    /// [`HardwareError::CameraUnavailable`] when the camera cannot be used,
    /// [`HardwareError::StartFailed`] for anything else.
    async fn start(
        &mut self,
        target: &MountTarget,
        settings: &CameraSettings,
        on_decoded: DecodedCallback,
        on_frame_error: FrameErrorCallback,
    ) -> Result<()>;

    /// Stop decoding. May fail, for example when the decoder never started.
    async fn stop(&mut self) -> Result<()>;

    /// Release the camera and clear the mount target. Must not fail.
    fn release(&mut self);
}

/// One camera scanner bound to one mount target.
pub struct CameraSession<D: CameraDecoder> {
    decoder: D,
    target: MountTarget,
    settings: CameraSettings,
    state: CameraState,
    live: Arc<AtomicBool>,
}

impl<D: CameraDecoder> CameraSession<D> {
    /// Create a session with default settings.
    pub fn new(decoder: D) -> Self {
        Self::with_settings(decoder, CameraSettings::default())
    }

    pub fn with_settings(decoder: D, settings: CameraSettings) -> Self {
        Self {
            decoder,
            target: MountTarget::generate(),
            settings,
            state: CameraState::Idle,
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a session from a decoder supplied by the host, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ConfigurationError`] when no decoder was
    /// provided.
    pub fn try_new(decoder: Option<D>) -> Result<Self> {
        decoder
            .map(Self::new)
            .ok_or_else(|| HardwareError::configuration("no camera decoder provided"))
    }

    pub fn target(&self) -> &MountTarget {
        &self.target
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Returns `true` while decoded text is being forwarded.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Start decoding; `on_decoded` receives every decoded text until
    /// [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::AlreadyRunning`] if the session is running.
    /// Decoder failures are returned as-is and leave the session in
    /// [`CameraState::Unavailable`].
    pub async fn start<F>(&mut self, on_decoded: F) -> Result<()>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if matches!(self.state, CameraState::Running | CameraState::Starting) {
            return Err(HardwareError::AlreadyRunning);
        }

        self.state = CameraState::Starting;
        self.live.store(true, Ordering::Release);

        let live = Arc::clone(&self.live);
        let mount = self.target.clone();
        let gated: DecodedCallback = Arc::new(move |text: String| {
            if live.load(Ordering::Acquire) {
                on_decoded(text);
            } else {
                trace!(%mount, "decode after stop suppressed");
            }
        });
        let on_frame_error: FrameErrorCallback = Arc::new(|_message: String| {});

        match self
            .decoder
            .start(&self.target, &self.settings, gated, on_frame_error)
            .await
        {
            Ok(()) => {
                self.state = CameraState::Running;
                info!(mount = %self.target, fps = self.settings.fps, "camera scanner started");
                Ok(())
            }
            Err(e) => {
                self.live.store(false, Ordering::Release);
                if e.is_capability_failure() {
                    warn!(mount = %self.target, error = %e, "camera not available");
                } else {
                    error!(mount = %self.target, error = %e, "camera scanner failed to start");
                }
                self.state = CameraState::Unavailable {
                    reason: unavailable_reason(&e),
                };
                Err(e)
            }
        }
    }

    /// Stop decoding and release the camera.
    ///
    /// Never fails: a stop error is logged and release still runs.
    pub async fn stop(&mut self) {
        self.live.store(false, Ordering::Release);

        if matches!(self.state, CameraState::Stopped) {
            return;
        }

        if matches!(self.state, CameraState::Running | CameraState::Starting)
            && let Err(e) = self.decoder.stop().await
        {
            warn!(mount = %self.target, error = %e, "camera stop failed, releasing anyway");
        }

        self.decoder.release();
        self.state = CameraState::Stopped;
        debug!(mount = %self.target, "camera scanner released");
    }
}

impl<D: CameraDecoder> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
        if !matches!(self.state, CameraState::Stopped) {
            self.decoder.release();
        }
    }
}

impl<D: CameraDecoder> fmt::Debug for CameraSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraSession")
            .field("target", &self.target)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("live", &self.is_live())
            .finish()
    }
}

fn unavailable_reason(error: &HardwareError) -> String {
    match error {
        HardwareError::PermissionDenied { .. } => {
            "Could not access camera. Ensure permissions are granted.".to_string()
        }
        HardwareError::CameraUnavailable { reason } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCamera;
    use std::sync::Mutex;

    fn collector() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let decoded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&decoded);
        (decoded, move |text| sink.lock().unwrap().push(text))
    }

    #[test]
    fn test_mount_targets_are_unique() {
        let a = MountTarget::generate();
        let b = MountTarget::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("scanner-"));
    }

    #[test]
    fn test_settings_fps_bounds() {
        assert_eq!(CameraSettings::default().fps, 10);
        assert_eq!(CameraSettings::default().with_fps(30).unwrap().fps, 30);
        assert!(CameraSettings::default().with_fps(0).is_err());
        assert!(CameraSettings::default().with_fps(61).is_err());
    }

    #[test]
    fn test_try_new_without_decoder_is_configuration_error() {
        let result = CameraSession::<MockCamera>::try_new(None);
        assert!(matches!(result, Err(HardwareError::ConfigurationError { .. })));
    }

    #[tokio::test]
    async fn test_start_forwards_decodes() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);
        let (decoded, on_decoded) = collector();

        session.start(on_decoded).await.unwrap();
        assert!(session.state().is_running());
        assert!(session.is_live());
        assert_eq!(handle.mounted_on().as_ref(), Some(session.target()));

        assert!(handle.decode("8851234567890"));
        assert_eq!(*decoded.lock().unwrap(), vec!["8851234567890".to_string()]);
    }

    #[tokio::test]
    async fn test_frame_errors_are_not_surfaced() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);
        let (decoded, on_decoded) = collector();

        session.start(on_decoded).await.unwrap();
        for _ in 0..5 {
            handle.unreadable_frame("No MultiFormat Readers were able to detect the code");
        }

        assert!(decoded.lock().unwrap().is_empty());
        assert!(session.state().is_running());
    }

    #[tokio::test]
    async fn test_decodes_after_stop_are_suppressed() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);
        let (decoded, on_decoded) = collector();

        session.start(on_decoded).await.unwrap();
        handle.keep_callbacks_after_release();
        session.stop().await;

        handle.decode("late-frame");
        assert!(decoded.lock().unwrap().is_empty());
        assert!(!session.is_live());
    }

    #[tokio::test]
    async fn test_stop_failure_still_releases() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);

        session.start(|_| {}).await.unwrap();
        handle.fail_next_stop();
        session.stop().await;

        assert_eq!(handle.stop_count(), 1);
        assert!(handle.is_released());
        assert_eq!(session.state(), &CameraState::Stopped);
    }

    #[tokio::test]
    async fn test_permission_denied_marks_unavailable() {
        let (camera, handle) = MockCamera::new();
        handle.deny_permission();
        let mut session = CameraSession::new(camera);

        let result = session.start(|_| {}).await;

        assert!(matches!(result, Err(HardwareError::PermissionDenied { .. })));
        assert!(matches!(session.state(), CameraState::Unavailable { .. }));
        assert!(!session.is_live());
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let (camera, _handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);

        session.start(|_| {}).await.unwrap();
        let second = session.start(|_| {}).await;
        assert!(matches!(second, Err(HardwareError::AlreadyRunning)));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);

        session.start(|_| {}).await.unwrap();
        session.stop().await;
        session.stop().await;

        assert_eq!(handle.stop_count(), 1);
        assert_eq!(handle.release_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_before_start_skips_decoder_stop() {
        let (camera, handle) = MockCamera::new();
        let mut session = CameraSession::new(camera);

        session.stop().await;

        assert_eq!(handle.stop_count(), 0);
        assert_eq!(handle.release_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let (camera, handle) = MockCamera::new();
        {
            let mut session = CameraSession::new(camera);
            session.start(|_| {}).await.unwrap();
        }
        assert!(handle.is_released());
    }

    #[tokio::test]
    async fn test_state_serializes_with_tag() {
        let state = CameraState::Unavailable {
            reason: "no camera".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "unavailable");
        assert_eq!(json["reason"], "no camera");
    }
}
