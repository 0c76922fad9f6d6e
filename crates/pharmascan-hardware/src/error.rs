//! Error types for scan source operations.
//!
//! Covers camera lifecycle failures (permission, availability, start/stop),
//! event channel shutdown and configuration problems. Per-frame decode
//! failures are deliberately absent: they are expected noise, not errors.

/// Result type alias for scan source operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while driving scan sources.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// No camera is present or it cannot be opened.
    #[error("Camera unavailable: {reason}")]
    CameraUnavailable { reason: String },

    /// The user or platform refused camera access.
    #[error("Camera permission denied: {message}")]
    PermissionDenied { message: String },

    /// `start` was called on a session that is already running.
    #[error("Camera session already running")]
    AlreadyRunning,

    /// An operation needed a running session.
    #[error("Camera session not running")]
    NotRunning,

    /// The decoder failed to start for a reason other than permission.
    #[error("Camera start failed: {message}")]
    StartFailed { message: String },

    /// The decoder failed to stop cleanly.
    #[error("Camera stop failed: {message}")]
    StopFailed { message: String },

    /// The receiving side of an event channel has gone away.
    #[error("Channel closed: {channel}")]
    ChannelClosed { channel: String },

    /// Invalid or missing configuration.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new camera unavailable error.
    pub fn camera_unavailable(reason: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a new permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new start failure.
    pub fn start_failed(message: impl Into<String>) -> Self {
        Self::StartFailed {
            message: message.into(),
        }
    }

    /// Create a new stop failure.
    pub fn stop_failed(message: impl Into<String>) -> Self {
        Self::StopFailed {
            message: message.into(),
        }
    }

    /// Create a new channel closed error.
    pub fn channel_closed(channel: impl Into<String>) -> Self {
        Self::ChannelClosed {
            channel: channel.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Returns `true` if the camera cannot be used at all on this device,
    /// as opposed to a transient lifecycle failure.
    pub fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            Self::CameraUnavailable { .. } | Self::PermissionDenied { .. }
        )
    }
}
