//! Error types for the point-of-sale scan flow.
//!
//! Lookup misses are not errors: "product not found" and "new batch" are
//! [`LookupOutcome`](crate::lookup::LookupOutcome) variants. Errors here
//! mean a collaborator failed.

use pharmascan_hardware::HardwareError;

/// Result type alias for point-of-sale operations.
pub type Result<T> = std::result::Result<T, PosError>;

/// Errors raised while wiring or running the scan flow.
#[derive(Debug, thiserror::Error)]
pub enum PosError {
    /// The product catalog could not be queried.
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Invalid configuration or malformed data file.
    #[error(transparent)]
    Core(#[from] pharmascan_core::Error),

    /// A scan source failed.
    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

impl PosError {
    /// Create a new catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error() {
        let error = PosError::catalog("connection reset");
        assert_eq!(error.to_string(), "Catalog error: connection reset");
    }

    #[test]
    fn test_wrapped_errors_keep_message() {
        let core: PosError = pharmascan_core::Error::config("history_capacity must be at least 1").into();
        assert_eq!(
            core.to_string(),
            "Configuration error: history_capacity must be at least 1"
        );

        let hardware: PosError = HardwareError::NotRunning.into();
        assert_eq!(hardware.to_string(), "Camera session not running");
    }
}
