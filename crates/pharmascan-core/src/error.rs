use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Barcode data errors
    #[error("Invalid GTIN '{value}': {reason}")]
    InvalidGtin { value: String, reason: String },

    #[error("Invalid {format} barcode record: {reason}")]
    InvalidBarcode { format: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new invalid GTIN error.
    pub fn invalid_gtin(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGtin {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid barcode record error.
    pub fn invalid_barcode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBarcode {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
