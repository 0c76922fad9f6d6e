//! GS1 Application Identifier definitions.
//!
//! Only the identifiers needed for pharmacy product, batch and expiry lookup
//! are recognized. Every other two-digit code is treated as the end of the
//! parseable data.
//!
//! # Examples
//!
//! ```
//! use pharmascan_gs1::ai::{ApplicationIdentifier, PayloadLength};
//!
//! let ai = ApplicationIdentifier::from_code("17").unwrap();
//! assert_eq!(ai, ApplicationIdentifier::ExpiryDate);
//! assert_eq!(ai.payload_length(), PayloadLength::Fixed(6));
//! assert_eq!(ai.code(), "17");
//!
//! assert!(ApplicationIdentifier::from_code("99").is_none());
//! ```

use pharmascan_core::constants::{EXPIRY_DATE_LENGTH, GTIN_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized Application Identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationIdentifier {
    /// `01`: Global Trade Item Number.
    Gtin,
    /// `17`: Expiration date (`YYMMDD`).
    ExpiryDate,
    /// `10`: Batch or lot number.
    BatchNumber,
    /// `21`: Serial number.
    SerialNumber,
}

/// Payload length rule of an Application Identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLength {
    /// Exactly this many digits follow the AI.
    Fixed(usize),
    /// Runs until a group separator or the end of the data.
    Variable,
}

impl ApplicationIdentifier {
    /// All recognized identifiers.
    pub const ALL: [Self; 4] = [
        Self::Gtin,
        Self::ExpiryDate,
        Self::BatchNumber,
        Self::SerialNumber,
    ];

    /// Look up an identifier by its two-digit code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Gtin),
            "17" => Some(Self::ExpiryDate),
            "10" => Some(Self::BatchNumber),
            "21" => Some(Self::SerialNumber),
            _ => None,
        }
    }

    /// The two-digit code written in front of the payload.
    pub fn code(self) -> &'static str {
        match self {
            Self::Gtin => "01",
            Self::ExpiryDate => "17",
            Self::BatchNumber => "10",
            Self::SerialNumber => "21",
        }
    }

    pub fn payload_length(self) -> PayloadLength {
        match self {
            Self::Gtin => PayloadLength::Fixed(GTIN_LENGTH),
            Self::ExpiryDate => PayloadLength::Fixed(EXPIRY_DATE_LENGTH),
            Self::BatchNumber | Self::SerialNumber => PayloadLength::Variable,
        }
    }

    /// Human-readable data title used by GS1 (`GTIN`, `EXPIRY`, ...).
    pub fn data_title(self) -> &'static str {
        match self {
            Self::Gtin => "GTIN",
            Self::ExpiryDate => "EXPIRY",
            Self::BatchNumber => "BATCH/LOT",
            Self::SerialNumber => "SERIAL",
        }
    }
}

impl fmt::Display for ApplicationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.code(), self.data_title())
    }
}
