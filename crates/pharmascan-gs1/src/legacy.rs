//! Legacy numeric code detection (EAN-13, UPC-A, bare GTIN-14).

use pharmascan_core::Gtin;
use pharmascan_core::constants::{GTIN_LENGTH, LEGACY_CODE_LENGTHS};

/// Recognizes pure-numeric retail codes.
pub struct LegacyCodeDetector;

impl LegacyCodeDetector {
    /// Detect a 12-digit UPC-A or 13-digit EAN-13 code.
    ///
    /// Returns the code left-padded with `0` to a GTIN-14.
    ///
    /// ```
    /// use pharmascan_gs1::LegacyCodeDetector;
    ///
    /// let gtin = LegacyCodeDetector::detect("8851234567890").unwrap();
    /// assert_eq!(gtin.as_str(), "08851234567890");
    ///
    /// assert!(LegacyCodeDetector::detect("08851234567890").is_none());
    /// assert!(LegacyCodeDetector::detect("885123456789X").is_none());
    /// ```
    pub fn detect(text: &str) -> Option<Gtin> {
        if !LEGACY_CODE_LENGTHS.contains(&text.len()) || !is_all_digits(text) {
            return None;
        }
        Gtin::from_legacy(text).ok()
    }

    /// Detect a bare 14-digit string carried without any AI prefix.
    ///
    /// ```
    /// use pharmascan_gs1::LegacyCodeDetector;
    ///
    /// let gtin = LegacyCodeDetector::detect_bare_gtin("98851234567890").unwrap();
    /// assert_eq!(gtin.as_str(), "98851234567890");
    /// assert!(LegacyCodeDetector::detect_bare_gtin("8851234567890").is_none());
    /// ```
    pub fn detect_bare_gtin(text: &str) -> Option<Gtin> {
        if text.len() != GTIN_LENGTH || !is_all_digits(text) {
            return None;
        }
        Gtin::new(text).ok()
    }
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
