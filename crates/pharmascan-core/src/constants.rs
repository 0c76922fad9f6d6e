//! Core constants for GS1 barcode decoding and scanner input handling.
//!
//! This module defines the field lengths, control characters and timing
//! defaults shared by the parsing and hardware crates. Keeping them in one
//! place ensures the classifier, the keystroke detector and the configuration
//! layer agree on the same values.
//!
//! # GS1 Element Strings
//!
//! A GS1 barcode carries a sequence of element strings, each one an
//! Application Identifier (AI) followed by its payload:
//!
//! ```text
//! 01 08851234567890 17 251231 10 BATCH001 <GS> 21 SN42
//! ^^ ^^^^^^^^^^^^^^ ^^ ^^^^^^ ^^ ^^^^^^^^ ^^^^ ^^ ^^^^
//! AI GTIN (14)      AI YYMMDD AI batch    sep  AI serial
//! ```
//!
//! | AI | Meaning | Payload |
//! |----|---------|---------|
//! | `01` | GTIN | fixed, [`GTIN_LENGTH`] digits |
//! | `17` | Expiry date | fixed, [`EXPIRY_DATE_LENGTH`] digits |
//! | `10` | Batch/lot | variable, up to [`GROUP_SEPARATOR`] or end |
//! | `21` | Serial number | variable, up to [`GROUP_SEPARATOR`] or end |
//!
//! # Usage
//!
//! ```
//! use pharmascan_core::constants::*;
//!
//! assert_eq!(AI_CODE_LENGTH + GTIN_LENGTH, 16);
//! assert!(LEGACY_CODE_LENGTHS.contains(&13));
//!
//! use std::time::Duration;
//! let gap = Duration::from_millis(DEFAULT_KEYSTROKE_GAP_MS);
//! assert_eq!(gap.as_millis(), 50);
//! ```

// ============================================================================
// GS1 Element Layout
// ============================================================================

/// Length of an Application Identifier code.
///
/// Only two-digit AIs are recognized (`01`, `10`, `17`, `21`).
pub const AI_CODE_LENGTH: usize = 2;

/// Length of a Global Trade Item Number.
///
/// Every GTIN produced by the classifier is normalized to this length,
/// whether it came from AI `01`, a legacy EAN-13/UPC-A code or a bare
/// 14-digit string.
///
/// # Examples
///
/// ```
/// use pharmascan_core::constants::GTIN_LENGTH;
///
/// let padded = format!("{:0>width$}", "8851234567890", width = GTIN_LENGTH);
/// assert_eq!(padded, "08851234567890");
/// ```
pub const GTIN_LENGTH: usize = 14;

/// Length of the AI `17` payload (`YYMMDD`).
pub const EXPIRY_DATE_LENGTH: usize = 6;

/// GS1 group separator (ASCII GS, 0x1D).
///
/// Decoders emit this character for FNC1 when it terminates a
/// variable-length element such as a batch number.
///
/// # Examples
///
/// ```
/// use pharmascan_core::constants::GROUP_SEPARATOR;
///
/// let data = "10LOT7\u{1D}21SN42";
/// let parts: Vec<&str> = data.split(GROUP_SEPARATOR).collect();
/// assert_eq!(parts, vec!["10LOT7", "21SN42"]);
/// ```
pub const GROUP_SEPARATOR: char = '\u{1D}';

/// Flag character opening an ISO/IEC 15424 symbology identifier (`]d2`, `]C1`).
pub const SYMBOLOGY_FLAG: char = ']';

/// Opening bracket of the human-readable AI notation (`(01)`).
pub const AI_OPEN_BRACKET: char = '(';

/// Closing bracket of the human-readable AI notation (`(01)`).
pub const AI_CLOSE_BRACKET: char = ')';

// ============================================================================
// Legacy Numeric Codes
// ============================================================================

/// Lengths of pure-numeric legacy codes (UPC-A = 12, EAN-13 = 13).
///
/// Strings of these lengths made entirely of ASCII digits are classified
/// as EAN-13 and padded to [`GTIN_LENGTH`].
pub const LEGACY_CODE_LENGTHS: [usize; 2] = [12, 13];

/// Padding character used to widen legacy codes to a GTIN-14.
pub const GTIN_PAD_CHAR: char = '0';

// ============================================================================
// Expiry Date Conversion
// ============================================================================

/// Two-digit year pivot for `YYMMDD` dates.
///
/// Years `00..=50` map to `2000..=2050`, years `51..=99` map to `1951..=1999`.
///
/// # Examples
///
/// ```
/// use pharmascan_core::constants::{CENTURY_CURRENT, CENTURY_PREVIOUS, YEAR_PIVOT};
///
/// fn full_year(yy: i32) -> i32 {
///     if yy <= YEAR_PIVOT { CENTURY_CURRENT + yy } else { CENTURY_PREVIOUS + yy }
/// }
///
/// assert_eq!(full_year(25), 2025);
/// assert_eq!(full_year(50), 2050);
/// assert_eq!(full_year(51), 1951);
/// ```
pub const YEAR_PIVOT: i32 = 50;

/// Century added to two-digit years at or below [`YEAR_PIVOT`].
pub const CENTURY_CURRENT: i32 = 2000;

/// Century added to two-digit years above [`YEAR_PIVOT`].
pub const CENTURY_PREVIOUS: i32 = 1900;

// ============================================================================
// Hardware Scanner Detection
// ============================================================================

/// Default maximum gap between scanner keystrokes (milliseconds).
///
/// Keyboard-wedge scanners type at near-zero latency. A larger gap between
/// two keystrokes means the buffer belongs to a different input sequence
/// and is discarded.
///
/// # Value: 50ms
pub const DEFAULT_KEYSTROKE_GAP_MS: u64 = 50;

/// Default minimum buffered length for an `Enter` to count as a scan.
///
/// # Value: 3 characters
pub const DEFAULT_MIN_SCAN_LENGTH: usize = 3;

// ============================================================================
// Session Defaults
// ============================================================================

/// Default number of scans kept in the recent-scan history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Default capacity of the merged scan event channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 32;

/// Default camera decode rate (frames per second).
pub const DEFAULT_CAMERA_FPS: u32 = 10;

/// Maximum camera decode rate accepted by configuration.
pub const MAX_CAMERA_FPS: u32 = 60;
