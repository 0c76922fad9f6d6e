//! Barcode format classification.
//!
//! [`FormatClassifier`] is the single entry point for camera decodes,
//! keyboard-wedge scans and manual input. It is pure and total: every input
//! produces a [`ParsedBarcode`], malformed input simply degrades to
//! [`BarcodeFormat::Unknown`] with the raw text preserved.
//!
//! # Precedence
//!
//! Bracketed input (`(01)...`):
//!
//! 1. Bracketed AI extraction
//! 2. Legacy 12/13-digit code on the normalized text
//! 3. Unknown
//!
//! Concatenated input:
//!
//! 1. Legacy 12/13-digit code
//! 2. Positional AI extraction
//! 3. Bare 14-digit GTIN
//! 4. Unknown
//!
//! A 12- or 13-digit string is therefore always EAN-13, even when it happens
//! to start with a valid AI such as `17`.
//!
//! # Examples
//!
//! ```
//! use pharmascan_core::BarcodeFormat;
//! use pharmascan_gs1::FormatClassifier;
//!
//! let parsed = FormatClassifier::classify("01088512345678901725123110BATCH001");
//! assert_eq!(parsed.format(), BarcodeFormat::Gs1);
//! assert_eq!(parsed.batch_number(), Some("BATCH001"));
//!
//! let parsed = FormatClassifier::classify("8851234567890");
//! assert_eq!(parsed.format(), BarcodeFormat::Ean13);
//! assert_eq!(parsed.gtin().unwrap().as_str(), "08851234567890");
//!
//! let parsed = FormatClassifier::classify("hello-world");
//! assert_eq!(parsed.format(), BarcodeFormat::Unknown);
//! assert_eq!(parsed.raw_text(), "hello-world");
//! ```

use crate::extractor::FieldExtractor;
use crate::legacy::LegacyCodeDetector;
use crate::normalizer::Normalizer;
use chrono::{DateTime, Utc};
use pharmascan_core::{BarcodeFormat, Gs1Fields, ParsedBarcode};
use tracing::debug;

/// Classifies raw scanner text into a [`ParsedBarcode`].
pub struct FormatClassifier;

impl FormatClassifier {
    /// Classify raw text, stamping the result with the current time.
    pub fn classify(raw: &str) -> ParsedBarcode {
        Self::classify_at(raw, Utc::now())
    }

    /// Classify raw text with a caller-supplied capture timestamp.
    pub fn classify_at(raw: &str, captured_at: DateTime<Utc>) -> ParsedBarcode {
        let envelope = Normalizer::strip_envelope(raw);
        let normalized = Normalizer::normalize(raw);

        let parsed = if Normalizer::is_bracketed(envelope) {
            Self::classify_bracketed(raw, envelope, &normalized, captured_at)
        } else {
            Self::classify_concatenated(raw, &normalized, captured_at)
        };

        if let Some(gtin) = parsed.gtin()
            && !gtin.has_valid_check_digit()
        {
            debug!(gtin = %gtin, "GTIN check digit mismatch");
        }
        debug!(
            format = %parsed.format(),
            gtin = parsed.gtin().map(|g| g.as_str()),
            batch = parsed.batch_number(),
            "classified barcode"
        );

        parsed
    }

    fn classify_bracketed(
        raw: &str,
        envelope: &str,
        normalized: &str,
        captured_at: DateTime<Utc>,
    ) -> ParsedBarcode {
        let fields = FieldExtractor::extract_bracketed(envelope);
        if !fields.is_empty() {
            return ParsedBarcode::gs1(raw, fields, captured_at);
        }
        if let Some(gtin) = LegacyCodeDetector::detect(normalized) {
            return ParsedBarcode::ean13(raw, gtin, captured_at);
        }
        ParsedBarcode::unknown(raw, captured_at)
    }

    fn classify_concatenated(
        raw: &str,
        normalized: &str,
        captured_at: DateTime<Utc>,
    ) -> ParsedBarcode {
        if let Some(gtin) = LegacyCodeDetector::detect(normalized) {
            return ParsedBarcode::ean13(raw, gtin, captured_at);
        }

        let fields = FieldExtractor::extract_concatenated(normalized);
        if !fields.is_empty() {
            return ParsedBarcode::gs1(raw, fields, captured_at);
        }

        if let Some(gtin) = LegacyCodeDetector::detect_bare_gtin(normalized) {
            let fields = Gs1Fields {
                gtin: Some(gtin),
                ..Default::default()
            };
            return ParsedBarcode::gs1(raw, fields, captured_at);
        }

        ParsedBarcode::unknown(raw, captured_at)
    }

    /// Classify and return only the detected format.
    pub fn detect_format(raw: &str) -> BarcodeFormat {
        Self::classify(raw).format()
    }
}
