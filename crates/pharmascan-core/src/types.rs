use crate::{
    Result,
    constants::{GTIN_LENGTH, GTIN_PAD_CHAR, LEGACY_CODE_LENGTHS},
    error::Error,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global Trade Item Number (exactly 14 ASCII digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gtin(String);

impl Gtin {
    /// Create a GTIN from a 14-digit string.
    ///
    /// # Errors
    /// Returns `Error::InvalidGtin` if the value is not exactly 14 ASCII digits.
    pub fn new(value: &str) -> Result<Self> {
        if value.len() != GTIN_LENGTH {
            return Err(Error::invalid_gtin(
                value,
                format!("expected {GTIN_LENGTH} digits, got {}", value.len()),
            ));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_gtin(value, "must contain only digits"));
        }
        Ok(Gtin(value.to_string()))
    }

    /// Widen a 12-digit UPC-A or 13-digit EAN-13 code to a GTIN-14.
    ///
    /// # Errors
    /// Returns `Error::InvalidGtin` if the code is not 12 or 13 ASCII digits.
    pub fn from_legacy(code: &str) -> Result<Self> {
        if !LEGACY_CODE_LENGTHS.contains(&code.len()) {
            return Err(Error::invalid_gtin(
                code,
                format!("legacy codes must be 12 or 13 digits, got {}", code.len()),
            ));
        }
        let padded: String = std::iter::repeat_n(GTIN_PAD_CHAR, GTIN_LENGTH - code.len())
            .chain(code.chars())
            .collect();
        Gtin::new(&padded)
    }

    /// Get the GTIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compute the GS1 mod-10 check digit for the first 13 digits.
    #[must_use]
    pub fn expected_check_digit(&self) -> u8 {
        let sum: u32 = self.0.as_bytes()[..GTIN_LENGTH - 1]
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let digit = u32::from(b - b'0');
                if i % 2 == 0 { digit * 3 } else { digit }
            })
            .sum();
        ((10 - sum % 10) % 10) as u8
    }

    /// Returns `true` if the last digit matches the GS1 check digit.
    ///
    /// Informational only: decoders occasionally carry GTINs with a wrong
    /// check digit and the classifier does not reject them.
    #[must_use]
    pub fn has_valid_check_digit(&self) -> bool {
        let last = self.0.as_bytes()[GTIN_LENGTH - 1] - b'0';
        last == self.expected_check_digit()
    }
}

impl fmt::Display for Gtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Gtin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Gtin::new(s)
    }
}

impl TryFrom<String> for Gtin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Gtin::new(&value)
    }
}

impl From<Gtin> for String {
    fn from(gtin: Gtin) -> Self {
        gtin.0
    }
}

impl AsRef<str> for Gtin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Barcode format detected by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    /// GS1 element string (bracketed or concatenated AIs)
    #[serde(rename = "GS1")]
    Gs1,
    /// Legacy EAN-13 / UPC-A numeric code
    #[serde(rename = "EAN-13")]
    Ean13,
    /// Anything else; only the raw text is kept
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl BarcodeFormat {
    /// Returns `true` if format is GS1.
    #[inline]
    #[must_use]
    pub fn is_gs1(self) -> bool {
        matches!(self, BarcodeFormat::Gs1)
    }

    /// Returns `true` if format is Unknown.
    #[inline]
    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, BarcodeFormat::Unknown)
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BarcodeFormat::Gs1 => write!(f, "GS1"),
            BarcodeFormat::Ean13 => write!(f, "EAN-13"),
            BarcodeFormat::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Fields extracted from GS1 Application Identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gs1Fields {
    /// AI 01
    pub gtin: Option<Gtin>,
    /// AI 17
    pub expiry_date: Option<NaiveDate>,
    /// AI 10
    pub batch_number: Option<String>,
    /// AI 21
    pub serial_number: Option<String>,
}

impl Gs1Fields {
    /// Returns `true` if no AI produced a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gtin.is_none()
            && self.expiry_date.is_none()
            && self.batch_number.is_none()
            && self.serial_number.is_none()
    }
}

/// Structured result of classifying one scan.
///
/// Constructed once per scan and never mutated. The constructors uphold the
/// format invariants: `Gs1` always carries at least one field, `Ean13` always
/// carries a GTIN and `Unknown` carries nothing but the raw text.
/// Deserialization checks the same invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParsedBarcodeRecord")]
pub struct ParsedBarcode {
    format: BarcodeFormat,
    gtin: Option<Gtin>,
    expiry_date: Option<NaiveDate>,
    batch_number: Option<String>,
    serial_number: Option<String>,
    raw_text: String,
    captured_at: DateTime<Utc>,
}

impl ParsedBarcode {
    /// Unrecognized input: only the raw text survives.
    #[must_use]
    pub fn unknown(raw_text: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            format: BarcodeFormat::Unknown,
            gtin: None,
            expiry_date: None,
            batch_number: None,
            serial_number: None,
            raw_text: raw_text.into(),
            captured_at,
        }
    }

    /// Legacy EAN-13 / UPC-A code already widened to a GTIN-14.
    #[must_use]
    pub fn ean13(raw_text: impl Into<String>, gtin: Gtin, captured_at: DateTime<Utc>) -> Self {
        Self {
            format: BarcodeFormat::Ean13,
            gtin: Some(gtin),
            ..Self::unknown(raw_text, captured_at)
        }
    }

    /// GS1 result built from extracted fields.
    ///
    /// Empty batch or serial strings are dropped. If nothing is left the
    /// result degrades to [`BarcodeFormat::Unknown`].
    #[must_use]
    pub fn gs1(raw_text: impl Into<String>, fields: Gs1Fields, captured_at: DateTime<Utc>) -> Self {
        let fields = Gs1Fields {
            batch_number: fields.batch_number.filter(|b| !b.is_empty()),
            serial_number: fields.serial_number.filter(|s| !s.is_empty()),
            ..fields
        };

        if fields.is_empty() {
            return Self::unknown(raw_text, captured_at);
        }

        Self {
            format: BarcodeFormat::Gs1,
            gtin: fields.gtin,
            expiry_date: fields.expiry_date,
            batch_number: fields.batch_number,
            serial_number: fields.serial_number,
            raw_text: raw_text.into(),
            captured_at,
        }
    }

    #[must_use]
    pub fn format(&self) -> BarcodeFormat {
        self.format
    }

    #[must_use]
    pub fn gtin(&self) -> Option<&Gtin> {
        self.gtin.as_ref()
    }

    #[must_use]
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    #[must_use]
    pub fn batch_number(&self) -> Option<&str> {
        self.batch_number.as_deref()
    }

    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    /// The original decoded text, exactly as received.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    #[must_use]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Compare everything except the capture timestamp.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.format == other.format
            && self.gtin == other.gtin
            && self.expiry_date == other.expiry_date
            && self.batch_number == other.batch_number
            && self.serial_number == other.serial_number
            && self.raw_text == other.raw_text
    }
}

/// Unchecked wire shape of a [`ParsedBarcode`].
#[derive(Deserialize)]
struct ParsedBarcodeRecord {
    format: BarcodeFormat,
    #[serde(default)]
    gtin: Option<Gtin>,
    #[serde(default)]
    expiry_date: Option<NaiveDate>,
    #[serde(default)]
    batch_number: Option<String>,
    #[serde(default)]
    serial_number: Option<String>,
    raw_text: String,
    captured_at: DateTime<Utc>,
}

impl TryFrom<ParsedBarcodeRecord> for ParsedBarcode {
    type Error = Error;

    fn try_from(record: ParsedBarcodeRecord) -> Result<Self> {
        let ParsedBarcodeRecord {
            format,
            gtin,
            expiry_date,
            batch_number,
            serial_number,
            raw_text,
            captured_at,
        } = record;
        let reject = |reason: &str| Err(Error::invalid_barcode(format.to_string(), reason));

        let has_ai_fields = expiry_date.is_some() || batch_number.is_some() || serial_number.is_some();
        match format {
            BarcodeFormat::Unknown if gtin.is_some() || has_ai_fields => {
                reject("unknown barcodes carry no structured fields")
            }
            BarcodeFormat::Unknown => Ok(Self::unknown(raw_text, captured_at)),
            BarcodeFormat::Ean13 => match gtin {
                None => reject("missing GTIN"),
                Some(_) if has_ai_fields => reject("only a GTIN is allowed"),
                Some(gtin) => Ok(Self::ean13(raw_text, gtin, captured_at)),
            },
            BarcodeFormat::Gs1 => {
                if batch_number.as_deref() == Some("") || serial_number.as_deref() == Some("") {
                    return reject("batch and serial numbers must not be empty");
                }
                let fields = Gs1Fields {
                    gtin,
                    expiry_date,
                    batch_number,
                    serial_number,
                };
                if fields.is_empty() {
                    return reject("at least one AI field is required");
                }
                Ok(Self::gs1(raw_text, fields, captured_at))
            }
        }
    }
}

/// Where a scan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    /// Text decoded from camera frames
    Camera,
    /// Keystroke burst from a keyboard-wedge scanner
    HardwareScanner,
    /// Text typed and submitted by the operator
    Manual,
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanSource::Camera => write!(f, "Camera"),
            ScanSource::HardwareScanner => write!(f, "HardwareScanner"),
            ScanSource::Manual => write!(f, "Manual"),
        }
    }
}
