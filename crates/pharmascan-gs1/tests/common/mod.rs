//! Shared helpers for classifier integration tests.
//!
//! Barcode fixtures mirror what real pharmacy stock carries: a GS1
//! DataMatrix on the carton with GTIN, expiry and lot, and a plain EAN-13
//! on older packaging.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use pharmascan_core::{BarcodeFormat, ParsedBarcode};

/// Carton GTIN used across fixtures.
pub const GTIN: &str = "08851234567890";

/// Concatenated element string: GTIN, expiry 2025-12-31, lot BATCH001.
pub const CONCATENATED: &str = "01088512345678901725123110BATCH001";

/// Same content in human-readable notation.
pub const BRACKETED: &str = "(01)08851234567890(17)251231(10)BATCH001";

/// EAN-13 printed on the same product.
pub const EAN13: &str = "8851234567890";

/// Fixed capture time so parsed values compare equal.
pub fn captured_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).expect("valid timestamp")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Assert every structured field of a GS1 result.
pub fn assert_gs1(
    parsed: &ParsedBarcode,
    gtin: Option<&str>,
    expiry: Option<NaiveDate>,
    batch: Option<&str>,
    serial: Option<&str>,
) {
    assert_eq!(parsed.format(), BarcodeFormat::Gs1, "format for {:?}", parsed.raw_text());
    assert_eq!(parsed.gtin().map(|g| g.as_str()), gtin, "gtin");
    assert_eq!(parsed.expiry_date(), expiry, "expiry");
    assert_eq!(parsed.batch_number(), batch, "batch");
    assert_eq!(parsed.serial_number(), serial, "serial");
}

/// Assert the result is `Unknown` with no structured fields and raw text kept.
pub fn assert_unknown(parsed: &ParsedBarcode, raw: &str) {
    assert_eq!(parsed.format(), BarcodeFormat::Unknown);
    assert!(parsed.gtin().is_none());
    assert!(parsed.expiry_date().is_none());
    assert!(parsed.batch_number().is_none());
    assert!(parsed.serial_number().is_none());
    assert_eq!(parsed.raw_text(), raw);
}
