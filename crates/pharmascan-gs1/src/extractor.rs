//! GS1 Application Identifier field extraction.
//!
//! Two input shapes are supported:
//!
//! ## Bracketed form
//!
//! Human-readable notation with every AI wrapped in parentheses. Groups are
//! matched by code, independent of their order:
//!
//! ```text
//! (01)08851234567890(17)251231(10)BATCH001
//! ```
//!
//! ## Concatenated form
//!
//! Raw element strings packed back to back. Fixed-length elements carry no
//! separator; variable-length elements run until a group separator (0x1D) or
//! the end of the data. Parsing is positional: a cursor tests for `01`, `17`,
//! `10` and `21` in that order, consuming each element that is present.
//!
//! ```text
//! 01 08851234567890 17 251231 10 BATCH001
//! ```
//!
//! Without a group separator a variable-length element swallows the rest of
//! the data, so batch and serial numbers are only reliable when they are the
//! last element or are terminated by a separator.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use pharmascan_gs1::FieldExtractor;
//!
//! let fields = FieldExtractor::extract_concatenated("01088512345678901725123110BATCH001");
//! assert_eq!(fields.gtin.unwrap().as_str(), "08851234567890");
//! assert_eq!(fields.expiry_date, NaiveDate::from_ymd_opt(2025, 12, 31));
//! assert_eq!(fields.batch_number.as_deref(), Some("BATCH001"));
//!
//! let bracketed = FieldExtractor::extract_bracketed("(10)BATCH001(01)08851234567890");
//! assert_eq!(bracketed.batch_number.as_deref(), Some("BATCH001"));
//! assert_eq!(bracketed.gtin.unwrap().as_str(), "08851234567890");
//! ```

use crate::ai::{ApplicationIdentifier, PayloadLength};
use crate::date::expiry_from_yymmdd;
use pharmascan_core::constants::{
    AI_CLOSE_BRACKET, AI_CODE_LENGTH, AI_OPEN_BRACKET, EXPIRY_DATE_LENGTH, GROUP_SEPARATOR,
    GTIN_LENGTH,
};
use pharmascan_core::{Gs1Fields, Gtin};
use tracing::trace;

/// Element order of un-bracketed data.
const CONCATENATED_ORDER: [ApplicationIdentifier; 4] = [
    ApplicationIdentifier::Gtin,
    ApplicationIdentifier::ExpiryDate,
    ApplicationIdentifier::BatchNumber,
    ApplicationIdentifier::SerialNumber,
];

/// Stateless GS1 field extractor.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Extract fields from concatenated element strings.
    ///
    /// Elements are read in the fixed order `01`, `17`, `10`, `21`; each is
    /// taken only if the cursor starts with its code once the previous
    /// element has been consumed. A serial number can therefore only follow
    /// a batch number that ends at a group separator. Scanning stops at a
    /// malformed fixed-length payload; fields extracted up to that point are
    /// kept, and data left after the last element is ignored.
    pub fn extract_concatenated(data: &str) -> Gs1Fields {
        let mut cursor = ElementCursor::new(data);
        let mut fields = Gs1Fields::default();

        for ai in CONCATENATED_ORDER {
            if !cursor.take_ai(ai) {
                continue;
            }

            let consumed = match ai.payload_length() {
                PayloadLength::Fixed(len) => cursor.take_fixed(len),
                PayloadLength::Variable => Some(cursor.take_variable()),
            };
            let Some(payload) = consumed else {
                trace!(%ai, position = cursor.pos, "malformed fixed-length payload, stopping");
                break;
            };

            apply(&mut fields, ai, payload);
            cursor.skip_separator();
        }

        if !cursor.is_at_end() {
            trace!(position = cursor.pos, "trailing data outside element order ignored");
        }
        fields
    }

    /// Extract fields from human-readable `(AI)value` notation.
    ///
    /// Unknown AIs are skipped. When an AI appears more than once the first
    /// occurrence wins. Text before the first bracket is ignored.
    pub fn extract_bracketed(data: &str) -> Gs1Fields {
        let mut fields = Gs1Fields::default();
        let mut seen: Vec<ApplicationIdentifier> =
            Vec::with_capacity(ApplicationIdentifier::ALL.len());

        for group in data.split(AI_OPEN_BRACKET).skip(1) {
            let Some((code, rest)) = group.split_once(AI_CLOSE_BRACKET) else {
                continue;
            };
            let Some(ai) = ApplicationIdentifier::from_code(code) else {
                trace!(code, "skipping unrecognized bracketed AI");
                continue;
            };
            if seen.contains(&ai) {
                continue;
            }

            let value = rest.split(GROUP_SEPARATOR).next().unwrap_or_default();
            let payload = match ai.payload_length() {
                PayloadLength::Fixed(len) => match leading_digits(value, len) {
                    Some(digits) => digits,
                    None => continue,
                },
                PayloadLength::Variable => value,
            };

            apply(&mut fields, ai, payload);
            seen.push(ai);
        }

        fields
    }
}

/// Store one AI payload into the result fields.
fn apply(fields: &mut Gs1Fields, ai: ApplicationIdentifier, payload: &str) {
    match ai {
        ApplicationIdentifier::Gtin => {
            debug_assert_eq!(payload.len(), GTIN_LENGTH);
            fields.gtin = Gtin::new(payload).ok();
        }
        ApplicationIdentifier::ExpiryDate => {
            debug_assert_eq!(payload.len(), EXPIRY_DATE_LENGTH);
            fields.expiry_date = expiry_from_yymmdd(payload);
            if fields.expiry_date.is_none() {
                trace!(payload, "AI 17 payload is not a calendar date");
            }
        }
        ApplicationIdentifier::BatchNumber => fields.batch_number = non_empty(payload),
        ApplicationIdentifier::SerialNumber => fields.serial_number = non_empty(payload),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The first `len` characters of `value`, if they are all ASCII digits.
fn leading_digits(value: &str, len: usize) -> Option<&str> {
    let digits = value.get(..len)?;
    digits.bytes().all(|b| b.is_ascii_digit()).then_some(digits)
}

/// Positional reader over concatenated element strings.
struct ElementCursor<'a> {
    data: &'a str,
    pos: usize,
}

impl<'a> ElementCursor<'a> {
    fn new(data: &'a str) -> Self {
        Self { data, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Advance past `ai`'s code if the cursor starts with it.
    fn take_ai(&mut self, ai: ApplicationIdentifier) -> bool {
        let at_code = self
            .data
            .get(self.pos..self.pos + AI_CODE_LENGTH)
            .is_some_and(|code| code == ai.code());
        if at_code {
            self.pos += AI_CODE_LENGTH;
        }
        at_code
    }

    fn take_fixed(&mut self, len: usize) -> Option<&'a str> {
        let digits = leading_digits(&self.data[self.pos..], len)?;
        self.pos += len;
        Some(digits)
    }

    fn take_variable(&mut self) -> &'a str {
        let rest = &self.data[self.pos..];
        let end = rest.find(GROUP_SEPARATOR).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_separator(&mut self) {
        if self.data[self.pos..].starts_with(GROUP_SEPARATOR) {
            self.pos += GROUP_SEPARATOR.len_utf8();
        }
    }
}
