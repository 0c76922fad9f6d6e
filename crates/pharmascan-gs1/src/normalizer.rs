//! Raw decoder output cleanup.
//!
//! Decoders and keyboard-wedge scanners wrap the barcode payload in
//! artifacts that carry no product data:
//!
//! - surrounding whitespace and line endings
//! - an ISO/IEC 15424 symbology identifier such as `]d2` (GS1 DataMatrix)
//!   or `]C1` (GS1-128)
//! - a leading FNC1 transmitted as the group separator control character
//! - the parentheses of the human-readable AI notation `(01)...(17)...`
//!
//! Interior group separators are kept: they terminate variable-length
//! elements and the extractor needs them.
//!
//! # Examples
//!
//! ```
//! use pharmascan_gs1::Normalizer;
//!
//! assert_eq!(
//!     Normalizer::normalize("  ]d2(01)08851234567890(17)251231\r\n"),
//!     "010885123456789017251231"
//! );
//! assert_eq!(Normalizer::normalize("hello-world"), "hello-world");
//! ```

use pharmascan_core::constants::{AI_CLOSE_BRACKET, AI_OPEN_BRACKET, SYMBOLOGY_FLAG};

/// Stateless cleaner for raw scanner text.
pub struct Normalizer;

impl Normalizer {
    /// Fully normalize raw text: strip the envelope and remove AI brackets.
    ///
    /// Never fails; input without any envelope is returned unchanged.
    pub fn normalize(raw: &str) -> String {
        Self::strip_envelope(raw)
            .chars()
            .filter(|&c| c != AI_OPEN_BRACKET && c != AI_CLOSE_BRACKET)
            .collect()
    }

    /// Strip whitespace, the symbology identifier and edge control characters.
    ///
    /// Brackets are left in place so bracketed AI notation can still be
    /// recognized. Returns a sub-slice of the input.
    ///
    /// ```
    /// use pharmascan_gs1::Normalizer;
    ///
    /// assert_eq!(Normalizer::strip_envelope("]C1(10)LOT7"), "(10)LOT7");
    /// assert_eq!(Normalizer::strip_envelope("\u{1D}0108851234567890"), "0108851234567890");
    /// ```
    pub fn strip_envelope(raw: &str) -> &str {
        let trimmed = raw.trim();
        let without_prefix = Self::strip_symbology_identifier(trimmed);
        without_prefix.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_control())
    }

    /// Remove one leading symbology identifier, if present.
    ///
    /// The identifier is one or more marker characters (the `]` flag or
    /// control characters, at least one `]`), a code letter and a modifier
    /// character. The code letter requirement keeps a leading FNC1 followed
    /// by AI `01` intact.
    ///
    /// ```
    /// use pharmascan_gs1::Normalizer;
    ///
    /// assert_eq!(Normalizer::strip_symbology_identifier("]d20108851234567890"), "0108851234567890");
    /// assert_eq!(Normalizer::strip_symbology_identifier("]Q3hello"), "hello");
    /// assert_eq!(Normalizer::strip_symbology_identifier("]01"), "]01");
    /// assert_eq!(Normalizer::strip_symbology_identifier("0108851234567890"), "0108851234567890");
    /// ```
    pub fn strip_symbology_identifier(text: &str) -> &str {
        let marker_len: usize = text
            .chars()
            .take_while(|&c| c == SYMBOLOGY_FLAG || c.is_ascii_control())
            .map(char::len_utf8)
            .sum();

        if marker_len == 0 || !text[..marker_len].contains(SYMBOLOGY_FLAG) {
            return text;
        }

        let rest = &text[marker_len..];
        let mut code = rest.chars();
        match (code.next(), code.next()) {
            (Some(letter), Some(modifier))
                if letter.is_ascii_alphabetic() && modifier.is_ascii_alphanumeric() =>
            {
                &rest[2..]
            }
            _ => text,
        }
    }

    /// Returns `true` if the text uses the human-readable `(AI)` notation.
    pub fn is_bracketed(text: &str) -> bool {
        text.contains(AI_OPEN_BRACKET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01088512345678901725123110BATCH001", "01088512345678901725123110BATCH001")]
    #[case("(01)08851234567890(17)251231(10)BATCH001", "01088512345678901725123110BATCH001")]
    #[case("]d201088512345678901725123110BATCH001", "01088512345678901725123110BATCH001")]
    #[case("]C1(01)08851234567890", "0108851234567890")]
    #[case("  8851234567890\n", "8851234567890")]
    #[case("\u{1D}0108851234567890\u{1D}", "0108851234567890")]
    #[case("10LOT7\u{1D}21SN42", "10LOT7\u{1D}21SN42")]
    #[case("hello-world", "hello-world")]
    #[case("", "")]
    #[case("   ", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::normalize(input), expected);
    }

    #[rstest]
    #[case("]d2", "")]
    #[case("]]e0data", "data")]
    #[case("\u{1D}]d2data", "data")]
    #[case("]", "]")]
    #[case("]d", "]d")]
    #[case("]1abc", "]1abc")]
    #[case("]d-abc", "]d-abc")]
    fn test_strip_symbology_identifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::strip_symbology_identifier(input), expected);
    }

    #[test]
    fn test_strip_only_one_identifier() {
        assert_eq!(Normalizer::strip_symbology_identifier("]d2]C1x"), "]C1x");
    }

    #[test]
    fn test_strip_envelope_keeps_brackets() {
        let text = Normalizer::strip_envelope(" ]d2(01)08851234567890 ");
        assert_eq!(text, "(01)08851234567890");
        assert!(Normalizer::is_bracketed(text));
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(Normalizer::normalize("ยาพารา (500)"), "ยาพารา 500");
    }
}
