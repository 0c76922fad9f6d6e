//! GS1 barcode parsing for pharmacy scanning.
//!
//! Turns raw scanner text into a [`ParsedBarcode`](pharmascan_core::ParsedBarcode):
//!
//! ```text
//! raw text ──► Normalizer ──► LegacyCodeDetector ──► FieldExtractor ──► ParsedBarcode
//! ```
//!
//! Use [`FormatClassifier::classify`] as the single entry point.

pub mod ai;
pub mod classifier;
pub mod date;
pub mod extractor;
pub mod legacy;
pub mod normalizer;

pub use ai::{ApplicationIdentifier, PayloadLength};
pub use classifier::FormatClassifier;
pub use date::expiry_from_yymmdd;
pub use extractor::FieldExtractor;
pub use legacy::LegacyCodeDetector;
pub use normalizer::Normalizer;
