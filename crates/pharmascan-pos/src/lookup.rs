//! Resolving a classified scan against the product catalog.
//!
//! A scan that decoded a GTIN is looked up by GTIN, and a decoded batch
//! number is matched against the product's batches. A scan without a GTIN
//! falls back to an exact match of its raw text on SKU, id or GTIN.
//!
//! ```text
//! gtin? ──yes──► find_by_gtin ──hit──► batch? ──► Matched { NotEncoded | Existing | New }
//!   │                          └─miss─► ProductNotFound
//!   └───no───► find_by_code ──hit──► MatchedByCode
//!                            └─miss─► UnknownBarcode
//! ```

use crate::Result;
use crate::catalog::{Batch, Product, ProductCatalog};
use pharmascan_core::{Gtin, ParsedBarcode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the scanned batch number relates to the product's known batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchMatch {
    /// The barcode carried no batch number.
    NotEncoded,

    /// The batch is already stocked.
    Existing(Batch),

    /// The batch number is not on record yet.
    New { batch_number: String },
}

/// Result of looking up one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Matched { product: Product, batch: BatchMatch },
    ProductNotFound { gtin: Gtin },
    MatchedByCode { product: Product },
    UnknownBarcode { raw: String },
}

impl LookupOutcome {
    /// Whether a product was found.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Matched { .. } | Self::MatchedByCode { .. })
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Matched { product, .. } | Self::MatchedByCode { product } => Some(product),
            Self::ProductNotFound { .. } | Self::UnknownBarcode { .. } => None,
        }
    }
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched { product, batch } => {
                write!(f, "Scanned: {}", product.name)?;
                match batch {
                    BatchMatch::NotEncoded => Ok(()),
                    BatchMatch::Existing(batch) => write!(f, " - Batch: {}", batch.batch_number),
                    BatchMatch::New { batch_number } => write!(f, " - New Batch: {batch_number}"),
                }
            }
            Self::ProductNotFound { gtin } => write!(f, "Product with GTIN {gtin} not found"),
            Self::MatchedByCode { product } => write!(f, "Added: {}", product.name),
            Self::UnknownBarcode { raw } => write!(f, "Unknown barcode: {raw}"),
        }
    }
}

/// Look up `parsed` in `catalog`.
///
/// # Errors
///
/// Only catalog failures are errors; misses are [`LookupOutcome`] variants.
pub async fn resolve<C: ProductCatalog>(catalog: &C, parsed: &ParsedBarcode) -> Result<LookupOutcome> {
    let Some(gtin) = parsed.gtin() else {
        let raw = parsed.raw_text();
        return Ok(match catalog.find_by_code(raw).await? {
            Some(product) => LookupOutcome::MatchedByCode { product },
            None => LookupOutcome::UnknownBarcode { raw: raw.to_string() },
        });
    };

    let Some(product) = catalog.find_by_gtin(gtin).await? else {
        return Ok(LookupOutcome::ProductNotFound { gtin: gtin.clone() });
    };

    let batch = match parsed.batch_number() {
        None => BatchMatch::NotEncoded,
        Some(number) => match product.find_batch(number) {
            Some(batch) => BatchMatch::Existing(batch.clone()),
            None => BatchMatch::New {
                batch_number: number.to_string(),
            },
        },
    };

    Ok(LookupOutcome::Matched { product, batch })
}
