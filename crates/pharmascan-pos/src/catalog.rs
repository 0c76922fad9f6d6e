//! Product catalog.
//!
//! The scan flow only needs two queries from the catalog, so it is modeled
//! as a small async repository trait. [`InMemoryCatalog`] backs tests and
//! demos; a database-backed store implements the same trait.

#![allow(async_fn_in_trait)]

use crate::Result;
use chrono::NaiveDate;
use pharmascan_core::Gtin;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One stock batch of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,

    /// Lot number as printed on the pack (GS1 AI `10`).
    pub batch_number: String,

    pub expiry_date: NaiveDate,

    pub quantity: u32,
}

/// A sellable product and its batches.
///
/// # Examples
///
/// ```
/// use pharmascan_pos::catalog::Product;
///
/// let product: Product = serde_json::from_str(r#"{
///     "id": "p1",
///     "sku": "MED-001",
///     "gtin": "03453120000011",
///     "name": "Paracetamol 500mg",
///     "category": "Analgesics",
///     "price": 1500,
///     "batches": [
///         { "id": "b1", "batch_number": "ABC123", "expiry_date": "2025-12-31", "quantity": 100 }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(product.find_batch("ABC123").map(|b| b.quantity), Some(100));
/// assert!(product.find_batch("ZZZ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,

    pub sku: String,

    /// Products sold without a printed barcode have no GTIN.
    #[serde(default)]
    pub gtin: Option<Gtin>,

    pub name: String,

    #[serde(default)]
    pub generic_name: Option<String>,

    pub category: String,

    /// Unit price in minor currency units.
    pub price: u64,

    #[serde(default)]
    pub requires_prescription: bool,

    #[serde(default)]
    pub batches: Vec<Batch>,
}

impl Product {
    /// Find a batch by its exact lot number.
    pub fn find_batch(&self, batch_number: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.batch_number == batch_number)
    }

    /// Whether `code` is exactly this product's SKU, id or GTIN.
    pub fn matches_code(&self, code: &str) -> bool {
        self.sku == code || self.id == code || self.gtin.as_ref().is_some_and(|g| g.as_str() == code)
    }
}

/// Read access to the product catalog.
///
/// Both queries return `Ok(None)` for a miss; errors mean the catalog
/// itself could not be queried.
pub trait ProductCatalog: Send + Sync {
    /// Find the product carrying `gtin`.
    async fn find_by_gtin(&self, gtin: &Gtin) -> Result<Option<Product>>;

    /// Find a product whose SKU, id or GTIN equals `code` exactly.
    async fn find_by_code(&self, code: &str) -> Result<Option<Product>>;
}

/// Catalog held in memory, first match wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a JSON array of products.
    pub fn from_json_str(json: &str) -> pharmascan_core::Result<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Load a JSON array of products from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> pharmascan_core::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    async fn find_by_gtin(&self, gtin: &Gtin) -> Result<Option<Product>> {
        Ok(self
            .products
            .iter()
            .find(|p| p.gtin.as_ref() == Some(gtin))
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.matches_code(code)).cloned())
    }
}
