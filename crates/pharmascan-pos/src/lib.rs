//! Point-of-sale scan flow for the pharmacy.
//!
//! Wires the scan sources from `pharmascan-hardware` and the classifier from
//! `pharmascan-gs1` to a product catalog:
//!
//! - [`ScannerConfig`]: tunables, loadable from JSON
//! - [`ProductCatalog`]: async catalog queries, with [`InMemoryCatalog`]
//! - [`resolve`]: turns a classified scan into a [`LookupOutcome`]
//! - [`ScanPipeline`]: drains a scan stream, keeping a [`ScanHistory`]
//!
//! # Examples
//!
//! ```
//! use pharmascan_pos::{InMemoryCatalog, ScanPipeline, ScannerConfig};
//! use pharmascan_hardware::ScanSourceManager;
//!
//! #[tokio::main]
//! async fn main() -> pharmascan_pos::Result<()> {
//!     let config = ScannerConfig::default();
//!     let catalog = InMemoryCatalog::from_json_str(r#"[
//!         { "id": "p1", "sku": "MED-001", "gtin": "03453120000011",
//!           "name": "Paracetamol 500mg", "category": "Analgesics", "price": 1500 }
//!     ]"#)?;
//!
//!     let mut manager = ScanSourceManager::new(config.event_channel_capacity);
//!     let mut events = manager.take_events()?;
//!     let mut pipeline = ScanPipeline::new(catalog, &config);
//!
//!     manager.submit_manual("(01)03453120000011(10)LOT42");
//!     drop(manager);
//!
//!     pipeline
//!         .run(&mut events, |report| {
//!             assert_eq!(
//!                 report.outcome.to_string(),
//!                 "Scanned: Paracetamol 500mg - New Batch: LOT42"
//!             );
//!         })
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod lookup;
pub mod pipeline;

pub use catalog::{Batch, InMemoryCatalog, Product, ProductCatalog};
pub use config::ScannerConfig;
pub use error::{PosError, Result};
pub use history::ScanHistory;
pub use lookup::{BatchMatch, LookupOutcome, resolve};
pub use pipeline::{ScanPipeline, ScanReport};
