//! Shared fixtures for scan flow integration tests.

#![allow(dead_code)]

use pharmascan_pos::InMemoryCatalog;
use tracing_subscriber::EnvFilter;

/// Paracetamol, stocked with batches `BAT-001` and `ABC123`.
pub const PARACETAMOL_GTIN: &str = "03453120000011";

/// Amoxicillin, stocked with batch `BAT-003`.
pub const AMOXICILLIN_GTIN: &str = "03453120000028";

const CATALOG_JSON: &str = r#"[
    {
        "id": "p1",
        "sku": "MED-001",
        "gtin": "03453120000011",
        "name": "Paracetamol 500mg",
        "generic_name": "Acetaminophen",
        "category": "Analgesics",
        "price": 1500,
        "batches": [
            { "id": "b1", "batch_number": "BAT-001", "expiry_date": "2024-12-31", "quantity": 200 },
            { "id": "b1-gs1", "batch_number": "ABC123", "expiry_date": "2025-12-31", "quantity": 100 }
        ]
    },
    {
        "id": "p2",
        "sku": "MED-002",
        "gtin": "03453120000028",
        "name": "Amoxicillin 250mg",
        "category": "Antibiotics",
        "price": 3500,
        "requires_prescription": true,
        "batches": [
            { "id": "b3", "batch_number": "BAT-003", "expiry_date": "2026-03-01", "quantity": 30 }
        ]
    },
    {
        "id": "p3",
        "sku": "VIT-001",
        "name": "Vitamin C 1000mg",
        "category": "Vitamins",
        "price": 12000
    }
]"#;

/// Route log output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn pharmacy_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_json_str(CATALOG_JSON).unwrap()
}
