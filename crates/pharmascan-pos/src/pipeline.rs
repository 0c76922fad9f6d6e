//! The point-of-sale scan flow.
//!
//! [`ScanPipeline`] takes each [`ScanEvent`] from the merged source stream,
//! classifies it, records it in the recent-scan history and resolves it
//! against the catalog.
//!
//! ```text
//! ScanEventStream ──► FormatClassifier ──► ScanHistory
//!                                     └──► resolve ──► ScanReport
//! ```

use crate::Result;
use crate::catalog::ProductCatalog;
use crate::config::ScannerConfig;
use crate::history::ScanHistory;
use crate::lookup::{LookupOutcome, resolve};
use pharmascan_core::ParsedBarcode;
use pharmascan_gs1::FormatClassifier;
use pharmascan_hardware::{ScanEvent, ScanEventStream};
use tracing::{info, warn};

/// Everything the flow learned about one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub event: ScanEvent,
    pub parsed: ParsedBarcode,
    pub outcome: LookupOutcome,
}

/// Classifies scans and resolves them against a catalog.
#[derive(Debug)]
pub struct ScanPipeline<C: ProductCatalog> {
    catalog: C,
    history: ScanHistory,
}

impl<C: ProductCatalog> ScanPipeline<C> {
    pub fn new(catalog: C, config: &ScannerConfig) -> Self {
        Self {
            catalog,
            history: ScanHistory::new(config.history_capacity),
        }
    }

    /// Classify, record and resolve one scan.
    ///
    /// The scan is recorded in history even when the lookup fails.
    ///
    /// # Errors
    ///
    /// Returns the catalog's error if it could not be queried.
    pub async fn process(&mut self, event: ScanEvent) -> Result<ScanReport> {
        let parsed = FormatClassifier::classify_at(&event.text, event.received_at);
        self.history.record(parsed.clone());

        let outcome = resolve(&self.catalog, &parsed).await?;
        info!(
            source = %event.source,
            format = %parsed.format(),
            success = outcome.is_success(),
            "{outcome}"
        );

        Ok(ScanReport {
            event,
            parsed,
            outcome,
        })
    }

    /// Process scans until every source has gone away.
    ///
    /// A scan whose lookup fails is logged and skipped. Returns the number
    /// of reports handed to `on_report`.
    pub async fn run<F>(&mut self, events: &mut ScanEventStream, mut on_report: F) -> usize
    where
        F: FnMut(&ScanReport),
    {
        let mut reported = 0;
        while let Some(event) = events.recv().await {
            let raw = event.text.clone();
            match self.process(event).await {
                Ok(report) => {
                    on_report(&report);
                    reported += 1;
                }
                Err(e) => warn!(error = %e, raw = %raw, "scan lookup failed"),
            }
        }
        reported
    }

    /// Recent scans, newest first.
    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PosError;
    use crate::catalog::{InMemoryCatalog, Product};
    use pharmascan_core::{BarcodeFormat, Gtin, ScanSource};
    use pharmascan_hardware::ScanSourceManager;

    struct OfflineCatalog;

    impl ProductCatalog for OfflineCatalog {
        async fn find_by_gtin(&self, _gtin: &Gtin) -> Result<Option<Product>> {
            Err(PosError::catalog("catalog offline"))
        }

        async fn find_by_code(&self, _code: &str) -> Result<Option<Product>> {
            Err(PosError::catalog("catalog offline"))
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![Product {
            id: "p1".to_string(),
            sku: "MED-001".to_string(),
            gtin: Some(Gtin::new("03453120000011").unwrap()),
            name: "Paracetamol 500mg".to_string(),
            generic_name: None,
            category: "Analgesics".to_string(),
            price: 1500,
            requires_prescription: false,
            batches: vec![],
        }])
    }

    #[tokio::test]
    async fn test_process_reports_and_records() {
        let mut pipeline = ScanPipeline::new(catalog(), &ScannerConfig::default());
        let event = ScanEvent::new("3453120000011", ScanSource::Manual);
        let received_at = event.received_at;

        let report = pipeline.process(event).await.unwrap();

        assert_eq!(report.parsed.format(), BarcodeFormat::Ean13);
        assert_eq!(report.parsed.captured_at(), received_at);
        assert_eq!(report.outcome.to_string(), "Scanned: Paracetamol 500mg");
        assert_eq!(pipeline.history().latest(), Some(&report.parsed));
    }

    #[tokio::test]
    async fn test_history_respects_capacity() {
        let config = ScannerConfig::default().history_capacity(2);
        let mut pipeline = ScanPipeline::new(catalog(), &config);

        for raw in ["A1", "A2", "A3"] {
            pipeline.process(ScanEvent::new(raw, ScanSource::Manual)).await.unwrap();
        }

        let raws: Vec<&str> = pipeline.history().iter().map(|p| p.raw_text()).collect();
        assert_eq!(raws, vec!["A3", "A2"]);
    }

    #[tokio::test]
    async fn test_catalog_failure_still_records_history() {
        let mut pipeline = ScanPipeline::new(OfflineCatalog, &ScannerConfig::default());

        let result = pipeline.process(ScanEvent::new("MED-001", ScanSource::Manual)).await;

        assert!(matches!(result, Err(PosError::Catalog { .. })));
        assert_eq!(pipeline.history().len(), 1);
    }

    #[tokio::test]
    async fn test_run_skips_failed_lookups() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();
        let mut pipeline = ScanPipeline::new(OfflineCatalog, &ScannerConfig::default());

        manager.submit_manual("MED-001");
        manager.submit_manual("MED-002");
        drop(manager);

        let reported = pipeline.run(&mut events, |_| {}).await;

        assert_eq!(reported, 0);
        assert_eq!(pipeline.history().len(), 2);
    }

    #[tokio::test]
    async fn test_run_until_stream_ends() {
        let mut manager = ScanSourceManager::default();
        let mut events = manager.take_events().unwrap();
        let mut pipeline = ScanPipeline::new(catalog(), &ScannerConfig::default());

        manager.submit_manual("MED-001");
        manager.submit_manual("hello-world");
        drop(manager);

        let mut messages = Vec::new();
        let reported = pipeline
            .run(&mut events, |report| messages.push(report.outcome.to_string()))
            .await;

        assert_eq!(reported, 2);
        assert_eq!(
            messages,
            vec!["Added: Paracetamol 500mg", "Unknown barcode: hello-world"]
        );
    }
}
