//! Recent scan history.

use pharmascan_core::ParsedBarcode;
use pharmascan_core::constants::DEFAULT_HISTORY_CAPACITY;
use std::collections::VecDeque;

/// Most-recent-first list of classified scans, bounded to `capacity`.
///
/// ```
/// use pharmascan_gs1::FormatClassifier;
/// use pharmascan_pos::ScanHistory;
///
/// let mut history = ScanHistory::new(2);
/// history.record(FormatClassifier::classify("8851234567890"));
/// history.record(FormatClassifier::classify("hello-world"));
/// history.record(FormatClassifier::classify("885123456789"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.latest().unwrap().raw_text(), "885123456789");
/// ```
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ParsedBarcode>,
    capacity: usize,
}

impl ScanHistory {
    /// Create an empty history. A capacity of `0` is raised to `1`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a scan, evicting the oldest entry when full.
    pub fn record(&mut self, scan: ParsedBarcode) {
        self.entries.push_front(scan);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&ParsedBarcode> {
        self.entries.front()
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedBarcode> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
