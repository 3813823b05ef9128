use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId};

/// Residency metadata for a single page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTableEntry {
    /// Frame holding the page while it is valid
    pub frame: Option<FrameId>,
    /// Page is present in memory
    pub valid: bool,
    /// Page was touched at least once
    pub referenced: bool,
    /// Reserved; no current policy writes pages
    pub modified: bool,
}

/// Page table row as exposed in snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTableRow {
    pub page_id: PageId,
    pub entry: PageTableEntry,
}

/// Page id -> entry mapping. Entries are created on first use and never
/// removed; eviction only clears `valid` and `frame`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTable {
    entries: BTreeMap<PageId, PageTableEntry>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-populated with invalid entries for pages `0..page_count`
    pub fn with_pages(page_count: usize) -> Self {
        let entries = (0..page_count as PageId)
            .map(|page_id| (page_id, PageTableEntry::default()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, page_id: PageId) -> Option<&PageTableEntry> {
        self.entries.get(&page_id)
    }

    /// Frame holding `page_id`, if the page is resident
    pub fn resident_frame(&self, page_id: PageId) -> Option<FrameId> {
        self.entries
            .get(&page_id)
            .filter(|entry| entry.valid)
            .and_then(|entry| entry.frame)
    }

    pub(crate) fn mark_referenced(&mut self, page_id: PageId) {
        self.entries.entry(page_id).or_default().referenced = true;
    }

    /// Record that `page_id` now lives in `frame`
    pub(crate) fn map(&mut self, page_id: PageId, frame: FrameId) {
        let entry = self.entries.entry(page_id).or_default();
        entry.frame = Some(frame);
        entry.valid = true;
        entry.referenced = true;
    }

    /// Drop residency for an evicted page, keeping the entry for reuse
    pub(crate) fn invalidate(&mut self, page_id: PageId) {
        if let Some(entry) = self.entries.get_mut(&page_id) {
            entry.frame = None;
            entry.valid = false;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.valid).count()
    }

    /// Entries in ascending page id order
    pub fn rows(&self) -> Vec<PageTableRow> {
        self.entries
            .iter()
            .map(|(&page_id, &entry)| PageTableRow { page_id, entry })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_and_invalidate() {
        let mut table = PageTable::new();
        table.map(3, 1);
        assert_eq!(table.resident_frame(3), Some(1));

        table.invalidate(3);
        let entry = table.get(3).unwrap();
        assert!(!entry.valid);
        assert_eq!(entry.frame, None);
        // referenced survives eviction
        assert!(entry.referenced);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_with_pages_prepopulates_invalid_entries() {
        let table = PageTable::with_pages(4);
        assert_eq!(table.len(), 4);
        assert_eq!(table.valid_count(), 0);
        assert!(table.rows().iter().all(|row| !row.entry.referenced));
    }

    #[test]
    fn test_unknown_page_is_not_resident() {
        let table = PageTable::new();
        assert_eq!(table.resident_frame(42), None);
        assert!(table.get(42).is_none());
    }
}
