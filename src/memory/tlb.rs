use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId};

/// TLB mapping as exposed in snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlbEntry {
    pub page_id: PageId,
    pub frame: FrameId,
}

/// Bounded page -> frame cache evicted in insertion order.
///
/// Lookups never reorder entries. A capacity of zero disables the cache.
#[derive(Debug, Clone)]
pub struct Tlb {
    capacity: usize,
    entries: LinkedHashMap<PageId, FrameId>,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: LinkedHashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, page_id: PageId) -> Option<FrameId> {
        self.entries.get(&page_id).copied()
    }

    /// Cache a translation, returning the page evicted to make room
    pub fn insert(&mut self, page_id: PageId, frame: FrameId) -> Option<PageId> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(existing) = self.entries.get_mut(&page_id) {
            *existing = frame;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front().map(|(page, _)| page)
        } else {
            None
        };

        self.entries.insert(page_id, frame);
        evicted
    }

    pub fn remove(&mut self, page_id: PageId) -> Option<FrameId> {
        self.entries.remove(&page_id)
    }

    /// Entries from oldest to newest
    pub fn entries(&self) -> Vec<TlbEntry> {
        self.entries
            .iter()
            .map(|(&page_id, &frame)| TlbEntry { page_id, frame })
            .collect()
    }
}

impl PartialEq for Tlb {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.entries() == other.entries()
    }
}
