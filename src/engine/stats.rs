use serde::{Deserialize, Serialize};

/// Access counters for one simulation run.
///
/// Ratios are exact; rounding is left to whoever displays them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Accesses resolved without a fault (includes TLB hits)
    pub hits: u64,
    pub faults: u64,
    /// Hits served directly from the TLB
    pub tlb_hits: u64,
    /// Faults that had to evict a resident page
    pub replacements: u64,
    /// Fraction of memory not held by any resident page
    pub fragmentation: f64,
}

impl Statistics {
    pub fn new(fragmentation: f64) -> Self {
        Self {
            fragmentation,
            ..Self::default()
        }
    }

    pub fn accesses(&self) -> u64 {
        self.hits + self.faults
    }

    pub fn hit_ratio(&self) -> f64 {
        ratio(self.hits, self.accesses())
    }

    pub fn fault_ratio(&self) -> f64 {
        ratio(self.faults, self.accesses())
    }

    pub fn tlb_hit_ratio(&self) -> f64 {
        ratio(self.tlb_hits, self.accesses())
    }

    pub(crate) fn record_tlb_hit(&mut self) {
        self.hits += 1;
        self.tlb_hits += 1;
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_fault(&mut self, replaced: bool) {
        self.faults += 1;
        if replaced {
            self.replacements += 1;
        }
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
