use serde::{Deserialize, Serialize};

use crate::common::types::{PageId, StepIndex};
use crate::engine::paging_engine::EngineState;
use crate::engine::stats::Statistics;
use crate::memory::frame::Frame;
use crate::memory::page_table::PageTableRow;
use crate::memory::replacer::ReplacementPolicy;
use crate::memory::tlb::TlbEntry;

/// Point-in-time copy of engine state for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub policy: Option<ReplacementPolicy>,
    pub frames: Vec<Frame>,
    /// Ascending by page id
    pub page_table: Vec<PageTableRow>,
    /// Oldest entry first
    pub tlb: Vec<TlbEntry>,
    pub stats: Statistics,
    pub current_step: StepIndex,
    pub total_steps: usize,
    pub completed: bool,
}

impl EngineSnapshot {
    /// Snapshot of an engine that has not been initialized
    pub fn idle() -> Self {
        Self {
            state: EngineState::Idle,
            policy: None,
            frames: Vec::new(),
            page_table: Vec::new(),
            tlb: Vec::new(),
            stats: Statistics::default(),
            current_step: 0,
            total_steps: 0,
            completed: false,
        }
    }

    /// Occupant of every frame, in frame order
    pub fn occupancy(&self) -> Vec<Option<PageId>> {
        self.frames.iter().map(Frame::occupant).collect()
    }

    pub fn free_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_free()).count()
    }
}
