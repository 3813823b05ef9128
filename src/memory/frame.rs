use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId, StepIndex};

/// Fixed-size slot of simulated physical memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    index: FrameId,
    occupant: Option<PageId>,
    loaded_at_step: Option<StepIndex>,
}

impl Frame {
    pub fn new(index: FrameId) -> Self {
        Self {
            index,
            occupant: None,
            loaded_at_step: None,
        }
    }

    pub fn index(&self) -> FrameId {
        self.index
    }

    pub fn occupant(&self) -> Option<PageId> {
        self.occupant
    }

    /// Step at which the current occupant was loaded
    pub fn loaded_at_step(&self) -> Option<StepIndex> {
        self.loaded_at_step
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Place `page_id` in this frame, returning the page it displaced
    pub(crate) fn load(&mut self, page_id: PageId, step: StepIndex) -> Option<PageId> {
        self.loaded_at_step = Some(step);
        self.occupant.replace(page_id)
    }
}

/// Build `count` empty frames indexed from zero
pub(crate) fn allocate_frames(count: usize) -> Vec<Frame> {
    (0..count).map(Frame::new).collect()
}
