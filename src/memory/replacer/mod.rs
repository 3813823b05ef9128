mod fifo;
mod lru;
mod optimal;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId, StepIndex};
use crate::engine::error::ConfigError;
use crate::memory::frame::Frame;
use crate::memory::page_table::PageTable;

/// Page replacement policy, consulted only when every frame is occupied.
///
/// Victim selection is a pure function of frame occupancy, the page table,
/// the page history and the current step; identical inputs always yield the
/// same frame. Ties go to the lowest frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    /// Evict the page that has been resident longest
    #[default]
    Fifo,
    /// Evict the page whose last use is oldest
    Lru,
    /// Evict the page used furthest in the future (needs the whole stream)
    Optimal,
}

impl ReplacementPolicy {
    pub const ALL: [ReplacementPolicy; 3] = [Self::Fifo, Self::Lru, Self::Optimal];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Lru => "LRU",
            Self::Optimal => "OPTIMAL",
        }
    }

    /// Choose the frame to evict. Returns `None` only if no frame holds a
    /// valid page.
    pub fn select_victim(
        &self,
        frames: &[Frame],
        page_table: &PageTable,
        history: &[PageId],
        current_step: StepIndex,
    ) -> Option<FrameId> {
        match self {
            Self::Fifo => fifo::select_victim(frames, page_table),
            Self::Lru => lru::select_victim(frames, page_table, history, current_step),
            Self::Optimal => optimal::select_victim(frames, page_table, history, current_step),
        }
    }
}

/// Frames whose occupant is a valid page mapped to that frame, in ascending
/// frame order
fn resident_pages<'a>(
    frames: &'a [Frame],
    page_table: &'a PageTable,
) -> impl Iterator<Item = (&'a Frame, PageId)> + 'a {
    frames.iter().filter_map(move |frame| {
        let page_id = frame.occupant()?;
        (page_table.resident_frame(page_id) == Some(frame.index())).then_some((frame, page_id))
    })
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            "optimal" | "opt" => Ok(Self::Optimal),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}
