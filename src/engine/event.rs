use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId, Reference, StepIndex};

/// How a single reference was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    TlbHit,
    Hit,
    Fault,
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, Self::Fault)
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TlbHit => f.write_str("TLB hit"),
            Self::Hit => f.write_str("Hit"),
            Self::Fault => f.write_str("Page fault"),
        }
    }
}

/// One resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub step_index: StepIndex,
    /// Value as it appeared in the reference stream
    pub reference: Reference,
    pub page_id: PageId,
    pub outcome: AccessOutcome,
    /// Frame that served or received the page
    pub frame_index: FrameId,
    /// Page evicted to make room, if the fault replaced one
    pub victim_page_id: Option<PageId>,
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}: page {} -> {} (frame {})",
            self.step_index + 1,
            self.page_id,
            self.outcome,
            self.frame_index
        )?;
        if let Some(victim) = self.victim_page_id {
            write!(f, ", evicted page {}", victim)?;
        }
        Ok(())
    }
}

/// Result of asking the engine to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Advanced(StepEvent),
    /// The stream was already exhausted; nothing changed
    AlreadyCompleted,
}

impl StepResult {
    pub fn event(&self) -> Option<&StepEvent> {
        match self {
            Self::Advanced(event) => Some(event),
            Self::AlreadyCompleted => None,
        }
    }
}

/// Receiver of step events (event logs, channels, renderers)
pub trait EventSink {
    fn record(&mut self, event: &StepEvent);
}

impl EventSink for Vec<StepEvent> {
    fn record(&mut self, event: &StepEvent) {
        self.push(*event);
    }
}

impl EventSink for crossbeam::channel::Sender<StepEvent> {
    fn record(&mut self, event: &StepEvent) {
        // a dropped receiver just stops listening
        let _ = self.send(*event);
    }
}
