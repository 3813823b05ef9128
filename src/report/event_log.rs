// Event Log
//
// Human-readable trace of a simulation, one numbered entry per message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::types::StepIndex;
use crate::engine::event::{AccessOutcome, EventSink, StepEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Hit,
    Fault,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 1-based step number shown to the user
    pub step: usize,
    pub kind: LogKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Step {}] {}", self.step, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    last_event: Option<StepEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message attributed to the reference at `step`
    pub fn note(&mut self, step: StepIndex, kind: LogKind, message: impl Into<String>) {
        self.entries.push(LogEntry {
            step: step + 1,
            kind,
            message: message.into(),
        });
    }

    pub fn info(&mut self, step: StepIndex, message: impl Into<String>) {
        self.note(step, LogKind::Info, message);
    }

    pub fn warning(&mut self, step: StepIndex, message: impl Into<String>) {
        self.note(step, LogKind::Warning, message);
    }

    pub fn error(&mut self, step: StepIndex, message: impl Into<String>) {
        self.note(step, LogKind::Error, message);
    }

    /// Drop every entry, leaving a single "Log cleared" marker
    pub fn clear(&mut self, step: StepIndex) {
        self.entries.clear();
        self.last_event = None;
        self.info(step, "Log cleared");
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent step event seen by this log
    pub fn last_event(&self) -> Option<&StepEvent> {
        self.last_event.as_ref()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(LogEntry::to_string).collect()
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: &StepEvent) {
        let step = event.step_index;
        let page = event.page_id;
        let frame = event.frame_index;

        if event.reference == page {
            self.info(step, format!("Processing reference: {}", event.reference));
        } else {
            self.info(
                step,
                format!("Processing reference: {} (page {})", event.reference, page),
            );
        }

        let (kind, message) = match (event.outcome, event.victim_page_id) {
            (AccessOutcome::TlbHit, _) => (
                LogKind::Hit,
                format!("TLB hit: {} found in Frame {}", page, frame),
            ),
            (AccessOutcome::Hit, _) => {
                (LogKind::Hit, format!("Hit: {} found in Frame {}", page, frame))
            }
            (AccessOutcome::Fault, None) => (
                LogKind::Fault,
                format!("Fault: {} added to Frame {}", page, frame),
            ),
            (AccessOutcome::Fault, Some(victim)) => (
                LogKind::Fault,
                format!("Fault: {} replaced {} in Frame {}", page, victim, frame),
            ),
        };
        self.note(step, kind, message);
        self.last_event = Some(*event);
    }
}
