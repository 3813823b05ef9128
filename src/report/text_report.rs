use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};

use crate::engine::config::{MemoryLayout, SimulationConfig};
use crate::engine::event::StepEvent;
use crate::engine::paging_engine::{EngineState, PagingEngine};
use crate::engine::snapshot::EngineSnapshot;
use crate::report::error::ReportError;
use crate::report::event_log::EventLog;

const TITLE: &str = "Paging Simulation Report";

/// Plain-text summary of a simulation: setup, memory state, statistics and
/// the full event log
#[derive(Debug, Clone)]
pub struct SimulationReport {
    config: SimulationConfig,
    snapshot: EngineSnapshot,
    log_lines: Vec<String>,
    last_event: Option<StepEvent>,
    generated_at: DateTime<Local>,
}

impl SimulationReport {
    pub fn new(engine: &PagingEngine, log: &EventLog) -> Result<Self, ReportError> {
        let config = engine.config().cloned().ok_or(ReportError::NotConfigured)?;
        Ok(Self {
            config,
            snapshot: engine.snapshot(),
            log_lines: log.lines(),
            last_event: log.last_event().copied(),
            generated_at: Local::now(),
        })
    }

    pub fn generated_at(mut self, timestamp: DateTime<Local>) -> Self {
        self.generated_at = timestamp;
        self
    }

    /// `paging-simulation-report-<date>.txt`
    pub fn default_file_name(date: NaiveDate) -> String {
        format!("paging-simulation-report-{}.txt", date.format("%Y-%m-%d"))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.render_into(&mut out);
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        fs::write(path, self.render())?;
        Ok(())
    }

    fn render_into(&self, out: &mut String) -> std::fmt::Result {
        let snapshot = &self.snapshot;
        let stats = &snapshot.stats;

        writeln!(out, "{}", TITLE)?;
        writeln!(out, "{}", "=".repeat(TITLE.len()))?;
        writeln!(out)?;
        writeln!(out, "Algorithm: {}", self.config.policy)?;
        writeln!(out, "Number of Frames: {}", snapshot.frames.len())?;
        if let MemoryLayout::Sized { memory_size, page_size } = self.config.layout {
            writeln!(out, "Memory Size: {} bytes (page size {})", memory_size, page_size)?;
            writeln!(out, "Addressing: {}", self.config.addressing)?;
        }
        let tlb_capacity = self
            .config
            .effective_tlb_capacity(snapshot.frames.len())
            .unwrap_or(0);
        writeln!(out, "TLB Capacity: {}", tlb_capacity)?;
        writeln!(out, "Reference String: {}", self.config.reference_string)?;
        writeln!(out)?;

        writeln!(out, "Memory Frames State")?;
        writeln!(out, "-------------------")?;
        for frame in &snapshot.frames {
            match frame.occupant() {
                Some(page) => writeln!(out, "  Frame {}: {}", frame.index(), page)?,
                None => writeln!(out, "  Frame {}: Free", frame.index())?,
            }
        }
        writeln!(out)?;

        writeln!(out, "Current Status")?;
        writeln!(out, "--------------")?;
        writeln!(out, "Step: {} of {}", snapshot.current_step, snapshot.total_steps)?;
        match &self.last_event {
            Some(event) => writeln!(out, "Processing: {}", event.reference)?,
            None => writeln!(out, "Processing: -")?,
        }
        writeln!(out, "Action: {}", self.action())?;
        writeln!(out)?;

        writeln!(out, "Statistics")?;
        writeln!(out, "----------")?;
        writeln!(out, "Page Faults: {}", stats.faults)?;
        writeln!(out, "Hits: {}", stats.hits)?;
        writeln!(out, "TLB Hits: {}", stats.tlb_hits)?;
        writeln!(out, "Replacements: {}", stats.replacements)?;
        writeln!(out, "Hit Ratio: {}%", percent(stats.hit_ratio()))?;
        writeln!(out, "Fragmentation: {}%", percent(stats.fragmentation))?;
        writeln!(out)?;

        writeln!(out, "Event Log")?;
        writeln!(out, "---------")?;
        for line in &self.log_lines {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        writeln!(out, "Report generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))
    }

    fn action(&self) -> String {
        match self.snapshot.state {
            EngineState::Completed => "Completed".to_string(),
            EngineState::Idle | EngineState::Ready => "Ready".to_string(),
            EngineState::Running => self
                .last_event
                .map_or_else(|| "Ready".to_string(), |event| event.outcome.to_string()),
        }
    }
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}
