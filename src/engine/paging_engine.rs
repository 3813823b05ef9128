use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::common::types::{FrameId, PageId, StepIndex};
use crate::engine::config::{MemoryGeometry, SimulationConfig};
use crate::engine::error::{ConfigError, EngineError};
use crate::engine::event::{AccessOutcome, StepEvent, StepResult};
use crate::engine::snapshot::EngineSnapshot;
use crate::engine::stats::Statistics;
use crate::memory::frame::{allocate_frames, Frame};
use crate::memory::page_table::PageTable;
use crate::memory::replacer::ReplacementPolicy;
use crate::memory::tlb::Tlb;
use crate::reference::ReferenceStream;

/// Engine handle for callers that step from one thread and read snapshots
/// from another. The lock is the only synchronization the engine relies on.
pub type SharedEngine = Arc<Mutex<PagingEngine>>;

/// Lifecycle of a paging engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No successful initialization yet
    Idle,
    /// Configured, no reference resolved
    Ready,
    /// Some references resolved
    Running,
    /// Every reference resolved
    Completed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// Aggregate simulation state built from one configuration
#[derive(Debug, Clone)]
struct SimulationState {
    geometry: MemoryGeometry,
    policy: ReplacementPolicy,
    frames: Vec<Frame>,
    page_table: PageTable,
    tlb: Tlb,
    stats: Statistics,
    stream: ReferenceStream,
    /// Page id of every reference, in stream order
    pages: Vec<PageId>,
    current_step: StepIndex,
}

impl SimulationState {
    fn build(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let tlb_capacity = config.effective_tlb_capacity(geometry.frame_count)?;
        let stream = ReferenceStream::parse(&config.reference_string)?;

        let pages: Vec<PageId> = stream
            .iter()
            .map(|reference| geometry.page_of(reference, config.addressing))
            .collect();

        let page_table = match config.process_page_count {
            Some(page_count) => {
                if let Some(&page_id) = pages.iter().find(|&&page| page >= page_count as PageId) {
                    return Err(ConfigError::PageOutOfRange { page_id, page_count });
                }
                PageTable::with_pages(page_count)
            }
            None => PageTable::new(),
        };

        Ok(Self {
            geometry,
            policy: config.policy,
            frames: allocate_frames(geometry.frame_count),
            page_table,
            tlb: Tlb::new(tlb_capacity),
            stats: Statistics::new(geometry.fragmentation(geometry.frame_count)),
            stream,
            pages,
            current_step: 0,
        })
    }

    fn is_complete(&self) -> bool {
        self.current_step >= self.pages.len()
    }

    fn free_frame(&self) -> Option<FrameId> {
        self.frames.iter().find(|frame| frame.is_free()).map(Frame::index)
    }

    fn free_frame_count(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_free()).count()
    }

    /// Resolve the reference at `current_step`. Victim selection runs before
    /// anything is modified, so an error leaves the state untouched.
    fn resolve_next(&mut self) -> Result<StepEvent, EngineError> {
        let step = self.current_step;
        let page_id = self.pages[step];
        let reference = self.stream.get(step).unwrap_or(page_id);

        let (outcome, frame_index, victim_page_id) = if let Some(frame) = self.tlb.lookup(page_id) {
            self.page_table.mark_referenced(page_id);
            self.stats.record_tlb_hit();
            (AccessOutcome::TlbHit, frame, None)
        } else if let Some(frame) = self.page_table.resident_frame(page_id) {
            self.page_table.mark_referenced(page_id);
            self.stats.record_hit();
            self.tlb.insert(page_id, frame);
            (AccessOutcome::Hit, frame, None)
        } else {
            let (frame, victim) = self.choose_frame(step)?;

            if let Some(victim) = victim {
                self.page_table.invalidate(victim);
                self.tlb.remove(victim);
            }

            self.frames[frame].load(page_id, step);
            self.page_table.map(page_id, frame);
            self.tlb.insert(page_id, frame);
            self.stats.record_fault(victim.is_some());
            (AccessOutcome::Fault, frame, victim)
        };

        self.stats.fragmentation = self.geometry.fragmentation(self.free_frame_count());
        self.current_step += 1;

        Ok(StepEvent {
            step_index: step,
            reference,
            page_id,
            outcome,
            frame_index,
            victim_page_id,
        })
    }

    /// Frame to receive a faulting page, and the page it currently holds
    fn choose_frame(&self, step: StepIndex) -> Result<(FrameId, Option<PageId>), EngineError> {
        if let Some(frame) = self.free_frame() {
            return Ok((frame, None));
        }

        let victim = self
            .policy
            .select_victim(&self.frames, &self.page_table, &self.pages, step)
            .ok_or_else(|| {
                EngineError::InvalidOperation(format!(
                    "{} found no resident page to evict at step {}",
                    self.policy, step
                ))
            })?;

        let evicted = self.frames[victim].occupant();
        debug!(
            "{} selected frame {} (page {:?}) as victim at step {}",
            self.policy, victim, evicted, step
        );
        Ok((victim, evicted))
    }
}

/// Demand-paging simulator advanced one reference at a time.
///
/// The engine is synchronous and has no interior locking: a `step` either
/// resolves exactly one reference or changes nothing.
#[derive(Debug, Clone, Default)]
pub struct PagingEngine {
    config: Option<SimulationConfig>,
    simulation: Option<SimulationState>,
}

impl PagingEngine {
    /// Create an engine in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and initialize an engine in one go
    pub fn with_config(config: SimulationConfig) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        engine.initialize(config)?;
        Ok(engine)
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Build fresh frames, page table, TLB and statistics from `config`.
    ///
    /// On error the engine is left `Idle`; the previously applied
    /// configuration is kept for `reset`.
    pub fn initialize(&mut self, config: SimulationConfig) -> Result<(), EngineError> {
        self.simulation = None;
        let simulation = SimulationState::build(&config)?;

        info!(
            "Initialized {} simulation: {} frames, TLB capacity {}, {} references",
            simulation.policy,
            simulation.frames.len(),
            simulation.tlb.capacity(),
            simulation.pages.len()
        );

        self.simulation = Some(simulation);
        self.config = Some(config);
        Ok(())
    }

    /// Re-initialize with the last applied configuration
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let config = self.config.clone().ok_or(EngineError::NotReady)?;
        info!("Resetting simulation");
        self.initialize(config)
    }

    /// Resolve the next reference
    pub fn step(&mut self) -> Result<StepResult, EngineError> {
        let simulation = self.simulation.as_mut().ok_or(EngineError::NotReady)?;

        if simulation.is_complete() {
            debug!("Step requested after completion");
            return Ok(StepResult::AlreadyCompleted);
        }

        let event = simulation.resolve_next()?;
        debug!("{}", event);

        if simulation.is_complete() {
            info!(
                "Simulation completed: {} faults, {} hits",
                simulation.stats.faults, simulation.stats.hits
            );
        }

        Ok(StepResult::Advanced(event))
    }

    /// Drain every remaining reference without pausing between steps
    pub fn run_to_completion(&mut self) -> Result<Vec<StepEvent>, EngineError> {
        let mut events = Vec::with_capacity(self.total_steps().saturating_sub(self.current_step()));
        while let StepResult::Advanced(event) = self.step()? {
            events.push(event);
        }
        Ok(events)
    }

    pub fn state(&self) -> EngineState {
        match &self.simulation {
            None => EngineState::Idle,
            Some(sim) if sim.is_complete() => EngineState::Completed,
            Some(sim) if sim.current_step == 0 => EngineState::Ready,
            Some(_) => EngineState::Running,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state() == EngineState::Completed
    }

    /// Last successfully applied configuration
    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    pub fn policy(&self) -> Option<ReplacementPolicy> {
        self.simulation.as_ref().map(|sim| sim.policy)
    }

    pub fn geometry(&self) -> Option<MemoryGeometry> {
        self.simulation.as_ref().map(|sim| sim.geometry)
    }

    pub fn current_step(&self) -> StepIndex {
        self.simulation.as_ref().map_or(0, |sim| sim.current_step)
    }

    pub fn total_steps(&self) -> usize {
        self.simulation.as_ref().map_or(0, |sim| sim.pages.len())
    }

    pub fn stats(&self) -> Statistics {
        self.simulation
            .as_ref()
            .map_or_else(Statistics::default, |sim| sim.stats)
    }

    pub fn frames(&self) -> &[Frame] {
        match &self.simulation {
            Some(sim) => &sim.frames,
            None => &[],
        }
    }

    pub fn page_table(&self) -> Option<&PageTable> {
        self.simulation.as_ref().map(|sim| &sim.page_table)
    }

    pub fn tlb(&self) -> Option<&Tlb> {
        self.simulation.as_ref().map(|sim| &sim.tlb)
    }

    pub fn reference_stream(&self) -> Option<&ReferenceStream> {
        self.simulation.as_ref().map(|sim| &sim.stream)
    }

    /// Page id of the next reference to resolve
    pub fn next_page(&self) -> Option<PageId> {
        self.simulation
            .as_ref()
            .and_then(|sim| sim.pages.get(sim.current_step).copied())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let Some(sim) = &self.simulation else {
            return EngineSnapshot::idle();
        };

        EngineSnapshot {
            state: self.state(),
            policy: Some(sim.policy),
            frames: sim.frames.clone(),
            page_table: sim.page_table.rows(),
            tlb: sim.tlb.entries(),
            stats: sim.stats,
            current_step: sim.current_step,
            total_steps: sim.pages.len(),
            completed: sim.is_complete(),
        }
    }
}
