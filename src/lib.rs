// Pagesim: demand-paging simulation engine

pub mod common;
pub mod engine;
pub mod memory;
pub mod playback;
pub mod reference;
pub mod report;

// Re-export key items for convenient access
pub use engine::{
    AccessOutcome, AddressingMode, ConfigError, EngineError, EngineSnapshot, EngineState, EventSink,
    MemoryLayout, PagingEngine, SharedEngine, SimulationConfig, Statistics, StepEvent, StepResult,
};
pub use memory::ReplacementPolicy;
pub use playback::{Playback, PlaybackCommand, PlaybackHandle, PlaybackOutcome, PlaybackSummary};
pub use reference::ReferenceStream;
pub use report::{EventLog, ReportError, SimulationReport};
