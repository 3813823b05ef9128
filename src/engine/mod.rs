pub mod config;
pub mod error;
pub mod event;
pub mod paging_engine;
pub mod snapshot;
pub mod stats;

pub use config::{AddressingMode, MemoryLayout, SimulationConfig};
pub use error::{ConfigError, EngineError};
pub use event::{AccessOutcome, EventSink, StepEvent, StepResult};
pub use paging_engine::{EngineState, PagingEngine, SharedEngine};
pub use snapshot::EngineSnapshot;
pub use stats::Statistics;
