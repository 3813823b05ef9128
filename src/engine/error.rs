use thiserror::Error;

use crate::common::types::PageId;

/// Invalid simulation configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NonPositiveSize(&'static str),
    #[error("Memory size {memory_size} with page size {page_size} yields no frames")]
    ZeroFrames { memory_size: usize, page_size: usize },
    #[error("{what} {value} exceeds the limit of {max}")]
    TooLarge { what: &'static str, value: usize, max: usize },
    #[error("TLB capacity {capacity} exceeds frame count {frames}")]
    TlbCapacityTooLarge { capacity: usize, frames: usize },
    #[error("Byte addressing requires a memory size and page size")]
    ByteAddressingWithoutPageSize,
    #[error("Reference string contains no valid references")]
    EmptyReferenceStream,
    #[error("Page {page_id} is outside the process address space of {page_count} pages")]
    PageOutOfRange { page_id: PageId, page_count: usize },
    #[error("Unknown replacement policy: {0}")]
    UnknownPolicy(String),
    #[error("Unknown addressing mode: {0}")]
    UnknownAddressingMode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Engine has not been initialized")]
    NotReady,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
