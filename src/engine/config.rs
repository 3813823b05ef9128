use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::types::{
    PageId, Reference, DEFAULT_REFERENCE_STRING, DEFAULT_TLB_CAPACITY, MAX_FRAMES,
    MAX_PROCESS_PAGES,
};
use crate::engine::error::ConfigError;
use crate::memory::replacer::ReplacementPolicy;

/// How physical memory is described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLayout {
    /// A bare frame count; each frame counts as one unit of memory
    Frames { count: usize },
    /// Total memory and page size in bytes; frames = memory_size / page_size
    Sized { memory_size: usize, page_size: usize },
}

/// How reference values map to pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Each reference is a page id
    #[default]
    PageId,
    /// Each reference is a byte address; page = address / page_size
    ByteAddress,
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageId => f.write_str("page"),
            Self::ByteAddress => f.write_str("byte"),
        }
    }
}

impl FromStr for AddressingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" | "page_id" | "page-id" => Ok(Self::PageId),
            "byte" | "byte_address" | "byte-address" => Ok(Self::ByteAddress),
            other => Err(ConfigError::UnknownAddressingMode(other.to_string())),
        }
    }
}

/// Everything needed to (re)initialize a paging engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub layout: MemoryLayout,
    #[serde(default)]
    pub addressing: AddressingMode,
    /// Bound on the process's page ids; pre-populates the page table
    #[serde(default)]
    pub process_page_count: Option<usize>,
    #[serde(default)]
    pub policy: ReplacementPolicy,
    /// Defaults to `min(4, frame_count)`
    #[serde(default)]
    pub tlb_capacity: Option<usize>,
    pub reference_string: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            layout: MemoryLayout::Frames { count: 3 },
            addressing: AddressingMode::PageId,
            process_page_count: None,
            policy: ReplacementPolicy::Fifo,
            tlb_capacity: None,
            reference_string: DEFAULT_REFERENCE_STRING.to_string(),
        }
    }
}

impl SimulationConfig {
    /// Configuration with an explicit frame count
    pub fn with_frames(count: usize, policy: ReplacementPolicy, references: &str) -> Self {
        Self {
            layout: MemoryLayout::Frames { count },
            policy,
            reference_string: references.to_string(),
            ..Self::default()
        }
    }

    /// Configuration derived from memory and page sizes in bytes
    pub fn with_memory(
        memory_size: usize,
        page_size: usize,
        policy: ReplacementPolicy,
        references: &str,
    ) -> Self {
        Self {
            layout: MemoryLayout::Sized { memory_size, page_size },
            policy,
            reference_string: references.to_string(),
            ..Self::default()
        }
    }

    pub fn addressing(mut self, mode: AddressingMode) -> Self {
        self.addressing = mode;
        self
    }

    pub fn tlb_capacity(mut self, capacity: usize) -> Self {
        self.tlb_capacity = Some(capacity);
        self
    }

    pub fn process_pages(mut self, count: usize) -> Self {
        self.process_page_count = Some(count);
        self
    }

    /// Check sizes and derive the frame geometry
    pub fn geometry(&self) -> Result<MemoryGeometry, ConfigError> {
        let geometry = match self.layout {
            MemoryLayout::Frames { count } => {
                if count == 0 {
                    return Err(ConfigError::NonPositiveSize("frame count"));
                }
                if self.addressing == AddressingMode::ByteAddress {
                    return Err(ConfigError::ByteAddressingWithoutPageSize);
                }
                MemoryGeometry {
                    frame_count: count,
                    page_size: 1,
                    memory_size: count,
                }
            }
            MemoryLayout::Sized { memory_size, page_size } => {
                if memory_size == 0 {
                    return Err(ConfigError::NonPositiveSize("memory size"));
                }
                if page_size == 0 {
                    return Err(ConfigError::NonPositiveSize("page size"));
                }
                let frame_count = memory_size / page_size;
                if frame_count == 0 {
                    return Err(ConfigError::ZeroFrames { memory_size, page_size });
                }
                MemoryGeometry {
                    frame_count,
                    page_size,
                    memory_size,
                }
            }
        };

        if geometry.frame_count > MAX_FRAMES {
            return Err(ConfigError::TooLarge {
                what: "frame count",
                value: geometry.frame_count,
                max: MAX_FRAMES,
            });
        }

        match self.process_page_count {
            Some(0) => return Err(ConfigError::NonPositiveSize("process page count")),
            Some(count) if count > MAX_PROCESS_PAGES => {
                return Err(ConfigError::TooLarge {
                    what: "process page count",
                    value: count,
                    max: MAX_PROCESS_PAGES,
                });
            }
            _ => {}
        }

        Ok(geometry)
    }

    /// Configured TLB capacity, checked against the frame count
    pub fn effective_tlb_capacity(&self, frame_count: usize) -> Result<usize, ConfigError> {
        match self.tlb_capacity {
            None => Ok(DEFAULT_TLB_CAPACITY.min(frame_count)),
            Some(capacity) if capacity > frame_count => Err(ConfigError::TlbCapacityTooLarge {
                capacity,
                frames: frame_count,
            }),
            Some(capacity) => Ok(capacity),
        }
    }
}

/// Frame layout derived from a validated configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryGeometry {
    pub frame_count: usize,
    pub page_size: usize,
    pub memory_size: usize,
}

impl MemoryGeometry {
    /// Fraction of memory not held by any resident page
    pub fn fragmentation(&self, free_frames: usize) -> f64 {
        (free_frames * self.page_size) as f64 / self.memory_size as f64
    }

    pub fn page_of(&self, reference: Reference, mode: AddressingMode) -> PageId {
        match mode {
            AddressingMode::PageId => reference,
            AddressingMode::ByteAddress => reference / self.page_size as u64,
        }
    }
}
