/// Page identifier type
pub type PageId = u64;

/// Physical frame index type
pub type FrameId = usize;

/// Position in the reference stream (0-based)
pub type StepIndex = usize;

/// Raw value read from the reference stream: a page id or a byte address,
/// depending on the addressing mode
pub type Reference = u64;

/// Default number of TLB entries when none is configured
pub const DEFAULT_TLB_CAPACITY: usize = 4;

/// Reference string used when no other input is supplied
pub const DEFAULT_REFERENCE_STRING: &str = "1,2,3,4,1,2,5,1,2,3,4,5";

/// Upper bound on physical frames a simulation may allocate
pub const MAX_FRAMES: usize = 1 << 20;

/// Upper bound on a pre-populated process address space, in pages
pub const MAX_PROCESS_PAGES: usize = 1 << 20;
