pub mod frame;
pub mod page_table;
pub mod tlb;
pub mod replacer;

pub use frame::Frame;
pub use page_table::{PageTable, PageTableEntry, PageTableRow};
pub use tlb::{Tlb, TlbEntry};
pub use replacer::ReplacementPolicy;
