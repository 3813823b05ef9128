use crate::common::types::{FrameId, PageId, StepIndex};
use crate::memory::frame::Frame;
use crate::memory::page_table::PageTable;

use super::resident_pages;

/// Belady's optimal choice: a page never referenced again, else the page
/// whose next reference is furthest away.
///
/// Scans `history[current_step..]` once per resident page.
pub(super) fn select_victim(
    frames: &[Frame],
    page_table: &PageTable,
    history: &[PageId],
    current_step: StepIndex,
) -> Option<FrameId> {
    let future = history.get(current_step..).unwrap_or(&[]);
    let mut victim: Option<(FrameId, usize)> = None;

    for (frame, page_id) in resident_pages(frames, page_table) {
        let next_use = match future.iter().position(|&page| page == page_id) {
            Some(offset) => offset,
            // never used again
            None => return Some(frame.index()),
        };

        match victim {
            Some((_, furthest)) if next_use <= furthest => {}
            _ => victim = Some((frame.index(), next_use)),
        }
    }

    victim.map(|(index, _)| index)
}
