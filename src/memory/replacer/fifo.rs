use crate::common::types::FrameId;
use crate::memory::frame::Frame;
use crate::memory::page_table::PageTable;

use super::resident_pages;

/// Oldest-loaded frame; the first one wins on equal load steps
pub(super) fn select_victim(frames: &[Frame], page_table: &PageTable) -> Option<FrameId> {
    let mut victim: Option<(FrameId, usize)> = None;

    for (frame, _) in resident_pages(frames, page_table) {
        let loaded_at = frame.loaded_at_step().unwrap_or(0);
        match victim {
            Some((_, oldest)) if loaded_at >= oldest => {}
            _ => victim = Some((frame.index(), loaded_at)),
        }
    }

    victim.map(|(index, _)| index)
}
