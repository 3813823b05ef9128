use crate::common::types::{FrameId, PageId, StepIndex};
use crate::memory::frame::Frame;
use crate::memory::page_table::PageTable;

use super::resident_pages;

/// Frame whose occupant was least recently used.
///
/// A page's last use is its latest position in `history[..current_step]`.
/// A resident page with no recorded use sorts before every used page.
pub(super) fn select_victim(
    frames: &[Frame],
    page_table: &PageTable,
    history: &[PageId],
    current_step: StepIndex,
) -> Option<FrameId> {
    let past = &history[..current_step.min(history.len())];
    let mut victim: Option<(FrameId, Option<usize>)> = None;

    for (frame, page_id) in resident_pages(frames, page_table) {
        let last_use = past.iter().rposition(|&page| page == page_id);
        match victim {
            Some((_, oldest)) if last_use >= oldest => {}
            _ => victim = Some((frame.index(), last_use)),
        }
    }

    victim.map(|(index, _)| index)
}
