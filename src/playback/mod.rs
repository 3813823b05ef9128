// Playback
//
// Caller-driven scheduling loop for continuous simulation. The engine never
// sleeps or spawns; playback decides when the next step happens and listens
// for pause/resume/stop commands between steps.

pub mod player;

pub use player::{Playback, PlaybackCommand, PlaybackHandle, PlaybackOutcome, PlaybackSummary};
