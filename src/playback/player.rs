use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, info};

use crate::engine::error::EngineError;
use crate::engine::event::{EventSink, StepEvent, StepResult};
use crate::engine::paging_engine::{PagingEngine, SharedEngine};

/// Delay used by interactive playback
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(800);

/// Control messages accepted between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause,
    Resume,
    Stop,
    SetDelay(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The reference stream was exhausted
    Completed,
    /// A `Stop` command arrived, or the controller went away while paused
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub outcome: PlaybackOutcome,
    /// Steps resolved by this playback session
    pub steps: usize,
}

/// Drives repeated `step()` calls with a delay between them.
///
/// A zero delay is instant mode: the remaining references are drained in a
/// tight loop, still checking for commands between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    delay: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::with_delay(DEFAULT_STEP_DELAY)
    }
}

#[derive(Debug, Default)]
struct ControlState {
    paused: bool,
    stopped: bool,
}

impl ControlState {
    fn apply(&mut self, command: PlaybackCommand, delay: &mut Duration) {
        debug!("Playback command: {:?}", command);
        match command {
            PlaybackCommand::Pause => self.paused = true,
            PlaybackCommand::Resume => self.paused = false,
            PlaybackCommand::Stop => self.stopped = true,
            PlaybackCommand::SetDelay(new_delay) => *delay = new_delay,
        }
    }
}

impl Playback {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn instant() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    /// Play `engine` on the current thread until completion or `Stop`
    pub fn run(
        &self,
        engine: &mut PagingEngine,
        sink: &mut dyn EventSink,
        control: &Receiver<PlaybackCommand>,
    ) -> Result<PlaybackSummary, EngineError> {
        self.drive(
            || {
                let result = engine.step()?;
                Ok((result, engine.is_completed()))
            },
            sink,
            control,
        )
    }

    /// Play a shared engine on a background thread.
    ///
    /// The engine lock is held for one step at a time, so other threads can
    /// take snapshots while playback is running or paused.
    pub fn spawn(self, engine: SharedEngine) -> PlaybackHandle {
        let (control_tx, control_rx) = channel::unbounded();
        let (event_tx, event_rx) = channel::unbounded();

        let thread = thread::spawn(move || {
            let mut sink = event_tx;
            self.drive(
                || {
                    let mut engine = engine.lock();
                    let result = engine.step()?;
                    Ok((result, engine.is_completed()))
                },
                &mut sink,
                &control_rx,
            )
        });

        PlaybackHandle {
            control: control_tx,
            events: event_rx,
            thread,
        }
    }

    fn drive<F>(
        &self,
        mut step: F,
        sink: &mut dyn EventSink,
        control: &Receiver<PlaybackCommand>,
    ) -> Result<PlaybackSummary, EngineError>
    where
        F: FnMut() -> Result<(StepResult, bool), EngineError>,
    {
        let mut delay = self.delay;
        let mut state = ControlState::default();
        let mut steps = 0;

        info!("Playback started with {:?} between steps", delay);

        loop {
            loop {
                match control.try_recv() {
                    Ok(command) => state.apply(command, &mut delay),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }

            if state.stopped {
                info!("Playback stopped after {} steps", steps);
                return Ok(PlaybackSummary { outcome: PlaybackOutcome::Stopped, steps });
            }

            if state.paused {
                match control.recv() {
                    Ok(command) => state.apply(command, &mut delay),
                    // nobody left to resume us
                    Err(_) => state.stopped = true,
                }
                continue;
            }

            let (result, finished) = step()?;
            if let StepResult::Advanced(event) = result {
                sink.record(&event);
                steps += 1;
            }

            if finished {
                info!("Playback completed after {} steps", steps);
                return Ok(PlaybackSummary { outcome: PlaybackOutcome::Completed, steps });
            }

            if !delay.is_zero() {
                match control.recv_timeout(delay) {
                    Ok(command) => state.apply(command, &mut delay),
                    Err(RecvTimeoutError::Timeout) => {}
                    // no controller: keep pacing without one
                    Err(RecvTimeoutError::Disconnected) => thread::sleep(delay),
                }
            }
        }
    }
}

/// Controller for a playback running on a background thread
#[derive(Debug)]
pub struct PlaybackHandle {
    control: Sender<PlaybackCommand>,
    events: Receiver<StepEvent>,
    thread: JoinHandle<Result<PlaybackSummary, EngineError>>,
}

impl PlaybackHandle {
    pub fn pause(&self) {
        self.send(PlaybackCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(PlaybackCommand::Resume);
    }

    pub fn stop(&self) {
        self.send(PlaybackCommand::Stop);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.send(PlaybackCommand::SetDelay(delay));
    }

    /// Events in step order; the channel closes when playback ends
    pub fn events(&self) -> &Receiver<StepEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the playback thread to end
    pub fn join(self) -> Result<PlaybackSummary, EngineError> {
        drop(self.control);
        self.thread
            .join()
            .map_err(|_| EngineError::InvalidOperation("Playback thread panicked".to_string()))?
    }

    fn send(&self, command: PlaybackCommand) {
        // the thread may already have finished
        let _ = self.control.send(command);
    }
}
