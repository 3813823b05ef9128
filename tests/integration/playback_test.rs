use std::thread;
use std::time::Duration;

use anyhow::Result;
use pagesim::{
    PagingEngine, Playback, PlaybackOutcome, ReplacementPolicy, SimulationConfig, StepEvent,
};

fn long_reference_string(len: usize) -> String {
    (0..len).map(|i| (i % 7).to_string()).collect::<Vec<_>>().join(",")
}

fn shared_engine(refs: &str) -> Result<pagesim::SharedEngine> {
    let config = SimulationConfig::with_frames(3, ReplacementPolicy::Lru, refs);
    Ok(PagingEngine::with_config(config)?.into_shared())
}

#[test]
fn test_background_instant_playback_matches_direct_run() -> Result<()> {
    let refs = "1,2,3,4,1,2,5,1,2,3,4,5";
    let shared = shared_engine(refs)?;

    let handle = Playback::instant().spawn(shared.clone());
    let streamed: Vec<StepEvent> = handle.events().iter().collect();
    let summary = handle.join()?;

    assert_eq!(summary.outcome, PlaybackOutcome::Completed);
    assert_eq!(summary.steps, 12);
    assert_eq!(streamed.len(), 12);

    let mut direct =
        PagingEngine::with_config(SimulationConfig::with_frames(3, ReplacementPolicy::Lru, refs))?;
    let expected = direct.run_to_completion()?;
    assert_eq!(streamed, expected);
    assert_eq!(shared.lock().snapshot(), direct.snapshot());
    Ok(())
}

#[test]
fn test_pause_holds_position_until_resume() -> Result<()> {
    let shared = shared_engine(&long_reference_string(200))?;
    let handle = Playback::with_delay(Duration::from_millis(20)).spawn(shared.clone());

    handle.pause();
    thread::sleep(Duration::from_millis(150));
    let paused_at = shared.lock().current_step();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(shared.lock().current_step(), paused_at);
    assert!(!shared.lock().is_completed());

    handle.set_delay(Duration::ZERO);
    handle.resume();
    let summary = handle.join()?;

    assert_eq!(summary.outcome, PlaybackOutcome::Completed);
    assert_eq!(summary.steps, 200);
    assert!(shared.lock().is_completed());
    Ok(())
}

#[test]
fn test_stop_ends_playback_early() -> Result<()> {
    let shared = shared_engine(&long_reference_string(500))?;
    let handle = Playback::with_delay(Duration::from_millis(10)).spawn(shared.clone());

    thread::sleep(Duration::from_millis(50));
    handle.stop();
    let summary = handle.join()?;

    assert_eq!(summary.outcome, PlaybackOutcome::Stopped);
    assert!(summary.steps < 500);
    assert_eq!(shared.lock().current_step(), summary.steps);

    // stepping resumes from where playback stopped
    let before = shared.lock().current_step();
    shared.lock().step()?;
    assert_eq!(shared.lock().current_step(), before + 1);
    Ok(())
}

#[test]
fn test_snapshots_readable_during_playback() -> Result<()> {
    let shared = shared_engine(&long_reference_string(100))?;
    let handle = Playback::with_delay(Duration::from_millis(2)).spawn(shared.clone());

    let mut last_step = 0;
    while !handle.is_finished() {
        let snapshot = shared.lock().snapshot();
        assert!(snapshot.current_step >= last_step);
        assert_eq!(snapshot.stats.accesses(), snapshot.current_step as u64);
        last_step = snapshot.current_step;
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(handle.join()?.outcome, PlaybackOutcome::Completed);
    Ok(())
}
