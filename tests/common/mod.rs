#![allow(dead_code)]

use anyhow::Result;
use pagesim::{PagingEngine, ReplacementPolicy, SimulationConfig, StepEvent};
use rand::prelude::*;

/// Classic reference string exhibiting Belady's anomaly under FIFO
pub const BELADY: &str = "1,2,3,4,1,2,5,1,2,3,4,5";

// Create an initialized engine over an explicit frame count
pub fn create_test_engine(
    frames: usize,
    policy: ReplacementPolicy,
    refs: &str,
) -> Result<PagingEngine> {
    Ok(PagingEngine::with_config(SimulationConfig::with_frames(frames, policy, refs))?)
}

// Run a configuration to completion and return every event
pub fn run_all(
    frames: usize,
    policy: ReplacementPolicy,
    refs: &str,
) -> Result<(PagingEngine, Vec<StepEvent>)> {
    let mut engine = create_test_engine(frames, policy, refs)?;
    let events = engine.run_to_completion()?;
    Ok((engine, events))
}

// Generate a random reference string over `pages` distinct pages
pub fn random_reference_string(rng: &mut StdRng, len: usize, pages: u64) -> String {
    (0..len)
        .map(|_| rng.gen_range(0..pages).to_string())
        .collect::<Vec<_>>()
        .join(",")
}
