use anyhow::Result;
use rand::prelude::*;

mod common;
use common::{create_test_engine, random_reference_string, run_all, BELADY};

use pagesim::{AccessOutcome, ReplacementPolicy, StepEvent};

fn fault_count(events: &[StepEvent]) -> usize {
    events.iter().filter(|e| e.outcome == AccessOutcome::Fault).count()
}

#[test]
fn test_fifo_belady_three_frames() -> Result<()> {
    let (engine, events) = run_all(3, ReplacementPolicy::Fifo, BELADY)?;
    assert_eq!(engine.stats().faults, 9);
    assert_eq!(engine.stats().hits, 3);

    // faults happen at these 1-indexed positions
    let positions: Vec<_> = events
        .iter()
        .filter(|e| e.outcome == AccessOutcome::Fault)
        .map(|e| e.step_index + 1)
        .collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7, 10, 11]);
    Ok(())
}

#[test]
fn test_fifo_belady_anomaly() -> Result<()> {
    let (three, _) = run_all(3, ReplacementPolicy::Fifo, BELADY)?;
    let (four, _) = run_all(4, ReplacementPolicy::Fifo, BELADY)?;
    assert_eq!(four.stats().faults, 10);
    assert!(four.stats().faults > three.stats().faults);
    Ok(())
}

#[test]
fn test_lru_belady_counts() -> Result<()> {
    let (three, _) = run_all(3, ReplacementPolicy::Lru, BELADY)?;
    assert_eq!(three.stats().faults, 10);
    assert_eq!(three.stats().hits, 2);
    assert_eq!(three.snapshot().occupancy(), vec![Some(3), Some(4), Some(5)]);

    // more frames never hurt LRU, while FIFO gets worse here
    let (four, _) = run_all(4, ReplacementPolicy::Lru, BELADY)?;
    let (fifo_four, _) = run_all(4, ReplacementPolicy::Fifo, BELADY)?;
    assert_eq!(four.stats().faults, 8);
    assert!(four.stats().faults <= three.stats().faults);
    assert!(four.stats().faults <= fifo_four.stats().faults);
    Ok(())
}

#[test]
fn test_optimal_belady_counts() -> Result<()> {
    let (engine, events) = run_all(3, ReplacementPolicy::Optimal, BELADY)?;
    assert_eq!(engine.stats().faults, 7);
    assert_eq!(engine.stats().hits, 5);

    // reference 4 evicts page 3, the one needed furthest ahead
    assert_eq!(events[3].victim_page_id, Some(3));
    // reference 3 at step 10: page 1 is never used again
    assert_eq!(events[9].victim_page_id, Some(1));
    Ok(())
}

#[test]
fn test_optimal_never_worse_than_online_policies() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..25 {
        let refs = random_reference_string(&mut rng, 50, 7);
        for frames in 1..=5 {
            let (_, optimal) = run_all(frames, ReplacementPolicy::Optimal, &refs)?;
            let (_, fifo) = run_all(frames, ReplacementPolicy::Fifo, &refs)?;
            let (_, lru) = run_all(frames, ReplacementPolicy::Lru, &refs)?;
            assert!(fault_count(&optimal) <= fault_count(&fifo));
            assert!(fault_count(&optimal) <= fault_count(&lru));
        }
    }
    Ok(())
}

#[test]
fn test_fifo_victim_is_oldest_load() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(5);
    let refs = random_reference_string(&mut rng, 60, 9);
    let (_, events) = run_all(4, ReplacementPolicy::Fifo, &refs)?;

    // replay and check each eviction against the frames just before it
    let mut replay = create_test_engine(4, ReplacementPolicy::Fifo, &refs)?;
    for event in &events {
        if event.victim_page_id.is_some() {
            let oldest = replay
                .frames()
                .iter()
                .filter_map(|f| f.loaded_at_step())
                .min();
            let chosen = replay.frames()[event.frame_index].loaded_at_step();
            assert_eq!(chosen, oldest);
        }
        replay.step()?;
    }
    Ok(())
}

#[test]
fn test_lru_victim_has_oldest_last_use() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(9);
    let refs = random_reference_string(&mut rng, 60, 9);
    let pages: Vec<u64> = refs.split(',').map(|t| t.parse().unwrap()).collect();
    let (_, events) = run_all(3, ReplacementPolicy::Lru, &refs)?;

    let mut resident: Vec<u64> = Vec::new();
    for event in &events {
        if let Some(victim) = event.victim_page_id {
            let last_use = |page: u64| pages[..event.step_index].iter().rposition(|&p| p == page);
            for &page in &resident {
                assert!(last_use(victim) <= last_use(page));
            }
            resident.retain(|&p| p != victim);
        }
        if event.outcome == AccessOutcome::Fault {
            resident.push(event.page_id);
        }
    }
    Ok(())
}

#[test]
fn test_optimal_prefers_pages_without_future_use() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(13);
    let refs = random_reference_string(&mut rng, 60, 9);
    let pages: Vec<u64> = refs.split(',').map(|t| t.parse().unwrap()).collect();
    let (_, events) = run_all(3, ReplacementPolicy::Optimal, &refs)?;

    let mut resident: Vec<u64> = Vec::new();
    for event in &events {
        if let Some(victim) = event.victim_page_id {
            let future = &pages[event.step_index..];
            let has_dead_page = resident.iter().any(|page| !future.contains(page));
            if has_dead_page {
                assert!(!future.contains(&victim));
            }
            resident.retain(|&p| p != victim);
        }
        if event.outcome == AccessOutcome::Fault {
            resident.push(event.page_id);
        }
    }
    Ok(())
}

#[test]
fn test_single_frame_every_change_faults() -> Result<()> {
    for policy in ReplacementPolicy::ALL {
        let (engine, _) = run_all(1, policy, "1,1,2,2,1")?;
        assert_eq!(engine.stats().faults, 3);
        assert_eq!(engine.stats().hits, 2);
    }
    Ok(())
}
