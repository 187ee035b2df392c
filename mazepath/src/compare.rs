//! Runs every move set against every heuristic on the same maze

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    find::PathFinder,
    grid::{Boundary, Grid, MoveSetKind, Point},
    heuristic::HeuristicKind,
    state::{CellCodes, FinalState},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub move_sets: Vec<MoveSetKind>,
    pub heuristics: Vec<HeuristicKind>,
    pub codes: HashMap<String, u8>,
    pub boundary: Boundary,
    /// Per-search time limit
    pub deadline_ms: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            move_sets: vec![MoveSetKind::Four, MoveSetKind::Eight],
            heuristics: HeuristicKind::REFERENCE.to_vec(),
            codes: CellCodes::default().to_map(),
            boundary: Boundary::default(),
            deadline_ms: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub move_set: MoveSetKind,
    pub heuristic: HeuristicKind,
    /// `None` when no path exists
    pub length: Option<usize>,
    pub explored: usize,
    /// Time spent in the search itself, export excluded
    pub elapsed: Duration,
    pub final_state: FinalState,
}

fn run(
    grid: &Grid,
    start: Point,
    end: Point,
    move_set: MoveSetKind,
    heuristic: HeuristicKind,
    config: &RunConfig,
    codes: &CellCodes,
) -> anyhow::Result<RunReport> {
    let mut finder =
        PathFinder::bounded(grid, start, end, move_set.into(), heuristic, config.boundary)?;

    let t_start = Instant::now();
    if let Some(ms) = config.deadline_ms {
        finder = finder.with_deadline(t_start + Duration::from_millis(ms));
    }
    let state = finder
        .solve()
        .with_context(|| format!("{} moves with {} heuristic", move_set, heuristic))?;
    let elapsed = t_start.elapsed();

    let final_state = finder.final_state_with(codes);

    Ok(RunReport {
        move_set,
        heuristic,
        length: state.length(),
        explored: final_state.explored,
        elapsed,
        final_state,
    })
}

/// Solves the maze once per move set and heuristic combination. Each search runs on its own
/// thread; reports come back grouped by move set, in configuration order.
pub fn compare(
    grid: &Grid,
    start: Point,
    end: Point,
    config: &RunConfig,
) -> anyhow::Result<Vec<RunReport>> {
    let codes = CellCodes::try_from(&config.codes)?;

    let combinations: Vec<(MoveSetKind, HeuristicKind)> = config
        .move_sets
        .iter()
        .flat_map(|m| config.heuristics.iter().map(move |h| (*m, *h)))
        .collect();

    let reports = std::thread::scope(|s| {
        let handles: Vec<_> = combinations
            .iter()
            .map(|&(move_set, heuristic)| {
                let codes = &codes;
                s.spawn(move || run(grid, start, end, move_set, heuristic, config, codes))
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .map_err(|_| anyhow!("search thread panicked"))
                    .and_then(|r| r)
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    for report in &reports {
        info!(
            "{} / {}: length={:?} explored={} in {:?}",
            report.move_set, report.heuristic, report.length, report.explored, report.elapsed
        );
    }

    Ok(reports)
}
