use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{Debug, Display},
    ops::Deref,
    time::Instant,
};

use log::{debug, error, trace};

use crate::{
    error::{Error, Result},
    grid::{Boundary, CellStorage, Grid, MoveSet, Offset, Point},
    heuristic::Heuristic,
};

/// The objects that we store in the priority queue
#[derive(Debug)]
pub(crate) struct ToVisit {
    pub(crate) priority: f64,
    pub(crate) sequence: u64,
    pub(crate) point: Point,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.sequence.cmp(&other.sequence))
            .reverse() // reverse for BinaryHeap to be a min-heap
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToVisit {
    fn eq(&self, other: &ToVisit) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToVisit {}

/// Best known number of steps from the start to a cell, `None` while unreached
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Distance(Option<usize>);

impl Distance {
    pub fn is_finite(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for Distance {
    type Target = Option<usize>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(cost) => write!(f, "{:03} ", cost),
            None => write!(f, "{:03} ", ""),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// Every cell from start to end, both included
    pub path: Vec<Point>,
    pub start: Point,
    pub end: Point,
    /// Number of moves, i.e. `path.len() - 1`
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }

    /// The path length if a path was found
    pub fn length(&self) -> Option<usize> {
        match self {
            PathFinderState::PathFound(result) => Some(result.length),
            _ => None,
        }
    }
}

/// Best-first search over a [`Grid`] with unit step cost.
///
/// Frontier entries are ordered by `g + h` and then by insertion order. Entries made stale by a
/// cheaper route are left in the queue, and a neighbor is only enqueued when it improves on the
/// distance recorded for it. A popped entry is expanded without re-checking its own distance, so
/// the same cell can be expanded more than once.
///
/// The search stops as soon as the end cell is first reached from an expanded cell. With an
/// admissible heuristic the path is a shortest one; with an inadmissible one it may not be.
pub struct PathFinder<'a, H: Heuristic> {
    grid: &'a Grid,
    start: Point,
    end: Point,
    moves: MoveSet,
    heuristic: H,
    boundary: Boundary,
    deadline: Option<Instant>,
    pub(crate) distances: CellStorage<Distance>,
    pub(crate) frontier: BinaryHeap<ToVisit>,
    pub(crate) path: Vec<Point>,
    sequence: u64,
    expansions: usize,
    state: PathFinderState,
}

impl<'a, H: Heuristic> PathFinder<'a, H> {
    /// Sets up a search from `start` to `end` using the default [`Boundary`].
    ///
    /// Fails with [`Error::InvalidConfiguration`] if start or end is not a valid cell, or if the
    /// move set is not symmetric (every move must have its reverse in the set, otherwise the path
    /// cannot be walked back from the end).
    pub fn new(
        grid: &'a Grid,
        start: Point,
        end: Point,
        moves: MoveSet,
        heuristic: H,
    ) -> Result<Self> {
        Self::bounded(grid, start, end, moves, heuristic, Boundary::default())
    }

    /// Like [`PathFinder::new`], with an explicit bounds check for every cell
    pub fn bounded(
        grid: &'a Grid,
        start: Point,
        end: Point,
        moves: MoveSet,
        heuristic: H,
        boundary: Boundary,
    ) -> Result<Self> {
        if let Some(offset) = moves
            .iter()
            .find(|m| !moves.contains(Offset::new(-m.row, -m.col)))
        {
            return Err(Error::InvalidConfiguration(format!(
                "move {:?} has no reverse in the move set",
                offset
            )));
        }

        for (name, point) in [("start", start), ("end", end)] {
            if !grid.is_valid(point, boundary) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} {} is out of bounds or on a wall",
                    name, point
                )));
            }
        }

        let mut distances = grid.create_storage(Distance::default());
        *distances.get_mut(start) = Distance(Some(0));

        Ok(Self {
            grid,
            start,
            end,
            moves,
            heuristic,
            boundary,
            deadline: None,
            distances,
            frontier: BinaryHeap::from([ToVisit {
                priority: 0.0,
                sequence: 0,
                point: start,
            }]),
            path: Vec::new(),
            sequence: 0,
            expansions: 0,
            state: PathFinderState::Computing,
        })
    }

    /// Stop [`PathFinder::solve`] with [`Error::DeadlineExceeded`] once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn is_valid(&self, point: Point) -> bool {
        self.grid.is_valid(point, self.boundary)
    }

    /// Runs the search until the end is reached or the frontier is exhausted
    pub fn solve(&mut self) -> Result<PathFinderState> {
        loop {
            if let Some(deadline) = self.deadline {
                if self.expansions % 256 == 0 && Instant::now() >= deadline {
                    debug!(
                        "search {} -> {} hit its deadline after {} expansions",
                        self.start, self.end, self.expansions
                    );
                    return Err(Error::DeadlineExceeded);
                }
            }

            match self.step() {
                PathFinderState::Computing => {}
                s => return Ok(s),
            }
        }
    }

    /// Expands a single frontier entry
    pub fn step(&mut self) -> PathFinderState {
        if self.state.is_done() {
            return self.state.clone();
        }

        if self.start == self.end {
            self.path = vec![self.start];
            return self.finish_found();
        }

        let Some(visit) = self.frontier.pop() else {
            return self.finish(PathFinderState::NoPathFound);
        };
        self.expansions += 1;

        let Some(cost) = **self.distances.get(visit.point) else {
            // only reachable cells are ever enqueued
            return self.state.clone();
        };
        let g = cost + 1;

        trace!(
            "expanding {} (g={}, priority={})",
            visit.point,
            cost,
            visit.priority
        );

        let mut found = false;
        for m in self.moves.iter() {
            let adjacent = visit.point + m;

            if !self.grid.is_valid(adjacent, self.boundary) {
                continue;
            }

            // already reached at equal or lower cost
            if matches!(**self.distances.get(adjacent), Some(d) if d <= g) {
                continue;
            }

            if adjacent == self.end {
                found = true;
                break;
            }

            let h = self.heuristic.evaluate(adjacent, self.end);
            self.sequence += 1;
            self.frontier.push(ToVisit {
                priority: g as f64 + h,
                sequence: self.sequence,
                point: adjacent,
            });
            *self.distances.get_mut(adjacent) = Distance(Some(g));
        }

        if found {
            self.path = self.reconstruct_path();
            return self.finish_found();
        }

        PathFinderState::Computing
    }

    /// Walks back from the end, always stepping to the neighbor with the smallest distance
    fn reconstruct_path(&self) -> Vec<Point> {
        let mut path = vec![self.end];
        let mut current = self.end;

        while current != self.start {
            let mut best: Option<(Point, usize)> = None;
            for m in self.moves.iter() {
                let neighbor = current + m;
                if !self.is_valid(neighbor) {
                    continue;
                }
                if let Some(d) = **self.distances.get(neighbor) {
                    if best.map_or(true, |(_, min)| d < min) {
                        best = Some((neighbor, d));
                    }
                }
            }

            match best {
                Some((neighbor, _)) => {
                    path.push(neighbor);
                    current = neighbor;
                }
                None => {
                    error!("Backtracking from {} found no reached neighbor", current);
                    break;
                }
            }
        }

        path.reverse();
        path
    }

    fn finish_found(&mut self) -> PathFinderState {
        let result = PathResult {
            path: self.path.clone(),
            start: self.start,
            end: self.end,
            length: self.path.len() - 1,
        };
        self.finish(PathFinderState::PathFound(result))
    }

    fn finish(&mut self, state: PathFinderState) -> PathFinderState {
        match &state {
            PathFinderState::PathFound(result) => debug!(
                "found path {} -> {} of length {} after {} expansions",
                self.start, self.end, result.length, self.expansions
            ),
            _ => debug!(
                "no path {} -> {} after {} expansions",
                self.start, self.end, self.expansions
            ),
        }
        trace!("distance field:\n{}", self.distances);
        self.state = state;
        self.state.clone()
    }

    pub fn state(&self) -> &PathFinderState {
        &self.state
    }

    pub fn distances(&self) -> &CellStorage<Distance> {
        &self.distances
    }

    /// The reconstructed path, empty until a path was found
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Number of entries in the frontier, stale duplicates included
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of frontier entries popped so far
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }
}

impl<H: Heuristic> Debug for PathFinder<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathFinder")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("moves", &self.moves)
            .field("boundary", &self.boundary)
            .field("frontier", &self.frontier.len())
            .field("expansions", &self.expansions)
            .field("state", &self.state)
            .finish()
    }
}
