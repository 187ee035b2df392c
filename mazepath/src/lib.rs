//! Shortest paths through occupancy grids with pluggable heuristics and move sets.
//!
//! A [`PathFinder`] is set up with a [`Grid`], start and end points, a [`MoveSet`] and a
//! [`Heuristic`], solved once, and then exported as a [`FinalState`] for rendering.

pub mod compare;
pub mod error;
pub mod find;
pub mod grid;
pub mod heuristic;
pub mod state;

pub use compare::{compare, RunConfig, RunReport};
pub use error::{Error, Result};
pub use find::{Distance, PathFinder, PathFinderState, PathResult};
pub use grid::{
    Boundary, Cell, CellStorage, Grid, MoveSet, MoveSetKind, Offset, ParsedMaze, Point,
};
pub use heuristic::{Heuristic, HeuristicKind};
pub use state::{CellCodes, FinalState};
