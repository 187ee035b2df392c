use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    find::PathFinder,
    grid::{Cell, CellStorage, Point},
    heuristic::Heuristic,
};

/// The code written into the exported state for each kind of cell
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellCodes {
    pub wall: u8,
    pub path: u8,
    pub start: u8,
    pub end: u8,
    pub best_path: u8,
    pub explored: u8,
    pub frontier: u8,
}

impl CellCodes {
    pub const LABELS: [&'static str; 7] = [
        "wall",
        "path",
        "start",
        "end",
        "best_path",
        "explored",
        "frontier",
    ];

    /// The codes as a label map, the shape [`PathFinder::final_state`] expects
    pub fn to_map(&self) -> HashMap<String, u8> {
        Self::LABELS
            .iter()
            .zip([
                self.wall,
                self.path,
                self.start,
                self.end,
                self.best_path,
                self.explored,
                self.frontier,
            ])
            .map(|(label, code)| (label.to_string(), code))
            .collect()
    }
}

impl Default for CellCodes {
    fn default() -> Self {
        Self {
            wall: 0,
            path: 1,
            start: 2,
            end: 3,
            best_path: 4,
            explored: 5,
            frontier: 6,
        }
    }
}

impl TryFrom<&HashMap<String, u8>> for CellCodes {
    type Error = Error;

    fn try_from(codes: &HashMap<String, u8>) -> Result<Self> {
        let code = |label: &str| {
            codes
                .get(label)
                .copied()
                .ok_or_else(|| Error::InvalidCodeMapping(label.to_string()))
        };

        Ok(Self {
            wall: code("wall")?,
            path: code("path")?,
            start: code("start")?,
            end: code("end")?,
            best_path: code("best_path")?,
            explored: code("explored")?,
            frontier: code("frontier")?,
        })
    }
}

/// A snapshot of a search laid out like the grid, ready to be rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalState {
    pub cells: CellStorage<u8>,
    /// Reached cells minus the distinct cells still waiting in the frontier
    pub explored: usize,
}

impl Display for FinalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cells)
    }
}

impl<H: Heuristic> PathFinder<'_, H> {
    /// Exports the search state using a label map of cell codes.
    ///
    /// Fails with [`Error::InvalidCodeMapping`] if any of [`CellCodes::LABELS`] is missing.
    pub fn final_state(&self, codes: &HashMap<String, u8>) -> Result<FinalState> {
        let codes = CellCodes::try_from(codes)?;
        Ok(self.final_state_with(&codes))
    }

    /// Exports the search state. Later layers override earlier ones: open/wall, explored,
    /// frontier, best path, then start and end.
    ///
    /// The search itself is left untouched, so repeated calls give the same result.
    pub fn final_state_with(&self, codes: &CellCodes) -> FinalState {
        let grid = self.grid();
        let mut cells = grid.create_storage(codes.path);

        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                let point = Point::new(row as isize, col as isize);
                let code = cells.get_mut(point);
                if grid.get(point) == Some(Cell::Wall) {
                    *code = codes.wall;
                } else if self.distances.get(point).is_finite() {
                    *code = codes.explored;
                }
            }
        }

        let frontier: HashSet<Point> = self.frontier.iter().map(|visit| visit.point).collect();
        for point in &frontier {
            *cells.get_mut(*point) = codes.frontier;
        }

        for point in &self.path {
            *cells.get_mut(*point) = codes.best_path;
        }

        *cells.get_mut(self.start()) = codes.start;
        *cells.get_mut(self.end()) = codes.end;

        let reached = self.distances.values().filter(|d| d.is_finite()).count();

        FinalState {
            cells,
            explored: reached - frontier.len(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{
        find::PathFinderState,
        grid::{Grid, MoveSet, ParsedMaze},
        heuristic::{Inadmissible, Zero},
    };

    fn render(state: &FinalState) -> String {
        state.to_string()
    }

    #[test]
    fn test_open_grid_state() {
        let grid = Grid::new(5, 5);
        let mut finder = PathFinder::new(
            &grid,
            Point::new(1, 1),
            Point::new(3, 3),
            MoveSet::four(),
            Zero,
        )
        .unwrap();
        finder.solve().unwrap();

        let state = finder.final_state(&CellCodes::default().to_map()).unwrap();

        assert_eq!(render(&state), "11111\n12555\n14556\n14431\n16111\n");
        assert_eq!(state.explored, 8);
    }

    #[test]
    fn test_greedy_state() {
        let maze: ParsedMaze = "
#####
#..S#
#...#
#...#
#.#.#
#.E.#
#####
"
        .parse()
        .unwrap();
        let mut finder = PathFinder::new(
            &maze.grid,
            maze.start,
            maze.end,
            MoveSet::four(),
            Inadmissible,
        )
        .unwrap();
        assert_eq!(finder.solve().unwrap().length(), Some(7));

        let state = finder.final_state_with(&CellCodes::default());
        assert_eq!(
            render(&state),
            "00000\n04420\n04560\n04560\n04010\n04310\n00000\n"
        );
        assert_eq!(state.explored, 7);
    }

    #[test]
    fn test_export_is_repeatable() {
        let grid = Grid::new(6, 6);
        let mut finder = PathFinder::new(
            &grid,
            Point::new(1, 1),
            Point::new(4, 5),
            MoveSet::eight(),
            Zero,
        )
        .unwrap();
        finder.solve().unwrap();
        let frontier = finder.frontier_len();

        let codes = CellCodes::default().to_map();
        let first = finder.final_state(&codes).unwrap();
        let second = finder.final_state(&codes).unwrap();

        assert_eq!(first, second);
        assert_eq!(finder.frontier_len(), frontier);
        assert!(matches!(finder.state(), PathFinderState::PathFound(_)));
    }

    #[test]
    fn test_no_path_state() {
        let maze: ParsedMaze = "
#####
#S..#
#####
#..E#
#####
"
        .parse()
        .unwrap();
        let mut finder =
            PathFinder::new(&maze.grid, maze.start, maze.end, MoveSet::four(), Zero).unwrap();
        assert_eq!(finder.solve().unwrap(), PathFinderState::NoPathFound);

        let state = finder.final_state_with(&CellCodes::default());
        assert_eq!(render(&state), "00000\n02550\n00000\n01130\n00000\n");
        // nothing is left in the frontier, so every reached cell counts
        assert_eq!(state.explored, 3);
    }

    #[test]
    fn test_custom_codes() {
        let grid = Grid::new(3, 4);
        let p = Point::new(1, 2);
        let mut finder = PathFinder::new(&grid, p, p, MoveSet::four(), Zero).unwrap();
        finder.solve().unwrap();

        let codes = CellCodes {
            wall: 9,
            path: 8,
            start: 7,
            end: 6,
            best_path: 5,
            explored: 4,
            frontier: 3,
        };
        let state = finder.final_state(&codes.to_map()).unwrap();

        // the end is stamped last
        assert_eq!(*state.cells.get(p), 6);
        assert_eq!(*state.cells.get(Point::new(0, 0)), 8);
        assert_eq!(state.explored, 0);
    }

    #[test]
    fn test_missing_label() {
        let grid = Grid::new(4, 4);
        let finder = PathFinder::new(
            &grid,
            Point::new(1, 1),
            Point::new(2, 2),
            MoveSet::four(),
            Zero,
        )
        .unwrap();

        let mut codes = CellCodes::default().to_map();
        codes.remove("best_path");

        assert_eq!(
            finder.final_state(&codes),
            Err(Error::InvalidCodeMapping("best_path".to_string()))
        );
    }

    #[test]
    fn test_codes_from_json() {
        let codes: CellCodes = serde_json::from_str(
            r#"{"wall": 0, "path": 1, "start": 2, "end": 3, "best_path": 4, "explored": 5, "frontier": 6}"#,
        )
        .unwrap();
        assert_eq!(codes, CellCodes::default());
    }
}
