use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    #[default]
    Open,
}

impl Cell {
    pub fn is_open(&self) -> bool {
        *self == Cell::Open
    }
}

impl From<bool> for Cell {
    fn from(passable: bool) -> Self {
        if passable {
            Cell::Open
        } else {
            Cell::Wall
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "X",
                Cell::Open => " ",
            }
        )
    }
}

/// A (row, col) coordinate. Signed so that stepping off the grid with a move is representable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: isize,
    pub col: isize,
}

impl Point {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single step vector of a [`MoveSet`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub row: isize,
    pub col: isize,
}

impl Offset {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Self::Output {
        Point {
            row: self.row + rhs.row,
            col: self.col + rhs.col,
        }
    }
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Self::Output {
        Offset {
            row: self.row - rhs.row,
            col: self.col - rhs.col,
        }
    }
}

const FOUR: [Offset; 4] = [
    Offset::new(0, -1),
    Offset::new(-1, 0),
    Offset::new(0, 1),
    Offset::new(1, 0),
];

const DIAGONALS: [Offset; 4] = [
    Offset::new(-1, -1),
    Offset::new(-1, 1),
    Offset::new(1, -1),
    Offset::new(1, 1),
];

/// The ordered list of moves the search may take from a cell. The order decides which of several
/// equally good neighbors wins a tie, both in the frontier and during path reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveSet(Vec<Offset>);

impl MoveSet {
    /// Left, up, right, down
    pub fn four() -> Self {
        Self(FOUR.to_vec())
    }

    /// The four cardinal moves followed by the four diagonals
    pub fn eight() -> Self {
        Self(FOUR.iter().chain(DIAGONALS.iter()).copied().collect())
    }

    pub fn custom(moves: Vec<Offset>) -> Self {
        Self(moves)
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.0.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<MoveSetKind> for MoveSet {
    fn from(kind: MoveSetKind) -> Self {
        match kind {
            MoveSetKind::Four => MoveSet::four(),
            MoveSetKind::Eight => MoveSet::eight(),
        }
    }
}

/// Named move sets, used where a move set has to be selected from text
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSetKind {
    Four,
    Eight,
}

impl Display for MoveSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MoveSetKind::Four => "four",
                MoveSetKind::Eight => "eight",
            }
        )
    }
}

impl FromStr for MoveSetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "4" | "four" => Ok(MoveSetKind::Four),
            "8" | "eight" => Ok(MoveSetKind::Eight),
            _ => Err(anyhow::anyhow!("Invalid move set: {}", s)),
        }
    }
}

/// Which coordinates count as inside the grid
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    /// `0 < pos < dim` on both axes: the first row and the first column are never valid
    #[default]
    ExcludeOrigin,
    /// `0 <= pos < dim` on both axes
    Inclusive,
}

impl Boundary {
    fn contains(&self, pos: isize, dim: usize) -> bool {
        let lower = match self {
            Boundary::ExcludeOrigin => pos > 0,
            Boundary::Inclusive => pos >= 0,
        };
        lower && (pos as usize) < dim
    }
}

/// A rectangular occupancy grid. (De)serialized as rows of passability flags, so a decoded grid
/// goes through the same checks as [`Grid::from_rows`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Creates a grid where every cell is open
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Cell::Open; columns]; rows],
        }
    }

    /// Builds a grid from rows of passability flags (`true` means open)
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);

        let cells = rows
            .into_iter()
            .enumerate()
            .map(|(row, flags)| {
                if flags.len() != columns {
                    return Err(Error::RaggedGrid {
                        row,
                        expected: columns,
                        found: flags.len(),
                    });
                }
                Ok(flags.into_iter().map(Cell::from).collect())
            })
            .collect::<Result<Vec<Vec<Cell>>>>()?;

        Ok(Self {
            rows: cells.len(),
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set(&mut self, point: Point, cell: Cell) {
        if let Some(c) = self.index(point).map(|(r, c)| &mut self.cells[r][c]) {
            *c = cell;
        }
    }

    /// Returns the cell at `point`, or `None` if the point lies outside the grid
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.index(point).map(|(r, c)| self.cells[r][c])
    }

    /// Whether the point is inside the boundary and not a wall
    pub fn is_valid(&self, point: Point, boundary: Boundary) -> bool {
        boundary.contains(point.row, self.rows)
            && boundary.contains(point.col, self.columns)
            && self.get(point).is_some_and(|c| c.is_open())
    }

    /// Create a per-cell storage for values of type T, all set to `value`
    pub fn create_storage<T: Clone>(&self, value: T) -> CellStorage<T> {
        CellStorage(vec![vec![value; self.columns]; self.rows])
    }

    fn index(&self, point: Point) -> Option<(usize, usize)> {
        let inside = point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.rows
            && (point.col as usize) < self.columns;
        inside.then(|| (point.row as usize, point.col as usize))
    }
}

impl TryFrom<Vec<Vec<bool>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<bool>> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.is_open()).collect())
            .collect()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A grid together with the start and end markers found while parsing it
#[derive(Clone, Debug)]
pub struct ParsedMaze {
    pub grid: Grid,
    pub start: Point,
    pub end: Point,
}

/// Parses an ASCII maze: `#` is a wall, anything else is open. `S` and `E` mark the start and
/// end cells (both open). Empty lines are ignored.
impl FromStr for ParsedMaze {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut start = None;
        let mut end = None;
        let mut rows = Vec::new();

        for line in s
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
        {
            let row = rows.len() as isize;
            let mut flags = Vec::with_capacity(line.len());
            for (col, c) in line.chars().enumerate() {
                let here = Point::new(row, col as isize);
                match c {
                    'S' if start.is_some() => anyhow::bail!("More than one start marker"),
                    'S' => start = Some(here),
                    'E' if end.is_some() => anyhow::bail!("More than one end marker"),
                    'E' => end = Some(here),
                    _ => {}
                }
                flags.push(c != '#');
            }
            rows.push(flags);
        }

        Ok(ParsedMaze {
            grid: Grid::from_rows(rows)?,
            start: start.ok_or_else(|| anyhow::anyhow!("Maze has no start marker 'S'"))?,
            end: end.ok_or_else(|| anyhow::anyhow!("Maze has no end marker 'E'"))?,
        })
    }
}

/// Per-cell values laid out like the grid they were created from (a vec in a vec)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T> CellStorage<T> {
    /// Panics if `node` lies outside the grid; callers validate points first.
    pub fn get(&self, node: Point) -> &T {
        &self.0[node.row as usize][node.col as usize]
    }

    pub fn get_mut(&mut self, node: Point) -> &mut T {
        &mut self.0[node.row as usize][node.col as usize]
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter().flatten()
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_parse_maze() {
        let maze: ParsedMaze = "
#####
#S..#
#.#E#
#####
"
        .parse()
        .unwrap();

        assert_eq!(maze.grid.rows(), 4);
        assert_eq!(maze.grid.columns(), 5);
        assert_eq!(maze.start, Point::new(1, 1));
        assert_eq!(maze.end, Point::new(2, 3));
        assert_eq!(maze.grid.get(Point::new(2, 2)), Some(Cell::Wall));
        assert_eq!(maze.grid.get(Point::new(1, 3)), Some(Cell::Open));
        assert_eq!(maze.grid.get(Point::new(4, 0)), None);
        assert_eq!(maze.grid.get(Point::new(-1, 0)), None);
    }

    #[test]
    fn test_parse_maze_markers() {
        assert!("#S.#\n#..#".parse::<ParsedMaze>().is_err());
        assert!("#..#\n#.E#".parse::<ParsedMaze>().is_err());
        assert!("#SS#\n#.E#".parse::<ParsedMaze>().is_err());
        assert!("#S.#\n#E#".parse::<ParsedMaze>().is_err());
    }

    #[test]
    fn test_ragged_rows() {
        assert!(matches!(
            Grid::from_rows(vec![vec![true, true], vec![true]]),
            Err(Error::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_deserialize_grid() {
        let grid: Grid =
            serde_json::from_str("[[false, true, true], [true, true, false]]").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.get(Point::new(0, 0)), Some(Cell::Wall));
        assert_eq!(grid.get(Point::new(1, 1)), Some(Cell::Open));

        // rows, columns and cells can no longer disagree
        let mismatched = r#"{"rows":3,"columns":3,"cells":[]}"#;
        assert!(serde_json::from_str::<Grid>(mismatched).is_err());
        let ragged = "[[true, true], [true]]";
        assert!(serde_json::from_str::<Grid>(ragged).is_err());

        let empty: Grid = serde_json::from_str("[]").unwrap();
        assert!(!empty.is_valid(Point::new(1, 1), Boundary::ExcludeOrigin));

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[false,true,true],[true,true,false]]");
    }

    #[test]
    fn test_boundary_excludes_origin() {
        let grid = Grid::new(3, 3);

        assert!(!grid.is_valid(Point::new(0, 1), Boundary::ExcludeOrigin));
        assert!(!grid.is_valid(Point::new(1, 0), Boundary::ExcludeOrigin));
        assert!(grid.is_valid(Point::new(1, 1), Boundary::ExcludeOrigin));
        assert!(grid.is_valid(Point::new(2, 2), Boundary::ExcludeOrigin));
        assert!(!grid.is_valid(Point::new(3, 2), Boundary::ExcludeOrigin));

        assert!(grid.is_valid(Point::new(0, 0), Boundary::Inclusive));
        assert!(!grid.is_valid(Point::new(-1, 0), Boundary::Inclusive));
        assert!(!grid.is_valid(Point::new(2, 3), Boundary::Inclusive));
    }

    #[test]
    fn test_walls_are_invalid() {
        let mut grid = Grid::new(4, 4);
        grid.set(Point::new(2, 2), Cell::Wall);

        assert!(!grid.is_valid(Point::new(2, 2), Boundary::ExcludeOrigin));
        assert!(!grid.is_valid(Point::new(2, 2), Boundary::Inclusive));
    }

    #[test]
    fn test_move_sets() {
        assert_eq!(MoveSet::four().len(), 4);
        assert_eq!(MoveSet::eight().len(), 8);
        assert_eq!(
            MoveSet::eight().iter().take(4).collect::<Vec<_>>(),
            MoveSet::four().iter().collect::<Vec<_>>()
        );
        assert!(MoveSet::eight().contains(Offset::new(1, -1)));

        assert_eq!("8".parse::<MoveSetKind>().unwrap(), MoveSetKind::Eight);
        assert_eq!("four".parse::<MoveSetKind>().unwrap(), MoveSetKind::Four);
        assert!("6".parse::<MoveSetKind>().is_err());
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(2, 3) + Offset::new(-1, 1);
        assert_eq!(p, Point::new(1, 4));
        assert_eq!(Point::new(5, 1) - Point::new(2, 3), Offset::new(3, -2));
    }
}
