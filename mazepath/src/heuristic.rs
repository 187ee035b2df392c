use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::grid::Point;

/// Factor applied by the "infinite" heuristics, large enough that the accumulated cost never
/// outweighs the estimate on any realistic grid
pub const INFINITE_SCALE: f64 = (180 * 457) as f64;

/// Estimate of the remaining cost from `current` to `end`.
///
/// Implementations must be pure: the same inputs always give the same estimate, and nothing is
/// mutated, so a single heuristic can be shared between searches running on different threads.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, current: Point, end: Point) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(Point, Point) -> f64 + Send + Sync,
{
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        self(current, end)
    }
}

fn chebyshev(current: Point, end: Point) -> f64 {
    let d = end - current;
    d.row.abs().max(d.col.abs()) as f64
}

fn manhattan(current: Point, end: Point) -> f64 {
    let d = end - current;
    (d.row.abs() + d.col.abs()) as f64
}

/// Always zero, which turns the search into plain Dijkstra
#[derive(Copy, Clone, Debug, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn evaluate(&self, _current: Point, _end: Point) -> f64 {
        0.0
    }
}

/// Half the diagonal distance
#[derive(Copy, Clone, Debug, Default)]
pub struct Admissible;

impl Heuristic for Admissible {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        chebyshev(current, end) / 2.0
    }
}

/// Diagonal (Chebyshev) distance. Exact on an open grid with unit-cost 8-directional moves.
#[derive(Copy, Clone, Debug, Default)]
pub struct Diagonal;

impl Heuristic for Diagonal {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        chebyshev(current, end)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        let d = end - current;
        ((d.row * d.row + d.col * d.col) as f64).sqrt()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        manhattan(current, end)
    }
}

/// Five times the Manhattan distance. Overestimates on purpose, so the search runs greedier and
/// may settle for a longer path.
#[derive(Copy, Clone, Debug, Default)]
pub struct Inadmissible;

impl Heuristic for Inadmissible {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        5.0 * manhattan(current, end)
    }
}

/// Diagonal distance times [`INFINITE_SCALE`], close to pure greedy best-first search
#[derive(Copy, Clone, Debug, Default)]
pub struct InfiniteDiagonal;

impl Heuristic for InfiniteDiagonal {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        INFINITE_SCALE * chebyshev(current, end)
    }
}

/// Manhattan distance times [`INFINITE_SCALE`]
#[derive(Copy, Clone, Debug, Default)]
pub struct InfiniteManhattan;

impl Heuristic for InfiniteManhattan {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        INFINITE_SCALE * manhattan(current, end)
    }
}

/// A heuristic selected by name
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    Zero,
    Admissible,
    Diagonal,
    Euclidean,
    Manhattan,
    Inadmissible,
    InfiniteDiagonal,
    InfiniteManhattan,
}

impl HeuristicKind {
    /// The heuristics compared by default, in reporting order
    pub const REFERENCE: [HeuristicKind; 6] = [
        HeuristicKind::Zero,
        HeuristicKind::Admissible,
        HeuristicKind::Inadmissible,
        HeuristicKind::Diagonal,
        HeuristicKind::Manhattan,
        HeuristicKind::Euclidean,
    ];

    pub const ALL: [HeuristicKind; 8] = [
        HeuristicKind::Zero,
        HeuristicKind::Admissible,
        HeuristicKind::Inadmissible,
        HeuristicKind::Diagonal,
        HeuristicKind::Manhattan,
        HeuristicKind::Euclidean,
        HeuristicKind::InfiniteDiagonal,
        HeuristicKind::InfiniteManhattan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::Zero => "zero",
            HeuristicKind::Admissible => "admissible",
            HeuristicKind::Diagonal => "diagonal",
            HeuristicKind::Euclidean => "euclidean",
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::Inadmissible => "inadmissible",
            HeuristicKind::InfiniteDiagonal => "infinite-diagonal",
            HeuristicKind::InfiniteManhattan => "infinite-manhattan",
        }
    }
}

impl Heuristic for HeuristicKind {
    fn evaluate(&self, current: Point, end: Point) -> f64 {
        match self {
            HeuristicKind::Zero => Zero.evaluate(current, end),
            HeuristicKind::Admissible => Admissible.evaluate(current, end),
            HeuristicKind::Diagonal => Diagonal.evaluate(current, end),
            HeuristicKind::Euclidean => Euclidean.evaluate(current, end),
            HeuristicKind::Manhattan => Manhattan.evaluate(current, end),
            HeuristicKind::Inadmissible => Inadmissible.evaluate(current, end),
            HeuristicKind::InfiniteDiagonal => InfiniteDiagonal.evaluate(current, end),
            HeuristicKind::InfiniteManhattan => InfiniteManhattan.evaluate(current, end),
        }
    }
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HeuristicKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeuristicKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid heuristic: {}", s))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const CURRENT: Point = Point::new(1, 7);
    const END: Point = Point::new(4, 3);

    #[test]
    fn test_formulas() {
        // d = (3, -4)
        assert_eq!(Zero.evaluate(CURRENT, END), 0.0);
        assert_eq!(Admissible.evaluate(CURRENT, END), 2.0);
        assert_eq!(Diagonal.evaluate(CURRENT, END), 4.0);
        assert_eq!(Euclidean.evaluate(CURRENT, END), 5.0);
        assert_eq!(Manhattan.evaluate(CURRENT, END), 7.0);
        assert_eq!(Inadmissible.evaluate(CURRENT, END), 35.0);
        assert_eq!(InfiniteDiagonal.evaluate(CURRENT, END), 4.0 * 82260.0);
        assert_eq!(InfiniteManhattan.evaluate(CURRENT, END), 7.0 * 82260.0);
    }

    #[test]
    fn test_half_steps() {
        assert_eq!(
            Admissible.evaluate(Point::new(1, 1), Point::new(2, 4)),
            1.5
        );
    }

    #[test]
    fn test_zero_at_goal() {
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.evaluate(END, END), 0.0, "{kind}");
        }
    }

    #[test]
    fn test_symmetric() {
        for kind in HeuristicKind::ALL {
            assert_eq!(
                kind.evaluate(CURRENT, END),
                kind.evaluate(END, CURRENT),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_kind_matches_strategy() {
        assert_eq!(
            HeuristicKind::Euclidean.evaluate(CURRENT, END),
            Euclidean.evaluate(CURRENT, END)
        );
        assert_eq!(
            HeuristicKind::InfiniteManhattan.evaluate(CURRENT, END),
            InfiniteManhattan.evaluate(CURRENT, END)
        );
    }

    #[test]
    fn test_names_round_trip() {
        for kind in HeuristicKind::ALL {
            assert_eq!(kind.to_string().parse::<HeuristicKind>().unwrap(), kind);
        }
        assert!("octile".parse::<HeuristicKind>().is_err());
        assert_eq!(
            serde_json::from_str::<HeuristicKind>("\"infinite-diagonal\"").unwrap(),
            HeuristicKind::InfiniteDiagonal
        );
    }

    #[test]
    fn test_closure_heuristic() {
        let h = |current: Point, end: Point| 2.0 * Manhattan.evaluate(current, end);
        assert_eq!(h.evaluate(CURRENT, END), 14.0);
    }
}
