//! Error types for mazepath

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The search cannot be set up, e.g. start or end is outside the grid or on a wall
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cell code mapping is missing one of the required labels
    #[error("Invalid code mapping: missing label '{0}'")]
    InvalidCodeMapping(String),

    #[error("Ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Search deadline exceeded")]
    DeadlineExceeded,
}

pub type Result<T> = std::result::Result<T, Error>;
