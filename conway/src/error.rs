//! Error types for the Life kernel.

use thiserror::Error;

/// Errors raised by grid operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinates outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A pattern row whose length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A pattern character other than `#` or `.`.
    #[error("unexpected character {ch:?} at ({x}, {y})")]
    InvalidCell { x: usize, y: usize, ch: char },
}
