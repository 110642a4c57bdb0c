// grid.rs - Toroidal grid for Conway's Game of Life
//
// A `Grid` is an immutable snapshot. Every transition (toggle, next generation)
// builds a fresh grid and leaves the input untouched.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::error::GridError;

/// Probability of a cell starting alive in a randomized grid.
pub const RANDOM_DENSITY: f64 = 0.5;

/// Relative positions of the eight neighbors, as (dx, dy).
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

pub type TRow = Vec<bool>;

/// Fixed-size boolean matrix whose edges wrap around.
///
/// Rows are shared behind an `Arc`, so cloning a grid is cheap and clones
/// observe the same cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Arc<[TRow]>,
}

impl Grid {
    /// Every cell dead.
    pub fn empty(width: usize, height: usize) -> Self {
        Self::from_fn(width, height, |_, _| false)
    }

    /// Every cell an independent fair coin flip drawn from `rng`.
    pub fn random<R: Rng>(width: usize, height: usize, rng: &mut R) -> Self {
        Self::from_fn(width, height, |_, _| rng.gen_bool(RANDOM_DENSITY))
    }

    /// Like [`Grid::random`], using the thread-local generator.
    pub fn randomize(width: usize, height: usize) -> Self {
        Self::random(width, height, &mut rand::thread_rng())
    }

    /// Build a grid by asking `alive(x, y)` for every cell, row by row.
    pub fn from_fn(width: usize, height: usize, mut alive: impl FnMut(usize, usize) -> bool) -> Self {
        let rows: Vec<TRow> = (0..height)
            .map(|y| (0..width).map(|x| alive(x, y)).collect())
            .collect();
        Self { width, height, rows: rows.into() }
    }

    /// Parse rows of `#` (alive) and `.` (dead). All rows must share one width.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut parsed = Vec::with_capacity(rows.len());

        for (y, row) in rows.iter().enumerate() {
            let cells = row
                .chars()
                .enumerate()
                .map(|(x, ch)| match ch {
                    '#' => Ok(true),
                    '.' => Ok(false),
                    _   => Err(GridError::InvalidCell { x, y, ch }),
                })
                .collect::<Result<TRow, _>>()?;

            if cells.len() != width {
                return Err(GridError::RaggedRow { row: y, found: cells.len(), expected: width });
            }
            parsed.push(cells);
        }

        Ok(Self { width, height: parsed.len(), rows: parsed.into() })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[TRow] {
        &self.rows
    }

    /// Cell state, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Number of alive cells.
    pub fn population(&self) -> usize {
        self.rows.iter().map(|row| row.iter().filter(|&&alive| alive).count()).sum()
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), GridError> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { x, y, width: self.width, height: self.height })
        }
    }

    /// A copy of this grid with the cell at `(x, y)` negated.
    pub fn toggled(&self, x: usize, y: usize) -> Result<Self, GridError> {
        self.check_bounds(x, y)?;

        let mut rows = self.rows.to_vec();
        rows[y][x] = !rows[y][x];
        Ok(Self { width: self.width, height: self.height, rows: rows.into() })
    }

    /// Alive cells among the eight wrapped neighbors of `(x, y)`.
    ///
    /// Each offset is wrapped on its own, so on a grid one or two cells wide the
    /// same cell can be counted more than once.
    pub fn count_neighbors(&self, x: usize, y: usize) -> Result<u8, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.neighbors_unchecked(x, y))
    }

    fn neighbors_unchecked(&self, x: usize, y: usize) -> u8 {
        let mut count = 0u8;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = wrap(x, dx, self.width);
            let ny = wrap(y, dy, self.height);
            if self.rows[ny][nx] { count += 1; }
        }
        count
    }

    /// Apply the Life rule to every cell against this snapshot.
    pub fn next_generation(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            let alive = self.rows[y][x];
            match (alive, self.neighbors_unchecked(x, y)) {
                (true, 2) | (true, 3) => true,   // Survival
                (false, 3)            => true,   // Birth
                _                     => false,  // Death or stays dead
            }
        })
    }
}

/// Step `coord` by `delta` (-1, 0 or 1) and wrap into `[0, bound)`.
fn wrap(coord: usize, delta: isize, bound: usize) -> usize {
    (coord as isize + delta).rem_euclid(bound as isize) as usize
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter() {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        fmt::Display::fmt(self, f)
    }
}
