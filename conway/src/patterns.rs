// patterns.rs - Built-in seed patterns
//
// Cells are (row, col) offsets from the pattern's top-left corner.

use crate::grid::Grid;

#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (4, 0), (4, 1), (5, 0), (5, 1),
            (4, 10), (5, 10), (6, 10), (3, 11), (7, 11), (2, 12), (8, 12),
            (2, 13), (8, 13), (5, 14), (3, 15), (7, 15), (4, 16), (5, 16),
            (6, 16), (5, 17), (2, 20), (3, 20), (4, 20), (2, 21), (3, 21),
            (4, 21), (1, 22), (5, 22), (0, 24), (1, 24), (5, 24), (6, 24),
            (2, 34), (3, 34), (2, 35), (3, 35),
        ],
    },
];

/// Look a pattern up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|pattern| pattern.name.eq_ignore_ascii_case(name))
}

impl Pattern {
    /// Bounding box as (width, height).
    pub fn size(&self) -> (usize, usize) {
        let width = self.cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);
        let height = self.cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
        (width, height)
    }

    /// Empty grid with the pattern's top-left corner at `(x, y)`.
    /// Cells falling off an edge wrap around to the opposite one.
    pub fn stamp_at(&self, width: usize, height: usize, x: usize, y: usize) -> Grid {
        if width == 0 || height == 0 {
            return Grid::empty(width, height);
        }
        Grid::from_fn(width, height, |cx, cy| {
            self.cells
                .iter()
                .any(|&(row, col)| (y + row) % height == cy && (x + col) % width == cx)
        })
    }

    /// Empty grid with the pattern centered.
    pub fn stamp(&self, width: usize, height: usize) -> Grid {
        let (pattern_width, pattern_height) = self.size();
        let x = width.saturating_sub(pattern_width) / 2;
        let y = height.saturating_sub(pattern_height) / 2;
        self.stamp_at(width, height, x, y)
    }
}
