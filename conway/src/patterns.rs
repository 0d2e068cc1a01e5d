// patterns.rs - Well-known starting patterns

use crate::board::Board;

pub struct Pattern {
    pub name: &'static str,
    /// Live cells as (row, col) relative to the pattern's top-left corner.
    pub cells: &'static [(usize, usize)],
}

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const PATTERNS: &[Pattern] = &[
    GLIDER,
    BLINKER,
    BLOCK,
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top section
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom section (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
];

impl Pattern {
    /// Bounding box as (rows, cols).
    pub fn extent(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(h, w), &(r, c)| (h.max(r + 1), w.max(c + 1)))
    }
}

/// Set the pattern's cells alive with its corner at (row, col). Cells that
/// fall off the board wrap around.
pub fn stamp(board: &mut Board, pattern: &Pattern, row: usize, col: usize) {
    let (h, w) = (board.height(), board.width());
    for &(r, c) in pattern.cells {
        board.set((row + r) % h, (col + c) % w, true);
    }
}

/// Clear the board and stamp the pattern in its centre.
pub fn apply_centered(board: &mut Board, pattern: &Pattern) {
    board.clear();
    let (ph, pw) = pattern.extent();
    let row = board.height().saturating_sub(ph) / 2;
    let col = board.width().saturating_sub(pw) / 2;
    stamp(board, pattern, row, col);
}
