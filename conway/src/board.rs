// board.rs - Column-major board of binary cells

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

/// Largest board, in cells, that a run will allocate.
pub const MAX_CELLS: usize = u32::MAX as usize;

/// How neighbour counting treats cells past the edge of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Edges wrap around, the board is a torus.
    #[default]
    Wrap,
    /// Everything outside the board counts as dead.
    Dead,
}

/// A fixed-size grid of 0/1 cells stored as `cells[col * height + row]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Board {
    /// All-dead board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        let len = check_dimensions(width, height)?;
        Ok(Self { width, height, cells: vec![DEAD; len] })
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, BoardError> {
        let expected = check_dimensions(width, height)?;
        if cells.len() != expected {
            return Err(BoardError::LengthMismatch { expected, actual: cells.len() });
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > ALIVE) {
            return Err(BoardError::InvalidCell { index, value });
        }
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn cells(&self) -> &[u8] { &self.cells }

    /// Panics when (row, col) lies outside the board.
    pub fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) is outside the {}x{} board",
            self.width,
            self.height
        );
        col * self.height + row
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)] == ALIVE
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let i = self.index(row, col);
        self.cells[i] = if alive { ALIVE } else { DEAD };
    }

    pub fn toggle(&mut self, row: usize, col: usize) {
        let i = self.index(row, col);
        self.cells[i] ^= ALIVE;
    }

    pub fn clear(&mut self) {
        self.cells.fill(DEAD);
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == ALIVE).count()
    }

    /// Live cells among the 8 neighbours of (row, col).
    pub fn live_neighbors(&self, row: usize, col: usize, boundary: Boundary) -> u8 {
        let (h, w) = (self.height as isize, self.width as isize);
        let mut count = 0;
        for dc in -1isize..=1 {
            for dr in -1isize..=1 {
                if dr == 0 && dc == 0 { continue; }
                let (mut r, mut c) = (row as isize + dr, col as isize + dc);
                match boundary {
                    Boundary::Wrap => {
                        r = r.rem_euclid(h);
                        c = c.rem_euclid(w);
                    }
                    Boundary::Dead => {
                        if r < 0 || r >= h || c < 0 || c >= w { continue; }
                    }
                }
                count += self.cells[c as usize * self.height + r as usize];
            }
        }
        count
    }

    /// Fingerprint of the board contents.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        hasher.finish()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Caller guarantees the dimensions match and every cell is 0 or 1.
    pub(crate) fn from_raw(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    pub(crate) fn into_cells(self) -> Vec<u8> {
        self.cells
    }
}

/// Cell count of a `width` x `height` board, if such a board is allowed.
pub fn check_dimensions(width: usize, height: usize) -> Result<usize, BoardError> {
    if width == 0 || height == 0 {
        return Err(BoardError::ZeroDimension { width, height });
    }
    match width.checked_mul(height) {
        Some(len) if len <= MAX_CELLS => Ok(len),
        _ => Err(BoardError::TooLarge { width, height }),
    }
}
