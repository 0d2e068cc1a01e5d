// seeder.rs - Random initial boards

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{check_dimensions, Board, ALIVE, DEAD};
use crate::error::BoardError;

/// Fill `nrows * ncols` cells column by column.
///
/// `probability` is the chance of a cell starting *dead*: a cell is alive
/// when its draw from `[0, 1)` is at least `probability`.
pub fn randomize<R: Rng>(
    nrows: usize,
    ncols: usize,
    probability: f32,
    rng: &mut R,
) -> Result<Vec<u8>, BoardError> {
    let len = check_dimensions(ncols, nrows)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(BoardError::ProbabilityOutOfRange(probability));
    }

    let mut cells = vec![DEAD; len];
    for x in 0..ncols {
        for y in 0..nrows {
            let rnd: f32 = rng.gen_range(0.0..1.0);
            cells[x * nrows + y] = if rnd >= probability { ALIVE } else { DEAD };
        }
    }
    Ok(cells)
}

/// Seeding policy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seeding {
    /// Chance of each cell starting dead.
    pub probability: f32,
    /// Fixed seed for reproducible boards, OS entropy otherwise.
    pub seed: Option<u64>,
}

impl Default for Seeding {
    fn default() -> Self {
        Self { probability: 0.5, seed: None }
    }
}

impl Seeding {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Board {
    pub fn random(width: usize, height: usize, seeding: &Seeding) -> Result<Self, BoardError> {
        let cells = randomize(height, width, seeding.probability, &mut seeding.rng())?;
        Board::from_cells(width, height, cells)
    }
}
