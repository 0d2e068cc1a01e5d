// engine/mod.rs - Evolution engines behind a common trait
//
// The coordinator only ever sees `EvolutionEngine`; how a generation is
// scheduled (sequentially or as a fan-out of column tasks) stays inside
// each implementation.

mod reference;
mod tasks;


pub use reference::ReferenceEngine;
pub use tasks::TaskEngine;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Boundary};
use crate::error::EngineError;
use crate::rule::next_state;

/// Advances a board through whole generations.
///
/// Every generation must be computed from the complete previous generation,
/// and `generations == 0` returns the board untouched.
pub trait EvolutionEngine {
    fn name(&self) -> &'static str;

    fn evolve(
        &mut self,
        board: Board,
        generations: u32,
        boundary: Boundary,
    ) -> Result<Board, EngineError>;
}

impl<E: EvolutionEngine + ?Sized> EvolutionEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn evolve(&mut self, board: Board, generations: u32, boundary: Boundary) -> Result<Board, EngineError> {
        (**self).evolve(board, generations, boundary)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Column tasks on a tokio runtime.
    #[default]
    Tasks,
    /// Single-threaded software implementation.
    Reference,
}

/// Build the engine for `kind`. The task engine acquires its runtime here.
pub fn build(kind: EngineKind) -> Result<Box<dyn EvolutionEngine>, EngineError> {
    Ok(match kind {
        EngineKind::Tasks => Box::new(TaskEngine::new()?),
        EngineKind::Reference => Box::new(ReferenceEngine::new()),
    })
}

/// Compute the next state of column `col` of `current` into `out`.
pub(crate) fn step_column(current: &Board, col: usize, boundary: Boundary, out: &mut [u8]) {
    debug_assert_eq!(out.len(), current.height());
    for (row, cell) in out.iter_mut().enumerate() {
        let count = current.live_neighbors(row, col, boundary);
        *cell = u8::from(next_state(current.get(row, col), count));
    }
}
