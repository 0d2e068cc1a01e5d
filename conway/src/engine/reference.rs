// engine/reference.rs - Sequential double-buffered engine

use log::trace;

use super::{step_column, EvolutionEngine};
use crate::board::{Board, Boundary};
use crate::error::EngineError;

#[derive(Debug, Default)]
pub struct ReferenceEngine;

impl ReferenceEngine {
    pub fn new() -> Self {
        Self
    }
}

impl EvolutionEngine for ReferenceEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn evolve(&mut self, board: Board, generations: u32, boundary: Boundary) -> Result<Board, EngineError> {
        let (width, height) = (board.width(), board.height());
        let mut current = board;
        let mut next = current.clone();

        for generation in 1..=generations {
            for (col, column) in next.cells_mut().chunks_mut(height).enumerate() {
                step_column(&current, col, boundary, column);
            }
            std::mem::swap(&mut current, &mut next);
            trace!("generation {generation}: {} live of {}", current.live_count(), width * height);
        }
        Ok(current)
    }
}
