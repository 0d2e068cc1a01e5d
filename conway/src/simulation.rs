// simulation.rs - One complete run: seed, evolve, report

use log::{debug, info};

use crate::board::{check_dimensions, Board, Boundary};
use crate::engine::EvolutionEngine;
use crate::error::{BoardError, EngineError};
use crate::seeder::Seeding;

/// Validated parameters for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    pub board_width: usize,
    pub board_height: usize,
    pub generation_count: u32,
}

impl RunParameters {
    pub fn new(board_width: usize, board_height: usize, generation_count: u32) -> Result<Self, BoardError> {
        check_dimensions(board_width, board_height)?;
        if generation_count == 0 {
            return Err(BoardError::ZeroGenerations);
        }
        Ok(Self { board_width, board_height, generation_count })
    }
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub generations: u32,
    pub initial_live: usize,
    pub final_live: usize,
    pub final_digest: u64,
    pub final_board: Board,
}

/// Seed a fresh board and evolve it `params.generation_count` times.
pub fn run_simulation<E: EvolutionEngine + ?Sized>(
    engine: &mut E,
    params: &RunParameters,
    seeding: &Seeding,
    boundary: Boundary,
) -> Result<SimulationReport, EngineError> {
    let board = Board::random(params.board_width, params.board_height, seeding)?;
    let initial_live = board.live_count();
    debug!(
        "seeded {}x{} board, {} live, digest {:016x}",
        board.width(),
        board.height(),
        initial_live,
        board.digest()
    );

    info!(
        "running {} generations on the {} engine ({:?} boundary)",
        params.generation_count,
        engine.name(),
        boundary
    );
    let final_board = engine.evolve(board, params.generation_count, boundary)?;

    Ok(SimulationReport {
        generations: params.generation_count,
        initial_live,
        final_live: final_board.live_count(),
        final_digest: final_board.digest(),
        final_board,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ReferenceEngine, TaskEngine};

    #[test]
    fn parameters_reject_empty_boards_and_zero_generations() {
        assert_eq!(RunParameters::new(64, 64, 0), Err(BoardError::ZeroGenerations));
        assert!(matches!(
            RunParameters::new(0, 64, 10),
            Err(BoardError::ZeroDimension { .. })
        ));
        assert!(RunParameters::new(64, 64, 1).is_ok());
    }

    #[test_log::test]
    fn seeded_runs_are_reproducible_across_engines() {
        let params = RunParameters::new(64, 64, 12).unwrap();
        let seeding = Seeding { probability: 0.5, seed: Some(5) };

        let a = run_simulation(&mut ReferenceEngine::new(), &params, &seeding, Boundary::Wrap).unwrap();
        let mut tasks = TaskEngine::with_workers(2).unwrap();
        let b = run_simulation(&mut tasks, &params, &seeding, Boundary::Wrap).unwrap();

        assert_eq!(a.generations, 12);
        assert_eq!(a.initial_live, b.initial_live);
        assert_eq!(a.final_digest, b.final_digest);
        assert_eq!(a.final_live, a.final_board.live_count());
    }

    #[test]
    fn bad_probability_fails_before_evolving() {
        let params = RunParameters::new(8, 8, 1).unwrap();
        let seeding = Seeding { probability: 2.0, seed: Some(1) };
        let err = run_simulation(&mut ReferenceEngine::new(), &params, &seeding, Boundary::Wrap).unwrap_err();
        assert!(matches!(err, EngineError::Board(BoardError::ProbabilityOutOfRange(_))));
    }
}
