// error.rs - Error types shared by the board, seeder and engines

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("a {width}x{height} board is too large")]
    TooLarge { width: usize, height: usize },
    #[error("expected {expected} cells for the board, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("cell {index} holds {value}, only 0 and 1 are allowed")]
    InvalidCell { index: usize, value: u8 },
    #[error("probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f32),
    #[error("generation count must be positive")]
    ZeroGenerations,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("failed to start the evolution runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("column kernel failed during generation {generation}: {reason}")]
    Kernel { generation: u32, reason: String },
}
