// lib.rs - Conway's Game of Life boards and evolution engines

pub mod board;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod rule;
pub mod seeder;
pub mod simulation;

pub use board::{Board, Boundary};
pub use engine::{EngineKind, EvolutionEngine, ReferenceEngine, TaskEngine};
pub use error::{BoardError, EngineError};
pub use seeder::{randomize, Seeding};
pub use simulation::{run_simulation, RunParameters, SimulationReport};
