// engine/tasks.rs - Column coroutines on a tokio runtime
//
// Each generation spawns one task per column. Every task reads the same
// immutable snapshot of the previous generation and returns its finished
// column, so no task can observe another task's output. The generation is
// committed only after every task has been joined.

use std::sync::Arc;

use log::{debug, trace};
use tokio::runtime::{Builder, Runtime};

use super::{step_column, EvolutionEngine};
use crate::board::{Board, Boundary, DEAD};
use crate::error::EngineError;

pub struct TaskEngine {
    runtime: Runtime,
}

impl TaskEngine {
    /// Start a multi-threaded runtime with one worker per core.
    pub fn new() -> Result<Self, EngineError> {
        let runtime = Builder::new_multi_thread().enable_all().build()?;
        Ok(Self { runtime })
    }

    pub fn with_workers(workers: usize) -> Result<Self, EngineError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers.max(1))
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }
}

/// Column coroutine: computes one column of the next generation.
async fn process_column(col: usize, current: Arc<Board>, boundary: Boundary) -> (usize, Vec<u8>) {
    let mut column = vec![DEAD; current.height()];
    step_column(&current, col, boundary, &mut column);
    tokio::task::yield_now().await; // Cooperative yielding
    (col, column)
}

impl EvolutionEngine for TaskEngine {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn evolve(&mut self, board: Board, generations: u32, boundary: Boundary) -> Result<Board, EngineError> {
        let (width, height) = (board.width(), board.height());
        debug!("evolving {width}x{height} board for {generations} generations on column tasks");

        let mut current = Arc::new(board);
        let mut next = vec![DEAD; width * height];

        for generation in 1..=generations {
            let snapshot = Arc::clone(&current);
            let columns = self.runtime.block_on(async move {
                let handles: Vec<_> = (0..width)
                    .map(|col| tokio::spawn(process_column(col, Arc::clone(&snapshot), boundary)))
                    .collect();

                let mut columns = Vec::with_capacity(handles.len());
                for handle in handles {
                    columns.push(handle.await);
                }
                columns
            });

            for joined in columns {
                let (col, column) = joined.map_err(|e| EngineError::Kernel {
                    generation,
                    reason: e.to_string(),
                })?;
                next[col * height..(col + 1) * height].copy_from_slice(&column);
            }

            // Every task has been joined, so the previous generation is no
            // longer shared and its buffer becomes the next write target.
            let committed = Board::from_raw(width, height, std::mem::take(&mut next));
            let previous = std::mem::replace(&mut current, Arc::new(committed));
            next = match Arc::try_unwrap(previous) {
                Ok(board) => board.into_cells(),
                Err(_) => vec![DEAD; width * height],
            };
            trace!("generation {generation} committed");
        }

        Ok(Arc::try_unwrap(current).unwrap_or_else(|shared| (*shared).clone()))
    }
}
