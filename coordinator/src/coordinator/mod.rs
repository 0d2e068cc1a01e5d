// coordinator/mod.rs - One group member's run from join to teardown

use std::io::{self, BufRead, Write};

use conway::{run_simulation, EngineError, EvolutionEngine, RunParameters, SimulationReport};
use log::{debug, error, info};
use thiserror::Error;

use crate::config::Config;
use crate::console::{self, InputError};
use crate::group::{GroupError, GroupSession, GroupTransport, Role};

#[cfg(test)]
mod tests;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("process group failure: {0}")]
    Group(#[from] GroupError),
    #[error("simulation failed: {0}")]
    Engine(#[from] EngineError),
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

/// How a member's run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The leader ran the simulation to the end.
    Completed(SimulationReport),
    /// The leader rejected the operator's generation count.
    InputRejected,
    /// A follower; nothing to do besides joining and leaving.
    Idle,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed(_) | Outcome::Idle => 0,
            Outcome::InputRejected => 1,
        }
    }
}

/// Join the group through `transport`, do this member's share of the work
/// and tear the group down again. Teardown happens on every return path;
/// an error from the leader's work is returned after it.
pub fn run_member<T, R, W, F, E>(
    transport: T,
    config: &Config,
    input: &mut R,
    output: &mut W,
    make_engine: F,
) -> Result<Outcome, CoordinatorError>
where
    T: GroupTransport,
    R: BufRead + ?Sized,
    W: Write + ?Sized,
    F: FnOnce(&Config) -> Result<E, EngineError>,
    E: EvolutionEngine,
{
    let session = GroupSession::join(transport)?;

    let result = match session.role() {
        Role::Leader => lead(config, input, output, make_engine),
        Role::Follower => {
            debug!("rank {} is a follower, going straight to teardown", session.membership().rank);
            Ok(Outcome::Idle)
        }
    };

    match (session.finalize(), result) {
        (Ok(()), result) => result,
        (Err(teardown), Ok(_)) => Err(teardown.into()),
        (Err(teardown), Err(err)) => {
            // The run's own failure is the one the operator needs to see.
            error!("group teardown also failed: {teardown}");
            Err(err)
        }
    }
}

fn lead<R, W, F, E>(
    config: &Config,
    input: &mut R,
    output: &mut W,
    make_engine: F,
) -> Result<Outcome, CoordinatorError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
    F: FnOnce(&Config) -> Result<E, EngineError>,
    E: EvolutionEngine,
{
    let generations = match console::read_generation_count(input, output) {
        Ok(generations) => generations,
        Err(InputError::Io(err)) => return Err(err.into()),
        Err(err) => {
            error!("rejected operator input: {err:?}");
            writeln!(output, "{err}")?;
            output.flush()?;
            return Ok(Outcome::InputRejected);
        }
    };

    // Dimensions are checked before the engine claims any resources.
    let params = RunParameters::new(config.board.width, config.board.height, generations)
        .map_err(EngineError::from)?;
    let mut engine = make_engine(config)?;

    let report = run_simulation(&mut engine, &params, &config.seeding, config.board.boundary)?;
    info!(
        "finished {} generations: {} -> {} live cells, digest {:016x}",
        report.generations, report.initial_live, report.final_live, report.final_digest
    );
    Ok(Outcome::Completed(report))
}
