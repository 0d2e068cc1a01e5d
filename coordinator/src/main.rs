// main.rs - Join the group, let rank 0 drive one simulation, tear down

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use conway::engine;
use conway_coordinator::config::CONFIG_ENV;
use conway_coordinator::{run_member, Config, LauncherTransport, LocalGroup, Outcome};
use log::info;

fn main() -> anyhow::Result<ExitCode> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    info!(
        "board {}x{} ({:?} boundary), {:?} engine",
        config.board.width, config.board.height, config.board.boundary, config.engine.kind
    );

    let outcome = if config.group.local_members > 1 {
        run_local_group(&config)?
    } else {
        run_launched(&config)?
    };
    Ok(ExitCode::from(outcome.exit_code()))
}

/// This process is one member of a group started by an external launcher.
fn run_launched(config: &Config) -> anyhow::Result<Outcome> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    run_member(LauncherTransport::from_env(), config, &mut input, &mut output, |c| {
        engine::build(c.engine.kind)
    })
    .context("Group member failed")
}

/// Every member runs as a thread of this process; rank 0 owns the console.
fn run_local_group(config: &Config) -> anyhow::Result<Outcome> {
    let group = LocalGroup::new(config.group.local_members).context("Failed to form local group")?;
    info!("starting local group of {} members", group.size());

    let results = group.run(|member| {
        let (mut input, mut output): (Box<dyn BufRead>, Box<dyn Write>) = if member.rank() == 0 {
            (Box::new(io::stdin().lock()), Box::new(io::stdout()))
        } else {
            (Box::new(io::empty()), Box::new(io::sink()))
        };
        run_member(member, config, &mut input, &mut output, |c| engine::build(c.engine.kind))
    });

    let mut leader = None;
    for (rank, joined) in results.into_iter().enumerate() {
        match joined {
            Ok(Ok(outcome)) if rank == 0 => leader = Some(outcome),
            Ok(Ok(_)) => {}
            Ok(Err(err)) => return Err(anyhow!(err).context(format!("Group member {rank} failed"))),
            Err(_) => bail!("Group member {rank} panicked"),
        }
    }
    leader.context("Leader produced no outcome")
}
