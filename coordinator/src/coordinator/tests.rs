// coordinator/tests.rs

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use conway::{Board, Boundary, EvolutionEngine, ReferenceEngine};

use super::*;
use crate::group::{LocalGroup, Membership};

/// Records every call and leaves the board untouched.
#[derive(Clone, Default)]
struct SpyEngine {
    calls: Arc<Mutex<Vec<(usize, usize, u32)>>>,
}

impl EvolutionEngine for SpyEngine {
    fn name(&self) -> &'static str {
        "spy"
    }

    fn evolve(&mut self, board: Board, generations: u32, _: Boundary) -> Result<Board, EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push((board.width(), board.height(), generations));
        Ok(board)
    }
}

struct FailingEngine;

impl EvolutionEngine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn evolve(&mut self, _: Board, generations: u32, _: Boundary) -> Result<Board, EngineError> {
        Err(EngineError::Kernel { generation: generations, reason: "device lost".into() })
    }
}

/// Run a local group where only rank 0 sees `operator_input`.
fn run_group(
    size: usize,
    operator_input: &str,
    spy: &SpyEngine,
) -> (Vec<Result<Outcome, CoordinatorError>>, String, usize) {
    let config = Config::default();
    let group = LocalGroup::new(size).unwrap();
    let leader_output = Mutex::new(Vec::new());

    let results = group.run(|member| {
        let leader = member.rank() == 0;
        let mut input = if leader { operator_input.as_bytes() } else { &[][..] };
        let mut output = Vec::new();
        let result = run_member(member, &config, &mut input, &mut output, |_| Ok(spy.clone()));
        if leader {
            *leader_output.lock().unwrap() = output;
        }
        result
    });

    let results = results.into_iter().map(|joined| joined.unwrap()).collect();
    let output = String::from_utf8(leader_output.into_inner().unwrap()).unwrap();
    (results, output, group.finalized_count())
}

#[test_log::test]
fn leader_runs_the_simulation_once() {
    let spy = SpyEngine::default();
    let (results, output, finalized) = run_group(3, "7\n", &spy);

    assert!(matches!(results[0], Ok(Outcome::Completed(ref r)) if r.generations == 7));
    assert!(results[1..].iter().all(|r| matches!(r, Ok(Outcome::Idle))));
    assert_eq!(*spy.calls.lock().unwrap(), vec![(64, 64, 7)]);
    assert_eq!(output, console::PROMPT);
    assert_eq!(finalized, 3);
}

#[test_log::test]
fn invalid_input_skips_the_simulation_but_not_teardown() {
    for (text, diagnostic) in [
        ("abc\n", "Failed to read the number of generations. Exiting.\n"),
        ("-5\n", "Invalid number of generations. Exiting.\n"),
        ("0\n", "Invalid number of generations. Exiting.\n"),
        ("", "Failed to read the number of generations. Exiting.\n"),
    ] {
        let spy = SpyEngine::default();
        let (results, output, finalized) = run_group(4, text, &spy);

        let leader = results[0].as_ref().unwrap();
        assert!(matches!(leader, Outcome::InputRejected), "{text:?}");
        assert_eq!(leader.exit_code(), 1);
        assert!(spy.calls.lock().unwrap().is_empty(), "{text:?} reached the engine");
        assert_eq!(output, format!("{}{diagnostic}", console::PROMPT));
        assert_eq!(finalized, 4, "{text:?} left a member hanging");
    }
}

#[test_log::test]
fn followers_exit_cleanly() {
    assert_eq!(Outcome::Idle.exit_code(), 0);
    let spy = SpyEngine::default();
    let (results, _, _) = run_group(2, "3\n", &spy);
    assert_eq!(results[1].as_ref().unwrap().exit_code(), 0);
}

#[test_log::test]
fn engine_failure_propagates_after_teardown() {
    let config = Config::default();
    let group = LocalGroup::new(2).unwrap();
    let results = group.run(|member| {
        let mut input = "10\n".as_bytes();
        run_member(member, &config, &mut input, &mut io::sink(), |_| Ok(FailingEngine))
    });

    assert!(matches!(
        results[0].as_ref().unwrap(),
        Err(CoordinatorError::Engine(EngineError::Kernel { .. }))
    ));
    assert_eq!(group.finalized_count(), 2);
}

#[test_log::test]
fn engine_is_not_built_for_an_empty_board() {
    let mut config = Config::default();
    config.board.width = 0;
    let built = AtomicUsize::new(0);
    let group = LocalGroup::new(1).unwrap();
    let results = group.run(|member| {
        let mut input = "10\n".as_bytes();
        run_member(member, &config, &mut input, &mut io::sink(), |_| {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(ReferenceEngine::new())
        })
    });

    assert!(matches!(results[0].as_ref().unwrap(), Err(CoordinatorError::Engine(EngineError::Board(_)))));
    assert_eq!(built.load(Ordering::SeqCst), 0);
    assert_eq!(group.finalized_count(), 1);
}

#[test_log::test]
fn single_member_group_runs_a_real_simulation() {
    let mut config = Config::default();
    config.seeding.seed = Some(8);
    config.board.width = 16;
    config.board.height = 16;
    let group = LocalGroup::new(1).unwrap();
    let results = group.run(|member| {
        let mut input = "4\n".as_bytes();
        run_member(member, &config, &mut input, &mut io::sink(), |_| Ok(ReferenceEngine::new()))
    });

    let Ok(Ok(Outcome::Completed(report))) = &results[0] else {
        panic!("leader did not complete");
    };
    assert_eq!(report.final_board.width(), 16);
    assert_eq!(report.final_live, report.final_board.live_count());
}

/// Single-member transport whose teardown always fails.
struct BrokenTeardown;

impl GroupTransport for BrokenTeardown {
    fn initialize(&mut self) -> Result<Membership, GroupError> {
        Membership::new(0, 1)
    }

    fn finalize(&mut self) -> Result<(), GroupError> {
        Err(GroupError::AlreadyFinalized)
    }
}

#[test_log::test]
fn engine_error_survives_a_failed_teardown() {
    let config = Config::default();
    let mut input = "10\n".as_bytes();
    let result = run_member(BrokenTeardown, &config, &mut input, &mut io::sink(), |_| Ok(FailingEngine));
    assert!(matches!(result, Err(CoordinatorError::Engine(EngineError::Kernel { .. }))));
}

#[test_log::test]
fn failed_teardown_is_reported_after_a_clean_run() {
    let config = Config::default();
    let mut input = "2\n".as_bytes();
    let result = run_member(BrokenTeardown, &config, &mut input, &mut io::sink(), |_| {
        Ok(ReferenceEngine::new())
    });
    assert!(matches!(result, Err(CoordinatorError::Group(GroupError::AlreadyFinalized))));
}
