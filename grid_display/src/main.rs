// main.rs - Board viewer: seed, step and watch a run on the task engine

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use conway::{Board, Boundary, EvolutionEngine, Seeding, TaskEngine};
use eframe::egui;
use egui::Color32;
use log::{info, warn};

mod ui;

const BOARD_WIDTH: usize = 64;
const BOARD_HEIGHT: usize = 64;
const HISTORY_LEN: usize = 10;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = GameOfLife::new().context("Failed to start the evolution engine")?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 950.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

pub struct GameOfLife {
    pub board: Board,
    engine: TaskEngine,
    pub boundary: Boundary,
    pub seeding: Seeding,

    pub is_running: bool,
    pub last_update: Instant,
    pub update_interval: Duration,
    pub generation: u32,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,

    history: [u64; HISTORY_LEN],
    history_count: usize,
}

impl GameOfLife {
    fn new() -> Result<Self, conway::EngineError> {
        let seeding = Seeding::default();
        Ok(Self {
            board: Board::random(BOARD_WIDTH, BOARD_HEIGHT, &seeding)?,
            engine: TaskEngine::new()?,
            boundary: Boundary::Wrap,
            seeding,
            is_running: false,
            last_update: Instant::now(),
            update_interval: Duration::from_millis(200),
            generation: 0,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
            history: [0; HISTORY_LEN],
            history_count: 0,
        })
    }

    /// Advance one generation. Stops the run on failure or once the board
    /// repeats one of the last few generations.
    pub fn step(&mut self) {
        match self.engine.evolve(self.board.clone(), 1, self.boundary) {
            Ok(next) => {
                self.board = next;
                self.generation += 1;
            }
            Err(err) => {
                warn!("step failed: {err}");
                self.is_running = false;
                return;
            }
        }
        if self.check_for_cycle() {
            info!("board repeats after generation {}, pausing", self.generation);
            self.is_running = false;
        }
    }

    fn check_for_cycle(&mut self) -> bool {
        let digest = self.board.digest();
        if self.history[..self.history_count.min(HISTORY_LEN)].contains(&digest) {
            return true;
        }
        self.history[self.history_count % HISTORY_LEN] = digest;
        self.history_count += 1;
        false
    }

    fn reset_history(&mut self) {
        self.generation = 0;
        self.history = [0; HISTORY_LEN];
        self.history_count = 0;
    }

    pub fn clear(&mut self) {
        self.board.clear();
        self.reset_history();
    }

    pub fn randomize(&mut self) {
        match Board::random(self.board.width(), self.board.height(), &self.seeding) {
            Ok(board) => self.board = board,
            Err(err) => warn!("could not seed board: {err}"),
        }
        self.reset_history();
    }

    pub fn apply_selected_pattern(&mut self) {
        if let Some(pattern) = conway::patterns::PATTERNS.get(self.selected_pattern) {
            conway::patterns::apply_centered(&mut self.board, pattern);
            self.reset_history();
        }
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        if row < self.board.height() && col < self.board.width() {
            self.board.toggle(row, col);
        }
    }
}
