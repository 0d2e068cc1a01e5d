// ui.rs - egui front end for the board viewer

use std::time::{Duration, Instant};

use conway::patterns;
use conway::Boundary;
use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};

use crate::GameOfLife;

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Auto-step if running
        if self.is_running && self.last_update.elapsed() >= self.update_interval {
            self.step();
            self.last_update = Instant::now();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life (column tasks)");

            // Controls
            ui.horizontal(|ui| {
                let button_text = if self.is_running { "⏸ Pause" } else { "▶ Start" };
                if ui.button(button_text).clicked() {
                    self.is_running = !self.is_running;
                    if self.is_running {
                        self.last_update = Instant::now();
                    }
                }

                if ui.button("⏭ Step").clicked() {
                    self.is_running = false;
                    self.step();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.is_running = false;
                    self.clear();
                }

                if ui.button("🎲 Random").clicked() {
                    self.is_running = false;
                    self.randomize();
                }

                ui.separator();

                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(patterns::PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in patterns::PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.is_running = false;
                    self.apply_selected_pattern();
                }

                ui.separator();

                ui.label(format!("Generation: {}", self.generation));
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1000.0 / self.update_interval.as_millis().max(1) as f32;
                if ui.add(egui::Slider::new(&mut speed, 0.5..=90.0).suffix(" gen/sec")).changed() {
                    self.update_interval = Duration::from_millis((1000.0 / speed) as u64);
                }

                ui.separator();

                ui.label("Start dead:");
                ui.add(egui::Slider::new(&mut self.seeding.probability, 0.0..=1.0));

                ui.separator();

                let mut wrap = self.boundary == Boundary::Wrap;
                if ui.checkbox(&mut wrap, "Wrap edges").changed() {
                    self.boundary = if wrap { Boundary::Wrap } else { Boundary::Dead };
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            ui.label("Click cells to toggle them alive/dead while paused.");

            ui.separator();

            // Draw the board
            let box_size = 11.0;
            let spacing = 0.5;
            let (rows, cols) = (self.board.height(), self.board.width());

            let start_pos = ui.cursor().min;
            let total_size = Vec2::new(
                (box_size + spacing) * cols as f32 - spacing,
                (box_size + spacing) * rows as f32 - spacing,
            );

            let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());

            painter.rect_filled(
                Rect::from_min_size(start_pos, total_size),
                0.0,
                Color32::BLACK,
            );

            for row in 0..rows {
                for col in 0..cols {
                    let x = start_pos.x + col as f32 * (box_size + spacing);
                    let y = start_pos.y + row as f32 * (box_size + spacing);
                    let rect = Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size));

                    let cell_color = if self.board.get(row, col) {
                        self.live_color
                    } else {
                        self.dead_color
                    };
                    painter.rect_filled(rect, 1.0, cell_color);
                    painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
                }
            }

            if !self.is_running && response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let col = ((pos.x - start_pos.x) / (box_size + spacing)).floor();
                    let row = ((pos.y - start_pos.y) / (box_size + spacing)).floor();
                    if row >= 0.0 && col >= 0.0 {
                        self.toggle_cell(row as usize, col as usize);
                    }
                }
            }

            ui.separator();

            let total = rows * cols;
            let live_cells = self.board.live_count();
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {}", live_cells));
                ui.label(format!("Dead cells: {}", total - live_cells));
                ui.label(format!("Population: {:.1}%", (live_cells as f32 / total as f32) * 100.0));
            });
        });

        // Keep animating while running
        if self.is_running {
            ctx.request_repaint();
        }
    }
}
