//! Headless demo runner
//!
//! Loads settings and the score file, lets the autopilot play a run on the
//! fixed-timestep loop, types a name for the leaderboard and prints the
//! result. A windowed front end drives the same pieces with real key events.

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec2;

use octo_robot::consts::*;
use octo_robot::platform::{InputState, Key, KeyEvent};
use octo_robot::renderer::{DrawList, vertex_bytes};
use octo_robot::settings::DEFAULT_SETTINGS_FILE;
use octo_robot::sim::{GameEvent, GamePhase, GameState, tick};
use octo_robot::ui::{FpsCounter, HudView, help_lines};
use octo_robot::{HighScores, Settings};

/// Simulated frame time; two ticks per frame exercises the accumulator
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after this many simulated seconds
const MAX_RUN_SECONDS: f32 = 600.0;
/// Name the demo types on the leaderboard
const DEMO_NAME: &str = "Autopilot";
/// Stand-in monitor size used when fullscreen
const DISPLAY_SIZE: Vec2 = Vec2::new(1920.0, 1080.0);
/// Frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 300;

/// Demo instance holding all state
struct Demo {
    settings: Settings,
    settings_path: PathBuf,
    state: GameState,
    scores: HighScores,
    input: InputState,
    accumulator: f32,
    frames: u64,
    collected: u32,
    resets: u32,
    peak_vertex_bytes: usize,
    fps: FpsCounter,
    started: Instant,
}

impl Demo {
    fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let mut input = InputState::new();
        input.idle_mode = true;
        input.set_fullscreen(settings.fullscreen);

        let mut state = GameState::from_settings(&settings);
        state.resize(settings.viewport(DISPLAY_SIZE));

        Self {
            scores: HighScores::load(&settings.score_file),
            settings,
            settings_path,
            state,
            input,
            accumulator: 0.0,
            frames: 0,
            collected: 0,
            resets: 0,
            peak_vertex_bytes: 0,
            fps: FpsCounter::new(),
            started: Instant::now(),
        }
    }

    /// Apply window requests from the keyboard, saving changed preferences
    fn sync_window(&mut self) {
        if self
            .input
            .sync_fullscreen(&mut self.settings, &mut self.state, DISPLAY_SIZE)
        {
            self.settings.save(&self.settings_path);
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shots ride on the first substep only
            let input = self.input.take_tick_input();
            for event in tick(&mut self.state, &input, &mut self.scores, SIM_DT) {
                self.on_event(event);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.frames += 1;
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ItemCollected(_) => self.collected += 1,
            GameEvent::ScoreReset { new_color } => {
                self.resets += 1;
                log::debug!("Score reset, now {}", new_color.as_str());
            }
            GameEvent::GameCompleted { score, time } => {
                log::info!("Target reached: {score} in {time:.2}s");
            }
            GameEvent::HighScoreRecorded { rank } => {
                log::info!("Recorded at rank {rank}");
            }
            GameEvent::PhaseChanged { from, to } => {
                log::debug!("{from:?} -> {to:?}");
            }
        }
    }

    /// Build the frame the way a renderer would, keeping vertex stats
    fn render(&mut self) {
        let list = DrawList::build(&self.state);
        let vertices = list.to_vertices();
        self.peak_vertex_bytes = self.peak_vertex_bytes.max(vertex_bytes(&vertices).len());

        self.fps.record(self.started.elapsed().as_secs_f64());
        if self.settings.show_fps && self.frames % FPS_LOG_INTERVAL == 0 {
            log::info!("{} fps", self.fps.fps());
        }
    }

    /// Type the demo name once the game asks for it
    fn type_name(&mut self) {
        let phase = self.state.phase();
        for c in DEMO_NAME.chars() {
            self.input.handle(KeyEvent::press(Key::Char(c)), phase);
        }
        self.input.handle(KeyEvent::press(Key::Enter), phase);
    }

    fn run(&mut self) {
        let max_frames = (MAX_RUN_SECONDS / FRAME_DT) as u64;
        let mut named = false;

        while self.frames < max_frames {
            self.sync_window();
            self.update(FRAME_DT);
            self.render();

            if self.input.quit_requested() {
                log::info!("Quit requested");
                break;
            }

            match self.state.phase() {
                GamePhase::NameEntry if !named => {
                    self.type_name();
                    named = true;
                }
                GamePhase::HighScores => break,
                _ => {}
            }
        }
    }

    fn print_summary(&self) {
        let session = &self.state.session;
        println!("\n=== RUN SUMMARY ===");
        println!("Seed: {}", self.state.seed);
        println!("Mode: {}", session.mode.as_str());
        println!("Simulated ticks: {}", self.state.time_ticks);
        println!("Items collected: {} (score resets: {})", self.collected, self.resets);
        println!(
            "Chunks generated: {} item, {} obstacle",
            self.state.items.store().chunk_count(),
            self.state.obstacles.store().chunk_count()
        );
        println!("Peak vertex buffer: {} bytes", self.peak_vertex_bytes);
        if self.settings.show_fps {
            println!("Frame rate: {} fps", self.fps.fps());
        }

        match HudView::for_state(&self.state, &self.scores, chrono::Local::now()) {
            HudView::HighScores { rows } => {
                println!("\n=== HIGH SCORES ===");
                for row in rows {
                    let marker = if row.highlight { ">" } else { " " };
                    println!(
                        "{marker}{:>2}. {:<20} {:>4}  {}  ({})",
                        row.rank, row.name, row.score, row.time, row.date
                    );
                }
            }
            HudView::Playing(bar) | HudView::Paused(bar) => {
                println!(
                    "Target not reached: {}/{} after {}",
                    bar.score, bar.target, bar.time
                );
            }
            other => println!("Stopped in {other:?}"),
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Octo-Robot (headless demo) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&settings_path);

    println!("Starting Octo-Robot!");
    for line in help_lines() {
        println!("{line}");
    }

    let mut demo = Demo::new(settings, settings_path);
    demo.run();
    demo.print_summary();
}
