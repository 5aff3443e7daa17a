//! Octo-Robot - A color-matching collector in an infinite world
//!
//! Core modules:
//! - `sim`: Deterministic simulation (chunked world generation, collisions, game state)
//! - `renderer`: Draw lists and CPU-side vertex building
//! - `platform`: Key event translation into tick input
//! - `persistence`: JSON file load/save with atomic replace
//! - `highscores`: Top-10 leaderboard
//! - `settings`: Process-level configuration

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default window size
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 25.0;
    /// Units per second (5 units per tick at 60 Hz)
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 100.0;

    /// Items and obstacles share one chunk grid
    pub const WORLD_CHUNK_SIZE: f32 = 500.0;
    /// Chunks generated around the player on each axis
    pub const GENERATION_RADIUS: i32 = 2;

    pub const ITEM_RADIUS: f32 = 15.0;
    pub const ITEMS_PER_CHUNK: u32 = 8;
    /// Item count is drawn from ITEMS_PER_CHUNK ± this
    pub const ITEM_COUNT_SPREAD: u32 = 3;

    pub const OBSTACLES_PER_CHUNK: u32 = 6;
    /// Keep obstacle centers this far from chunk edges
    pub const OBSTACLE_EDGE_MARGIN: f32 = 50.0;
    /// Extra clearance between obstacles placed in the same chunk
    pub const OBSTACLE_SPACING_BUFFER: f32 = 20.0;

    /// Score needed to finish a run
    pub const TARGET_SCORE: u32 = 100;
    /// Entered names are capped at this many characters
    pub const MAX_NAME_LEN: usize = 20;

    /// Camera dead-zone margin before the mode multiplier is applied
    pub const CAMERA_BASE_MARGIN: f32 = 200.0;
    /// Margins never exceed this fraction of the screen axis
    pub const CAMERA_MAX_MARGIN_FRACTION: f32 = 0.25;
    /// Exponential smoothing factor per tick
    pub const CAMERA_LERP: f32 = 0.1;

    /// Items/obstacles farther than this from the camera are not drawn
    pub const RENDER_RADIUS: f32 = 1000.0;
}

/// Squared distance check without a square root
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// True when two circles strictly overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}
