//! Game settings and preferences
//!
//! Persisted as JSON next to the score file. Every field has a default, so a
//! partial or missing file is fine.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::DEFAULT_SCORE_FILE;
use crate::persistence;
use crate::sim::items::ItemColor;
use crate::sim::session::GameMode;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub screen_width: u32,
    pub screen_height: u32,
    pub fullscreen: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Gameplay ===
    /// Difficulty mode at startup
    pub mode: GameMode,
    /// World seed; the same seed always builds the same world
    pub seed: u64,
    /// Player color at spawn, by name ("yellow", "gray", ...)
    pub starting_color: String,

    // === Files ===
    pub score_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH as u32,
            screen_height: SCREEN_HEIGHT as u32,
            fullscreen: false,
            show_fps: false,

            mode: GameMode::default(),
            seed: 42,
            starting_color: ItemColor::default().as_str().to_string(),

            score_file: PathBuf::from(DEFAULT_SCORE_FILE),
        }
    }
}

impl Settings {
    /// Screen size in world units (never zero)
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width.max(1) as f32, self.screen_height.max(1) as f32)
    }

    /// Visible area: the whole `display` when fullscreen, else the window
    pub fn viewport(&self, display: Vec2) -> Vec2 {
        if self.fullscreen {
            display.max(Vec2::ONE)
        } else {
            self.screen_size()
        }
    }

    /// Parsed starting color; unknown names fall back to yellow
    pub fn starting_color(&self) -> ItemColor {
        ItemColor::from_name(&self.starting_color)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) {
        match persistence::save_json(path, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
