//! Game state aggregate
//!
//! Everything one run needs: the session, the player, the three chunked
//! worlds and the camera. The world seed is fixed for the lifetime of the
//! state, so a restart brings back the same world.

use glam::Vec2;

use super::background::Background;
use super::camera::Camera;
use super::items::{ItemColor, ItemField};
use super::obstacles::ObstacleField;
use super::player::Player;
use super::session::{GameMode, GamePhase, Session};
use crate::settings::Settings;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// World seed shared by every generator
    pub seed: u64,
    pub session: Session,
    pub player: Player,
    pub items: ItemField,
    pub obstacles: ObstacleField,
    pub background: Background,
    pub camera: Camera,
    /// Screen size in world units, for the camera and culling
    pub screen: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(seed: u64, screen: Vec2, mode: GameMode, start_color: ItemColor) -> Self {
        let player = Player::new(start_color);
        let mut state = Self {
            seed,
            session: Session::new(mode),
            camera: Camera::new(player.pos),
            player,
            items: ItemField::new(seed),
            obstacles: ObstacleField::new(seed),
            background: Background::new(seed),
            screen,
            time_ticks: 0,
        };
        state.generate_world();
        state
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.seed,
            settings.screen_size(),
            settings.mode,
            settings.starting_color(),
        )
    }

    /// Materialize chunks around the player and the camera
    pub fn generate_world(&mut self) -> usize {
        let pos = self.player.pos;
        self.items.update_generation(pos)
            + self.obstacles.update_generation(pos)
            + self.background.update_generation(self.camera.pos, self.screen)
    }

    /// Start over: fresh session, player back at spawn, same world regenerated
    pub fn restart(&mut self) {
        log::info!("Restarting run (seed {})", self.seed);
        self.session.restart();
        self.player.reset();
        self.camera.reset(self.player.pos);
        self.items.reset();
        self.obstacles.reset();
        self.background.reset();
        self.time_ticks = 0;
        self.generate_world();
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Change the screen size (window resize or fullscreen toggle)
    pub fn resize(&mut self, screen: Vec2) {
        self.screen = screen.max(Vec2::ONE);
        self.background.update_generation(self.camera.pos, self.screen);
    }
}
