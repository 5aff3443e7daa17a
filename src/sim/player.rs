//! The player avatar

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_movement;
use super::items::ItemColor;
use super::obstacles::ObstacleField;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Units per second, set from held movement keys
    pub vel: Vec2,
    /// Position before the last step
    pub prev_pos: Vec2,
    pub color: ItemColor,
    pub radius: f32,
    start_color: ItemColor,
}

impl Player {
    pub fn new(start_color: ItemColor) -> Self {
        let start = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        Self {
            pos: start,
            vel: Vec2::ZERO,
            prev_pos: start,
            color: start_color,
            radius: PLAYER_RADIUS,
            start_color,
        }
    }

    /// Back to the spawn point with the starting color
    pub fn reset(&mut self) {
        *self = Self::new(self.start_color);
    }

    /// Set velocity from a per-axis direction in [-1, 1]
    pub fn steer(&mut self, direction: Vec2) {
        self.vel = direction.clamp(Vec2::NEG_ONE, Vec2::ONE) * PLAYER_SPEED;
    }

    /// Move by `vel * dt`, sliding around obstacles
    pub fn step(&mut self, dt: f32, obstacles: &ObstacleField) {
        self.prev_pos = self.pos;
        if self.vel != Vec2::ZERO {
            self.pos = resolve_movement(self.pos, self.vel * dt, self.radius, obstacles);
        }
    }
}
