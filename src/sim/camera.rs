//! Dead-zone camera that eases toward the player

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    /// Fraction of the remaining distance covered per tick
    pub lerp: f32,
    pub base_margin: f32,
}

impl Camera {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            lerp: CAMERA_LERP,
            base_margin: CAMERA_BASE_MARGIN,
        }
    }

    /// Margin per axis after the mode multiplier, capped at a quarter of the screen
    pub fn margins(&self, screen: Vec2, multiplier: f32) -> Vec2 {
        let cap = screen * CAMERA_MAX_MARGIN_FRACTION;
        Vec2::splat(self.base_margin * multiplier).min(cap)
    }

    /// Half extents of the dead-zone rectangle centered on the camera
    pub fn dead_zone_half(&self, screen: Vec2, multiplier: f32) -> Vec2 {
        screen * 0.5 - self.margins(screen, multiplier)
    }

    /// Where the camera wants to be so the player is back inside the dead zone
    pub fn target(&self, player: Vec2, screen: Vec2, multiplier: f32) -> Vec2 {
        let half = self.dead_zone_half(screen, multiplier);
        let lo = self.pos - half;
        let hi = self.pos + half;

        let axis = |p: f32, lo: f32, hi: f32, cur: f32, half: f32| {
            if p < lo {
                p + half
            } else if p > hi {
                p - half
            } else {
                cur
            }
        };

        Vec2::new(
            axis(player.x, lo.x, hi.x, self.pos.x, half.x),
            axis(player.y, lo.y, hi.y, self.pos.y, half.y),
        )
    }

    /// Ease one tick toward the target
    pub fn follow(&mut self, player: Vec2, screen: Vec2, multiplier: f32) {
        let target = self.target(player, screen, multiplier);
        self.pos += (target - self.pos) * self.lerp;
    }

    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_margin_is_capped_per_axis() {
        let camera = Camera::new(Vec2::ZERO);
        // 200 * 3.5 = 700, capped to 200 (x) and 150 (y)
        assert_eq!(camera.margins(SCREEN, 3.5), Vec2::new(200.0, 150.0));
        assert_eq!(camera.margins(SCREEN, 0.7), Vec2::new(140.0, 140.0));
        // Never collapses the dead zone
        assert!(camera.dead_zone_half(Vec2::new(100.0, 80.0), 10.0).cmpgt(Vec2::ZERO).all());
    }

    #[test]
    fn test_player_inside_dead_zone_never_moves_camera() {
        let mut camera = Camera::new(Vec2::new(100.0, 100.0));
        let start = camera.pos;
        // Normal mode: margin 150 (y capped), half zone = (200, 150)
        let inside = [Vec2::new(250.0, 200.0), Vec2::new(-90.0, -40.0), Vec2::new(100.0, 100.0)];
        for _ in 0..30 {
            for p in inside {
                camera.follow(p, SCREEN, 1.0);
            }
        }
        assert_eq!(camera.pos, start);
    }

    #[test]
    fn test_camera_eases_without_overshoot() {
        let mut camera = Camera::new(Vec2::ZERO);
        let player = Vec2::new(1000.0, 0.0);
        let mut last = camera.pos.x;
        for _ in 0..200 {
            camera.follow(player, SCREEN, 1.0);
            assert!(camera.pos.x >= last);
            // The dead-zone edge never passes the player
            assert!(camera.pos.x <= player.x - camera.dead_zone_half(SCREEN, 1.0).x + 1e-3);
            last = camera.pos.x;
        }
        // First step covers 10% of the gap to the target
        let mut fresh = Camera::new(Vec2::ZERO);
        fresh.follow(player, SCREEN, 1.0);
        assert!((fresh.pos.x - 80.0).abs() < 1e-3);
        assert_eq!(fresh.pos.y, 0.0);
    }

    #[test]
    fn test_target_puts_edge_on_player() {
        let camera = Camera::new(Vec2::ZERO);
        let target = camera.target(Vec2::new(-500.0, 400.0), SCREEN, 1.0);
        // half zone (200, 150): left edge at -500, top edge at 400
        assert_eq!(target, Vec2::new(-300.0, 250.0));
    }
}
