//! Static obstacles and their spaced-out chunk generator

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chunk::{ChunkKey, ChunkPopulator, ChunkStore, Placed, subsystem_salt, weighted_pick};
use crate::circles_overlap;
use crate::consts::*;

/// Salt tag for obstacle chunk seeds
const OBSTACLE_SALT_TAG: u64 = 0x0B57_AC1E_5EED_0001;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Rock,
    Tree,
    CrystalFormation,
    MetalDebris,
}

/// Spawn weights, summing to 1
pub const OBSTACLE_SPAWN_TABLE: [(ObstacleKind, f32); 4] = [
    (ObstacleKind::Rock, 0.5),
    (ObstacleKind::Tree, 0.3),
    (ObstacleKind::CrystalFormation, 0.15),
    (ObstacleKind::MetalDebris, 0.05),
];

impl ObstacleKind {
    pub fn radius(&self) -> f32 {
        match self {
            ObstacleKind::Rock => 30.0,
            ObstacleKind::Tree => 25.0,
            ObstacleKind::CrystalFormation => 35.0,
            ObstacleKind::MetalDebris => 20.0,
        }
    }

    /// Reserved: nothing in the game destroys obstacles yet
    pub fn destructible(&self) -> bool {
        matches!(self, ObstacleKind::MetalDebris)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::Tree => "tree",
            ObstacleKind::CrystalFormation => "crystal_formation",
            ObstacleKind::MetalDebris => "metal_debris",
        }
    }
}

/// A static, round obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub kind: ObstacleKind,
    pub destroyed: bool,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind) -> Self {
        Self {
            pos,
            kind,
            destroyed: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    /// True if a circle at `pos` would overlap this obstacle
    #[inline]
    pub fn blocks(&self, pos: Vec2, radius: f32) -> bool {
        circles_overlap(pos, radius, self.pos, self.radius())
    }
}

impl Placed for Obstacle {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn is_live(&self) -> bool {
        !self.destroyed
    }
}

/// Places obstacles away from chunk edges and from each other
#[derive(Debug, Clone)]
pub struct ObstaclePopulator {
    pub average: u32,
    pub edge_margin: f32,
    pub spacing_buffer: f32,
    /// Circle that must stay free (the player's spawn point)
    pub keep_clear: Option<(Vec2, f32)>,
}

impl Default for ObstaclePopulator {
    fn default() -> Self {
        Self {
            average: OBSTACLES_PER_CHUNK,
            edge_margin: OBSTACLE_EDGE_MARGIN,
            spacing_buffer: OBSTACLE_SPACING_BUFFER,
            keep_clear: Some((
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                PLAYER_RADIUS + OBSTACLE_SPACING_BUFFER,
            )),
        }
    }
}

impl ChunkPopulator for ObstaclePopulator {
    type Entity = Obstacle;

    fn populate(&self, key: ChunkKey, chunk_size: f32, rng: &mut Pcg32) -> Vec<Obstacle> {
        let origin = key.origin(chunk_size);
        let low = self.average.saturating_sub(2);
        let target = rng.random_range(low..=self.average + 4) as usize;
        // Bounded so crowded chunks still terminate
        let max_attempts = target * 3;

        let mut placed: Vec<Obstacle> = Vec::with_capacity(target);
        let mut attempts = 0;
        while placed.len() < target && attempts < max_attempts {
            attempts += 1;

            let local = Vec2::new(
                rng.random_range(self.edge_margin..chunk_size - self.edge_margin),
                rng.random_range(self.edge_margin..chunk_size - self.edge_margin),
            );
            let kind = weighted_pick(&OBSTACLE_SPAWN_TABLE, rng.random::<f32>());
            let candidate = Obstacle::new(origin + local, kind);

            let spawn_free = self
                .keep_clear
                .is_none_or(|(center, r)| !candidate.blocks(center, r));
            let clear = spawn_free
                && placed.iter().all(|existing| {
                    !circles_overlap(
                        candidate.pos,
                        candidate.radius() + self.spacing_buffer,
                        existing.pos,
                        existing.radius(),
                    )
                });
            if clear {
                placed.push(candidate);
            }
        }

        placed
    }
}

/// All obstacles in the world, chunked
#[derive(Debug, Clone)]
pub struct ObstacleField {
    store: ChunkStore<Obstacle>,
    populator: ObstaclePopulator,
}

impl ObstacleField {
    pub fn new(world_seed: u64) -> Self {
        Self {
            store: ChunkStore::new(
                WORLD_CHUNK_SIZE,
                subsystem_salt(world_seed, OBSTACLE_SALT_TAG),
            ),
            populator: ObstaclePopulator::default(),
        }
    }

    pub fn store(&self) -> &ChunkStore<Obstacle> {
        &self.store
    }

    /// Hand-place an obstacle
    pub fn insert(&mut self, obstacle: Obstacle) {
        let key = super::chunk::chunk_of(obstacle.pos, WORLD_CHUNK_SIZE);
        self.store.insert(key, obstacle);
    }

    /// Make sure the chunks around the player exist
    pub fn update_generation(&mut self, player_pos: Vec2) -> usize {
        self.store
            .ensure_around(player_pos, GENERATION_RADIUS, &self.populator)
    }

    /// First live obstacle overlapping a circle at `pos`
    pub fn blocking(&self, pos: Vec2, radius: f32) -> Option<&Obstacle> {
        self.store
            .query_adjacent(pos)
            .into_iter()
            .find(|o| o.blocks(pos, radius))
    }

    /// Live obstacles within `radius` of `center`, for drawing
    pub fn visible(&self, center: Vec2, radius: f32) -> Vec<&Obstacle> {
        self.store.query_near(center, radius)
    }

    /// Drop all generated chunks
    pub fn reset(&mut self) {
        self.store.clear();
    }
}
