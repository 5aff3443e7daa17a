//! Player movement against obstacles and item pickup
//!
//! Obstacles block the player; items are collected on contact and never
//! block. Movement is resolved one axis at a time so that pushing
//! diagonally into an obstacle slides along it instead of stopping dead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chunk::ChunkStore;
use super::items::{Item, ItemColor, ItemKind};
use super::obstacles::ObstacleField;
use crate::circles_overlap;

/// Emitted once per collected item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    pub kind: ItemKind,
    pub color: ItemColor,
    pub value: u32,
    pub pos: Vec2,
}

/// Apply `delta` to a circle at `from`, reverting each axis that would
/// overlap a live obstacle.
///
/// X is resolved first; Y is then tested at the already-resolved X.
pub fn resolve_movement(from: Vec2, delta: Vec2, radius: f32, obstacles: &ObstacleField) -> Vec2 {
    let mut pos = from;

    if delta.x != 0.0 {
        let candidate = Vec2::new(from.x + delta.x, from.y);
        if obstacles.blocking(candidate, radius).is_none() {
            pos.x = candidate.x;
        }
    }

    if delta.y != 0.0 {
        let candidate = Vec2::new(pos.x, from.y + delta.y);
        if obstacles.blocking(candidate, radius).is_none() {
            pos.y = candidate.y;
        }
    }

    pos
}

/// Offer every live item overlapping the player to `accept`, marking the
/// ones it takes as collected. Refused items stay in the world.
///
/// Already-collected items are skipped by the store, so calling this twice
/// in a tick yields each item at most once.
pub fn collect_items(
    items: &mut ChunkStore<Item>,
    player_pos: Vec2,
    player_radius: f32,
    mut accept: impl FnMut(&CollectionEvent) -> bool,
) -> Vec<CollectionEvent> {
    let mut events = Vec::new();
    items.for_each_adjacent_mut(player_pos, |item| {
        if !circles_overlap(player_pos, player_radius, item.pos, item.radius()) {
            return;
        }
        let event = CollectionEvent {
            kind: item.kind,
            color: item.color(),
            value: item.value(),
            pos: item.pos,
        };
        if accept(&event) {
            item.collected = true;
            events.push(event);
        }
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ITEM_RADIUS, PLAYER_RADIUS, WORLD_CHUNK_SIZE};
    use crate::sim::chunk::{ChunkKey, chunk_of};
    use crate::sim::obstacles::{Obstacle, ObstacleKind};

    fn field_with(obstacles: &[(f32, f32, ObstacleKind)]) -> ObstacleField {
        let mut field = ObstacleField::new(0);
        for &(x, y, kind) in obstacles {
            field.insert(Obstacle::new(Vec2::new(x, y), kind));
        }
        field
    }

    #[test]
    fn test_free_movement_applies_full_delta() {
        let field = field_with(&[]);
        let pos = resolve_movement(Vec2::new(10.0, 10.0), Vec2::new(5.0, -5.0), PLAYER_RADIUS, &field);
        assert_eq!(pos, Vec2::new(15.0, 5.0));
    }

    #[test]
    fn test_diagonal_move_slides_along_blocking_obstacle() {
        // Rock (r=30) directly to the right; player (r=25) touching distance is 55
        let field = field_with(&[(200.0, 100.0, ObstacleKind::Rock)]);
        let start = Vec2::new(144.0, 100.0);
        let pos = resolve_movement(start, Vec2::new(5.0, 5.0), PLAYER_RADIUS, &field);

        // X would overlap and is reverted; Y is free and advances
        assert_eq!(pos.x, start.x);
        assert_eq!(pos.y, start.y + 5.0);
    }

    #[test]
    fn test_y_is_tested_at_resolved_x() {
        // Obstacle above-right: only blocks if we end up at the advanced x
        let field = field_with(&[(125.0, 150.0, ObstacleKind::Tree)]);
        let start = Vec2::new(100.0, 100.0);

        // Moving right alone is fine, then moving up from the new x hits the tree.
        // From the old x the same upward step would have been clear.
        let pos = resolve_movement(start, Vec2::new(20.0, 5.0), PLAYER_RADIUS, &field);
        assert_eq!(pos.x, 120.0);
        assert_eq!(pos.y, 100.0);
    }

    #[test]
    fn test_head_on_block_stops_movement() {
        let field = field_with(&[(200.0, 100.0, ObstacleKind::Rock)]);
        let start = Vec2::new(144.0, 100.0);
        let pos = resolve_movement(start, Vec2::new(5.0, 0.0), PLAYER_RADIUS, &field);
        assert_eq!(pos, start);
    }

    #[test]
    fn test_obstacle_in_neighbor_chunk_still_blocks() {
        // Player in chunk (0,0), rock just across the border in chunk (1,0)
        let field = field_with(&[(510.0, 100.0, ObstacleKind::Rock)]);
        assert_eq!(chunk_of(Vec2::new(510.0, 100.0), WORLD_CHUNK_SIZE), ChunkKey::new(1, 0));
        let start = Vec2::new(452.0, 100.0);
        let pos = resolve_movement(start, Vec2::new(5.0, 0.0), PLAYER_RADIUS, &field);
        assert_eq!(pos, start);
    }

    #[test]
    fn test_collection_is_idempotent_within_a_tick() {
        let mut store: ChunkStore<Item> = ChunkStore::new(WORLD_CHUNK_SIZE, 0);
        store.insert(ChunkKey::new(0, 0), Item::new(Vec2::new(120.0, 100.0), ItemKind::Gear));
        store.insert(ChunkKey::new(0, 0), Item::new(Vec2::new(300.0, 300.0), ItemKind::Gem));

        let player = Vec2::new(100.0, 100.0);
        let first = collect_items(&mut store, player, PLAYER_RADIUS, |_| true);
        let second = collect_items(&mut store, player, PLAYER_RADIUS, |_| true);

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ItemKind::Gear);
        assert_eq!(first[0].color, ItemColor::Gray);
        assert_eq!(first[0].value, 2);
        assert!(second.is_empty());
        assert_eq!(store.query_adjacent(player).len(), 1);
    }

    #[test]
    fn test_collection_requires_strict_overlap() {
        let mut store: ChunkStore<Item> = ChunkStore::new(WORLD_CHUNK_SIZE, 0);
        let touching = Vec2::new(100.0 + PLAYER_RADIUS + ITEM_RADIUS, 100.0);
        store.insert(ChunkKey::new(0, 0), Item::new(touching, ItemKind::Battery));
        assert!(collect_items(&mut store, Vec2::new(100.0, 100.0), PLAYER_RADIUS, |_| true).is_empty());
        assert_eq!(collect_items(&mut store, Vec2::new(101.0, 100.0), PLAYER_RADIUS, |_| true).len(), 1);
    }

    #[test]
    fn test_refused_items_stay_in_the_world() {
        let mut store: ChunkStore<Item> = ChunkStore::new(WORLD_CHUNK_SIZE, 0);
        let player = Vec2::new(100.0, 100.0);
        store.insert(ChunkKey::new(0, 0), Item::new(player, ItemKind::Battery));
        store.insert(ChunkKey::new(0, 0), Item::new(player, ItemKind::Battery));

        let mut offered = 0;
        let taken = collect_items(&mut store, player, PLAYER_RADIUS, |_| {
            offered += 1;
            offered == 1
        });
        assert_eq!(offered, 2);
        assert_eq!(taken.len(), 1);
        assert_eq!(store.query_adjacent(player).len(), 1);
    }
}
