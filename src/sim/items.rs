//! Collectible items and their chunk generator

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chunk::{ChunkKey, ChunkPopulator, ChunkStore, Placed, subsystem_salt, weighted_pick};
use super::collision::{CollectionEvent, collect_items};
use crate::consts::*;

/// Salt tag for item chunk seeds
const ITEM_SALT_TAG: u64 = 0x17E5_C011_EC7A_B1E5;

/// Item color tags. The player carries one of these too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemColor {
    #[default]
    Yellow,
    Gray,
    Cyan,
    Purple,
    Red,
}

impl ItemColor {
    pub const ALL: [ItemColor; 5] = [
        ItemColor::Yellow,
        ItemColor::Gray,
        ItemColor::Cyan,
        ItemColor::Purple,
        ItemColor::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemColor::Yellow => "yellow",
            ItemColor::Gray => "gray",
            ItemColor::Cyan => "cyan",
            ItemColor::Purple => "purple",
            ItemColor::Red => "red",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yellow" => Some(ItemColor::Yellow),
            "gray" | "grey" => Some(ItemColor::Gray),
            "cyan" => Some(ItemColor::Cyan),
            "purple" => Some(ItemColor::Purple),
            "red" => Some(ItemColor::Red),
            _ => None,
        }
    }

    /// Like `parse`, but unknown names fall back to the default color
    pub fn from_name(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("Unknown color '{}', using {}", s, Self::default().as_str());
            Self::default()
        })
    }
}

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    Battery,
    Gear,
    Gem,
    Crystal,
    PowerCore,
}

/// Fixed per-type properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemProps {
    pub color: ItemColor,
    pub value: u32,
    pub spawn_weight: f32,
}

/// Spawn weights, summing to 1
pub const ITEM_SPAWN_TABLE: [(ItemKind, f32); 5] = [
    (ItemKind::Battery, 0.35),
    (ItemKind::Gear, 0.30),
    (ItemKind::Gem, 0.20),
    (ItemKind::Crystal, 0.10),
    (ItemKind::PowerCore, 0.05),
];

impl ItemKind {
    pub fn props(&self) -> ItemProps {
        let (color, value, spawn_weight) = match self {
            ItemKind::Battery => (ItemColor::Yellow, 1, 0.35),
            ItemKind::Gear => (ItemColor::Gray, 2, 0.30),
            ItemKind::Gem => (ItemColor::Cyan, 5, 0.20),
            ItemKind::Crystal => (ItemColor::Purple, 10, 0.10),
            ItemKind::PowerCore => (ItemColor::Red, 20, 0.05),
        };
        ItemProps {
            color,
            value,
            spawn_weight,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Battery => "battery",
            ItemKind::Gear => "gear",
            ItemKind::Gem => "gem",
            ItemKind::Crystal => "crystal",
            ItemKind::PowerCore => "power_core",
        }
    }
}

/// A collectible in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
    pub collected: bool,
}

impl Item {
    pub fn new(pos: Vec2, kind: ItemKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        ITEM_RADIUS
    }

    #[inline]
    pub fn color(&self) -> ItemColor {
        self.kind.props().color
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.kind.props().value
    }
}

impl Placed for Item {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn is_live(&self) -> bool {
        !self.collected
    }
}

/// Scatters items uniformly over a chunk
#[derive(Debug, Clone)]
pub struct ItemPopulator {
    pub average: u32,
    pub spread: u32,
}

impl Default for ItemPopulator {
    fn default() -> Self {
        Self {
            average: ITEMS_PER_CHUNK,
            spread: ITEM_COUNT_SPREAD,
        }
    }
}

impl ChunkPopulator for ItemPopulator {
    type Entity = Item;

    fn populate(&self, key: ChunkKey, chunk_size: f32, rng: &mut Pcg32) -> Vec<Item> {
        let origin = key.origin(chunk_size);
        let low = self.average.saturating_sub(self.spread);
        let count = rng.random_range(low..=self.average + self.spread);

        (0..count)
            .map(|_| {
                let local = Vec2::new(
                    rng.random_range(0.0..chunk_size),
                    rng.random_range(0.0..chunk_size),
                );
                let kind = weighted_pick(&ITEM_SPAWN_TABLE, rng.random::<f32>());
                Item::new(origin + local, kind)
            })
            .collect()
    }
}

/// All items in the world, chunked
#[derive(Debug, Clone)]
pub struct ItemField {
    store: ChunkStore<Item>,
    populator: ItemPopulator,
}

impl ItemField {
    pub fn new(world_seed: u64) -> Self {
        Self {
            store: ChunkStore::new(WORLD_CHUNK_SIZE, subsystem_salt(world_seed, ITEM_SALT_TAG)),
            populator: ItemPopulator::default(),
        }
    }

    pub fn store(&self) -> &ChunkStore<Item> {
        &self.store
    }

    /// Make sure the chunks around the player exist
    pub fn update_generation(&mut self, player_pos: Vec2) -> usize {
        self.store
            .ensure_around(player_pos, GENERATION_RADIUS, &self.populator)
    }

    /// Hand-place an item
    pub fn insert(&mut self, item: Item) {
        let key = super::chunk::chunk_of(item.pos, WORLD_CHUNK_SIZE);
        self.store.insert(key, item);
    }

    /// Collect the items touching the player that `accept` takes
    pub fn collect(
        &mut self,
        player_pos: Vec2,
        player_radius: f32,
        accept: impl FnMut(&CollectionEvent) -> bool,
    ) -> Vec<CollectionEvent> {
        collect_items(&mut self.store, player_pos, player_radius, accept)
    }

    /// Live items within `radius` of `center`, for drawing
    pub fn visible(&self, center: Vec2, radius: f32) -> Vec<&Item> {
        self.store.query_near(center, radius)
    }

    /// Drop all generated chunks
    pub fn reset(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::chunk::chunk_of;

    #[test]
    fn test_spawn_table_matches_props() {
        let total: f32 = ITEM_SPAWN_TABLE.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-5);
        for (kind, weight) in ITEM_SPAWN_TABLE {
            assert_eq!(kind.props().spawn_weight, weight);
        }
    }

    #[test]
    fn test_color_from_name_falls_back() {
        assert_eq!(ItemColor::from_name("Gray"), ItemColor::Gray);
        assert_eq!(ItemColor::from_name("grey"), ItemColor::Gray);
        assert_eq!(ItemColor::from_name("chartreuse"), ItemColor::Yellow);
        for color in ItemColor::ALL {
            assert_eq!(ItemColor::parse(color.as_str()), Some(color));
        }
    }

    #[test]
    fn test_chunk_3_neg2_is_deterministic() {
        let key = ChunkKey::new(3, -2);
        let focal = key.origin(WORLD_CHUNK_SIZE) + Vec2::splat(250.0);

        let mut direct = ItemField::new(7);
        direct
            .store
            .generate_chunk(key, &ItemPopulator::default());
        let expected = direct.store.entities_in(key).to_vec();

        let mut wandering = ItemField::new(7);
        wandering.update_generation(Vec2::new(-2000.0, 3000.0));
        wandering.update_generation(focal);
        assert_eq!(wandering.store.entities_in(key), expected.as_slice());

        // Asking again changes nothing
        wandering.update_generation(focal);
        assert_eq!(wandering.store.entities_in(key), expected.as_slice());
    }

    #[test]
    fn test_generated_items_stay_inside_their_chunk() {
        let mut field = ItemField::new(3);
        field.update_generation(Vec2::new(-120.0, 40.0));
        for x in -3..=2 {
            for y in -2..=2 {
                let key = ChunkKey::new(x, y);
                let items = field.store.entities_in(key);
                if field.store.is_generated(key) {
                    assert!(items.len() >= 5 && items.len() <= 11);
                }
                for item in items {
                    assert_eq!(chunk_of(item.pos, WORLD_CHUNK_SIZE), key);
                }
            }
        }
    }

    #[test]
    fn test_reset_regenerates_same_world() {
        let mut field = ItemField::new(11);
        field.update_generation(Vec2::ZERO);
        let before = field.store.entities_in(ChunkKey::new(0, 0)).to_vec();

        field.reset();
        assert_eq!(field.store.chunk_count(), 0);
        field.update_generation(Vec2::ZERO);
        assert_eq!(field.store.entities_in(ChunkKey::new(0, 0)), before.as_slice());
    }
}
