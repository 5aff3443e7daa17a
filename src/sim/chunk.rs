//! Chunked world storage and seeded generation
//!
//! The world is cut into fixed-size square chunks. Each chunk is populated
//! exactly once, from a local RNG seeded by the chunk key, so the same key
//! always yields the same entities no matter which chunks were generated
//! before it. Generated chunks are never evicted or repopulated; only the
//! liveness flags of their entities change.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::within_radius;

/// Integer chunk coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
}

impl ChunkKey {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// World position of the chunk's minimum corner
    #[inline]
    pub fn origin(self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }

    /// Whether a world point falls inside this chunk
    pub fn contains(self, point: Vec2, chunk_size: f32) -> bool {
        chunk_of(point, chunk_size) == self
    }
}

/// Map a world position to its chunk (floor division, so -1.0 lands in chunk -1)
#[inline]
pub fn chunk_of(pos: Vec2, chunk_size: f32) -> ChunkKey {
    ChunkKey::new(
        (pos.x / chunk_size).floor() as i32,
        (pos.y / chunk_size).floor() as i32,
    )
}

/// Every key in the inclusive square `[-reach, reach]²` around `center`
pub fn keys_around(center: ChunkKey, reach: i32) -> impl Iterator<Item = ChunkKey> {
    (-reach..=reach).flat_map(move |dx| (-reach..=reach).map(move |dy| center.offset(dx, dy)))
}

/// Stable per-chunk seed. Only depends on the key and the salt.
pub fn chunk_seed(key: ChunkKey, salt: u64) -> u64 {
    let mut h = mix64(salt ^ 0x9E37_79B9_7F4A_7C15);
    h = mix64(h ^ (key.x as u32 as u64));
    h = mix64(h ^ ((key.y as u32 as u64) << 32));
    h
}

/// Combine a world seed with a subsystem tag
pub fn subsystem_salt(world_seed: u64, tag: u64) -> u64 {
    mix64(world_seed.wrapping_mul(0x2545_F491_4F6C_DD1D) ^ tag)
}

/// SplitMix64 finalizer
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Cumulative-weight selection. `roll` is uniform in [0, 1).
///
/// The first entry whose running total exceeds the roll wins. If rounding
/// leaves the roll past the final total, the last entry is used.
pub fn weighted_pick<K: Copy + Default>(table: &[(K, f32)], roll: f32) -> K {
    let mut cumulative = 0.0;
    for &(kind, weight) in table {
        cumulative += weight;
        if roll < cumulative {
            return kind;
        }
    }
    table.last().map(|&(kind, _)| kind).unwrap_or_default()
}

/// Anything stored in a chunk
pub trait Placed {
    fn pos(&self) -> Vec2;

    /// Dead entities stay in their chunk but are skipped by queries
    fn is_live(&self) -> bool {
        true
    }
}

/// Produces the contents of one chunk from its seeded RNG
pub trait ChunkPopulator {
    type Entity;

    fn populate(&self, key: ChunkKey, chunk_size: f32, rng: &mut Pcg32) -> Vec<Self::Entity>;
}

/// Chunk key → entity list, plus the set of keys already generated
#[derive(Debug, Clone)]
pub struct ChunkStore<E> {
    chunk_size: f32,
    salt: u64,
    generated: HashSet<ChunkKey>,
    chunks: HashMap<ChunkKey, Vec<E>>,
}

impl<E: Placed> ChunkStore<E> {
    pub fn new(chunk_size: f32, salt: u64) -> Self {
        Self {
            chunk_size,
            salt,
            generated: HashSet::new(),
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn is_generated(&self, key: ChunkKey) -> bool {
        self.generated.contains(&key)
    }

    /// Number of generated chunks
    pub fn chunk_count(&self) -> usize {
        self.generated.len()
    }

    /// Total stored entities, dead ones included
    pub fn entity_count(&self) -> usize {
        self.chunks.values().map(Vec::len).sum()
    }

    /// Populate `key` if it has never been generated. Returns true if it was.
    pub fn generate_chunk<P>(&mut self, key: ChunkKey, populator: &P) -> bool
    where
        P: ChunkPopulator<Entity = E>,
    {
        if !self.generated.insert(key) {
            return false;
        }

        let mut rng = Pcg32::seed_from_u64(chunk_seed(key, self.salt));
        let entities = populator.populate(key, self.chunk_size, &mut rng);
        log::debug!(
            "Generated chunk ({}, {}) with {} entities",
            key.x,
            key.y,
            entities.len()
        );
        self.chunks.entry(key).or_default().extend(entities);
        true
    }

    /// Generate every chunk within `radius` chunks of the focal point.
    /// Returns how many chunks were newly generated.
    pub fn ensure_around<P>(&mut self, focal: Vec2, radius: i32, populator: &P) -> usize
    where
        P: ChunkPopulator<Entity = E>,
    {
        let center = chunk_of(focal, self.chunk_size);
        keys_around(center, radius)
            .filter(|&key| self.generate_chunk(key, populator))
            .count()
    }

    /// Generate every chunk in the inclusive rectangle `min..=max`
    pub fn ensure_range<P>(&mut self, min: ChunkKey, max: ChunkKey, populator: &P) -> usize
    where
        P: ChunkPopulator<Entity = E>,
    {
        let mut created = 0;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                if self.generate_chunk(ChunkKey::new(x, y), populator) {
                    created += 1;
                }
            }
        }
        created
    }

    /// Append an entity to a chunk's list. Does not mark the chunk generated.
    pub fn insert(&mut self, key: ChunkKey, entity: E) {
        self.chunks.entry(key).or_default().push(entity);
    }

    /// All entities stored for a chunk, dead ones included
    pub fn entities_in(&self, key: ChunkKey) -> &[E] {
        self.chunks.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Live entities within `radius` of `point`, in no particular order
    pub fn query_near(&self, point: Vec2, radius: f32) -> Vec<&E> {
        let reach = (radius / self.chunk_size).ceil() as i32;
        self.live_in(chunk_of(point, self.chunk_size), reach)
            .filter(|e| within_radius(point, e.pos(), radius))
            .collect()
    }

    /// Live entities in the 3×3 chunk block around `point`
    pub fn query_adjacent(&self, point: Vec2) -> Vec<&E> {
        self.live_in(chunk_of(point, self.chunk_size), 1).collect()
    }

    /// Visit live entities in the 3×3 chunk block around `point` mutably
    pub fn for_each_adjacent_mut(&mut self, point: Vec2, mut f: impl FnMut(&mut E)) {
        let center = chunk_of(point, self.chunk_size);
        for key in keys_around(center, 1) {
            if let Some(list) = self.chunks.get_mut(&key) {
                for entity in list.iter_mut().filter(|e| e.is_live()) {
                    f(entity);
                }
            }
        }
    }

    /// Live entities in every chunk of the inclusive rectangle `min..=max`
    pub fn live_in_range(&self, min: ChunkKey, max: ChunkKey) -> impl Iterator<Item = &E> {
        (min.x..=max.x)
            .flat_map(move |x| (min.y..=max.y).map(move |y| ChunkKey::new(x, y)))
            .filter_map(move |key| self.chunks.get(&key))
            .flatten()
            .filter(|e| e.is_live())
    }

    fn live_in(&self, center: ChunkKey, reach: i32) -> impl Iterator<Item = &E> {
        keys_around(center, reach)
            .filter_map(move |key| self.chunks.get(&key))
            .flatten()
            .filter(|e| e.is_live())
    }

    /// Forget everything, including which chunks were generated
    pub fn clear(&mut self) {
        self.generated.clear();
        self.chunks.clear();
    }
}
