//! Parallax background layers
//!
//! Each layer is its own chunked world in "layer space": the camera is
//! divided by the layer depth before generation and culling, so far layers
//! scroll slower. Elements are decorative and never removed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chunk::{ChunkKey, ChunkPopulator, ChunkStore, Placed, chunk_of, subsystem_salt};

/// Salt tag for background chunk seeds (the layer depth is mixed in too)
const BACKGROUND_SALT_TAG: u64 = 0xBAC6_6000_0000_0000;

/// The three background layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Sky,
    Hills,
    Ground,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Sky, LayerKind::Hills, LayerKind::Ground];

    /// Parallax divisor applied to the camera position
    pub fn depth(&self) -> u32 {
        match self {
            LayerKind::Sky => 1,
            LayerKind::Hills => 2,
            LayerKind::Ground => 3,
        }
    }

    /// Region (chunk) size in layer space
    pub fn pattern_size(&self) -> f32 {
        match self {
            LayerKind::Sky => 2000.0,
            LayerKind::Hills => 1500.0,
            LayerKind::Ground => 800.0,
        }
    }
}

/// Ground patch flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroundKind {
    #[default]
    Grass,
    Dirt,
    Sand,
}

const GROUND_TABLE: [(GroundKind, f32); 3] = [
    (GroundKind::Grass, 1.0 / 3.0),
    (GroundKind::Dirt, 1.0 / 3.0),
    (GroundKind::Sand, 1.0 / 3.0),
];

/// Decorative shape data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decoration {
    Cloud { size: f32, alpha: u8 },
    Hill { width: f32, height: f32 },
    Patch { ground: GroundKind, size: f32 },
}

/// A background element in layer space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundElement {
    pub pos: Vec2,
    pub decoration: Decoration,
}

impl Placed for BackgroundElement {
    fn pos(&self) -> Vec2 {
        self.pos
    }
}

/// Per-layer region contents
#[derive(Debug, Clone, Copy)]
pub struct LayerPopulator {
    pub kind: LayerKind,
}

impl ChunkPopulator for LayerPopulator {
    type Entity = BackgroundElement;

    fn populate(&self, key: ChunkKey, size: f32, rng: &mut Pcg32) -> Vec<BackgroundElement> {
        let origin = key.origin(size);
        let mut elements = Vec::new();

        match self.kind {
            LayerKind::Sky => {
                for _ in 0..rng.random_range(2..=5) {
                    let pos = origin
                        + Vec2::new(rng.random_range(0.0..size), rng.random_range(400.0..600.0));
                    let cloud_size = rng.random_range(30.0..80.0);
                    let alpha = rng.random_range(50..=150);
                    elements.push(BackgroundElement {
                        pos,
                        decoration: Decoration::Cloud {
                            size: cloud_size,
                            alpha,
                        },
                    });
                }
            }
            LayerKind::Hills => {
                for _ in 0..rng.random_range(1..=3) {
                    let pos = origin
                        + Vec2::new(rng.random_range(0.0..size), rng.random_range(200.0..350.0));
                    let width = rng.random_range(200.0..400.0);
                    let height = rng.random_range(50.0..120.0);
                    elements.push(BackgroundElement {
                        pos,
                        decoration: Decoration::Hill { width, height },
                    });
                }
            }
            LayerKind::Ground => {
                for _ in 0..rng.random_range(3..=8) {
                    let pos = origin
                        + Vec2::new(rng.random_range(0.0..size), rng.random_range(0.0..150.0));
                    let patch_size = rng.random_range(20.0..60.0);
                    let ground = super::chunk::weighted_pick(&GROUND_TABLE, rng.random::<f32>());
                    elements.push(BackgroundElement {
                        pos,
                        decoration: Decoration::Patch {
                            ground,
                            size: patch_size,
                        },
                    });
                }
            }
        }

        elements
    }
}

/// One parallax layer
#[derive(Debug, Clone)]
pub struct BackgroundLayer {
    pub kind: LayerKind,
    store: ChunkStore<BackgroundElement>,
}

impl BackgroundLayer {
    pub fn new(kind: LayerKind, world_seed: u64) -> Self {
        let salt = subsystem_salt(world_seed, BACKGROUND_SALT_TAG ^ kind.depth() as u64);
        Self {
            kind,
            store: ChunkStore::new(kind.pattern_size(), salt),
        }
    }

    pub fn store(&self) -> &ChunkStore<BackgroundElement> {
        &self.store
    }

    /// Camera position as seen from this layer
    #[inline]
    pub fn effective_camera(&self, camera: Vec2) -> Vec2 {
        camera / self.kind.depth() as f32
    }

    /// Region window covering one screen beyond the view on every side
    fn window(&self, camera: Vec2, screen: Vec2) -> (ChunkKey, ChunkKey) {
        let eff = self.effective_camera(camera);
        let size = self.kind.pattern_size();
        let min = chunk_of(eff - screen, size);
        let max = chunk_of(eff + screen, size).offset(1, 1);
        (min, max)
    }

    pub fn update_generation(&mut self, camera: Vec2, screen: Vec2) -> usize {
        let (min, max) = self.window(camera, screen);
        self.store
            .ensure_range(min, max, &LayerPopulator { kind: self.kind })
    }

    /// Elements near the view, with positions shifted into world space
    pub fn visible(&self, camera: Vec2, screen: Vec2) -> Vec<BackgroundElement> {
        let eff = self.effective_camera(camera);
        let (lo, hi) = (eff - screen, eff + screen);
        let (min, max) = self.window(camera, screen);
        // A layer-space point at `eff` is drawn at the camera
        let shift = camera - eff;

        self.store
            .live_in_range(min, max)
            .filter(|e| e.pos.cmpge(lo).all() && e.pos.cmple(hi).all())
            .map(|e| BackgroundElement {
                pos: e.pos + shift,
                decoration: e.decoration,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.store.clear();
    }
}

/// All background layers
#[derive(Debug, Clone)]
pub struct Background {
    pub layers: Vec<BackgroundLayer>,
}

impl Background {
    pub fn new(world_seed: u64) -> Self {
        Self {
            layers: LayerKind::ALL
                .iter()
                .map(|&kind| BackgroundLayer::new(kind, world_seed))
                .collect(),
        }
    }

    /// Generate regions around the camera for every layer
    pub fn update_generation(&mut self, camera: Vec2, screen: Vec2) -> usize {
        self.layers
            .iter_mut()
            .map(|layer| layer.update_generation(camera, screen))
            .sum()
    }

    /// Visible elements, back layer first
    pub fn visible(&self, camera: Vec2, screen: Vec2) -> Vec<(LayerKind, BackgroundElement)> {
        self.layers
            .iter()
            .flat_map(|layer| {
                layer
                    .visible(camera, screen)
                    .into_iter()
                    .map(move |e| (layer.kind, e))
            })
            .collect()
    }

    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }
}
