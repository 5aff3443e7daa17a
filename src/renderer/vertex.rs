//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Reinterpret vertices as raw bytes for a GPU buffer upload
pub fn vertex_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    use crate::sim::background::GroundKind;
    use crate::sim::items::ItemColor;
    use crate::sim::obstacles::ObstacleKind;

    pub const SKY: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HILL: [f32; 4] = [0.56, 0.93, 0.56, 1.0];
    pub const GRASS: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const DIRT: [f32; 4] = [0.65, 0.16, 0.16, 1.0];
    pub const SAND: [f32; 4] = [0.82, 0.71, 0.55, 1.0];

    pub const ROCK: [f32; 4] = [0.66, 0.66, 0.66, 1.0];
    pub const TREE: [f32; 4] = [0.0, 0.39, 0.0, 1.0];
    pub const CRYSTAL_FORMATION: [f32; 4] = [0.68, 0.85, 0.90, 1.0];
    pub const METAL_DEBRIS: [f32; 4] = [0.72, 0.25, 0.05, 1.0];
    pub const OUTLINE: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// Fill color for an item color tag (also used for the player)
    pub fn item(color: ItemColor) -> [f32; 4] {
        match color {
            ItemColor::Yellow => [1.0, 1.0, 0.0, 1.0],
            ItemColor::Gray => [0.5, 0.5, 0.5, 1.0],
            ItemColor::Cyan => [0.0, 1.0, 1.0, 1.0],
            ItemColor::Purple => [0.5, 0.0, 0.5, 1.0],
            ItemColor::Red => [1.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn obstacle(kind: ObstacleKind) -> [f32; 4] {
        match kind {
            ObstacleKind::Rock => ROCK,
            ObstacleKind::Tree => TREE,
            ObstacleKind::CrystalFormation => CRYSTAL_FORMATION,
            ObstacleKind::MetalDebris => METAL_DEBRIS,
        }
    }

    pub fn ground(kind: GroundKind) -> [f32; 4] {
        match kind {
            GroundKind::Grass => GRASS,
            GroundKind::Dirt => DIRT,
            GroundKind::Sand => SAND,
        }
    }

    /// Same color with an 8-bit alpha
    pub fn with_alpha(color: [f32; 4], alpha: u8) -> [f32; 4] {
        [color[0], color[1], color[2], alpha as f32 / 255.0]
    }
}
