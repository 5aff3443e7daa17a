//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded, per-chunk RNG only
//! - No rendering or platform dependencies

pub mod background;
pub mod camera;
pub mod chunk;
pub mod collision;
pub mod items;
pub mod obstacles;
pub mod player;
pub mod session;
pub mod state;
pub mod tick;

pub use background::{Background, BackgroundElement, Decoration, GroundKind, LayerKind};
pub use camera::Camera;
pub use chunk::{ChunkKey, ChunkPopulator, ChunkStore, Placed, chunk_of};
pub use collision::{CollectionEvent, collect_items, resolve_movement};
pub use items::{Item, ItemColor, ItemField, ItemKind};
pub use obstacles::{Obstacle, ObstacleField, ObstacleKind};
pub use player::Player;
pub use session::{GameMode, GamePhase, ScoreChange, Session};
pub use state::GameState;
pub use tick::{GameEvent, TextKey, TickInput, tick};
