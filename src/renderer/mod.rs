//! Rendering data
//!
//! Backend-agnostic: builds world-space shape lists and clip-space triangle
//! vertices. Window and GPU ownership live with the embedding application.

pub mod frame;
pub mod shapes;
pub mod vertex;

pub use frame::{DrawList, DrawShape, ShapeKind};
pub use vertex::{Vertex, colors, vertex_bytes};
