//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Point on an axis-aligned ellipse at segment `i` of `segments`
#[inline]
fn rim(center: Vec2, radii: Vec2, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radii
}

/// Generate vertices for a filled ellipse with half extents `radii`
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let a = rim(center, radii, i, segments);
        let b = rim(center, radii, i + 1, segments);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let inner = Vec2::splat(inner_radius);
    let outer = Vec2::splat(outer_radius);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let inner1 = rim(center, inner, i, segments);
        let outer1 = rim(center, outer, i, segments);
        let inner2 = rim(center, inner, i + 1, segments);
        let outer2 = rim(center, outer, i + 1, segments);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(center: Vec2, half: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (lo, hi) = (center - half, center + half);
    vec![
        Vertex::new(lo.x, lo.y, color),
        Vertex::new(hi.x, lo.y, color),
        Vertex::new(hi.x, hi.y, color),
        Vertex::new(lo.x, lo.y, color),
        Vertex::new(hi.x, hi.y, color),
        Vertex::new(lo.x, hi.y, color),
    ]
}
