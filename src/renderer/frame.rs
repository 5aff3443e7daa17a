//! Per-frame draw list
//!
//! Turns a `GameState` into a flat, back-to-front list of primitive shapes
//! in world space, culled around the camera. A GPU backend can upload
//! `to_vertices()` directly; anything else can walk `shapes`.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::RENDER_RADIUS;
use crate::sim::background::Decoration;
use crate::sim::state::GameState;

/// Segments used for round shapes
const CIRCLE_SEGMENTS: u32 = 24;

/// Primitive geometry, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Circle { radius: f32 },
    Ring { inner: f32, outer: f32 },
    Ellipse { half: Vec2 },
    Rect { half: Vec2 },
}

/// One thing to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawShape {
    pub pos: Vec2,
    pub kind: ShapeKind,
    pub color: [f32; 4],
}

impl DrawShape {
    pub fn circle(pos: Vec2, radius: f32, color: [f32; 4]) -> Self {
        Self {
            pos,
            kind: ShapeKind::Circle { radius },
            color,
        }
    }

    /// Triangles for this shape in world space
    pub fn vertices(&self) -> Vec<Vertex> {
        match self.kind {
            ShapeKind::Circle { radius } => {
                shapes::circle(self.pos, radius, self.color, CIRCLE_SEGMENTS)
            }
            ShapeKind::Ring { inner, outer } => {
                shapes::ring(self.pos, inner, outer, self.color, CIRCLE_SEGMENTS)
            }
            ShapeKind::Ellipse { half } => {
                shapes::ellipse(self.pos, half, self.color, CIRCLE_SEGMENTS)
            }
            ShapeKind::Rect { half } => shapes::rect(self.pos, half, self.color),
        }
    }
}

/// Everything visible this frame, back to front
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub camera: Vec2,
    pub screen: Vec2,
    pub shapes: Vec<DrawShape>,
}

impl DrawList {
    pub fn build(state: &GameState) -> Self {
        let camera = state.camera.pos;
        let screen = state.screen;
        let mut shapes = Vec::new();

        // Sky backdrop with a margin so resizes never show the clear color
        let buffer = (screen.max_element() * 0.5).max(500.0);
        shapes.push(DrawShape {
            pos: camera,
            kind: ShapeKind::Rect {
                half: screen * 0.5 + Vec2::splat(buffer),
            },
            color: colors::SKY,
        });

        for (_, element) in state.background.visible(camera, screen) {
            push_decoration(&mut shapes, element.pos, element.decoration);
        }

        for obstacle in state.obstacles.visible(camera, RENDER_RADIUS) {
            let r = obstacle.radius();
            shapes.push(DrawShape::circle(obstacle.pos, r, colors::obstacle(obstacle.kind)));
            shapes.push(DrawShape {
                pos: obstacle.pos,
                kind: ShapeKind::Ring {
                    inner: r - 2.0,
                    outer: r,
                },
                color: colors::OUTLINE,
            });
        }

        for item in state.items.visible(camera, RENDER_RADIUS) {
            shapes.push(DrawShape::circle(item.pos, item.radius(), colors::item(item.color())));
        }

        push_player(&mut shapes, state.player.pos, state.player.radius, colors::item(state.player.color));

        Self {
            camera,
            screen,
            shapes,
        }
    }

    /// Triangles in clip space ([-1, 1] on both axes, +y up)
    pub fn to_vertices(&self) -> Vec<Vertex> {
        let half = (self.screen * 0.5).max(Vec2::ONE);
        self.shapes
            .iter()
            .flat_map(DrawShape::vertices)
            .map(|mut v| {
                let clip = (Vec2::from(v.position) - self.camera) / half;
                v.position = clip.to_array();
                v
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn push_decoration(shapes: &mut Vec<DrawShape>, pos: Vec2, decoration: Decoration) {
    match decoration {
        Decoration::Cloud { size, alpha } => {
            let color = colors::with_alpha(colors::CLOUD, alpha);
            shapes.push(DrawShape::circle(pos, size * 0.6, color));
            shapes.push(DrawShape::circle(pos - Vec2::new(size * 0.4, 0.0), size * 0.4, color));
            shapes.push(DrawShape::circle(pos + Vec2::new(size * 0.4, 0.0), size * 0.4, color));
            shapes.push(DrawShape::circle(pos + Vec2::new(0.0, size * 0.3), size * 0.3, color));
        }
        Decoration::Hill { width, height } => shapes.push(DrawShape {
            pos,
            kind: ShapeKind::Ellipse {
                half: Vec2::new(width, height) * 0.5,
            },
            color: colors::HILL,
        }),
        Decoration::Patch { ground, size } => {
            shapes.push(DrawShape::circle(pos, size, colors::ground(ground)))
        }
    }
}

/// Body in the current color, an outline and two eyes
fn push_player(shapes: &mut Vec<DrawShape>, pos: Vec2, radius: f32, color: [f32; 4]) {
    shapes.push(DrawShape::circle(pos, radius, color));
    shapes.push(DrawShape {
        pos,
        kind: ShapeKind::Ring {
            inner: radius - 2.0,
            outer: radius,
        },
        color: colors::OUTLINE,
    });
    for side in [-1.0, 1.0] {
        let eye = pos + Vec2::new(8.0 * side, 8.0);
        shapes.push(DrawShape::circle(eye, 4.0, colors::EYE_WHITE));
        shapes.push(DrawShape::circle(eye, 2.0, colors::EYE_PUPIL));
    }
}
