//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in playfield coordinates.

use glam::{Mat2, Vec2};
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle (two triangles)
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rectangle rotated by `degrees` around `pivot`
///
/// `offset` is the rectangle's top-left corner relative to the pivot before
/// rotation. Positive angles turn clockwise on screen (y down).
pub fn rotated_rect(
    pivot: Vec2,
    offset: Vec2,
    size: Vec2,
    degrees: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let rot = Mat2::from_angle(degrees.to_radians());
    let corner = |dx: f32, dy: f32| pivot + rot * (offset + Vec2::new(dx, dy));
    let a = corner(0.0, 0.0);
    let b = corner(size.x, 0.0);
    let c = corner(0.0, size.y);
    let d = corner(size.x, size.y);
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}
