//! Endpoint dots and the measurement line.

use crate::{Color, Geometry, LightingModel, LineGeometry, Material, Node, SphereGeometry};
use glam::Vec3;

/// Endpoint dot radius in meters.
pub const MARKER_RADIUS: f32 = 0.003;

/// Endpoint dot color (orange).
pub const MARKER_COLOR: Color = Color::rgba(1.0, 0.6, 0.325, 1.0);

/// Unlit, double-sided orange sphere at `position`.
pub fn endpoint_marker(name: &str, position: Vec3) -> Node {
    let material = Material::color(MARKER_COLOR)
        .with_lighting_model(LightingModel::Constant)
        .with_double_sided(true);
    Node::new()
        .with_name(name)
        .with_geometry(Geometry::Sphere(SphereGeometry {
            radius: MARKER_RADIUS,
            material,
        }))
        .with_position(position)
}

/// Line node between two world points. No material is applied.
pub fn line_segment(from: Vec3, to: Vec3) -> Node {
    Node::new()
        .with_name("measurement line")
        .with_geometry(Geometry::Line(LineGeometry::between(from, to)))
}
