//! Anchor types reported by the tracking subsystem.
//!
//! Coordinates are world meters in a right-handed system with +Y up.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an anchor issued by the tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// Orientation of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAlignment {
    #[default]
    Horizontal,
    Vertical,
}

/// A detected real-world plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAnchor {
    /// Identity, stable across updates.
    pub id: AnchorId,
    /// Plane orientation.
    pub alignment: PlaneAlignment,
    /// Centre of the tracked rectangle in anchor-local coordinates.
    pub center: Vec3,
    /// Size along local X (`x`) and local Z (`z`). `y` is always zero.
    pub extent: Vec3,
    /// Anchor-to-world transform.
    pub transform: Mat4,
}

impl PlaneAnchor {
    /// Create a horizontal plane anchor whose local origin sits at `origin`.
    pub fn horizontal(id: AnchorId, origin: Vec3, extent: Vec2) -> Self {
        Self {
            id,
            alignment: PlaneAlignment::Horizontal,
            center: Vec3::ZERO,
            extent: Vec3::new(extent.x, 0.0, extent.y),
            transform: Mat4::from_translation(origin),
        }
    }

    /// Set the local centre offset. Only X and Z are meaningful.
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = Vec3::new(center.x, 0.0, center.z);
        self
    }

    /// Set the extent (width along X, length along Z).
    pub fn with_extent(mut self, width: f32, length: f32) -> Self {
        self.extent = Vec3::new(width, 0.0, length);
        self
    }

    /// Width along local X in meters.
    pub fn width(&self) -> f32 {
        self.extent.x
    }

    /// Length along local Z in meters.
    pub fn length(&self) -> f32 {
        self.extent.z
    }

    /// World position of the anchor's local origin.
    pub fn origin(&self) -> Vec3 {
        position_from_transform(&self.transform)
    }

    /// World position of the centre of the tracked rectangle.
    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point3(self.center)
    }

    /// Plane normal in world space (the anchor's local +Y).
    pub fn normal(&self) -> Vec3 {
        self.transform.transform_vector3(Vec3::Y).normalize_or_zero()
    }

    /// Whether an anchor-local point lies inside the tracked rectangle.
    pub fn contains_local(&self, local: Vec3) -> bool {
        let half = self.extent * 0.5;
        (local.x - self.center.x).abs() <= half.x && (local.z - self.center.z).abs() <= half.z
    }
}

/// Translation column of a world transform.
pub fn position_from_transform(transform: &Mat4) -> Vec3 {
    transform.w_axis.truncate()
}
