//! Artape Scene Crate
//!
//! A small retained scene graph for AR overlays: nodes with transforms,
//! geometry (boxes, spheres, line segments) and materials, plus the two
//! overlay builders the measuring tool needs.
//!
//! ## Modules
//!
//! - [`graph`]: node arena with parent-owns-child semantics
//! - [`geometry`] and [`material`]: what a node draws and how
//! - [`overlay`]: grid-textured slab tracking a horizontal plane anchor
//! - [`marker`]: endpoint dots and the measurement line
//!
//! Node handles are non-owning. Removing a node from its parent drops the
//! whole subtree, and any handle into it stops resolving.

mod error;
mod handle;

pub mod geometry;
pub mod graph;
pub mod marker;
pub mod material;
pub mod overlay;

pub use error::SceneError;
pub use geometry::{BoxFace, BoxGeometry, Geometry, LineGeometry, LineVertex, PrimitiveType, SphereGeometry};
pub use graph::{Node, SceneGraph};
pub use handle::NodeHandle;
pub use marker::{MARKER_COLOR, MARKER_RADIUS, endpoint_marker, line_segment};
pub use material::{Color, Contents, LightingModel, Material, MaterialProperty, WrapMode};
pub use overlay::{GRID_TEXTURE, PLANE_HEIGHT, PlaneOverlay};
