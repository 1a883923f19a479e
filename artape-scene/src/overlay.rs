//! Grid overlay for a tracked horizontal plane.
//!
//! The overlay is a wrapper node holding a thin box ("slab"). The slab is
//! offset by half its height below the wrapper so that its top face lies on
//! the anchor plane. Only the top face is visible: it carries the grid
//! texture, scaled so that one grid cell is one meter. The other five faces
//! are fully transparent.

use crate::{BoxFace, BoxGeometry, Geometry, Material, Node, NodeHandle, SceneError, SceneGraph, WrapMode};
use artape_data::{AnchorId, PlaneAnchor};
use glam::{Mat4, Vec3};
use tracing::trace;

/// Slab thickness in meters.
pub const PLANE_HEIGHT: f32 = 0.01;

/// Image asset used for the plane grid.
pub const GRID_TEXTURE: &str = "grid";

/// Visual representation of one tracked plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneOverlay {
    anchor: AnchorId,
    node: NodeHandle,
    slab: NodeHandle,
}

impl PlaneOverlay {
    /// Build the overlay for `anchor` and attach it under `host`.
    pub fn spawn(scene: &mut SceneGraph, host: NodeHandle, anchor: &PlaneAnchor) -> Result<Self, SceneError> {
        let mut geometry = BoxGeometry::new(anchor.width(), PLANE_HEIGHT, anchor.length());
        for face in BoxFace::ALL {
            *geometry.material_mut(face) = match face {
                BoxFace::Top => Material::image(GRID_TEXTURE),
                _ => Material::transparent(),
            };
        }

        let node = scene.add_child(host, Node::new().with_name(format!("plane {}", anchor.id)))?;
        let slab = scene.add_child(
            node,
            Node::new()
                .with_name("plane slab")
                .with_geometry(Geometry::Box(geometry))
                .with_position(Vec3::new(0.0, -PLANE_HEIGHT / 2.0, 0.0)),
        )?;

        let overlay = Self {
            anchor: anchor.id,
            node,
            slab,
        };
        overlay.update_with(scene, anchor)?;
        Ok(overlay)
    }

    /// Resize and reposition the slab to match the anchor, then retexture.
    pub fn update_with(&self, scene: &mut SceneGraph, anchor: &PlaneAnchor) -> Result<(), SceneError> {
        {
            let slab = self.slab_geometry_mut(scene)?;
            slab.width = anchor.width();
            slab.length = anchor.length();
        }
        scene.set_position(self.node, Vec3::new(anchor.center.x, 0.0, anchor.center.z))?;
        self.set_texture_scale(scene)?;
        trace!(
            "Plane {} now {}x{} at {:?}",
            anchor.id,
            anchor.width(),
            anchor.length(),
            anchor.center
        );
        Ok(())
    }

    fn set_texture_scale(&self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        let slab = self.slab_geometry_mut(scene)?;
        let scale = Vec3::new(slab.width, slab.length, 1.0);
        let grid = &mut slab.material_mut(BoxFace::Top).diffuse;
        grid.contents_transform = Mat4::from_scale(scale);
        grid.wrap_s = WrapMode::Repeat;
        grid.wrap_t = WrapMode::Repeat;
        Ok(())
    }

    /// Detach the overlay and its slab from the scene.
    pub fn despawn(self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        scene.remove_from_parent(self.node)?;
        Ok(())
    }

    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    /// Wrapper node positioned at the anchor centre.
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    /// Node carrying the box geometry.
    pub fn slab(&self) -> NodeHandle {
        self.slab
    }

    pub fn slab_geometry<'a>(&self, scene: &'a SceneGraph) -> Result<&'a BoxGeometry, SceneError> {
        scene
            .get(self.slab)?
            .geometry
            .as_ref()
            .and_then(Geometry::as_box)
            .ok_or(SceneError::NotABox(self.slab))
    }

    fn slab_geometry_mut<'a>(&self, scene: &'a mut SceneGraph) -> Result<&'a mut BoxGeometry, SceneError> {
        scene
            .get_mut(self.slab)?
            .geometry
            .as_mut()
            .and_then(Geometry::as_box_mut)
            .ok_or(SceneError::NotABox(self.slab))
    }

    /// Current slab width and length in meters.
    pub fn dimensions(&self, scene: &SceneGraph) -> Result<(f32, f32), SceneError> {
        let slab = self.slab_geometry(scene)?;
        Ok((slab.width, slab.length))
    }

    /// Scale of the grid texture's contents transform.
    pub fn texture_scale(&self, scene: &SceneGraph) -> Result<Vec3, SceneError> {
        Ok(self.slab_geometry(scene)?.material(BoxFace::Top).diffuse.contents_scale())
    }
}
