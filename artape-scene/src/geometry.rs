//! Geometry carried by scene nodes.

use crate::Material;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Faces of a box, in material order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxFace {
    /// +Z
    Front,
    /// +X
    Right,
    /// -Z
    Back,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Front,
        BoxFace::Right,
        BoxFace::Back,
        BoxFace::Left,
        BoxFace::Top,
        BoxFace::Bottom,
    ];

    /// Index into [`BoxGeometry::materials`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Axis-aligned box centred on its node's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    /// Size along X.
    pub width: f32,
    /// Size along Y.
    pub height: f32,
    /// Size along Z.
    pub length: f32,
    pub chamfer_radius: f32,
    /// One material per face, indexed by [`BoxFace::index`].
    pub materials: [Material; 6],
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, length: f32) -> Self {
        Self {
            width,
            height,
            length,
            chamfer_radius: 0.0,
            materials: std::array::from_fn(|_| Material::default()),
        }
    }

    pub fn material(&self, face: BoxFace) -> &Material {
        &self.materials[face.index()]
    }

    pub fn material_mut(&mut self, face: BoxFace) -> &mut Material {
        &mut self.materials[face.index()]
    }
}

/// Sphere centred on its node's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub material: Material,
}

/// Vertex of a line segment, laid out for direct upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl From<Vec3> for LineVertex {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

/// How a geometry element's indices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Line,
    Triangles,
}

/// Two-vertex line drawn with the native line primitive. Carries no material.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    vertices: [LineVertex; 2],
    indices: [u32; 2],
    primitive: PrimitiveType,
}

impl LineGeometry {
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self {
            vertices: [from.into(), to.into()],
            indices: [0, 1],
            primitive: PrimitiveType::Line,
        }
    }

    pub fn start(&self) -> Vec3 {
        Vec3::from_array(self.vertices[0].position)
    }

    pub fn end(&self) -> Vec3 {
        Vec3::from_array(self.vertices[1].position)
    }

    pub fn length(&self) -> f32 {
        self.start().distance(self.end())
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    /// Vertex source as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index element as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Geometry attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box(BoxGeometry),
    Sphere(SphereGeometry),
    Line(LineGeometry),
}

impl Geometry {
    pub fn as_box(&self) -> Option<&BoxGeometry> {
        match self {
            Geometry::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_box_mut(&mut self) -> Option<&mut BoxGeometry> {
        match self {
            Geometry::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sphere(&self) -> Option<&SphereGeometry> {
        match self {
            Geometry::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineGeometry> {
        match self {
            Geometry::Line(l) => Some(l),
            _ => None,
        }
    }
}
