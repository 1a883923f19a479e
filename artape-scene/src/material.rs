//! Surface materials.
//!
//! Only the diffuse channel is modelled. Its contents are either a flat
//! color or a named image asset; loading the asset is the renderer's job.

use glam::{Mat4, Vec3};

/// RGBA color with values in 0-1 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Create an opaque RGB color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an RGBA color.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hex value (0xRRGGBB).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Same color with the alpha replaced.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// What a material property samples from.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    Color(Color),
    /// Named image asset.
    Image(String),
}

/// Texture addressing outside the 0-1 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
}

/// Shading model applied to a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    #[default]
    Blinn,
    Lambert,
    Phong,
    /// Unlit: the diffuse contents are shown as-is.
    Constant,
}

/// One material channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    pub contents: Contents,
    /// Texture-coordinate transform applied before sampling.
    pub contents_transform: Mat4,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

impl MaterialProperty {
    pub fn new(contents: Contents) -> Self {
        Self {
            contents,
            contents_transform: Mat4::IDENTITY,
            wrap_s: WrapMode::Clamp,
            wrap_t: WrapMode::Clamp,
        }
    }

    /// Scale part of the contents transform.
    pub fn contents_scale(&self) -> Vec3 {
        let (scale, _, _) = self.contents_transform.to_scale_rotation_translation();
        scale
    }
}

/// Appearance of a geometry element.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub diffuse: MaterialProperty,
    pub lighting_model: LightingModel,
    pub double_sided: bool,
}

impl Material {
    /// Flat-colored material.
    pub fn color(color: Color) -> Self {
        Self {
            diffuse: MaterialProperty::new(Contents::Color(color)),
            lighting_model: LightingModel::default(),
            double_sided: false,
        }
    }

    /// Material sampling a named image asset.
    pub fn image(name: impl Into<String>) -> Self {
        Self {
            diffuse: MaterialProperty::new(Contents::Image(name.into())),
            lighting_model: LightingModel::default(),
            double_sided: false,
        }
    }

    /// Fully transparent white.
    pub fn transparent() -> Self {
        Self::color(Color::WHITE.with_alpha(0.0))
    }

    pub fn with_lighting_model(mut self, model: LightingModel) -> Self {
        self.lighting_model = model;
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self.diffuse.contents, Contents::Color(c) if c.a == 0.0)
    }

    /// Name of the image asset, if the diffuse channel is textured.
    pub fn image_name(&self) -> Option<&str> {
        match &self.diffuse.contents {
            Contents::Image(name) => Some(name.as_str()),
            Contents::Color(_) => None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::color(Color::WHITE)
    }
}
