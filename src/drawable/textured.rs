use std::path::PathBuf;

use glam::Vec3;

use super::{
    ensure_perpendicular, unit_direction, AttributeLayout, Geometry, Primitive, ShapeResult,
};
use crate::resources::ShaderKind;

/// Rectangle spanned by two half-extent vectors, sampling one image.
///
/// Texture coordinate (0, 0) is the corner at `center - axis_u - axis_v`.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedQuad {
    center: Vec3,
    axis_u: Vec3,
    axis_v: Vec3,
    texture: PathBuf,
}

impl TexturedQuad {
    pub fn new(
        center: Vec3,
        axis_u: Vec3,
        axis_v: Vec3,
        texture: impl Into<PathBuf>,
    ) -> ShapeResult<Self> {
        let u = unit_direction("textured quad", "u axis", axis_u)?;
        let v = unit_direction("textured quad", "v axis", axis_v)?;
        ensure_perpendicular("textured quad", ("u axis", u), ("v axis", v))?;

        Ok(Self {
            center,
            axis_u,
            axis_v,
            texture: texture.into(),
        })
    }

    pub fn texture(&self) -> &PathBuf {
        &self.texture
    }
}

impl Geometry for TexturedQuad {
    fn vertices(&self) -> Vec<f32> {
        let corners = [
            (self.center - self.axis_u - self.axis_v, [0.0, 0.0]),
            (self.center + self.axis_u - self.axis_v, [1.0, 0.0]),
            (self.center - self.axis_u + self.axis_v, [0.0, 1.0]),
            (self.center + self.axis_u + self.axis_v, [1.0, 1.0]),
        ];
        let mut buffer = Vec::with_capacity(4 * 5);
        for (position, uv) in corners {
            buffer.extend_from_slice(&position.to_array());
            buffer.extend_from_slice(&uv);
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_uv()
    }

    fn primitives(&self) -> Vec<Primitive> {
        vec![Primitive::strip(vec![0, 1, 2, 3]).with_texture(0)]
    }

    fn shader(&self) -> ShaderKind {
        ShaderKind::Textured
    }

    fn textures(&self) -> Vec<PathBuf> {
        vec![self.texture.clone()]
    }
}
