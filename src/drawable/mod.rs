//! Procedural shapes
//!
//! Every shape produces a flat vertex buffer, the [`AttributeLayout`] that
//! decodes it and a list of [`Primitive`]s that index into it. Shapes are
//! validated when they are constructed; a shape that exists is drawable.

mod color;
mod cube;
mod flat;
mod layout;
mod primitive;
mod round;
mod surface;
mod textured;

use std::path::PathBuf;

use glam::Vec3;
use thiserror::Error;

use crate::resources::ShaderKind;

pub use color::srgb;
pub use cube::{Cube, Pyramid};
pub use flat::{Tetrahedron, Triangle};
pub use layout::{AttributeLayout, AttributeSize, GenericAttribute};
pub use primitive::{IndexType, Primitive, Topology};
pub use round::{Cone, Cylinder, Sphere};
pub use surface::{HeightField, HeightFieldBuilder};
pub use textured::TexturedQuad;

/// Shape construction failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{shape}: {dimension} must be positive, got {value}")]
    NonPositive {
        shape: &'static str,
        dimension: &'static str,
        value: f32,
    },

    #[error("{shape}: {first} and {second} directions must be perpendicular (dot = {dot})")]
    NotPerpendicular {
        shape: &'static str,
        first: &'static str,
        second: &'static str,
        dot: f32,
    },

    #[error("{shape}: {direction} direction must be non-zero")]
    ZeroDirection {
        shape: &'static str,
        direction: &'static str,
    },

    #[error("{shape}: needs at least {min} {what}, got {got}")]
    TooCoarse {
        shape: &'static str,
        what: &'static str,
        min: u32,
        got: u32,
    },

    #[error("{shape}: {vertices} vertices cannot be addressed by {index_bits}-bit indices")]
    TooFine {
        shape: &'static str,
        vertices: u64,
        index_bits: u32,
    },
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Capability shared by every shape: what to upload and how to draw it.
pub trait Geometry {
    /// Flat vertex buffer, records laid out as [`Geometry::layout`] says.
    fn vertices(&self) -> Vec<f32>;

    fn layout(&self) -> AttributeLayout;

    fn primitives(&self) -> Vec<Primitive>;

    fn shader(&self) -> ShaderKind {
        ShaderKind::BakedColor
    }

    /// Image files referenced by [`Primitive::texture`] slots.
    fn textures(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Every shape kind the engine knows how to load.
#[derive(Debug, Clone)]
pub enum Drawable {
    Triangle(Triangle),
    Tetrahedron(Tetrahedron),
    Cube(Cube),
    Pyramid(Pyramid),
    Cone(Cone),
    Cylinder(Cylinder),
    Sphere(Sphere),
    HeightField(HeightField),
    TexturedQuad(TexturedQuad),
}

macro_rules! dispatch {
    ($self:ident, $shape:ident => $body:expr) => {
        match $self {
            Drawable::Triangle($shape) => $body,
            Drawable::Tetrahedron($shape) => $body,
            Drawable::Cube($shape) => $body,
            Drawable::Pyramid($shape) => $body,
            Drawable::Cone($shape) => $body,
            Drawable::Cylinder($shape) => $body,
            Drawable::Sphere($shape) => $body,
            Drawable::HeightField($shape) => $body,
            Drawable::TexturedQuad($shape) => $body,
        }
    };
}

impl Drawable {
    pub fn name(&self) -> &'static str {
        match self {
            Drawable::Triangle(_) => "triangle",
            Drawable::Tetrahedron(_) => "tetrahedron",
            Drawable::Cube(_) => "cube",
            Drawable::Pyramid(_) => "pyramid",
            Drawable::Cone(_) => "cone",
            Drawable::Cylinder(_) => "cylinder",
            Drawable::Sphere(_) => "sphere",
            Drawable::HeightField(_) => "height field",
            Drawable::TexturedQuad(_) => "textured quad",
        }
    }
}

impl Geometry for Drawable {
    fn vertices(&self) -> Vec<f32> {
        dispatch!(self, shape => shape.vertices())
    }

    fn layout(&self) -> AttributeLayout {
        dispatch!(self, shape => shape.layout())
    }

    fn primitives(&self) -> Vec<Primitive> {
        dispatch!(self, shape => shape.primitives())
    }

    fn shader(&self) -> ShaderKind {
        dispatch!(self, shape => shape.shader())
    }

    fn textures(&self) -> Vec<PathBuf> {
        dispatch!(self, shape => shape.textures())
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Drawable {
                fn from(shape: $variant) -> Self {
                    Drawable::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(
    Triangle,
    Tetrahedron,
    Cube,
    Pyramid,
    Cone,
    Cylinder,
    Sphere,
    HeightField,
    TexturedQuad,
);

pub(crate) fn push_vertex(buffer: &mut Vec<f32>, position: Vec3, color: [f32; 3]) {
    buffer.extend_from_slice(&position.to_array());
    buffer.extend_from_slice(&color);
}

/// Every vertex of a shape must be reachable from an [`IndexType`] index.
pub(crate) fn ensure_indexable(shape: &'static str, vertices: u64) -> ShapeResult<()> {
    if vertices <= IndexType::MAX as u64 + 1 {
        Ok(())
    } else {
        Err(ShapeError::TooFine {
            shape,
            vertices,
            index_bits: IndexType::BITS,
        })
    }
}

pub(crate) fn ensure_positive(shape: &'static str, dimension: &'static str, value: f32) -> ShapeResult<()> {
    // NaN fails this comparison too
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::NonPositive {
            shape,
            dimension,
            value,
        })
    }
}

pub(crate) fn unit_direction(shape: &'static str, direction: &'static str, v: Vec3) -> ShapeResult<Vec3> {
    v.try_normalize()
        .ok_or(ShapeError::ZeroDirection { shape, direction })
}

pub(crate) fn ensure_perpendicular(
    shape: &'static str,
    (first, a): (&'static str, Vec3),
    (second, b): (&'static str, Vec3),
) -> ShapeResult<()> {
    let dot = a.dot(b);
    if dot.abs() <= 1e-5 {
        Ok(())
    } else {
        Err(ShapeError::NotPerpendicular {
            shape,
            first,
            second,
            dot,
        })
    }
}
