//! Common types shared between backends

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::drawable::{AttributeLayout, AttributeSize};

/// Primitive topology of one index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    /// Number of triangles an index list of `count` entries assembles into.
    pub fn triangle_count(&self, count: usize) -> usize {
        match self {
            Topology::TriangleList => count / 3,
            Topology::TriangleStrip | Topology::TriangleFan => count.saturating_sub(2),
        }
    }
}

/// Rasterization mode for triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
}

/// Texture format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8UnormSrgb,
    Depth32Float,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float)
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        4
    }
}

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUsage(u32);

impl BufferUsage {
    pub const COPY_DST: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const VERTEX: Self = Self(1 << 2);
    pub const UNIFORM: Self = Self(1 << 3);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Sampled 2D texture with its initial RGBA8 contents.
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: &'a [u8],
}

/// Vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub fn size(&self) -> u64 {
        match self {
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

impl From<AttributeSize> for VertexFormat {
    fn from(size: AttributeSize) -> Self {
        match size {
            AttributeSize::Vec1 => VertexFormat::Float32,
            AttributeSize::Vec2 => VertexFormat::Float32x2,
            AttributeSize::Vec3 => VertexFormat::Float32x3,
            AttributeSize::Vec4 => VertexFormat::Float32x4,
        }
    }
}

/// Vertex attribute description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u64,
}

/// Vertex buffer layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBufferLayout {
    pub array_stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexBufferLayout {
    /// Shader locations follow declaration order, offsets accumulate the
    /// widths of the attributes before them.
    pub fn from_attribute_layout(layout: &AttributeLayout) -> Self {
        let attributes = layout
            .attributes()
            .iter()
            .zip(layout.offsets())
            .enumerate()
            .map(|(location, (attribute, offset))| VertexAttribute {
                location: location as u32,
                format: attribute.size.into(),
                offset,
            })
            .collect();

        Self {
            array_stride: layout.stride(),
            attributes,
        }
    }
}

/// Matrices written before every draw, matching the `model`, `view` and
/// `projection` members of the shader uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for TransformUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_layout_from_position_color() {
        let layout = VertexBufferLayout::from_attribute_layout(&AttributeLayout::position_color());
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].location, 1);
        assert_eq!(layout.attributes[1].format, VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_transform_uniforms_size() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 3 * 64);
    }

    #[test]
    fn test_triangle_count() {
        assert_eq!(Topology::TriangleList.triangle_count(6), 2);
        assert_eq!(Topology::TriangleStrip.triangle_count(6), 4);
        assert_eq!(Topology::TriangleFan.triangle_count(2), 0);
    }
}
