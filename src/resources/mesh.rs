//! Mesh data structures and index packing

use crate::backend::{BufferHandle, ProgramHandle, TextureHandle, VertexArrayHandle};
use crate::drawable::{IndexType, Primitive, Topology};

/// Opaque reference to a loaded [`Mesh`]: its position in the engine's
/// mesh collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Renderable(pub(crate) usize);

impl Renderable {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One indexed draw call of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawElement {
    pub topology: Topology,
    pub count: u32,
    /// Number of indices written before this element, not bytes.
    pub offset: u32,
    /// Slot into the mesh's texture list.
    pub texture: Option<usize>,
}

impl DrawElement {
    pub fn byte_offset(&self) -> u64 {
        self.offset as u64 * std::mem::size_of::<IndexType>() as u64
    }
}

/// GPU-resident packaging of one drawable.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertex_array: VertexArrayHandle,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub program: ProgramHandle,
    pub textures: Vec<TextureHandle>,
    pub elements: Vec<DrawElement>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.elements.iter().map(|e| e.count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.elements
            .iter()
            .map(|e| e.topology.triangle_count(e.count as usize))
            .sum()
    }
}

/// Concatenated index buffer plus the draw elements that slice it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedIndices {
    pub indices: Vec<IndexType>,
    pub elements: Vec<DrawElement>,
}

impl PackedIndices {
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Concatenate primitive index lists in declaration order.
///
/// Each element's offset is the number of indices already written when its
/// list was appended. Fans are rewritten as triangle lists when
/// `supports_topology` rejects them.
pub fn pack_primitives(
    primitives: &[Primitive],
    supports_topology: impl Fn(Topology) -> bool,
) -> PackedIndices {
    let mut packed = PackedIndices::default();

    for primitive in primitives {
        let lowered;
        let (topology, indices) = if primitive.topology == Topology::TriangleFan
            && !supports_topology(Topology::TriangleFan)
        {
            lowered = lower_fan(&primitive.indices);
            (Topology::TriangleList, lowered.as_slice())
        } else {
            (primitive.topology, primitive.indices.as_slice())
        };

        packed.elements.push(DrawElement {
            topology,
            count: indices.len() as u32,
            offset: packed.indices.len() as u32,
            texture: primitive.texture,
        });
        packed.indices.extend_from_slice(indices);
    }

    packed
}

/// Triangle list covering the same triangles as the fan `indices`.
pub fn lower_fan(indices: &[IndexType]) -> Vec<IndexType> {
    let Some((&hub, rim)) = indices.split_first() else {
        return Vec::new();
    };
    rim.windows(2)
        .flat_map(|edge| [hub, edge[0], edge[1]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Primitive> {
        vec![
            Primitive::strip(vec![0, 1, 2, 3]),
            Primitive::fan(vec![4, 0, 1, 2, 0]),
            Primitive::list(vec![1, 2, 3]).with_texture(0),
        ]
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let packed = pack_primitives(&sample(), |_| true);
        assert_eq!(packed.indices.len(), 12);
        let offsets: Vec<_> = packed.elements.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0, 4, 9]);
        assert_eq!(packed.elements[1].topology, Topology::TriangleFan);
        assert_eq!(packed.elements[2].texture, Some(0));
        assert_eq!(packed.elements[2].byte_offset(), 36);
    }

    #[test]
    fn test_fans_lowered_when_unsupported() {
        let packed = pack_primitives(&sample(), |t| t != Topology::TriangleFan);
        let counts: Vec<_> = packed.elements.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![4, 9, 3]);
        assert_eq!(packed.elements[1].topology, Topology::TriangleList);
        assert_eq!(packed.elements[2].offset, 13);
        assert_eq!(&packed.indices[4..13], &[4, 0, 1, 4, 1, 2, 4, 2, 0]);
    }

    #[test]
    fn test_lower_fan_degenerate_inputs() {
        assert!(lower_fan(&[]).is_empty());
        assert!(lower_fan(&[3, 4]).is_empty());
        assert_eq!(lower_fan(&[0, 1, 2]), vec![0, 1, 2]);
    }

    #[test]
    fn test_index_bytes_little_endian_u32() {
        let packed = pack_primitives(&[Primitive::list(vec![1, 2, 3])], |_| true);
        assert_eq!(packed.index_bytes().len(), 12);
        assert_eq!(
            bytemuck::cast_slice::<u8, u32>(packed.index_bytes()),
            &[1, 2, 3]
        );
    }
}
