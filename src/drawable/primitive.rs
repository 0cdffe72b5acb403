//! Topology-tagged index lists

pub use crate::backend::Topology;

/// Index element type. Draw offsets are converted to bytes with its size.
pub type IndexType = u32;

/// One batch of vertex indices forming part of a shape's surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    pub topology: Topology,
    pub indices: Vec<IndexType>,
    /// Slot into the drawable's texture list, if this batch is textured.
    pub texture: Option<usize>,
}

impl Primitive {
    pub fn new(topology: Topology, indices: Vec<IndexType>) -> Self {
        Self {
            topology,
            indices,
            texture: None,
        }
    }

    pub fn list(indices: Vec<IndexType>) -> Self {
        Self::new(Topology::TriangleList, indices)
    }

    pub fn strip(indices: Vec<IndexType>) -> Self {
        Self::new(Topology::TriangleStrip, indices)
    }

    pub fn fan(indices: Vec<IndexType>) -> Self {
        Self::new(Topology::TriangleFan, indices)
    }

    pub fn with_texture(mut self, slot: usize) -> Self {
        self.texture = Some(slot);
        self
    }

    pub fn max_index(&self) -> Option<IndexType> {
        self.indices.iter().copied().max()
    }
}
