//! Vertex attribute layouts
//!
//! A drawable hands the renderer one flat `f32` buffer. The layout says how
//! that buffer splits into per-vertex records: attributes are packed in
//! declaration order, each one `width` floats wide.

/// Number of floats in one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSize {
    Vec1 = 1,
    Vec2 = 2,
    Vec3 = 3,
    Vec4 = 4,
}

impl AttributeSize {
    pub fn width(self) -> usize {
        self as usize
    }
}

/// One entry of an [`AttributeLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericAttribute {
    pub size: AttributeSize,
    pub normalized: bool,
}

impl GenericAttribute {
    pub const fn new(size: AttributeSize, normalized: bool) -> Self {
        Self { size, normalized }
    }
}

/// Ordered attribute list describing one vertex record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttributeLayout {
    attributes: Vec<GenericAttribute>,
}

impl AttributeLayout {
    pub fn new(attributes: Vec<GenericAttribute>) -> Self {
        Self { attributes }
    }

    /// Position (vec3) followed by a baked colour (vec3).
    pub fn position_color() -> Self {
        Self::new(vec![
            GenericAttribute::new(AttributeSize::Vec3, false),
            GenericAttribute::new(AttributeSize::Vec3, false),
        ])
    }

    /// Position (vec3) followed by a texture coordinate (vec2).
    pub fn position_uv() -> Self {
        Self::new(vec![
            GenericAttribute::new(AttributeSize::Vec3, false),
            GenericAttribute::new(AttributeSize::Vec2, false),
        ])
    }

    pub fn attributes(&self) -> &[GenericAttribute] {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Sum of attribute widths.
    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.size.width()).sum()
    }

    /// Size of one vertex record in bytes.
    pub fn stride(&self) -> u64 {
        (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u64
    }

    /// Byte offset of every attribute inside a record.
    pub fn offsets(&self) -> Vec<u64> {
        let mut offset = 0u64;
        self.attributes
            .iter()
            .map(|attribute| {
                let current = offset;
                offset += (attribute.size.width() * std::mem::size_of::<f32>()) as u64;
                current
            })
            .collect()
    }

    /// Number of whole records in `data`, or `None` if the buffer does not
    /// split evenly.
    pub fn vertex_count(&self, data: &[f32]) -> Option<usize> {
        let width = self.floats_per_vertex();
        if width == 0 || data.len() % width != 0 {
            return None;
        }
        Some(data.len() / width)
    }

    /// Decode `data` into records, one slice per attribute.
    ///
    /// A trailing partial record is ignored.
    pub fn records<'a>(&'a self, data: &'a [f32]) -> impl Iterator<Item = Vec<&'a [f32]>> + 'a {
        let width = self.floats_per_vertex().max(1);
        data.chunks_exact(width).map(move |record| {
            let mut start = 0;
            self.attributes
                .iter()
                .map(|attribute| {
                    let end = start + attribute.size.width();
                    let slice = &record[start..end];
                    start = end;
                    slice
                })
                .collect()
        })
    }
}
