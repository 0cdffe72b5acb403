//! Height fields sampled from `z = f(x, y)`

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use super::{
    ensure_indexable, ensure_positive, push_vertex, srgb, AttributeLayout, Geometry, IndexType,
    Primitive, ShapeError, ShapeResult,
};

type HeightFn = Arc<dyn Fn(f32, f32) -> f32 + Send + Sync>;

/// Regular grid over `[-hx, hx] x [-hy, hy]` lifted by a height function.
///
/// Grid point `(i, j)` has index `j * (segments_x + 1) + i`. Each row band
/// `j` is one triangle strip alternating between rows `j` and `j + 1`.
#[derive(Clone)]
pub struct HeightField {
    function: HeightFn,
    half_extent_x: f32,
    half_extent_y: f32,
    segments_x: u32,
    segments_y: u32,
    color: [f32; 3],
}

impl fmt::Debug for HeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightField")
            .field("half_extent_x", &self.half_extent_x)
            .field("half_extent_y", &self.half_extent_y)
            .field("segments_x", &self.segments_x)
            .field("segments_y", &self.segments_y)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl HeightField {
    pub fn builder<F>(function: F) -> HeightFieldBuilder
    where
        F: Fn(f32, f32) -> f32 + Send + Sync + 'static,
    {
        HeightFieldBuilder {
            function: Arc::new(function),
            half_extent_x: 10.0,
            half_extent_y: 10.0,
            segments_x: 100,
            segments_y: 100,
            color: srgb::GREEN,
        }
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.segments_x + 1, self.segments_y + 1)
    }

    fn grid_index(&self, i: u32, j: u32) -> IndexType {
        j * (self.segments_x + 1) + i
    }
}

impl Geometry for HeightField {
    fn vertices(&self) -> Vec<f32> {
        let (columns, rows) = self.grid_size();
        let mut buffer = Vec::with_capacity((columns * rows) as usize * 6);
        for j in 0..rows {
            let y = -self.half_extent_y + 2.0 * self.half_extent_y * j as f32 / self.segments_y as f32;
            for i in 0..columns {
                let x =
                    -self.half_extent_x + 2.0 * self.half_extent_x * i as f32 / self.segments_x as f32;
                push_vertex(&mut buffer, Vec3::new(x, y, (self.function)(x, y)), self.color);
            }
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        (0..self.segments_y)
            .map(|j| {
                let mut strip = Vec::with_capacity(2 * (self.segments_x as usize + 1));
                for i in 0..=self.segments_x {
                    strip.extend([self.grid_index(i, j), self.grid_index(i, j + 1)]);
                }
                Primitive::strip(strip)
            })
            .collect()
    }
}

pub struct HeightFieldBuilder {
    function: HeightFn,
    half_extent_x: f32,
    half_extent_y: f32,
    segments_x: u32,
    segments_y: u32,
    color: [f32; 3],
}

impl HeightFieldBuilder {
    pub fn half_extents(mut self, x: f32, y: f32) -> Self {
        self.half_extent_x = x;
        self.half_extent_y = y;
        self
    }

    pub fn segments(mut self, x: u32, y: u32) -> Self {
        self.segments_x = x;
        self.segments_y = y;
        self
    }

    pub fn color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn build(self) -> ShapeResult<HeightField> {
        ensure_positive("height field", "half extent x", self.half_extent_x)?;
        ensure_positive("height field", "half extent y", self.half_extent_y)?;
        for (what, got) in [("segments x", self.segments_x), ("segments y", self.segments_y)] {
            if got == 0 {
                return Err(ShapeError::TooCoarse {
                    shape: "height field",
                    what,
                    min: 1,
                    got,
                });
            }
        }
        ensure_indexable(
            "height field",
            (self.segments_x as u64 + 1) * (self.segments_y as u64 + 1),
        )?;

        Ok(HeightField {
            function: self.function,
            half_extent_x: self.half_extent_x,
            half_extent_y: self.half_extent_y,
            segments_x: self.segments_x,
            segments_y: self.segments_y,
            color: self.color,
        })
    }
}
