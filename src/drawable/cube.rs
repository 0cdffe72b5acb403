//! Square-based solids oriented by an up axis and a corner direction

use glam::Vec3;

use super::{
    ensure_perpendicular, ensure_positive, push_vertex, srgb, unit_direction, AttributeLayout,
    Geometry, Primitive, ShapeResult,
};

/// Cube standing on its base, with one base corner along `corner`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    center: Vec3,
    up: Vec3,
    corner: Vec3,
    side: f32,
}

impl Cube {
    /// `up` and `corner` are normalized; they must be perpendicular and
    /// `side` must be positive.
    pub fn new(center: Vec3, up: Vec3, corner: Vec3, side: f32) -> ShapeResult<Self> {
        ensure_positive("cube", "side length", side)?;
        let up = unit_direction("cube", "up", up)?;
        let corner = unit_direction("cube", "corner", corner)?;
        ensure_perpendicular("cube", ("up", up), ("corner", corner))?;

        Ok(Self {
            center,
            up,
            corner,
            side,
        })
    }

    pub fn base_center(&self) -> Vec3 {
        self.center - self.up * (self.side / 2.0)
    }

    pub fn top_center(&self) -> Vec3 {
        self.center + self.up * (self.side / 2.0)
    }

    /// Distance from a face center to each of its corners.
    pub fn corner_radius(&self) -> f32 {
        self.side / std::f32::consts::SQRT_2
    }

    /// Base corners first, each top corner follows at the same position + 4.
    pub fn corners(&self) -> [Vec3; 8] {
        let base = self.base_center();
        let radius = self.corner_radius();
        let left = self.up.cross(self.corner).normalize();
        let right = self.corner.cross(self.up).normalize();

        let p0 = base + self.corner * radius;
        let p1 = base + left * radius;
        let p2 = base - self.corner * radius;
        let p3 = base + right * radius;
        let lift = self.up * self.side;

        [p0, p1, p2, p3, p0 + lift, p1 + lift, p2 + lift, p3 + lift]
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            up: Vec3::Z,
            corner: Vec3::X,
            side: 1.0,
        }
    }
}

impl Geometry for Cube {
    fn vertices(&self) -> Vec<f32> {
        let colors = [
            srgb::RED,
            srgb::BLACK,
            srgb::GREEN,
            srgb::YELLOW,
            srgb::MAGENTA,
            srgb::BLUE,
            srgb::CYAN,
            srgb::WHITE,
        ];
        let mut buffer = Vec::with_capacity(8 * 6);
        for (corner, color) in self.corners().into_iter().zip(colors) {
            push_vertex(&mut buffer, corner, color);
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        vec![
            // sides, zig-zagging top/bottom around the loop
            Primitive::strip(vec![4, 0, 5, 1, 6, 2, 7, 3, 4, 0]),
            // top
            Primitive::strip(vec![4, 5, 7, 6]),
            // bottom
            Primitive::strip(vec![3, 2, 0, 1]),
        ]
    }
}

/// Square pyramid: base centered on `base_center`, apex `height` along `up`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pyramid {
    base_center: Vec3,
    up: Vec3,
    side: Vec3,
    base_length: f32,
    height: f32,
}

impl Pyramid {
    /// `side` gives the direction of one pair of base edges and must be
    /// perpendicular to `up`.
    pub fn new(
        base_center: Vec3,
        up: Vec3,
        side: Vec3,
        base_length: f32,
        height: f32,
    ) -> ShapeResult<Self> {
        ensure_positive("pyramid", "base length", base_length)?;
        ensure_positive("pyramid", "height", height)?;
        let up = unit_direction("pyramid", "up", up)?;
        let side = unit_direction("pyramid", "side", side)?;
        ensure_perpendicular("pyramid", ("up", up), ("side", side))?;

        Ok(Self {
            base_center,
            up,
            side,
            base_length,
            height,
        })
    }

    pub fn apex(&self) -> Vec3 {
        self.base_center + self.up * self.height
    }

    /// Base corners in loop order around `up`.
    pub fn base_corners(&self) -> [Vec3; 4] {
        let half = self.base_length / 2.0;
        let s = self.side * half;
        let t = self.up.cross(self.side).normalize() * half;
        let b = self.base_center;
        [b + s + t, b - s + t, b - s - t, b + s - t]
    }
}

impl Default for Pyramid {
    fn default() -> Self {
        Self {
            base_center: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Z,
            side: Vec3::X,
            base_length: 1.0,
            height: 2.0,
        }
    }
}

impl Geometry for Pyramid {
    fn vertices(&self) -> Vec<f32> {
        let colors = [srgb::RED, srgb::GREEN, srgb::BLUE, srgb::YELLOW];
        let mut buffer = Vec::with_capacity(5 * 6);
        for (corner, color) in self.base_corners().into_iter().zip(colors) {
            push_vertex(&mut buffer, corner, color);
        }
        push_vertex(&mut buffer, self.apex(), srgb::WHITE);
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        vec![
            Primitive::fan(vec![4, 0, 1, 2, 3, 0]),
            Primitive::strip(vec![0, 3, 1, 2]),
        ]
    }
}
