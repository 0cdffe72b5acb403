//! Shapes given directly by their corner points

use glam::Vec3;

use super::{push_vertex, srgb, AttributeLayout, Geometry, Primitive};

/// Single triangle with red, green and blue corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    points: [Vec3; 3],
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            points: [p0, p1, p2],
        }
    }

    pub fn points(&self) -> &[Vec3; 3] {
        &self.points
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Self::new(
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        )
    }
}

impl Geometry for Triangle {
    fn vertices(&self) -> Vec<f32> {
        let colors = [srgb::RED, srgb::GREEN, srgb::BLUE];
        let mut buffer = Vec::with_capacity(3 * 6);
        for (point, color) in self.points.iter().zip(colors) {
            push_vertex(&mut buffer, *point, color);
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        vec![Primitive::list(vec![0, 1, 2])]
    }
}

/// Four points drawn as one strip that wraps back to the first corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Tetrahedron {
    points: [Vec3; 4],
}

impl Tetrahedron {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    pub fn points(&self) -> &[Vec3; 4] {
        &self.points
    }
}

impl Default for Tetrahedron {
    fn default() -> Self {
        Self::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(-1.0, 0.0, 1.0),
        )
    }
}

impl Geometry for Tetrahedron {
    fn vertices(&self) -> Vec<f32> {
        let colors = [srgb::RED, srgb::GREEN, srgb::BLUE, srgb::CYAN];
        let mut buffer = Vec::with_capacity(4 * 6);
        for (point, color) in self.points.iter().zip(colors) {
            push_vertex(&mut buffer, *point, color);
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        vec![Primitive::strip(vec![0, 2, 1, 3, 0])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::test_support::{assert_indices_in_range, positions};
    use crate::drawable::Topology;

    #[test]
    fn test_triangle_keeps_input_points_in_order() {
        let triangle = Triangle::new(Vec3::X, Vec3::Y, Vec3::Z);
        assert_eq!(positions(&triangle), vec![Vec3::X, Vec3::Y, Vec3::Z]);

        let primitives = triangle.primitives();
        assert_eq!(primitives.len(), 1);
        assert_eq!(primitives[0].topology, Topology::TriangleList);
        assert_eq!(primitives[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_triangle_layout_round_trip() {
        let triangle = Triangle::default();
        let layout = triangle.layout();
        let vertices = triangle.vertices();
        let records: Vec<_> = layout.records(&vertices).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][0], &[-0.5, -0.5, 0.0]);
        assert_eq!(records[0][1], &srgb::RED);
        assert_eq!(records[2][0], &[0.0, 0.5, 0.0]);
        assert_eq!(records[2][1], &srgb::BLUE);
    }

    #[test]
    fn test_tetrahedron_is_one_strip() {
        let tetrahedron = Tetrahedron::default();
        assert_eq!(positions(&tetrahedron), tetrahedron.points().to_vec());

        let primitives = tetrahedron.primitives();
        assert_eq!(primitives.len(), 1);
        assert_eq!(primitives[0].topology, Topology::TriangleStrip);
        assert_indices_in_range(&tetrahedron);
    }
}
