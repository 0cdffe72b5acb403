//! Shapes tessellated around an axis

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::{
    ensure_indexable, ensure_positive, push_vertex, srgb, unit_direction, AttributeLayout,
    Geometry, IndexType, Primitive, ShapeError, ShapeResult,
};

pub const DEFAULT_RING_SEGMENTS: u32 = 100;
pub const DEFAULT_SPHERE_SEGMENTS: u32 = 50;
pub const DEFAULT_SPHERE_DIVISIONS: u32 = 20;

/// Two unit vectors spanning the plane perpendicular to `up`.
///
/// For `up = +Z` the first ring point lands on `+Y` and the ring runs
/// counter-clockwise seen from above.
fn ring_basis(up: Vec3) -> (Vec3, Vec3) {
    let reference = if up.dot(Vec3::X).abs() > 0.9 {
        Vec3::Y
    } else {
        Vec3::X
    };
    let u = up.cross(reference).normalize();
    let v = up.cross(u).normalize();
    (u, v)
}

fn ring_points(center: Vec3, up: Vec3, radius: f32, segments: u32) -> impl Iterator<Item = Vec3> {
    let (u, v) = ring_basis(up);
    (0..segments).map(move |i| {
        let angle = i as f32 * TAU / segments as f32;
        center + (u * angle.cos() + v * angle.sin()) * radius
    })
}

fn ensure_segments(shape: &'static str, what: &'static str, min: u32, got: u32) -> ShapeResult<()> {
    if got >= min {
        Ok(())
    } else {
        Err(ShapeError::TooCoarse {
            shape,
            what,
            min,
            got,
        })
    }
}

/// `[center, first, first + 1, ..., first + count - 1, first]`
fn closed_fan(center: IndexType, first: IndexType, count: u32) -> Primitive {
    let mut indices = Vec::with_capacity(count as usize + 2);
    indices.push(center);
    indices.extend(first..first + count);
    indices.push(first);
    Primitive::fan(indices)
}

/// Cone resting on a disk around `center`, apex `height` along `up`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    center: Vec3,
    radius: f32,
    height: f32,
    up: Vec3,
    segments: u32,
}

impl Cone {
    pub fn new(center: Vec3, radius: f32, height: f32, up: Vec3) -> ShapeResult<Self> {
        ensure_positive("cone", "radius", radius)?;
        ensure_positive("cone", "height", height)?;
        let up = unit_direction("cone", "up", up)?;

        Ok(Self {
            center,
            radius,
            height,
            up,
            segments: DEFAULT_RING_SEGMENTS,
        })
    }

    pub fn with_segments(mut self, segments: u32) -> ShapeResult<Self> {
        ensure_segments("cone", "segments", 3, segments)?;
        ensure_indexable("cone", segments as u64 + 2)?;
        self.segments = segments;
        Ok(self)
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn apex(&self) -> Vec3 {
        self.center + self.up * self.height
    }
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, -1.0),
            radius: 1.0,
            height: 2.0,
            up: Vec3::Z,
            segments: DEFAULT_RING_SEGMENTS,
        }
    }
}

impl Geometry for Cone {
    fn vertices(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity((self.segments as usize + 2) * 6);
        push_vertex(&mut buffer, self.center, srgb::CYAN);
        for point in ring_points(self.center, self.up, self.radius, self.segments) {
            push_vertex(&mut buffer, point, srgb::PURPLE);
        }
        push_vertex(&mut buffer, self.apex(), srgb::RED);
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        let n = self.segments;
        vec![closed_fan(0, 1, n), closed_fan(n + 1, 1, n)]
    }
}

/// Cylinder whose bottom disk is centered on `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    center: Vec3,
    radius: f32,
    height: f32,
    up: Vec3,
    segments: u32,
}

impl Cylinder {
    pub fn new(center: Vec3, radius: f32, height: f32, up: Vec3) -> ShapeResult<Self> {
        ensure_positive("cylinder", "radius", radius)?;
        ensure_positive("cylinder", "height", height)?;
        let up = unit_direction("cylinder", "up", up)?;

        Ok(Self {
            center,
            radius,
            height,
            up,
            segments: DEFAULT_RING_SEGMENTS,
        })
    }

    pub fn with_segments(mut self, segments: u32) -> ShapeResult<Self> {
        ensure_segments("cylinder", "segments", 3, segments)?;
        ensure_indexable("cylinder", 2 * (segments as u64 + 1))?;
        self.segments = segments;
        Ok(self)
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn top_center(&self) -> Vec3 {
        self.center + self.up * self.height
    }
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, -2.0),
            radius: 2.0,
            height: 4.0,
            up: Vec3::Z,
            segments: DEFAULT_RING_SEGMENTS,
        }
    }
}

impl Geometry for Cylinder {
    fn vertices(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity((self.segments as usize + 1) * 2 * 6);
        for ring_center in [self.center, self.top_center()] {
            push_vertex(&mut buffer, ring_center, srgb::BLUE);
            for point in ring_points(ring_center, self.up, self.radius, self.segments) {
                push_vertex(&mut buffer, point, srgb::CYAN);
            }
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        let n = self.segments;
        let top = n + 1;

        let mut side = Vec::with_capacity(2 * n as usize + 2);
        for i in 0..n {
            side.extend([top + 1 + i, 1 + i]);
        }
        side.extend([top + 1, 1]);

        vec![
            closed_fan(0, 1, n),
            closed_fan(top, top + 1, n),
            Primitive::strip(side),
        ]
    }
}

/// Latitude/longitude sphere with poles on the Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    segments: u32,
    divisions: u32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> ShapeResult<Self> {
        ensure_positive("sphere", "radius", radius)?;
        Ok(Self {
            center,
            radius,
            segments: DEFAULT_SPHERE_SEGMENTS,
            divisions: DEFAULT_SPHERE_DIVISIONS,
        })
    }

    /// `segments` points around each band, `divisions` slices pole to pole.
    pub fn with_resolution(mut self, segments: u32, divisions: u32) -> ShapeResult<Self> {
        ensure_segments("sphere", "segments", 3, segments)?;
        ensure_segments("sphere", "divisions", 2, divisions)?;
        ensure_indexable("sphere", 2 + (divisions as u64 - 1) * segments as u64)?;
        self.segments = segments;
        self.divisions = divisions;
        Ok(self)
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Index of band vertex `j` on intermediate band `band` (0-based).
    fn band_index(&self, band: u32, j: u32) -> IndexType {
        band * self.segments + j + 2
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
            segments: DEFAULT_SPHERE_SEGMENTS,
            divisions: DEFAULT_SPHERE_DIVISIONS,
        }
    }
}

impl Geometry for Sphere {
    fn vertices(&self) -> Vec<f32> {
        let (s, d) = (self.segments, self.divisions);
        let mut buffer = Vec::with_capacity((2 + (d as usize - 1) * s as usize) * 6);

        push_vertex(&mut buffer, self.center + Vec3::Z * self.radius, srgb::YELLOW);
        push_vertex(&mut buffer, self.center - Vec3::Z * self.radius, srgb::YELLOW);

        for i in 1..d {
            let theta = i as f32 * PI / d as f32;
            for j in 0..s {
                let phi = j as f32 * TAU / s as f32;
                let direction = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                );
                push_vertex(&mut buffer, self.center + direction * self.radius, srgb::CYAN);
            }
        }
        buffer
    }

    fn layout(&self) -> AttributeLayout {
        AttributeLayout::position_color()
    }

    fn primitives(&self) -> Vec<Primitive> {
        let (s, d) = (self.segments, self.divisions);
        let bands = d - 1;
        let mut primitives = Vec::with_capacity(bands as usize + 1);

        for band in 0..bands - 1 {
            let mut strip = Vec::with_capacity(2 * s as usize + 2);
            for j in 0..s {
                strip.extend([self.band_index(band, j), self.band_index(band + 1, j)]);
            }
            strip.extend([self.band_index(band, 0), self.band_index(band + 1, 0)]);
            primitives.push(Primitive::strip(strip));
        }

        primitives.push(closed_fan(0, self.band_index(0, 0), s));
        primitives.push(closed_fan(1, self.band_index(bands - 1, 0), s));
        primitives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::test_support::{assert_indices_in_range, positions};
    use crate::drawable::Topology;
    use rstest::rstest;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_ring_basis_matches_z_up_convention() {
        let first = ring_points(Vec3::ZERO, Vec3::Z, 1.0, 4).next().unwrap();
        assert!(first.abs_diff_eq(Vec3::Y, EPS));
        let (u, v) = ring_basis(Vec3::X);
        assert!(u.is_normalized() && v.is_normalized());
        assert!(u.dot(v).abs() < EPS && u.dot(Vec3::X).abs() < EPS);
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(17)]
    #[case(100)]
    fn test_cone_ring_and_closed_fans(#[case] n: u32) {
        let cone = Cone::new(Vec3::new(1.0, 2.0, 3.0), 2.5, 4.0, Vec3::new(0.0, 1.0, 1.0))
            .unwrap()
            .with_segments(n)
            .unwrap();
        let points = positions(&cone);
        assert_eq!(points.len(), n as usize + 2);

        let up = Vec3::new(0.0, 1.0, 1.0).normalize();
        for point in &points[1..=n as usize] {
            let offset = *point - points[0];
            assert!((offset.length() - 2.5).abs() < EPS);
            assert!(offset.dot(up).abs() < EPS);
        }
        assert!(points[n as usize + 1].abs_diff_eq(cone.apex(), EPS));

        let primitives = cone.primitives();
        assert_eq!(primitives.len(), 2);
        for fan in &primitives {
            assert_eq!(fan.topology, Topology::TriangleFan);
            assert_eq!(fan.indices.len(), n as usize + 2);
            assert_eq!(fan.indices[1], *fan.indices.last().unwrap());
        }
        assert_eq!(primitives[0].indices[0], 0);
        assert_eq!(primitives[1].indices[0], n + 1);
        assert_indices_in_range(&cone);
    }

    #[rstest]
    #[case(3)]
    #[case(8)]
    #[case(100)]
    fn test_cylinder_rings_and_closed_side(#[case] n: u32) {
        let cylinder = Cylinder::new(Vec3::ZERO, 1.5, 2.0, Vec3::Z)
            .unwrap()
            .with_segments(n)
            .unwrap();
        let points = positions(&cylinder);
        assert_eq!(points.len(), 2 * (n as usize + 1));

        let ring = n as usize + 1;
        for (center, range) in [(0, 1..ring), (ring, ring + 1..2 * ring)] {
            for point in &points[range] {
                assert!((point.distance(points[center]) - 1.5).abs() < EPS);
                assert!((point.z - points[center].z).abs() < EPS);
            }
        }

        let primitives = cylinder.primitives();
        assert_eq!(primitives.len(), 3);
        for fan in &primitives[..2] {
            assert_eq!(fan.topology, Topology::TriangleFan);
            assert_eq!(fan.indices[1], *fan.indices.last().unwrap());
        }
        let side = &primitives[2];
        assert_eq!(side.topology, Topology::TriangleStrip);
        assert_eq!(side.indices.len(), 2 * n as usize + 2);
        assert_eq!(side.indices[..2], side.indices[side.indices.len() - 2..]);
        assert_indices_in_range(&cylinder);
    }

    #[rstest]
    #[case(3, 2)]
    #[case(4, 3)]
    #[case(50, 20)]
    #[case(7, 11)]
    fn test_sphere_counts(#[case] s: u32, #[case] d: u32) {
        let sphere = Sphere::new(Vec3::ZERO, 2.0)
            .unwrap()
            .with_resolution(s, d)
            .unwrap();
        let points = positions(&sphere);
        assert_eq!(points.len(), 2 + (d as usize - 1) * s as usize);

        let primitives = sphere.primitives();
        let strips = primitives
            .iter()
            .filter(|p| p.topology == Topology::TriangleStrip)
            .count();
        let fans = primitives
            .iter()
            .filter(|p| p.topology == Topology::TriangleFan)
            .count();
        assert_eq!(strips, d as usize - 2);
        assert_eq!(fans, 2);
        assert_indices_in_range(&sphere);
    }

    #[test]
    fn test_sphere_points_lie_on_surface() {
        let center = Vec3::new(0.5, -1.0, 2.0);
        let sphere = Sphere::new(center, 3.0).unwrap();
        for point in positions(&sphere) {
            assert!((point.distance(center) - 3.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_pole_fans_touch_adjacent_bands() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0)
            .unwrap()
            .with_resolution(4, 3)
            .unwrap();
        let primitives = sphere.primitives();
        assert_eq!(primitives[1].indices, vec![0, 2, 3, 4, 5, 2]);
        assert_eq!(primitives[2].indices, vec![1, 6, 7, 8, 9, 6]);
        assert_eq!(primitives[0].indices, vec![2, 6, 3, 7, 4, 8, 5, 9, 2, 6]);
    }

    #[test]
    fn test_cone_with_non_positive_height_fails() {
        assert!(matches!(
            Cone::new(Vec3::ZERO, 1.0, 0.0, Vec3::Z),
            Err(ShapeError::NonPositive { dimension: "height", .. })
        ));
        assert!(Cone::new(Vec3::ZERO, 1.0, -2.0, Vec3::Z).is_err());
    }

    #[test]
    fn test_too_coarse_tessellation_fails() {
        assert!(Cone::default().with_segments(2).is_err());
        assert!(Cylinder::default().with_segments(0).is_err());
        assert!(Sphere::default().with_resolution(3, 1).is_err());
        assert!(Sphere::default().with_resolution(2, 4).is_err());
    }

    #[test]
    fn test_tessellation_beyond_index_range_fails() {
        // 2 + 65536 * 65536 vertices
        assert!(matches!(
            Sphere::default().with_resolution(65_536, 65_537),
            Err(ShapeError::TooFine { shape: "sphere", .. })
        ));
        assert!(matches!(
            Cylinder::default().with_segments(u32::MAX),
            Err(ShapeError::TooFine { shape: "cylinder", .. })
        ));
        assert!(matches!(
            Cone::default().with_segments(u32::MAX),
            Err(ShapeError::TooFine { shape: "cone", .. })
        ));
        assert!(Sphere::default().with_resolution(1_000, 1_000).is_ok());
    }

    #[test]
    fn test_round_shapes_reject_non_positive_radius() {
        assert!(Cylinder::new(Vec3::ZERO, 0.0, 1.0, Vec3::Z).is_err());
        assert!(Sphere::new(Vec3::ZERO, -1.0).is_err());
        assert!(Cone::new(Vec3::ZERO, 1.0, 1.0, Vec3::ZERO).is_err());
    }
}
