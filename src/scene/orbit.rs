//! Camera orbiting the origin on a sphere

use glam::{Mat4, Vec3};

use super::{Projection, ViewProjection};

pub const MIN_RADIUS: f32 = 1.0;
pub const MAX_RADIUS: f32 = 50.0;
/// Polar angle bounds in degrees, measured from +Z.
pub const MIN_THETA: f32 = 1.0;
pub const MAX_THETA: f32 = 179.0;
pub const ZOOM_SENSITIVITY: f32 = 0.3;
/// Degrees per unit of drag.
pub const DRAG_SENSITIVITY: f32 = 0.5;

/// Orbit camera with +Z as world up, always looking at the origin.
///
/// Azimuth is periodic and kept in `[0, 360)`; the polar angle is clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    radius: f32,
    azimuth: f32,
    polar: f32,
    projection: Projection,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(4.0, -90.0, 80.0)
    }
}

impl OrbitCamera {
    /// Angles in degrees. Out-of-range values are brought into range.
    pub fn new(radius: f32, azimuth: f32, polar: f32) -> Self {
        Self {
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            azimuth: wrap_degrees(azimuth),
            polar: polar.clamp(MIN_THETA, MAX_THETA),
            projection: Projection::default(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Rotate by a cursor drag delta.
    pub fn relative_drag(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.azimuth = wrap_degrees(self.azimuth - dx * DRAG_SENSITIVITY);
        self.polar = (self.polar - dy * DRAG_SENSITIVITY).clamp(MIN_THETA, MAX_THETA);
    }

    /// Move towards the origin for positive `amount`.
    pub fn relative_zoom(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.radius = (self.radius - amount * ZOOM_SENSITIVITY).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn set_frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.projection = Projection::frustum(left, right, bottom, top, near, far);
    }

    pub fn set_perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Projection::perspective(fov_y_degrees, aspect, near, far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.set_aspect(aspect);
    }

    pub fn eye_position(&self) -> Vec3 {
        let (theta, phi) = (self.polar.to_radians(), self.azimuth.to_radians());
        self.radius
            * Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            )
    }
}

impl ViewProjection for OrbitCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), Vec3::ZERO, Vec3::Z)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let camera = OrbitCamera::default();
        assert_eq!(camera.radius(), 4.0);
        assert_eq!(camera.azimuth(), 270.0);
        assert_eq!(camera.polar(), 80.0);
    }

    #[rstest]
    #[case(&[1.0, 2.0, 3.0])]
    #[case(&[1000.0])]
    #[case(&[-1000.0])]
    #[case(&[f32::INFINITY, f32::NEG_INFINITY, 0.5])]
    #[case(&[-5.0, 200.0, -200.0, 7.5, f32::NAN, -0.1])]
    fn test_zoom_keeps_radius_in_bounds(#[case] amounts: &[f32]) {
        let mut camera = OrbitCamera::default();
        for &amount in amounts {
            camera.relative_zoom(amount);
            assert!((MIN_RADIUS..=MAX_RADIUS).contains(&camera.radius()));
        }
    }

    #[test]
    fn test_zoom_clamping_is_idempotent() {
        let mut camera = OrbitCamera::default();
        camera.relative_zoom(1e6);
        assert_eq!(camera.radius(), MIN_RADIUS);
        camera.relative_zoom(1e6);
        assert_eq!(camera.radius(), MIN_RADIUS);
        camera.relative_zoom(-1e6);
        assert_eq!(camera.radius(), MAX_RADIUS);
    }

    #[test]
    fn test_zoom_moves_by_sensitivity() {
        let mut camera = OrbitCamera::default();
        camera.relative_zoom(2.0);
        assert!((camera.radius() - (4.0 - 2.0 * ZOOM_SENSITIVITY)).abs() < 1e-6);
    }

    #[test]
    fn test_drag_wraps_azimuth_and_clamps_polar() {
        let mut camera = OrbitCamera::new(4.0, 10.0, 90.0);
        camera.relative_drag(60.0, 0.0);
        assert!((camera.azimuth() - 340.0).abs() < 1e-4);
        camera.relative_drag(-100.0, 0.0);
        assert!((camera.azimuth() - 30.0).abs() < 1e-4);

        camera.relative_drag(0.0, 1000.0);
        assert_eq!(camera.polar(), MIN_THETA);
        camera.relative_drag(0.0, -1000.0);
        assert_eq!(camera.polar(), MAX_THETA);
    }

    #[test]
    fn test_azimuth_stays_in_range_under_repeated_drag() {
        let mut camera = OrbitCamera::default();
        for step in 0..1000 {
            let dx = if step % 3 == 0 { -7.3 } else { 11.9 };
            camera.relative_drag(dx, 0.0);
            assert!((0.0..360.0).contains(&camera.azimuth()));
        }
    }

    #[test]
    fn test_eye_on_sphere_looking_at_origin() {
        let camera = OrbitCamera::new(5.0, 30.0, 60.0);
        let eye = camera.eye_position();
        assert!((eye.length() - 5.0).abs() < 1e-5);

        let origin_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin_in_view.x.abs() < 1e-5 && origin_in_view.y.abs() < 1e-5);
        assert!((origin_in_view.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_setters() {
        let mut camera = OrbitCamera::default();
        camera.set_frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        assert!(matches!(camera.projection(), Projection::Frustum { .. }));
        camera.set_perspective(60.0, 2.0, 0.5, 50.0);
        camera.set_aspect(1.0);
        assert_eq!(*camera.projection(), Projection::perspective(60.0, 1.0, 0.5, 50.0));
    }
}
