//! Camera system

use glam::{Mat4, Vec4};

use super::{FreeLookCamera, OrbitCamera};

/// Camera projection type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Off-axis perspective given by the near-plane rectangle.
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::perspective(45.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Projection::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Right-handed projection mapping depth to `[0, 1]`.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => {
                let depth = far / (near - far);
                Mat4::from_cols(
                    Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
                    Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
                    Vec4::new(
                        (right + left) / (right - left),
                        (top + bottom) / (top - bottom),
                        depth,
                        -1.0,
                    ),
                    Vec4::new(0.0, 0.0, depth * near, 0.0),
                )
            }
        }
    }

    pub fn near(&self) -> f32 {
        match self {
            Projection::Perspective { near, .. } => *near,
            Projection::Frustum { near, .. } => *near,
        }
    }

    pub fn far(&self) -> f32 {
        match self {
            Projection::Perspective { far, .. } => *far,
            Projection::Frustum { far, .. } => *far,
        }
    }

    /// Keeps the vertical extent; a frustum is widened or narrowed around
    /// its horizontal center.
    pub fn set_aspect(&mut self, aspect: f32) {
        if !(aspect.is_finite() && aspect > 0.0) {
            return;
        }
        match self {
            Projection::Perspective { aspect: a, .. } => *a = aspect,
            Projection::Frustum {
                left,
                right,
                bottom,
                top,
                ..
            } => {
                let center = (*left + *right) / 2.0;
                let half_width = (*top - *bottom) * aspect / 2.0;
                *left = center - half_width;
                *right = center + half_width;
            }
        }
    }
}

/// Anything that can supply the view and projection transforms of a draw.
pub trait ViewProjection {
    fn view_matrix(&self) -> Mat4;

    fn projection_matrix(&self) -> Mat4;
}

/// One of the two camera models; never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    Orbit(OrbitCamera),
    FreeLook(FreeLookCamera),
}

impl Camera {
    pub fn set_aspect(&mut self, aspect: f32) {
        match self {
            Camera::Orbit(camera) => camera.set_aspect(aspect),
            Camera::FreeLook(camera) => camera.set_aspect(aspect),
        }
    }

    pub fn as_orbit_mut(&mut self) -> Option<&mut OrbitCamera> {
        match self {
            Camera::Orbit(camera) => Some(camera),
            Camera::FreeLook(_) => None,
        }
    }

    pub fn as_free_look_mut(&mut self) -> Option<&mut FreeLookCamera> {
        match self {
            Camera::FreeLook(camera) => Some(camera),
            Camera::Orbit(_) => None,
        }
    }
}

impl ViewProjection for Camera {
    fn view_matrix(&self) -> Mat4 {
        match self {
            Camera::Orbit(camera) => camera.view_matrix(),
            Camera::FreeLook(camera) => camera.view_matrix(),
        }
    }

    fn projection_matrix(&self) -> Mat4 {
        match self {
            Camera::Orbit(camera) => camera.projection_matrix(),
            Camera::FreeLook(camera) => camera.projection_matrix(),
        }
    }
}

impl From<OrbitCamera> for Camera {
    fn from(camera: OrbitCamera) -> Self {
        Camera::Orbit(camera)
    }
}

impl From<FreeLookCamera> for Camera {
    fn from(camera: FreeLookCamera) -> Self {
        Camera::FreeLook(camera)
    }
}
