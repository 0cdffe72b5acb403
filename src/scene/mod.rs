//! Cameras

mod camera;
mod free_look;
mod orbit;

pub use camera::*;
pub use free_look::{FreeLookCamera, Movement};
pub use orbit::OrbitCamera;

/// Tuning constants of the camera models.
pub mod limits {
    pub use super::free_look::{MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT, SENSITIVITY, SPEED};
    pub use super::orbit::{
        DRAG_SENSITIVITY, MAX_RADIUS, MAX_THETA, MIN_RADIUS, MIN_THETA, ZOOM_SENSITIVITY,
    };
}
