//! Shape Engine - procedural shapes drawn through a small immediate-mode
//! renderer
//!
//! - **drawable**: closed-form tessellation of triangles, cubes, cones,
//!   cylinders, spheres and height fields into flat vertex buffers plus
//!   topology-tagged index lists
//! - **engine**: packs a drawable into GPU buffers and issues one indexed draw
//!   per primitive with a model / view / projection transform
//! - **scene**: orbit and free-look cameras
//! - **backend**: the graphics context trait, a wgpu implementation and a
//!   recording implementation for tests

pub mod backend;
pub mod drawable;
pub mod engine;
pub mod entity;
pub mod resources;
pub mod scene;
pub mod window;

use std::path::PathBuf;

pub use backend::{GraphicsBackend, PolygonMode, WgpuBackend};
pub use drawable::{Drawable, Geometry};
pub use engine::{Engine, EngineError, EngineResult};
pub use entity::{Entity, EntityAllocator};
pub use window::{InputBindings, Window};

/// Configuration for initializing the engine and its window
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Colour every render call clears to
    pub clear_color: [f32; 4],
    /// Directory holding the `*.vert.wgsl` / `*.frag.wgsl` pairs
    pub shader_dir: PathBuf,
    pub polygon_mode: PolygonMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Shape Engine".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            clear_color: [0.09804, 0.14118, 0.15686, 1.0],
            shader_dir: PathBuf::from("shaders"),
            polygon_mode: PolygonMode::Fill,
        }
    }
}

/// Install the `env_logger` backend, `info` unless `RUST_LOG` says otherwise.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
