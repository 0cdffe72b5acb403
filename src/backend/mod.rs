//! Backend abstraction layer
//!
//! Provides the graphics context trait plus a wgpu implementation and a
//! recording implementation that needs no GPU.

pub mod dummy;
pub mod traits;
pub mod types;
pub mod wgpu_backend;

pub use dummy::{DummyBackend, RecordedCommand};
pub use traits::*;
pub use types::*;
pub use wgpu_backend::WgpuBackend;
