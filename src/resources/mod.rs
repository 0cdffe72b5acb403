//! Resource management
//!
//! Handles packaging drawables into meshes, loading shader sources and
//! decoding textures.

mod mesh;
mod shader;
mod texture;

pub use mesh::*;
pub use shader::*;
pub use texture::*;
