//! Core backend abstraction traits
//!
//! A backend owns every GPU object and all bind state. Meshes, programs and
//! textures are referred to through the plain handles below; the backend
//! value itself is threaded through upload and draw calls so that the
//! single owner of the GPU is visible in every signature.

use crate::backend::types::*;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to initialize backend: {0}")]
    InitializationFailed(String),
    #[error("Failed to create surface: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to create device: {0}")]
    DeviceCreationFailed(String),
    #[error("Failed to acquire next image: {0}")]
    AcquireImageFailed(String),
    #[error("Failed to create buffer: {0}")]
    BufferCreationFailed(String),
    #[error("Failed to create texture: {0}")]
    TextureCreationFailed(String),
    #[error("Failed to create vertex array: {0}")]
    VertexArrayCreationFailed(String),
    #[error("Surface lost")]
    SurfaceLost,
    #[error("Out of memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

/// Handle to a sampled GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u64);

/// Handle to a linked vertex + fragment program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u64);

/// Handle to a vertex buffer / index buffer pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub(crate) u64);

/// Buffer descriptor
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub usage: BufferUsage,
}

/// Program descriptor: two WGSL stages with `vs_main` / `fs_main` entry
/// points and the vertex layout they consume.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    pub label: Option<String>,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub layout: VertexBufferLayout,
    /// Whether the fragment stage samples a texture at unit 0.
    pub textured: bool,
}

/// Vertex array descriptor
#[derive(Debug, Clone, Copy)]
pub struct VertexArrayDescriptor {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
}

/// Main graphics backend trait
pub trait GraphicsBackend {
    /// Human readable backend name
    fn name(&self) -> &'static str;

    /// Resize the swapchain
    fn resize(&mut self, width: u32, height: u32);

    /// Get the actual surface size (may be clamped by device limits)
    fn surface_size(&self) -> (u32, u32);

    /// Whether indexed draws with `topology` can be issued directly
    fn supports_topology(&self, topology: Topology) -> bool;

    fn set_polygon_mode(&mut self, mode: PolygonMode);

    fn polygon_mode(&self) -> PolygonMode;

    /// Begin a new frame
    fn begin_frame(&mut self) -> BackendResult<()>;

    /// End and present the frame
    fn end_frame(&mut self) -> BackendResult<()>;

    // Resource creation

    /// Create a buffer with initial data
    fn create_buffer_init(&mut self, desc: &BufferDescriptor, data: &[u8])
        -> BackendResult<BufferHandle>;

    /// Create a texture and upload its contents
    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle>;

    /// Compile and link a program. Compile or link diagnostics are logged and
    /// the returned handle may render nothing.
    fn create_program(&mut self, desc: &ProgramDescriptor) -> BackendResult<ProgramHandle>;

    fn create_vertex_array(&mut self, desc: &VertexArrayDescriptor)
        -> BackendResult<VertexArrayHandle>;

    // Command recording and execution

    /// Begin a render pass clearing colour to `clear_color` and depth to 1
    fn begin_render_pass(&mut self, clear_color: [f32; 4]);

    /// End the current render pass
    fn end_render_pass(&mut self);

    fn bind_program(&mut self, program: ProgramHandle);

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Write the `model` / `view` / `projection` uniforms of `program`
    fn set_uniforms(&mut self, program: ProgramHandle, uniforms: &TransformUniforms);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Draw `count` indices of the bound vertex array starting at index
    /// `first_index` (element offset, not bytes)
    fn draw_indexed(&mut self, topology: Topology, count: u32, first_index: u32);

    // Resource cleanup

    fn destroy_buffer(&mut self, buffer: BufferHandle);

    fn destroy_texture(&mut self, texture: TextureHandle);

    fn destroy_program(&mut self, program: ProgramHandle);

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);
}
