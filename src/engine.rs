//! Mesh loading and drawing

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Mat4;
use thiserror::Error;

use crate::backend::{
    BackendError, BufferDescriptor, BufferHandle, BufferUsage, GraphicsBackend, ProgramDescriptor,
    ProgramHandle, TextureHandle, TransformUniforms, VertexArrayDescriptor, VertexArrayHandle,
    VertexBufferLayout,
};
use crate::drawable::{AttributeLayout, Drawable, Geometry};
use crate::entity::Entity;
use crate::resources::{
    pack_primitives, Mesh, PackedIndices, Renderable, ShaderError, ShaderKind, ShaderSource,
    TextureData,
};
use crate::scene::{Camera, ViewProjection};
use crate::EngineConfig;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{name}: {floats} vertex floats do not split into records of {width}")]
    InvalidVertexData {
        name: &'static str,
        floats: usize,
        width: usize,
    },

    #[error("{name}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        name: &'static str,
        index: u32,
        vertex_count: usize,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Owns every loaded mesh and the cameras registered against entities.
///
/// GPU objects live in the graphics context passed to each call; the engine
/// only keeps their handles. [`Engine::destroy`] must be called with the same
/// context before it is dropped.
pub struct Engine {
    meshes: Vec<Mesh>,
    programs: HashMap<(ShaderKind, AttributeLayout), ProgramHandle>,
    cameras: HashMap<Entity, Camera>,
    clear_color: [f32; 4],
    shader_dir: PathBuf,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            meshes: Vec::new(),
            programs: HashMap::new(),
            cameras: HashMap::new(),
            clear_color: config.clear_color,
            shader_dir: config.shader_dir.clone(),
        }
    }

    /// Upload a drawable and return the handle to draw it with.
    ///
    /// Vertex data, layout and primitives are each produced exactly once.
    /// Index lists are concatenated in declaration order; fans are lowered to
    /// lists on contexts that cannot draw them.
    pub fn load_mesh<B: GraphicsBackend>(
        &mut self,
        gfx: &mut B,
        drawable: &Drawable,
    ) -> EngineResult<Renderable> {
        let name = drawable.name();
        let vertices = drawable.vertices();
        let layout = drawable.layout();
        let primitives = drawable.primitives();

        let vertex_count =
            layout
                .vertex_count(&vertices)
                .ok_or(EngineError::InvalidVertexData {
                    name,
                    floats: vertices.len(),
                    width: layout.floats_per_vertex(),
                })?;
        if let Some(index) = primitives
            .iter()
            .flat_map(|p| p.indices.iter().copied())
            .find(|&i| i as usize >= vertex_count)
        {
            return Err(EngineError::IndexOutOfRange {
                name,
                index,
                vertex_count,
            });
        }

        let program = self.program_for(gfx, drawable.shader(), &layout)?;

        let packed = pack_primitives(&primitives, |topology| gfx.supports_topology(topology));

        let mut pending = PendingUpload::default();
        let (vertex_buffer, index_buffer, vertex_array) =
            match upload(gfx, name, &vertices, &packed, &drawable.textures(), &mut pending) {
                Ok(handles) => handles,
                Err(err) => {
                    log::warn!("Loading {name} failed, releasing partial upload: {err}");
                    pending.release(gfx);
                    return Err(err);
                }
            };
        let textures = pending.textures;

        let mesh = Mesh {
            name: name.to_string(),
            vertex_array,
            vertex_buffer,
            index_buffer,
            program,
            textures,
            elements: packed.elements,
        };
        log::debug!(
            "Loaded {}: {} vertices, {} indices in {} draw elements",
            mesh.name,
            vertex_count,
            mesh.index_count(),
            mesh.elements.len()
        );

        self.meshes.push(mesh);
        Ok(Renderable(self.meshes.len() - 1))
    }

    fn program_for<B: GraphicsBackend>(
        &mut self,
        gfx: &mut B,
        kind: ShaderKind,
        layout: &AttributeLayout,
    ) -> EngineResult<ProgramHandle> {
        let key = (kind, layout.clone());
        if let Some(program) = self.programs.get(&key) {
            return Ok(*program);
        }

        let source = ShaderSource::load(&self.shader_dir, kind)?;
        let program = gfx.create_program(&ProgramDescriptor {
            label: Some(kind.file_stem().to_string()),
            vertex_source: &source.vertex,
            fragment_source: &source.fragment,
            layout: VertexBufferLayout::from_attribute_layout(layout),
            textured: kind.is_textured(),
        })?;
        log::info!("Created {} program", kind.file_stem());

        self.programs.insert(key, program);
        Ok(program)
    }

    /// Clear the target and draw one mesh seen through `camera`.
    ///
    /// An unknown handle only clears. Bind state left behind is whatever the
    /// last draw needed.
    pub fn render<B, C>(&self, gfx: &mut B, handle: Renderable, camera: &C)
    where
        B: GraphicsBackend,
        C: ViewProjection + ?Sized,
    {
        gfx.begin_render_pass(self.clear_color);

        if let Some(mesh) = self.meshes.get(handle.0) {
            gfx.bind_program(mesh.program);
            gfx.bind_vertex_array(mesh.vertex_array);
            gfx.set_uniforms(
                mesh.program,
                &TransformUniforms {
                    model: Mat4::IDENTITY,
                    view: camera.view_matrix(),
                    projection: camera.projection_matrix(),
                },
            );

            for element in &mesh.elements {
                // textured programs sample a single texture
                if let Some(slot) = element.texture {
                    if let Some(texture) = mesh.textures.get(slot) {
                        gfx.bind_texture(0, *texture);
                    }
                }
                gfx.draw_indexed(element.topology, element.count, element.offset);
            }
        }

        gfx.end_render_pass();
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn mesh(&self, handle: Renderable) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    // Cameras

    /// Register `camera` for `entity`, returning the camera it replaces.
    pub fn create_camera(&mut self, entity: Entity, camera: impl Into<Camera>) -> Option<Camera> {
        self.cameras.insert(entity, camera.into())
    }

    pub fn camera(&self, entity: Entity) -> Option<&Camera> {
        self.cameras.get(&entity)
    }

    pub fn camera_mut(&mut self, entity: Entity) -> Option<&mut Camera> {
        self.cameras.get_mut(&entity)
    }

    pub fn destroy_camera(&mut self, entity: Entity) -> Option<Camera> {
        self.cameras.remove(&entity)
    }

    /// Resize the surface and update every camera's aspect ratio.
    pub fn resize<B: GraphicsBackend>(&mut self, gfx: &mut B, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        gfx.resize(width, height);
        let (width, height) = gfx.surface_size();
        let aspect = width as f32 / height as f32;
        for camera in self.cameras.values_mut() {
            camera.set_aspect(aspect);
        }
    }

    /// Release every GPU object created by this engine.
    pub fn destroy<B: GraphicsBackend>(&mut self, gfx: &mut B) {
        for mesh in self.meshes.drain(..) {
            gfx.destroy_vertex_array(mesh.vertex_array);
            gfx.destroy_buffer(mesh.vertex_buffer);
            gfx.destroy_buffer(mesh.index_buffer);
            for texture in mesh.textures {
                gfx.destroy_texture(texture);
            }
        }
        for (_, program) in self.programs.drain() {
            gfx.destroy_program(program);
        }
        self.cameras.clear();
        log::info!("Engine resources released");
    }
}

/// GPU objects created so far by one [`Engine::load_mesh`] call.
#[derive(Default)]
struct PendingUpload {
    vertex_buffer: Option<BufferHandle>,
    index_buffer: Option<BufferHandle>,
    vertex_array: Option<VertexArrayHandle>,
    textures: Vec<TextureHandle>,
}

impl PendingUpload {
    fn release<B: GraphicsBackend>(self, gfx: &mut B) {
        for texture in self.textures {
            gfx.destroy_texture(texture);
        }
        if let Some(vertex_array) = self.vertex_array {
            gfx.destroy_vertex_array(vertex_array);
        }
        for buffer in [self.index_buffer, self.vertex_buffer].into_iter().flatten() {
            gfx.destroy_buffer(buffer);
        }
    }
}

/// Create the buffers, vertex array and textures of one mesh, recording each
/// handle in `pending` as soon as it exists.
fn upload<B: GraphicsBackend>(
    gfx: &mut B,
    name: &str,
    vertices: &[f32],
    packed: &PackedIndices,
    texture_paths: &[PathBuf],
    pending: &mut PendingUpload,
) -> EngineResult<(BufferHandle, BufferHandle, VertexArrayHandle)> {
    let vertex_buffer = gfx.create_buffer_init(
        &BufferDescriptor {
            label: Some(format!("{name} vertices")),
            usage: BufferUsage::VERTEX,
        },
        bytemuck::cast_slice(vertices),
    )?;
    pending.vertex_buffer = Some(vertex_buffer);

    let index_buffer = gfx.create_buffer_init(
        &BufferDescriptor {
            label: Some(format!("{name} indices")),
            usage: BufferUsage::INDEX,
        },
        packed.index_bytes(),
    )?;
    pending.index_buffer = Some(index_buffer);

    let vertex_array = gfx.create_vertex_array(&VertexArrayDescriptor {
        vertex_buffer,
        index_buffer,
    })?;
    pending.vertex_array = Some(vertex_array);

    for path in texture_paths {
        let texture = TextureData::from_file_or_white(path).upload(gfx)?;
        pending.textures.push(texture);
    }

    Ok((vertex_buffer, index_buffer, vertex_array))
}
