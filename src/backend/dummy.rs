//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It keeps uploaded
//! buffer contents and records every pass and draw command so that callers
//! can be checked without GPU hardware.

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::drawable::IndexType;

/// One command issued against the dummy backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    BeginPass {
        clear_color: [f32; 4],
    },
    EndPass,
    BindProgram(ProgramHandle),
    BindVertexArray(VertexArrayHandle),
    SetUniforms {
        program: ProgramHandle,
        uniforms: TransformUniforms,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    DrawIndexed {
        topology: Topology,
        count: u32,
        first_index: u32,
        /// `first_index` scaled by the index element size
        byte_offset: u64,
        polygon_mode: PolygonMode,
    },
}

#[derive(Debug, Clone)]
pub struct RecordedProgram {
    pub label: Option<String>,
    pub layout: VertexBufferLayout,
    pub textured: bool,
}

/// Dummy GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    supports_fans: bool,
    fail_vertex_arrays: bool,
    polygon_mode: PolygonMode,
    surface_size: (u32, u32),
    frames: u64,

    buffers: HashMap<u64, Vec<u8>>,
    textures: HashMap<u64, (u32, u32)>,
    programs: HashMap<u64, RecordedProgram>,
    vertex_arrays: HashMap<u64, VertexArrayDescriptor>,
    next_id: u64,

    commands: Vec<RecordedCommand>,
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyBackend {
    /// Backend accepting every topology, fans included.
    pub fn new() -> Self {
        Self {
            supports_fans: true,
            fail_vertex_arrays: false,
            polygon_mode: PolygonMode::Fill,
            surface_size: (800, 600),
            frames: 0,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            programs: HashMap::new(),
            vertex_arrays: HashMap::new(),
            next_id: 1,
            commands: Vec::new(),
        }
    }

    /// Backend that, like wgpu, cannot draw triangle fans.
    pub fn without_fans() -> Self {
        Self {
            supports_fans: false,
            ..Self::new()
        }
    }

    /// Make every `create_vertex_array` call fail, for exercising cleanup
    /// paths.
    pub fn with_failing_vertex_arrays(mut self) -> Self {
        self.fail_vertex_arrays = true;
        self
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &RecordedCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, RecordedCommand::DrawIndexed { .. }))
    }

    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(Vec::as_slice)
    }

    pub fn buffer_floats(&self, buffer: BufferHandle) -> Option<Vec<f32>> {
        self.buffer_data(buffer)
            .map(|bytes| bytemuck::pod_collect_to_vec(bytes))
    }

    pub fn buffer_indices(&self, buffer: BufferHandle) -> Option<Vec<IndexType>> {
        self.buffer_data(buffer)
            .map(|bytes| bytemuck::pod_collect_to_vec(bytes))
    }

    pub fn program(&self, program: ProgramHandle) -> Option<&RecordedProgram> {
        self.programs.get(&program.0)
    }

    pub fn vertex_array(&self, vertex_array: VertexArrayHandle) -> Option<VertexArrayDescriptor> {
        self.vertex_arrays.get(&vertex_array.0).copied()
    }

    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture.0).copied()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl GraphicsBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_size = (width, height);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    fn supports_topology(&self, topology: Topology) -> bool {
        topology != Topology::TriangleFan || self.supports_fans
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.polygon_mode = mode;
    }

    fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    fn begin_frame(&mut self) -> BackendResult<()> {
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn create_buffer_init(
        &mut self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> BackendResult<BufferHandle> {
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            desc.label,
            data.len()
        );
        let id = self.allocate_id();
        self.buffers.insert(id, data.to_vec());
        Ok(BufferHandle(id))
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle> {
        let expected = (desc.width * desc.height * desc.format.bytes_per_pixel()) as usize;
        if desc.data.len() != expected {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: expected {expected} bytes, got {}",
                desc.label,
                desc.data.len()
            )));
        }
        log::trace!(
            "DummyBackend: creating texture {:?} ({}x{})",
            desc.label,
            desc.width,
            desc.height
        );
        let id = self.allocate_id();
        self.textures.insert(id, (desc.width, desc.height));
        Ok(TextureHandle(id))
    }

    fn create_program(&mut self, desc: &ProgramDescriptor) -> BackendResult<ProgramHandle> {
        log::trace!("DummyBackend: creating program {:?}", desc.label);
        let id = self.allocate_id();
        self.programs.insert(
            id,
            RecordedProgram {
                label: desc.label.clone(),
                layout: desc.layout.clone(),
                textured: desc.textured,
            },
        );
        Ok(ProgramHandle(id))
    }

    fn create_vertex_array(
        &mut self,
        desc: &VertexArrayDescriptor,
    ) -> BackendResult<VertexArrayHandle> {
        if self.fail_vertex_arrays {
            return Err(BackendError::VertexArrayCreationFailed(
                "vertex array creation disabled".into(),
            ));
        }
        for buffer in [desc.vertex_buffer, desc.index_buffer] {
            if !self.buffers.contains_key(&buffer.0) {
                return Err(BackendError::VertexArrayCreationFailed(format!(
                    "unknown buffer {buffer:?}"
                )));
            }
        }
        let id = self.allocate_id();
        self.vertex_arrays.insert(id, *desc);
        Ok(VertexArrayHandle(id))
    }

    fn begin_render_pass(&mut self, clear_color: [f32; 4]) {
        self.commands.push(RecordedCommand::BeginPass { clear_color });
    }

    fn end_render_pass(&mut self) {
        self.commands.push(RecordedCommand::EndPass);
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.commands.push(RecordedCommand::BindProgram(program));
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.commands
            .push(RecordedCommand::BindVertexArray(vertex_array));
    }

    fn set_uniforms(&mut self, program: ProgramHandle, uniforms: &TransformUniforms) {
        self.commands.push(RecordedCommand::SetUniforms {
            program,
            uniforms: *uniforms,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.commands
            .push(RecordedCommand::BindTexture { unit, texture });
    }

    fn draw_indexed(&mut self, topology: Topology, count: u32, first_index: u32) {
        self.commands.push(RecordedCommand::DrawIndexed {
            topology,
            count,
            first_index,
            byte_offset: first_index as u64 * std::mem::size_of::<IndexType>() as u64,
            polygon_mode: self.polygon_mode,
        });
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer.0);
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture.0);
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program.0);
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_keep_contents() {
        let mut backend = DummyBackend::new();
        let data = [1.0f32, 2.0, 3.0];
        let buffer = backend
            .create_buffer_init(
                &BufferDescriptor {
                    label: None,
                    usage: BufferUsage::VERTEX,
                },
                bytemuck::cast_slice(&data),
            )
            .unwrap();
        assert_eq!(backend.buffer_floats(buffer).unwrap(), data);

        backend.destroy_buffer(buffer);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn test_fan_support_is_configurable() {
        assert!(DummyBackend::new().supports_topology(Topology::TriangleFan));
        let backend = DummyBackend::without_fans();
        assert!(!backend.supports_topology(Topology::TriangleFan));
        assert!(backend.supports_topology(Topology::TriangleStrip));
    }

    #[test]
    fn test_failing_vertex_arrays() {
        let mut backend = DummyBackend::new().with_failing_vertex_arrays();
        let desc = BufferDescriptor {
            label: None,
            usage: BufferUsage::VERTEX,
        };
        let vertex_buffer = backend.create_buffer_init(&desc, &[0; 12]).unwrap();
        let index_buffer = backend.create_buffer_init(&desc, &[0; 4]).unwrap();
        let result = backend.create_vertex_array(&VertexArrayDescriptor {
            vertex_buffer,
            index_buffer,
        });
        assert!(matches!(
            result,
            Err(BackendError::VertexArrayCreationFailed(_))
        ));
        assert_eq!(backend.live_vertex_arrays(), 0);
    }

    #[test]
    fn test_texture_size_is_validated() {
        let mut backend = DummyBackend::new();
        let result = backend.create_texture(&TextureDescriptor {
            label: Some("bad".into()),
            width: 2,
            height: 2,
            format: TextureFormat::Rgba8UnormSrgb,
            data: &[0; 4],
        });
        assert!(matches!(result, Err(BackendError::TextureCreationFailed(_))));
    }

    #[test]
    fn test_draw_records_byte_offset_and_mode() {
        let mut backend = DummyBackend::new();
        backend.set_polygon_mode(PolygonMode::Line);
        backend.draw_indexed(Topology::TriangleStrip, 4, 6);
        assert_eq!(
            backend.commands(),
            &[RecordedCommand::DrawIndexed {
                topology: Topology::TriangleStrip,
                count: 4,
                first_index: 6,
                byte_offset: 24,
                polygon_mode: PolygonMode::Line,
            }]
        );
    }
}
