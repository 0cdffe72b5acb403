//! wgpu backend implementation

use crate::backend::traits::*;
use crate::backend::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Draw resolved against the bind state current when it was recorded
#[derive(Clone, Copy)]
struct DrawCommand {
    program: ProgramHandle,
    vertex_array: VertexArrayHandle,
    texture: Option<TextureHandle>,
    pipeline: (Topology, PolygonMode),
    indices: (u32, u32),
}

/// Pending render pass with buffered draws
struct PendingRenderPass {
    clear_color: [f32; 4],
    draws: Vec<DrawCommand>,
}

struct Program {
    label: Option<String>,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    vertex_layout: VertexBufferLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    textured: bool,
    pipelines: HashMap<(Topology, PolygonMode), wgpu::RenderPipeline>,
}

struct Texture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu backend implementation
pub struct WgpuBackend {
    #[allow(dead_code)]
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    #[allow(dead_code)]
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    current_texture: Option<wgpu::SurfaceTexture>,
    depth_view: wgpu::TextureView,
    line_mode_supported: bool,
    polygon_mode: PolygonMode,

    // Shared layouts
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    default_texture: Texture,

    // Resource storage
    buffers: HashMap<u64, wgpu::Buffer>,
    textures: HashMap<u64, Texture>,
    programs: HashMap<u64, Program>,
    vertex_arrays: HashMap<u64, VertexArrayDescriptor>,
    next_id: u64,

    // Bind state
    bound_program: Option<ProgramHandle>,
    bound_vertex_array: Option<VertexArrayHandle>,
    bound_texture: Option<TextureHandle>,

    // Command encoding
    encoder: Option<wgpu::CommandEncoder>,

    // Draws are buffered here and executed on end_render_pass
    pending_render_pass: Option<PendingRenderPass>,
}

impl WgpuBackend {
    fn convert_texture_format(format: TextureFormat) -> wgpu::TextureFormat {
        match format {
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        }
    }

    fn convert_buffer_usage(usage: BufferUsage) -> wgpu::BufferUsages {
        let mut result = wgpu::BufferUsages::empty();
        if usage.contains(BufferUsage::COPY_DST) {
            result |= wgpu::BufferUsages::COPY_DST;
        }
        if usage.contains(BufferUsage::INDEX) {
            result |= wgpu::BufferUsages::INDEX;
        }
        if usage.contains(BufferUsage::VERTEX) {
            result |= wgpu::BufferUsages::VERTEX;
        }
        if usage.contains(BufferUsage::UNIFORM) {
            result |= wgpu::BufferUsages::UNIFORM;
        }
        result
    }

    fn convert_vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
        match format {
            VertexFormat::Float32 => wgpu::VertexFormat::Float32,
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }

    fn convert_topology(topology: Topology) -> Option<wgpu::PrimitiveTopology> {
        match topology {
            Topology::TriangleList => Some(wgpu::PrimitiveTopology::TriangleList),
            Topology::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
            Topology::TriangleFan => None,
        }
    }

    fn convert_polygon_mode(mode: PolygonMode) -> wgpu::PolygonMode {
        match mode {
            PolygonMode::Fill => wgpu::PolygonMode::Fill,
            PolygonMode::Line => wgpu::PolygonMode::Line,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl WgpuBackend {
    /// Create the device and configure the window surface
    pub fn new(window: Arc<winit::window::Window>, vsync: bool) -> BackendResult<Self> {
        pollster::block_on(Self::new_async(window, vsync))
    }

    pub async fn new_async(window: Arc<winit::window::Window>, vsync: bool) -> BackendResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| BackendError::SurfaceCreationFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BackendError::InitializationFailed("No suitable adapter found".into()))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?} backend)",
            adapter_info.name,
            adapter_info.backend
        );

        let line_mode_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        if !line_mode_supported {
            log::warn!("Adapter lacks POLYGON_MODE_LINE, wireframe requests will be ignored");
        }
        let required_features = if line_mode_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Graphics Device"),
                    required_features,
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::DeviceCreationFailed(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("wgpu error: {error}");
        }));

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| {
                BackendError::SurfaceCreationFailed("Surface reports no formats".into())
            })?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let (width, height) = clamp_to_limit(
            size.width,
            size.height,
            device.limits().max_texture_dimension_2d,
        );

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, width, height);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let default_texture = upload_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            &TextureDescriptor {
                label: Some("Default White".into()),
                width: 1,
                height: 1,
                format: TextureFormat::Rgba8UnormSrgb,
                data: &[255, 255, 255, 255],
            },
        );

        Ok(Self {
            instance,
            surface,
            adapter,
            device,
            queue,
            surface_config,
            current_texture: None,
            depth_view,
            line_mode_supported,
            polygon_mode: PolygonMode::Fill,
            uniform_layout,
            texture_layout,
            sampler,
            default_texture,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            programs: HashMap::new(),
            vertex_arrays: HashMap::new(),
            next_id: 1,
            bound_program: None,
            bound_vertex_array: None,
            bound_texture: None,
            encoder: None,
            pending_render_pass: None,
        })
    }

    fn create_shader_module(&self, label: Option<&str>, source: &str) -> wgpu::ShaderModule {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            log::error!(
                "Shader {} failed to compile: {error}",
                label.unwrap_or("<unnamed>")
            );
        }
        module
    }

    /// Build the pipeline for `key` on first use
    fn ensure_pipeline(&mut self, program: ProgramHandle, key: (Topology, PolygonMode)) -> bool {
        let color_format = self.surface_config.format;
        let Some(entry) = self.programs.get_mut(&program.0) else {
            return false;
        };
        if !entry.pipelines.contains_key(&key) {
            let Some(pipeline) = build_pipeline(&self.device, entry, color_format, key) else {
                return false;
            };
            entry.pipelines.insert(key, pipeline);
        }
        true
    }
}

impl GraphicsBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let (width, height) =
                clamp_to_limit(width, height, self.device.limits().max_texture_dimension_2d);

            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn supports_topology(&self, topology: Topology) -> bool {
        Self::convert_topology(topology).is_some()
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        if mode == PolygonMode::Line && !self.line_mode_supported {
            log::warn!("Line polygon mode is not supported on this device");
            return;
        }
        self.polygon_mode = mode;
    }

    fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    fn begin_frame(&mut self) -> BackendResult<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Err(BackendError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(BackendError::OutOfMemory),
            Err(e) => return Err(BackendError::AcquireImageFailed(e.to_string())),
        };

        self.current_texture = Some(output);
        self.encoder = Some(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                }),
        );

        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }

        if let Some(texture) = self.current_texture.take() {
            texture.present();
        }

        Ok(())
    }

    fn create_buffer_init(
        &mut self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> BackendResult<BufferHandle> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: desc.label.as_deref(),
                contents: data,
                usage: Self::convert_buffer_usage(desc.usage),
            });

        let id = self.allocate_id();
        self.buffers.insert(id, buffer);

        Ok(BufferHandle(id))
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle> {
        if desc.format.is_depth() {
            return Err(BackendError::TextureCreationFailed(
                "depth formats cannot be sampled".into(),
            ));
        }
        let expected = desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel() as usize;
        if desc.data.len() != expected {
            return Err(BackendError::TextureCreationFailed(format!(
                "expected {expected} bytes for {}x{}, got {}",
                desc.width,
                desc.height,
                desc.data.len()
            )));
        }

        let texture = upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            desc,
        );

        let id = self.allocate_id();
        self.textures.insert(id, texture);

        Ok(TextureHandle(id))
    }

    fn create_program(&mut self, desc: &ProgramDescriptor) -> BackendResult<ProgramHandle> {
        let label = desc.label.as_deref();
        let vertex_module = self.create_shader_module(label, desc.vertex_source);
        let fragment_module = self.create_shader_module(label, desc.fragment_source);

        let layouts: Vec<&wgpu::BindGroupLayout> = if desc.textured {
            vec![&self.uniform_layout, &self.texture_layout]
        } else {
            vec![&self.uniform_layout]
        };
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Transform Uniforms"),
                contents: bytemuck::bytes_of(&TransformUniforms::default()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Uniforms"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let id = self.allocate_id();
        self.programs.insert(
            id,
            Program {
                label: desc.label.clone(),
                vertex_module,
                fragment_module,
                pipeline_layout,
                vertex_layout: desc.layout.clone(),
                uniform_buffer,
                uniform_bind_group,
                textured: desc.textured,
                pipelines: HashMap::new(),
            },
        );

        Ok(ProgramHandle(id))
    }

    fn create_vertex_array(
        &mut self,
        desc: &VertexArrayDescriptor,
    ) -> BackendResult<VertexArrayHandle> {
        for buffer in [desc.vertex_buffer, desc.index_buffer] {
            if !self.buffers.contains_key(&buffer.0) {
                return Err(BackendError::VertexArrayCreationFailed(format!(
                    "unknown buffer {}",
                    buffer.0
                )));
            }
        }

        let id = self.allocate_id();
        self.vertex_arrays.insert(id, *desc);

        Ok(VertexArrayHandle(id))
    }

    fn begin_render_pass(&mut self, clear_color: [f32; 4]) {
        self.pending_render_pass = Some(PendingRenderPass {
            clear_color,
            draws: Vec::new(),
        });
    }

    fn end_render_pass(&mut self) {
        let Some(pending) = self.pending_render_pass.take() else {
            return;
        };

        let Some(mut encoder) = self.encoder.take() else {
            log::warn!("Render pass ended outside of a frame, dropping it");
            return;
        };

        let Some(swapchain_view) = self
            .current_texture
            .as_ref()
            .map(|tex| tex.texture.create_view(&wgpu::TextureViewDescriptor::default()))
        else {
            self.encoder = Some(encoder);
            return;
        };

        {
            let [r, g, b, a] = pending.clear_color.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Draw Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swapchain_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for draw in &pending.draws {
                let Some(program) = self.programs.get(&draw.program.0) else {
                    continue;
                };
                let Some(pipeline) = program.pipelines.get(&draw.pipeline) else {
                    continue;
                };
                let Some(vertex_array) = self.vertex_arrays.get(&draw.vertex_array.0) else {
                    continue;
                };
                let (Some(vertices), Some(indices)) = (
                    self.buffers.get(&vertex_array.vertex_buffer.0),
                    self.buffers.get(&vertex_array.index_buffer.0),
                ) else {
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &program.uniform_bind_group, &[]);
                if program.textured {
                    let texture = draw
                        .texture
                        .and_then(|t| self.textures.get(&t.0))
                        .unwrap_or(&self.default_texture);
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                }
                render_pass.set_vertex_buffer(0, vertices.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);

                let (first, count) = draw.indices;
                render_pass.draw_indexed(first..first + count, 0, 0..1);
            }
        }

        // Submit now so uniforms written for the next pass cannot overtake this one
        self.queue.submit(std::iter::once(encoder.finish()));
        self.encoder = Some(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                }),
        );
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.bound_program = Some(program);
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.bound_vertex_array = Some(vertex_array);
    }

    fn set_uniforms(&mut self, program: ProgramHandle, uniforms: &TransformUniforms) {
        if let Some(entry) = self.programs.get(&program.0) {
            self.queue
                .write_buffer(&entry.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if unit != 0 {
            log::warn!("Only texture unit 0 is available, ignoring unit {unit}");
            return;
        }
        self.bound_texture = Some(texture);
    }

    fn draw_indexed(&mut self, topology: Topology, count: u32, first_index: u32) {
        if !self.supports_topology(topology) {
            log::warn!("{topology:?} cannot be drawn directly, skipping {count} indices");
            return;
        }
        let (Some(program), Some(vertex_array)) = (self.bound_program, self.bound_vertex_array)
        else {
            log::warn!("draw_indexed without a bound program and vertex array");
            return;
        };

        let key = (topology, self.polygon_mode);
        if !self.ensure_pipeline(program, key) {
            return;
        }

        let texture = self.bound_texture;
        if let Some(pending) = self.pending_render_pass.as_mut() {
            pending.draws.push(DrawCommand {
                program,
                vertex_array,
                texture,
                pipeline: key,
                indices: (first_index, count),
            });
        }
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buf) = self.buffers.remove(&buffer.0) {
            buf.destroy();
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if let Some(tex) = self.textures.remove(&texture.0) {
            tex.texture.destroy();
        }
        if self.bound_texture == Some(texture) {
            self.bound_texture = None;
        }
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        if let Some(entry) = self.programs.remove(&program.0) {
            entry.uniform_buffer.destroy();
        }
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array.0);
        if self.bound_vertex_array == Some(vertex_array) {
            self.bound_vertex_array = None;
        }
    }
}

/// Clamp to device limits while maintaining aspect ratio
fn clamp_to_limit(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width > max_size || height > max_size {
        let scale = (max_size as f32 / width as f32).min(max_size as f32 / height as f32);
        (
            ((width as f32 * scale) as u32).max(1),
            ((height as f32 * scale) as u32).max(1),
        )
    } else {
        (width.max(1), height.max(1))
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    desc: &TextureDescriptor,
) -> Texture {
    let size = wgpu::Extent3d {
        width: desc.width,
        height: desc.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: desc.label.as_deref(),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: WgpuBackend::convert_texture_format(desc.format),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        desc.data,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(desc.width * desc.format.bytes_per_pixel()),
            rows_per_image: Some(desc.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: desc.label.as_deref(),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    Texture {
        texture,
        bind_group,
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    program: &Program,
    color_format: wgpu::TextureFormat,
    (topology, polygon_mode): (Topology, PolygonMode),
) -> Option<wgpu::RenderPipeline> {
    let primitive_topology = WgpuBackend::convert_topology(topology)?;

    let attributes: Vec<wgpu::VertexAttribute> = program
        .vertex_layout
        .attributes
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: WgpuBackend::convert_vertex_format(a.format),
            offset: a.offset,
            shader_location: a.location,
        })
        .collect();
    let vertex_buffers = [wgpu::VertexBufferLayout {
        array_stride: program.vertex_layout.array_stride,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &attributes,
    }];

    let strip_index_format = match primitive_topology {
        wgpu::PrimitiveTopology::TriangleStrip => Some(wgpu::IndexFormat::Uint32),
        _ => None,
    };

    log::debug!(
        "Building {} pipeline for {topology:?} / {polygon_mode:?}",
        program.label.as_deref().unwrap_or("<unnamed>")
    );

    Some(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: program.label.as_deref(),
        layout: Some(&program.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex_module,
            entry_point: "vs_main",
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment_module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: WgpuBackend::convert_polygon_mode(polygon_mode),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    }))
}
