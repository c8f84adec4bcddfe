use crate::coords::DeviceSize;
use crate::device::Gpu;
use crate::error::ShaderError;

use super::compile::{compile_fragment, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::surface::{RasterBackend, ShaderProgram, ShaderUniforms};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// wgpu implementation of [`RasterBackend`]: every surface renders offscreen
/// into its own texture.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuBackend {
    pub fn new(gpu: &Gpu) -> Self {
        Self { device: gpu.device().clone(), queue: gpu.queue().clone() }
    }
}

impl RasterBackend for GpuBackend {
    fn create_program(
        &mut self,
        fragment_source: &str,
        size: DeviceSize,
    ) -> Result<Box<dyn ShaderProgram>, ShaderError> {
        // Validate before wgpu sees the module; an invalid module would
        // otherwise reach the uncaptured-error handler.
        let source = compile_fragment(fragment_source)?;

        check_size(&self.device, size)?;

        let program = GpuProgram::new(self.device.clone(), self.queue.clone(), &source, size);
        log::info!("shader surface allocated ({}x{})", size.width, size.height);
        Ok(Box::new(program))
    }
}

struct GpuProgram {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    size: DeviceSize,
}

impl GpuProgram {
    fn new(device: wgpu::Device, queue: wgpu::Queue, source: &str, size: DeviceSize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("graphsvg shader surface"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("graphsvg shader surface bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ShaderUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("graphsvg shader surface pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("graphsvg shader surface pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("graphsvg shader surface ubo"),
            size: std::mem::size_of::<ShaderUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("graphsvg shader surface bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_ubo.as_entire_binding() }],
        });

        let (target, target_view) = create_target(&device, size);

        Self { device, queue, pipeline, bind_group, uniform_ubo, target, target_view, size }
    }
}

impl ShaderProgram for GpuProgram {
    fn resize(&mut self, size: DeviceSize) -> Result<(), ShaderError> {
        check_size(&self.device, size)?;
        let (target, target_view) = create_target(&self.device, size);
        self.target = target;
        self.target_view = target_view;
        self.size = size;
        Ok(())
    }

    fn render(&mut self, uniforms: &ShaderUniforms) {
        self.queue.write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("graphsvg shader surface encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("graphsvg shader surface pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..4, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn read_pixels(&self) -> Option<Vec<u8>> {
        let DeviceSize { width, height } = self.size;
        let row_bytes = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row = row_bytes.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("graphsvg shader surface readback"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("graphsvg shader surface readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            target_extent(self.size),
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        if let Err(err) = self.device.poll(wgpu::PollType::wait_indefinitely()) {
            log::error!("shader surface readback poll failed: {err}");
            return None;
        }
        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                log::error!("shader surface readback map failed: {err}");
                return None;
            }
            Err(_) => return None,
        }

        let mut pixels = Vec::with_capacity((row_bytes * height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(padded_row as usize).take(height as usize) {
                pixels.extend_from_slice(&row[..row_bytes as usize]);
            }
        }
        buffer.unmap();
        Some(pixels)
    }
}

/// wgpu panics on textures past the device limit, so sizes are checked first.
fn check_size(device: &wgpu::Device, size: DeviceSize) -> Result<(), ShaderError> {
    let max = device.limits().max_texture_dimension_2d;
    if !size.is_valid() || size.width > max || size.height > max {
        return Err(ShaderError::Device {
            message: format!("cannot allocate a {}x{} surface (limit {max})", size.width, size.height),
        });
    }
    Ok(())
}

fn target_extent(size: DeviceSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width.max(1),
        height: size.height.max(1),
        depth_or_array_layers: 1,
    }
}

fn create_target(device: &wgpu::Device, size: DeviceSize) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("graphsvg shader surface target"),
        size: target_extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
