//! wgpu compute renderer (f32)

use super::{FrameParams, RenderBackend};
use crate::common::viewport::SurfaceSize;
use crate::error::{ExplorerError, Result};
use bytemuck::{Pod, Zeroable};

/// Uniform block of `mandelbrot.wgsl`. Field order and padding must match.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GpuParams {
    center_x: f32,
    center_y: f32,
    zoom: f32,
    time: f32,
    width: u32,
    height: u32,
    max_iter: u32,
    scheme: u32,
    supersampling: f32,
    _padding: [u32; 3],
}

impl From<&FrameParams> for GpuParams {
    fn from(p: &FrameParams) -> Self {
        Self {
            center_x: p.center.re as f32,
            center_y: p.center.im as f32,
            zoom: p.zoom as f32,
            time: p.time as f32,
            width: p.size.width as u32,
            height: p.size.height as u32,
            max_iter: p.iteration_budget,
            scheme: p.scheme.index() as u32,
            supersampling: p.supersampling as f32,
            _padding: [0; 3],
        }
    }
}

/// Output and staging buffers for one surface size
struct FrameBuffers {
    size: SurfaceSize,
    output: wgpu::Buffer,
    staging: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Compute-shader renderer.
///
/// Construction fails fast when no adapter exists or the shader does not
/// validate, so a returned renderer is always able to draw.
pub struct GpuRenderer {
    name: String,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    buffers: Option<FrameBuffers>,
}

impl GpuRenderer {
    pub fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| ExplorerError::Unsupported("no GPU adapter found".into()))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Mandelbrot Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mandelbrot Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mandelbrot.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Mandelbrot Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            log::error!("shader build failed: {err}");
            return Err(ExplorerError::ShaderBuild(err.to_string()));
        }

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Params Buffer"),
            size: std::mem::size_of::<GpuParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            name: format!("GPU (f32) {}", info.name),
            device,
            queue,
            pipeline,
            bind_group_layout,
            params_buffer,
            buffers: None,
        })
    }

    fn create_buffers(&self, size: SurfaceSize) -> FrameBuffers {
        let byte_len = (size.pixel_count() * std::mem::size_of::<u32>()) as u64;

        let output = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Output Buffer"),
            size: byte_len,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.as_entire_binding(),
                },
            ],
        });

        FrameBuffers {
            size,
            output,
            staging,
            bind_group,
        }
    }

    /// Reallocates the per-size buffers when the surface changed
    fn ensure_buffers(&mut self, size: SurfaceSize) {
        if self.buffers.as_ref().map(|b| b.size) == Some(size) {
            return;
        }
        log::debug!("allocating GPU buffers for {}x{}", size.width, size.height);
        if let Some(old) = self.buffers.take() {
            old.output.destroy();
            old.staging.destroy();
        }
        self.buffers = Some(self.create_buffers(size));
    }
}

impl RenderBackend for GpuRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, params: &FrameParams, out: &mut [u32]) -> Result<()> {
        if params.size.is_empty() {
            return Ok(());
        }

        let uniform = GpuParams::from(params);
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&uniform));

        let size = params.size;
        self.ensure_buffers(size);
        let Some(buffers) = self.buffers.as_ref() else {
            return Err(ExplorerError::Readback("frame buffers missing".into()));
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Compute Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Mandelbrot Compute Pass"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &buffers.bind_group, &[]);
            compute_pass.dispatch_workgroups(
                (size.width as u32).div_ceil(8),
                (size.height as u32).div_ceil(8),
                1,
            );
        }

        encoder.copy_buffer_to_buffer(
            &buffers.output,
            0,
            &buffers.staging,
            0,
            buffers.staging.size(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffers.staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|e| ExplorerError::Readback(e.to_string()))?
            .map_err(|e| ExplorerError::Readback(e.to_string()))?;

        {
            let data = buffer_slice.get_mapped_range();
            let pixels: &[u32] = bytemuck::cast_slice(&data);
            let n = out.len().min(pixels.len());
            out[..n].copy_from_slice(&pixels[..n]);
        }
        buffers.staging.unmap();

        Ok(())
    }

    fn release(&mut self) {
        if let Some(buffers) = self.buffers.take() {
            buffers.output.destroy();
            buffers.staging.destroy();
        }
        self.params_buffer.destroy();
        log::info!("GPU resources released");
    }
}
