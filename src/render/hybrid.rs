//! Picks the GPU or the CPU path from the zoom level

use super::{CpuRenderer, FrameParams, GpuRenderer, RenderBackend};
use crate::common::constants::GPU_PRECISION_LIMIT;
use crate::error::Result;

/// Which path renders the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeMode {
    Gpu,
    CpuF64,
}

impl ComputeMode {
    /// GPU while f32 still separates pixels, CPU f64 past `limit`
    pub fn for_zoom(zoom: f64, limit: f64) -> Self {
        if zoom > limit {
            ComputeMode::CpuF64
        } else {
            ComputeMode::Gpu
        }
    }
}

impl std::fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputeMode::Gpu => write!(f, "GPU (f32)"),
            ComputeMode::CpuF64 => write!(f, "CPU (f64)"),
        }
    }
}

pub struct HybridRenderer {
    gpu: GpuRenderer,
    cpu: CpuRenderer,
    limit: f64,
    mode: ComputeMode,
}

impl HybridRenderer {
    pub fn new() -> Result<Self> {
        Self::with_limit(GPU_PRECISION_LIMIT)
    }

    pub fn with_limit(limit: f64) -> Result<Self> {
        Ok(Self {
            gpu: GpuRenderer::new()?,
            cpu: CpuRenderer::new(),
            limit,
            mode: ComputeMode::Gpu,
        })
    }

    pub fn mode(&self) -> ComputeMode {
        self.mode
    }
}

impl RenderBackend for HybridRenderer {
    fn name(&self) -> &str {
        match self.mode {
            ComputeMode::Gpu => self.gpu.name(),
            ComputeMode::CpuF64 => self.cpu.name(),
        }
    }

    fn render(&mut self, params: &FrameParams, out: &mut [u32]) -> Result<()> {
        let mode = ComputeMode::for_zoom(params.zoom, self.limit);
        if mode != self.mode {
            log::info!("compute mode: {} -> {} at zoom {:.2e}", self.mode, mode, params.zoom);
            self.mode = mode;
        }
        match mode {
            ComputeMode::Gpu => self.gpu.render(params, out),
            ComputeMode::CpuF64 => self.cpu.render(params, out),
        }
    }

    fn release(&mut self) {
        self.gpu.release();
    }
}
