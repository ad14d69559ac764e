//! Rendering back-ends.
//!
//! Every back-end fills a `0xRRGGBB` frame buffer (the layout minifb presents
//! directly) from one [`FrameParams`] upload. The CPU path is the reference:
//! [`shade_pixel`] is the whole per-pixel pipeline and the WGSL shader mirrors
//! it in f32.

pub mod cpu;
pub mod gpu;
pub mod hybrid;

use crate::common::colors::{colorize, gamma_correct, ColorScheme, Rgb};
use crate::common::mandelbrot::evaluate;
use crate::common::viewport::{ndc_to_plane, ScreenPoint, SurfaceSize, Viewport};
use crate::error::Result;
use num_complex::Complex;

pub use cpu::CpuRenderer;
pub use gpu::GpuRenderer;
pub use hybrid::{ComputeMode, HybridRenderer};

/// Everything a back-end needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub center: Complex<f64>,
    pub zoom: f64,
    pub iteration_budget: u32,
    pub supersampling: f64,
    pub scheme: ColorScheme,
    /// Seconds since the explorer started rendering
    pub time: f64,
    pub size: SurfaceSize,
}

impl FrameParams {
    pub fn new(viewport: &Viewport, scheme: ColorScheme, time: f64, size: SurfaceSize) -> Self {
        Self {
            center: viewport.center,
            zoom: viewport.zoom,
            iteration_budget: viewport.iteration_budget,
            supersampling: viewport.supersampling,
            scheme,
            time,
            size,
        }
    }
}

/// A surface that can evaluate, colour and average every pixel of a frame.
pub trait RenderBackend {
    /// Short label for logs and the host's status line
    fn name(&self) -> &str;

    /// Renders one frame into `out`, which holds `params.size.pixel_count()`
    /// pixels in row-major order.
    fn render(&mut self, params: &FrameParams, out: &mut [u32]) -> Result<()>;

    /// Frees device resources. The back-end must not be used afterwards.
    fn release(&mut self) {}
}

/// Sub-pixel offsets along one axis, in pixels.
///
/// `ceil(supersampling)` samples spaced `1 / supersampling` apart and centred
/// on the pixel centre, so a factor of 1 samples the centre only.
pub fn subsample_offsets(supersampling: f64) -> Vec<f64> {
    let factor = if supersampling.is_finite() && supersampling >= 1.0 {
        supersampling
    } else {
        1.0
    };
    let n = factor.ceil() as usize;
    let half_span = (n as f64 - 1.0) * 0.5;
    (0..n).map(|k| (k as f64 - half_span) / factor).collect()
}

/// Evaluates, colours and box-filters pixel `(px, py)`.
///
/// Colours are averaged in linear space and gamma is applied once to the
/// average.
pub fn shade_pixel(params: &FrameParams, px: usize, py: usize, offsets: &[f64]) -> u32 {
    let mut sum = Rgb::BLACK;
    for &oy in offsets {
        for &ox in offsets {
            let screen = ScreenPoint::new(px as f64 + 0.5 + ox, py as f64 + 0.5 + oy);
            let c = ndc_to_plane(params.size.to_ndc(screen), params.center, params.zoom);
            let sample = evaluate(c, params.iteration_budget);
            sum += colorize(sample.count, params.iteration_budget, params.scheme, params.time);
        }
    }
    let samples = (offsets.len() * offsets.len()).max(1) as f64;
    gamma_correct(sum.scale(1.0 / samples)).to_u32()
}
