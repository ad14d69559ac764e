//! f64 CPU renderer, row-parallel with Rayon

use super::{shade_pixel, subsample_offsets, FrameParams, RenderBackend};
use crate::error::Result;
use rayon::prelude::*;

/// Renders on all cores in double precision.
///
/// Slower than the GPU but keeps neighbouring pixels distinct down to zoom
/// levels around 1e13, and needs no device.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuRenderer;

impl CpuRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for CpuRenderer {
    fn name(&self) -> &str {
        "CPU (f64)"
    }

    fn render(&mut self, params: &FrameParams, out: &mut [u32]) -> Result<()> {
        let width = params.size.width;
        if params.size.is_empty() {
            return Ok(());
        }
        let offsets = subsample_offsets(params.supersampling);

        out.par_chunks_mut(width)
            .take(params.size.height)
            .enumerate()
            .for_each(|(py, row)| {
                for (px, pixel) in row.iter_mut().enumerate() {
                    *pixel = shade_pixel(params, px, py, &offsets);
                }
            });
        Ok(())
    }
}
