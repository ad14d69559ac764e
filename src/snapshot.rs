//! PNG export of a rendered frame

use crate::common::viewport::SurfaceSize;
use crate::error::Result;
use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

/// Unpacks a `0xRRGGBB` frame into an RGB image
pub fn to_image(pixels: &[u32], size: SurfaceSize) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>> {
    if size.is_empty() || pixels.len() < size.pixel_count() {
        log::warn!(
            "cannot export {} pixels as {}x{}",
            pixels.len(),
            size.width,
            size.height
        );
        return Err(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
        .into());
    }

    Ok(ImageBuffer::from_fn(size.width as u32, size.height as u32, |x, y| {
        let pixel = pixels[(y as usize) * size.width + (x as usize)];
        let r = ((pixel >> 16) & 0xFF) as u8;
        let g = ((pixel >> 8) & 0xFF) as u8;
        let b = (pixel & 0xFF) as u8;
        Rgb([r, g, b])
    }))
}

pub fn save_png(path: &Path, pixels: &[u32], size: SurfaceSize) -> Result<()> {
    to_image(pixels, size)?.save(path)?;
    log::info!("saved {}", path.display());
    Ok(())
}

/// Hands out `mandelbrot_001.png`, `mandelbrot_002.png`, ... in `dir`
#[derive(Debug, Clone)]
pub struct SnapshotNamer {
    dir: PathBuf,
    counter: u32,
}

impl SnapshotNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: 0,
        }
    }

    pub fn next_path(&mut self) -> PathBuf {
        self.counter += 1;
        self.dir.join(format!("mandelbrot_{:03}.png", self.counter))
    }
}
