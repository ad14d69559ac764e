//! Interactive Mandelbrot explorer.
//!
//! The pure pieces (viewport math, escape-time evaluation, palettes) live in
//! [`common`] and are usable without any rendering surface. [`render`] holds
//! the CPU and GPU back-ends, and [`explorer::Explorer`] ties them to input
//! handling and the per-frame driver.

pub mod common;
pub mod error;
pub mod explorer;
pub mod frame;
pub mod input;
pub mod render;
pub mod snapshot;

pub use common::colors::ColorScheme;
pub use common::viewport::{QualitySchedule, SurfaceSize, ViewportInfo, ViewportPatch};
pub use error::{ExplorerError, Result};
pub use explorer::{Explorer, ExplorerOptions, FrameStatus};
