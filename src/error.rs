//! Error types

/// Everything that can go wrong while building or driving an explorer
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// No GPU adapter, no window, or some other missing capability
    #[error("rendering environment unsupported: {0}")]
    Unsupported(String),
    #[error("GPU device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("shader build failed: {0}")]
    ShaderBuild(String),
    #[error("GPU read-back failed: {0}")]
    Readback(String),
    #[error("window error: {0}")]
    Window(String),
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
