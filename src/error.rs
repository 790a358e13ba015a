//! Error types for setup and per-frame failures.

use thiserror::Error;

/// Result type for setup-time operations
pub type SetupResult<T> = Result<T, SetupError>;

/// Errors raised while creating device objects. All of them are fatal:
/// initialization stops and no partial state is kept.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("validation failed while creating '{label}': {message}")]
    Validation { label: String, message: String },

    #[error("out of device memory while creating '{label}'")]
    OutOfMemory { label: String },

    #[error("buffer '{label}' would have zero size")]
    EmptyBuffer { label: String },

    #[error("buffer '{label}' is {actual} bytes but its binding requires at least {required}")]
    BindingSize {
        label: String,
        required: u64,
        actual: u64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors raised while producing a single frame.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("failed to acquire the next surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl FrameError {
    /// A recoverable failure skips the current frame and is retried on the next tick.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FrameError::Surface(wgpu::SurfaceError::OutOfMemory) => false,
            FrameError::Surface(_) => true,
        }
    }

    /// Outdated or lost surfaces have to be configured again before the retry.
    pub fn needs_reconfigure(&self) -> bool {
        matches!(
            self,
            FrameError::Surface(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)
        )
    }
}
