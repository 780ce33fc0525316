//! Error taxonomy for scene construction.
//!
//! Mount either fully succeeds or fails with a [`SceneError`]; there are no
//! partial-failure states and no retries. Errors are not recovered
//! internally — the embedding shell decides fallback behavior.

use thiserror::Error;

/// Failures that can occur while building the scene at mount time.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No GPU adapter compatible with the surface was found.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The drawing surface could not be created for the host window.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// The logical device could not be created.
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The embedded font could not be parsed.
    #[error("failed to parse embedded font: {0}")]
    FontParse(&'static str),
}
