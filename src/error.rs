//! Error types for the particle field.
//!
//! This module provides error types for attaching the simulator to a
//! surface, GPU initialization, snapshot export, and running the host window.

use std::fmt;

/// Errors reported by a [`Surface`](crate::surface::Surface) when it cannot
/// hand out a drawing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface has no 2D drawing context (never had one, or lost it).
    ContextUnavailable,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ContextUnavailable => write!(f, "No 2D drawing context available"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Invalid [`FieldConfig`](crate::config::FieldConfig) values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Density divisor must be finite and greater than zero.
    Density(f32),
    /// Maximum speed must be finite and greater than zero.
    MaxSpeed(f32),
    /// Connection threshold must be finite and non-negative.
    ConnectionDistance(f32),
    /// Particle radius must be finite and non-negative.
    Radius(f32),
    /// Line width must be finite and non-negative.
    LineWidth(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Density(v) => write!(f, "Density must be > 0, got {}", v),
            ConfigError::MaxSpeed(v) => write!(f, "Max speed must be > 0, got {}", v),
            ConfigError::ConnectionDistance(v) => {
                write!(f, "Connection distance must be >= 0, got {}", v)
            }
            ConfigError::Radius(v) => write!(f, "Particle radius must be >= 0, got {}", v),
            ConfigError::LineWidth(v) => write!(f, "Line width must be >= 0, got {}", v),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur when attaching a [`ParticleField`](crate::field::ParticleField).
#[derive(Debug, Clone, PartialEq)]
pub enum AttachError {
    /// The surface could not produce a drawing context.
    NoContext(SurfaceError),
    /// The field is already attached; call `detach` first.
    AlreadyAttached,
    /// The field configuration is invalid.
    InvalidConfig(ConfigError),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::NoContext(e) => write!(f, "Failed to attach to surface: {}", e),
            AttachError::AlreadyAttached => {
                write!(f, "Particle field is already attached. Call detach() first.")
            }
            AttachError::InvalidConfig(e) => write!(f, "Invalid field configuration: {}", e),
        }
    }
}

impl std::error::Error for AttachError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttachError::NoContext(e) => Some(e),
            AttachError::InvalidConfig(e) => Some(e),
            AttachError::AlreadyAttached => None,
        }
    }
}

impl From<SurfaceError> for AttachError {
    fn from(e: SurfaceError) -> Self {
        AttachError::NoContext(e)
    }
}

impl From<ConfigError> for AttachError {
    fn from(e: ConfigError) -> Self {
        AttachError::InvalidConfig(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The adapter reports no usable surface format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "GPU surface reports no supported formats"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when writing a canvas snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Failed to encode the image.
    Encode(image::ImageError),
    /// Failed to write the file to disk.
    Io(std::io::Error),
    /// The canvas has no pixels to write.
    Empty,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Encode(e) => write!(f, "Failed to encode snapshot: {}", e),
            SnapshotError::Io(e) => write!(f, "Failed to write snapshot file: {}", e),
            SnapshotError::Empty => write!(f, "Canvas is empty; nothing to snapshot"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Encode(e) => Some(e),
            SnapshotError::Io(e) => Some(e),
            SnapshotError::Empty => None,
        }
    }
}

impl From<image::ImageError> for SnapshotError {
    fn from(e: image::ImageError) -> Self {
        SnapshotError::Encode(e)
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Errors that can occur when running the host window.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The particle field could not attach to the window canvas.
    Attach(AttachError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to run event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Attach(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Attach(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<AttachError> for RunError {
    fn from(e: AttachError) -> Self {
        RunError::Attach(e)
    }
}
