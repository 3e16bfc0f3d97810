//! Error types for the Ember device layer
//!
//! Every failure the device layer can surface to its caller. Driver failures
//! carry the native result code (`vk::Result` raw value) and its name.

use std::fmt;

/// Result type for device layer operations
pub type Result<T> = std::result::Result<T, Error>;

/// A driver-reported failure code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// Raw driver result code (negative for errors)
    pub code: i32,

    /// Driver name of the code (e.g. "ERROR_OUT_OF_DEVICE_MEMORY")
    pub name: String,
}

impl NativeError {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self { code, name: name.into() }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Result of a raw driver call
pub type NativeResult<T> = std::result::Result<T, NativeError>;

/// Which step of per-frame resource acquisition failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStage {
    /// Command buffer allocation from the device's command pool
    CommandBuffer,

    /// Fence creation
    Fence,

    /// Resetting the freshly created fence to unsignaled
    FenceReset,
}

impl fmt::Display for ResourceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStage::CommandBuffer => write!(f, "command buffer allocation"),
            ResourceStage::Fence => write!(f, "fence creation"),
            ResourceStage::FenceReset => write!(f, "fence reset"),
        }
    }
}

/// Device layer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// No queue family supports graphics
    NoGraphicsQueue,

    /// Presentation was requested but no present-capable family was found
    NoPresentQueue,

    /// The driver rejected logical device creation
    DeviceCreationFailed(NativeError),

    /// Swapchain creation failed
    SwapchainCreationFailed(NativeError),

    /// Command pool creation failed
    PoolCreationFailed(NativeError),

    /// The GPU memory allocator could not be bound to the device
    AllocatorCreationFailed(String),

    /// A per-frame rendering resource could not be acquired
    ResourceAllocationFailed {
        stage: ResourceStage,
        error: NativeError,
    },

    /// Caller-supplied configuration is invalid
    InvalidConfig(String),

    /// A handle that does not belong to this device (or was already released)
    InvalidResource(String),

    /// Any other driver failure (idle wait, fence status query, ...)
    BackendError(String),
}

impl Error {
    /// The native driver code carried by this error, if any
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Error::DeviceCreationFailed(e)
            | Error::SwapchainCreationFailed(e)
            | Error::PoolCreationFailed(e)
            | Error::ResourceAllocationFailed { error: e, .. } => Some(e.code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoGraphicsQueue => write!(f, "No graphics-capable queue family found"),
            Error::NoPresentQueue => write!(f, "Presentation requested but no present-capable queue family found"),
            Error::DeviceCreationFailed(e) => write!(f, "Logical device creation failed: {}", e),
            Error::SwapchainCreationFailed(e) => write!(f, "Swapchain creation failed: {}", e),
            Error::PoolCreationFailed(e) => write!(f, "Command pool creation failed: {}", e),
            Error::AllocatorCreationFailed(msg) => write!(f, "GPU allocator creation failed: {}", msg),
            Error::ResourceAllocationFailed { stage, error } => {
                write!(f, "Rendering resource allocation failed at {}: {}", stage, error)
            }
            Error::InvalidConfig(msg) => write!(f, "Invalid device configuration: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
