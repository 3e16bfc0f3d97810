/*!
# Ember Device

Ownership and lifecycle layer over a Vulkan-model GPU device.

This crate turns a borrowed instance (physical device + optional surface) into
a ready-to-render device: it selects queue families, creates the logical
device, binds the memory allocator, creates the command pool and, when
presenting, the swapchain. Per-frame rendering resources (command buffer +
fence) are handed out and taken back through the device.

## Architecture

- **QueueSelector**: graphics/present queue family selection
- **DeviceFactory**: logical device creation and queue retrieval
- **Device**: aggregate owner, creation with reverse unwinding, ordered teardown
- **GpuInstance / LogicalDevice**: the driver seam the Vulkan crate implements

Backend implementations (`ember_device_vulkan`) provide the concrete driver.
*/

// Internal modules
mod error;
mod global;
mod config;
pub mod log;
pub mod queue;
pub mod device;

#[cfg(test)]
mod test_support;

// Main ember namespace module
pub mod ember {
    // Error types
    pub use crate::error::{Error, NativeError, NativeResult, ResourceStage, Result};

    // Logging facade
    pub use crate::global::Ember;

    // Configuration
    pub use crate::config::{DeviceConfig, Extent2D};

    // Device aggregate
    pub use crate::device::{Device, DeviceState, RenderingResources, RenderingResourceKey};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Queue selection sub-module
    pub mod queue {
        pub use crate::queue::*;
    }

    // Driver seam and device building blocks
    pub mod device {
        pub use crate::device::*;
    }
}
