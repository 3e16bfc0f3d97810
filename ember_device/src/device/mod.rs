/// Device module - logical device lifecycle and everything it owns

pub mod driver;
pub mod factory;
pub mod allocator;
pub mod command_pool;
pub mod swapchain;
pub mod rendering_resources;
pub mod device;
mod creation_scope;

pub use driver::*;
pub use factory::*;
pub use allocator::*;
pub use command_pool::*;
pub use swapchain::*;
pub use rendering_resources::{RenderingResourceKey, RenderingResources};
pub use device::*;

// Recording mock driver for tests (no GPU required)
#[cfg(test)]
pub(crate) mod mock_driver;
