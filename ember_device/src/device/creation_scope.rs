/// CreationScope - owns the sub-resources of a device under construction
///
/// Each creation step stores its handle here as soon as it exists. If a later
/// step fails, dropping the scope releases everything already created, in
/// reverse creation order. `finish` hands the complete set over to `Device`.

use crate::device::driver::{AllocatorOf, CommandPoolOf, DeviceOf, GpuInstance, LogicalDevice, SwapchainOf};
use crate::device::swapchain::SwapchainBinding;
use crate::ember_warn;

pub(crate) struct CreationScope<I: GpuInstance> {
    pub(crate) device: Option<DeviceOf<I>>,
    pub(crate) allocator: Option<AllocatorOf<I>>,
    pub(crate) command_pool: Option<CommandPoolOf<I>>,
    pub(crate) swapchain: Option<SwapchainBinding<SwapchainOf<I>>>,
}

/// Everything a Ready device owns
pub(crate) struct ReadyParts<I: GpuInstance> {
    pub(crate) device: DeviceOf<I>,
    pub(crate) allocator: AllocatorOf<I>,
    pub(crate) command_pool: CommandPoolOf<I>,
    pub(crate) swapchain: Option<SwapchainBinding<SwapchainOf<I>>>,
}

impl<I: GpuInstance> CreationScope<I> {
    pub(crate) fn new() -> Self {
        Self {
            device: None,
            allocator: None,
            command_pool: None,
            swapchain: None,
        }
    }

    /// Take ownership of every created part
    ///
    /// Called once device, allocator and command pool are stored; `Device::create`
    /// reaches it only after every required step succeeded.
    pub(crate) fn finish(mut self) -> ReadyParts<I> {
        match (self.device.take(), self.allocator.take(), self.command_pool.take()) {
            (Some(device), Some(allocator), Some(command_pool)) => ReadyParts {
                device,
                allocator,
                command_pool,
                swapchain: self.swapchain.take(),
            },
            _ => unreachable!("creation scope finished before device, allocator and command pool were stored"),
        }
    }
}

impl<I: GpuInstance> Drop for CreationScope<I> {
    fn drop(&mut self) {
        let Some(device) = self.device.take() else {
            return;
        };

        ember_warn!("ember::CreationScope", "Device creation aborted, releasing partially created resources");

        if let Some(swapchain) = self.swapchain.take() {
            device.destroy_swapchain(swapchain.into_handle());
        }
        if let Some(pool) = self.command_pool.take() {
            device.destroy_command_pool(pool);
        }
        if let Some(allocator) = self.allocator.take() {
            device.release_allocator(allocator);
        }
        device.destroy();
    }
}
