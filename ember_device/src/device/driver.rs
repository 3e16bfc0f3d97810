/// Driver seam - the narrow interface the device layer drives
///
/// `GpuInstance` is the borrowed instance collaborator (physical device,
/// optional surface, and the calls that need the instance: device creation,
/// allocator binding, swapchain creation). `LogicalDevice` is the created
/// device and every call made through it.
///
/// Both traits follow the Vulkan device model one-to-one. The Vulkan crate
/// implements them with `ash`; unit tests implement them with a recording mock.

use std::fmt;
use bitflags::bitflags;
use crate::config::Extent2D;
use crate::error::NativeResult;
use crate::queue::{QueueFamilyInfo, QueueRequest, QueueSelection};

bitflags! {
    /// Command pool creation flags (bit values match `VkCommandPoolCreateFlagBits`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandPoolFlags: u32 {
        /// Buffers are short-lived (re-recorded every frame)
        const TRANSIENT = 0x1;
        /// Buffers can be reset/freed individually
        const RESET_COMMAND_BUFFER = 0x2;
    }
}

/// A created logical device
///
/// Destroy calls return nothing: teardown never fails its caller.
pub trait LogicalDevice {
    type Queue: Copy + fmt::Debug;
    type CommandPool: Copy + fmt::Debug + PartialEq;
    type CommandBuffer: Copy + fmt::Debug + PartialEq;
    type Fence: Copy + fmt::Debug + PartialEq;
    type Allocator;
    type Swapchain;

    /// Retrieve a queue created with the device
    fn get_queue(&self, family_index: u32, queue_index: u32) -> Self::Queue;

    fn create_command_pool(&self, family_index: u32, flags: CommandPoolFlags) -> NativeResult<Self::CommandPool>;
    fn destroy_command_pool(&self, pool: Self::CommandPool);

    /// Allocate one primary command buffer from `pool`
    fn allocate_command_buffer(&self, pool: Self::CommandPool) -> NativeResult<Self::CommandBuffer>;
    fn free_command_buffer(&self, pool: Self::CommandPool, buffer: Self::CommandBuffer);

    fn create_fence(&self, signaled: bool) -> NativeResult<Self::Fence>;
    fn reset_fence(&self, fence: Self::Fence) -> NativeResult<()>;
    fn fence_signaled(&self, fence: Self::Fence) -> NativeResult<bool>;
    fn destroy_fence(&self, fence: Self::Fence);

    /// Block until all submitted work has completed
    fn wait_idle(&self) -> NativeResult<()>;

    /// Release the memory allocator (must happen before `destroy`)
    fn release_allocator(&self, allocator: Self::Allocator);

    fn destroy_swapchain(&self, swapchain: Self::Swapchain);

    /// Destroy the logical device handle itself
    fn destroy(self)
    where
        Self: Sized;
}

/// The instance collaborator, borrowed for the whole life of a `Device`
pub trait GpuInstance {
    type PhysicalDevice: Copy + fmt::Debug;
    type Surface: Copy + fmt::Debug;
    type Device: LogicalDevice;

    /// Device extension required for presentation
    const PRESENT_EXTENSION: &'static str;

    /// The selected physical device
    fn gpu(&self) -> Self::PhysicalDevice;

    /// The presentation surface, if the windowing layer created one
    fn surface(&self) -> Option<Self::Surface>;

    /// Queue family properties of `gpu()`, in driver index order
    fn queue_family_properties(&self) -> Vec<QueueFamilyInfo>;

    /// Surface-support query for one queue family
    fn surface_support(&self, family_index: u32, surface: Self::Surface) -> bool;

    /// Issue a single device-create request
    fn create_device(&self, requests: &[QueueRequest], extensions: &[String]) -> NativeResult<Self::Device>;

    /// Bind a memory allocator to (gpu, device, instance)
    fn create_allocator(&self, device: &Self::Device) -> Result<AllocatorOf<Self>, String>;

    /// Create a presentable image chain; returns the extent actually used
    fn create_swapchain(
        &self,
        device: &Self::Device,
        surface: Self::Surface,
        extent: Extent2D,
        queues: &QueueSelection,
    ) -> NativeResult<(SwapchainOf<Self>, Extent2D)>;
}

pub type DeviceOf<I> = <I as GpuInstance>::Device;
pub type QueueOf<I> = <DeviceOf<I> as LogicalDevice>::Queue;
pub type CommandPoolOf<I> = <DeviceOf<I> as LogicalDevice>::CommandPool;
pub type CommandBufferOf<I> = <DeviceOf<I> as LogicalDevice>::CommandBuffer;
pub type FenceOf<I> = <DeviceOf<I> as LogicalDevice>::Fence;
pub type AllocatorOf<I> = <DeviceOf<I> as LogicalDevice>::Allocator;
pub type SwapchainOf<I> = <DeviceOf<I> as LogicalDevice>::Swapchain;
