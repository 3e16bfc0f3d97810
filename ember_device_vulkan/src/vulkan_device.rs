/// VulkanLogicalDevice - logical device calls made on behalf of ember's Device

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use ember_device::ember::NativeResult;
use ember_device::ember::device::{CommandPoolFlags, LogicalDevice};
use ember_device::ember_trace;

use crate::vulkan_instance::native_error;
use crate::vulkan_swapchain::VulkanSwapchain;

const SOURCE: &str = "ember::vulkan";

/// Owned `ash::Device`, plus the swapchain loader when presentation was enabled
pub struct VulkanLogicalDevice {
    device: ash::Device,
    swapchain_loader: Option<ash::khr::swapchain::Device>,
}

impl VulkanLogicalDevice {
    pub(crate) fn new(device: ash::Device, swapchain_loader: Option<ash::khr::swapchain::Device>) -> Self {
        Self { device, swapchain_loader }
    }

    /// The device function table (for recording and submitting commands)
    pub fn raw(&self) -> &ash::Device {
        &self.device
    }

    pub fn swapchain_loader(&self) -> Option<&ash::khr::swapchain::Device> {
        self.swapchain_loader.as_ref()
    }
}

impl LogicalDevice for VulkanLogicalDevice {
    type Queue = vk::Queue;
    type CommandPool = vk::CommandPool;
    type CommandBuffer = vk::CommandBuffer;
    type Fence = vk::Fence;
    type Allocator = Allocator;
    type Swapchain = VulkanSwapchain;

    fn get_queue(&self, family_index: u32, queue_index: u32) -> vk::Queue {
        unsafe { self.device.get_device_queue(family_index, queue_index) }
    }

    fn create_command_pool(&self, family_index: u32, flags: CommandPoolFlags) -> NativeResult<vk::CommandPool> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(family_index)
            .flags(vk::CommandPoolCreateFlags::from_raw(flags.bits()));

        unsafe {
            self.device
                .create_command_pool(&create_info, None)
                .map_err(native_error)
        }
    }

    fn destroy_command_pool(&self, pool: vk::CommandPool) {
        unsafe { self.device.destroy_command_pool(pool, None) }
    }

    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> NativeResult<vk::CommandBuffer> {
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);

        let buffers = unsafe {
            self.device
                .allocate_command_buffers(&allocate_info)
                .map_err(native_error)?
        };

        buffers
            .first()
            .copied()
            .ok_or_else(|| native_error(vk::Result::ERROR_OUT_OF_HOST_MEMORY))
    }

    fn free_command_buffer(&self, pool: vk::CommandPool, buffer: vk::CommandBuffer) {
        unsafe { self.device.free_command_buffers(pool, &[buffer]) }
    }

    fn create_fence(&self, signaled: bool) -> NativeResult<vk::Fence> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo::default().flags(flags);

        unsafe {
            self.device.create_fence(&create_info, None).map_err(native_error)
        }
    }

    fn reset_fence(&self, fence: vk::Fence) -> NativeResult<()> {
        unsafe { self.device.reset_fences(&[fence]).map_err(native_error) }
    }

    fn fence_signaled(&self, fence: vk::Fence) -> NativeResult<bool> {
        unsafe { self.device.get_fence_status(fence).map_err(native_error) }
    }

    fn destroy_fence(&self, fence: vk::Fence) {
        unsafe { self.device.destroy_fence(fence, None) }
    }

    fn wait_idle(&self) -> NativeResult<()> {
        unsafe { self.device.device_wait_idle().map_err(native_error) }
    }

    fn release_allocator(&self, allocator: Allocator) {
        // Frees every VkDeviceMemory block the allocator still holds
        drop(allocator);
        ember_trace!(SOURCE, "GPU allocator released");
    }

    fn destroy_swapchain(&self, swapchain: VulkanSwapchain) {
        swapchain.destroy(&self.device);
    }

    fn destroy(self) {
        unsafe { self.device.destroy_device(None) }
        ember_trace!(SOURCE, "Logical device destroyed");
    }
}
