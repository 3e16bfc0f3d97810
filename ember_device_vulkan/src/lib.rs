/*!
# Ember Device - Vulkan Backend

Vulkan implementation of the `ember_device` driver seam.

This crate implements `GpuInstance` and `LogicalDevice` using the Ash library
for Vulkan bindings and gpu-allocator for memory management. The caller keeps
ownership of the `ash::Instance`, the physical device choice and the surface;
`VulkanDevice` owns everything created from them.

## Example

```no_run
use ember_device::ember::DeviceConfig;
use ember_device_vulkan::{VulkanDevice, VulkanInstance};

# fn run(instance: &ash::Instance, gpu: ash::vk::PhysicalDevice) -> ember_device::ember::Result<()> {
let vulkan = VulkanInstance::new(instance, gpu, None);
let mut device = VulkanDevice::create(&vulkan, &DeviceConfig::default())?;

let frame = device.create_rendering_resource()?;
// record into frame.command_buffer(), submit with frame.fence() ...
device.destroy_rendering_resource(frame);
device.destroy();
# Ok(())
# }
```
*/

mod vulkan_instance;
mod vulkan_device;
mod vulkan_swapchain;

pub use vulkan_instance::{SurfaceBinding, VulkanInstance};
pub use vulkan_device::VulkanLogicalDevice;
pub use vulkan_swapchain::VulkanSwapchain;

/// A device created from a `VulkanInstance`
///
/// The device borrows the `ash::Instance` (and the surface binding) for `'i`.
/// Giving up the instance while the device is alive does not compile:
///
/// ```compile_fail
/// use ember_device::ember::DeviceConfig;
/// use ember_device_vulkan::{VulkanDevice, VulkanInstance};
///
/// fn outlive(instance: ash::Instance, gpu: ash::vk::PhysicalDevice) {
///     let vulkan = VulkanInstance::new(&instance, gpu, None);
///     let device = VulkanDevice::create(&vulkan, &DeviceConfig::default()).unwrap();
///     drop(instance);
///     device.destroy();
/// }
/// ```
pub type VulkanDevice<'i> = ember_device::ember::Device<'i, VulkanInstance<'i>>;
