/// VulkanInstance - the borrowed instance collaborator, Vulkan implementation

use std::ffi::{c_char, CString};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use ember_device::ember::{Extent2D, NativeError, NativeResult};
use ember_device::ember::device::GpuInstance;
use ember_device::ember::queue::{QueueCapabilities, QueueFamilyInfo, QueueRequest, QueueSelection};
use ember_device::{ember_debug, ember_warn};

use crate::vulkan_device::VulkanLogicalDevice;
use crate::vulkan_swapchain::VulkanSwapchain;

const SOURCE: &str = "ember::vulkan";

/// Driver error carrying the raw `vk::Result` and its name
pub(crate) fn native_error(result: vk::Result) -> NativeError {
    NativeError::new(result.as_raw(), format!("{:?}", result))
}

/// A presentation surface together with the loader that queries it
///
/// Created (and destroyed) by the windowing layer.
#[derive(Clone)]
pub struct SurfaceBinding {
    pub loader: ash::khr::surface::Instance,
    pub surface: vk::SurfaceKHR,
}

/// Non-owning view of an instance, its selected physical device and an
/// optional surface
///
/// Borrows the instance and the surface binding for `'a`, so a device built
/// from it cannot outlive either. Nothing is destroyed here.
pub struct VulkanInstance<'a> {
    instance: &'a ash::Instance,
    physical_device: vk::PhysicalDevice,
    surface: Option<&'a SurfaceBinding>,
}

impl<'a> VulkanInstance<'a> {
    pub fn new(
        instance: &'a ash::Instance,
        physical_device: vk::PhysicalDevice,
        surface: Option<&'a SurfaceBinding>,
    ) -> Self {
        Self {
            instance,
            physical_device,
            surface,
        }
    }

    /// The instance function table
    pub fn inst(&self) -> &'a ash::Instance {
        self.instance
    }

    pub fn surface_binding(&self) -> Option<&'a SurfaceBinding> {
        self.surface
    }
}

impl<'a> GpuInstance for VulkanInstance<'a> {
    type PhysicalDevice = vk::PhysicalDevice;
    type Surface = vk::SurfaceKHR;
    type Device = VulkanLogicalDevice;

    const PRESENT_EXTENSION: &'static str = "VK_KHR_swapchain";

    fn gpu(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    fn surface(&self) -> Option<vk::SurfaceKHR> {
        self.surface.map(|binding| binding.surface)
    }

    fn queue_family_properties(&self) -> Vec<QueueFamilyInfo> {
        let properties = unsafe {
            self.instance
                .get_physical_device_queue_family_properties(self.physical_device)
        };

        properties
            .iter()
            .map(|family| {
                QueueFamilyInfo::new(
                    QueueCapabilities::from_bits_truncate(family.queue_flags.as_raw()),
                    family.queue_count,
                )
            })
            .collect()
    }

    fn surface_support(&self, family_index: u32, surface: vk::SurfaceKHR) -> bool {
        let Some(binding) = self.surface else {
            return false;
        };

        let supported = unsafe {
            binding
                .loader
                .get_physical_device_surface_support(self.physical_device, family_index, surface)
        };

        supported.unwrap_or_else(|e| {
            ember_warn!(SOURCE, "Surface support query failed for family {}: {:?}", family_index, e);
            false
        })
    }

    fn create_device(&self, requests: &[QueueRequest], extensions: &[String]) -> NativeResult<VulkanLogicalDevice> {
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = requests
            .iter()
            .map(|request| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(request.family_index)
                    .queue_priorities(&request.priorities)
            })
            .collect();

        let extension_names = extensions
            .iter()
            .map(|name| CString::new(name.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                ember_debug!(SOURCE, "Invalid device extension name: {}", e);
                native_error(vk::Result::ERROR_EXTENSION_NOT_PRESENT)
            })?;
        let extension_ptrs: Vec<*const c_char> = extension_names.iter().map(|name| name.as_ptr()).collect();

        let device_features = vk::PhysicalDeviceFeatures::default();
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_features(&device_features);

        let device = unsafe {
            self.instance
                .create_device(self.physical_device, &create_info, None)
                .map_err(native_error)?
        };

        let swapchain_loader = extensions
            .iter()
            .any(|name| name == Self::PRESENT_EXTENSION)
            .then(|| ash::khr::swapchain::Device::new(self.instance, &device));

        ember_debug!(SOURCE, "Logical device created ({} extension(s))", extensions.len());
        Ok(VulkanLogicalDevice::new(device, swapchain_loader))
    }

    fn create_allocator(&self, device: &VulkanLogicalDevice) -> Result<Allocator, String> {
        // The allocator keeps its own function tables
        Allocator::new(&AllocatorCreateDesc {
            instance: self.instance.clone(),
            device: device.raw().clone(),
            physical_device: self.physical_device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })
        .map_err(|e| e.to_string())
    }

    fn create_swapchain(
        &self,
        device: &VulkanLogicalDevice,
        surface: vk::SurfaceKHR,
        extent: Extent2D,
        queues: &QueueSelection,
    ) -> NativeResult<(VulkanSwapchain, Extent2D)> {
        let binding = self
            .surface
            .filter(|binding| binding.surface == surface)
            .ok_or_else(|| {
                ember_debug!(SOURCE, "Swapchain requested for an unknown surface {:?}", surface);
                native_error(vk::Result::ERROR_SURFACE_LOST_KHR)
            })?;

        let loader = device.swapchain_loader().ok_or_else(|| {
            ember_debug!(SOURCE, "Device was created without {}", Self::PRESENT_EXTENSION);
            native_error(vk::Result::ERROR_EXTENSION_NOT_PRESENT)
        })?;

        let swapchain = VulkanSwapchain::new(device.raw(), loader, self.physical_device, binding, extent, queues)?;
        let actual = swapchain.extent();
        Ok((swapchain, actual))
    }
}

#[cfg(test)]
#[path = "vulkan_instance_tests.rs"]
mod tests;
