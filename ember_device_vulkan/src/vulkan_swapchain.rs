/// VulkanSwapchain - presentable images for a surface, owned by the device

use ash::vk;
use ember_device::ember::{Extent2D, NativeResult};
use ember_device::ember::queue::QueueSelection;
use ember_device::ember_debug;

use crate::vulkan_instance::{native_error, SurfaceBinding};

const SOURCE: &str = "ember::vulkan";

/// Vulkan swapchain with its images and image views
///
/// Created by `VulkanInstance::create_swapchain`, destroyed by the device
/// (views first, then the swapchain). The surface itself stays with the caller.
pub struct VulkanSwapchain {
    loader: ash::khr::swapchain::Device,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    format: vk::SurfaceFormatKHR,
    present_mode: vk::PresentModeKHR,
    extent: vk::Extent2D,
}

impl std::fmt::Debug for VulkanSwapchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VulkanSwapchain")
            .field("swapchain", &self.swapchain)
            .field("images", &self.images.len())
            .field("format", &self.format.format)
            .field("present_mode", &self.present_mode)
            .field("extent", &self.extent)
            .finish()
    }
}

impl VulkanSwapchain {
    /// Create a swapchain for `surface`
    ///
    /// # Arguments
    ///
    /// * `device` - Vulkan logical device
    /// * `loader` - Swapchain extension loader of `device`
    /// * `physical_device` - Physical device for capability queries
    /// * `surface` - Surface and its loader
    /// * `requested` - Requested extent (used when the surface leaves it open)
    /// * `queues` - Queue selection (concurrent sharing when present differs from graphics)
    pub(crate) fn new(
        device: &ash::Device,
        loader: &ash::khr::swapchain::Device,
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceBinding,
        requested: Extent2D,
        queues: &QueueSelection,
    ) -> NativeResult<Self> {
        unsafe {
            let capabilities = surface
                .loader
                .get_physical_device_surface_capabilities(physical_device, surface.surface)
                .map_err(|e| {
                    ember_debug!(SOURCE, "Failed to get surface capabilities: {:?}", e);
                    native_error(e)
                })?;

            let formats = surface
                .loader
                .get_physical_device_surface_formats(physical_device, surface.surface)
                .map_err(|e| {
                    ember_debug!(SOURCE, "Failed to query surface formats: {:?}", e);
                    native_error(e)
                })?;

            let present_modes = surface
                .loader
                .get_physical_device_surface_present_modes(physical_device, surface.surface)
                .map_err(|e| {
                    ember_debug!(SOURCE, "Failed to query present modes: {:?}", e);
                    native_error(e)
                })?;

            let format = choose_surface_format(&formats).ok_or_else(|| {
                ember_debug!(SOURCE, "Surface reports no formats");
                native_error(vk::Result::ERROR_FORMAT_NOT_SUPPORTED)
            })?;
            let present_mode = choose_present_mode(&present_modes);
            let extent = choose_extent(&capabilities, requested).ok_or_else(|| {
                ember_debug!(SOURCE, "Surface has no drawable area (minimized?)");
                native_error(vk::Result::ERROR_OUT_OF_DATE_KHR)
            })?;

            let family_indices = [queues.graphics_family(), queues.present_family().unwrap_or(queues.graphics_family())];
            let mut create_info = vk::SwapchainCreateInfoKHR::default()
                .surface(surface.surface)
                .min_image_count(choose_image_count(&capabilities))
                .image_format(format.format)
                .image_color_space(format.color_space)
                .image_extent(extent)
                .image_array_layers(1)
                .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST)
                .pre_transform(capabilities.current_transform)
                .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
                .present_mode(present_mode)
                .clipped(true);

            create_info = if queues.has_separate_present_family() {
                create_info
                    .image_sharing_mode(vk::SharingMode::CONCURRENT)
                    .queue_family_indices(&family_indices)
            } else {
                create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            };

            let swapchain = loader.create_swapchain(&create_info, None).map_err(|e| {
                ember_debug!(SOURCE, "Failed to create swapchain: {:?}", e);
                native_error(e)
            })?;

            let images = match loader.get_swapchain_images(swapchain) {
                Ok(images) => images,
                Err(e) => {
                    ember_debug!(SOURCE, "Failed to get swapchain images: {:?}", e);
                    loader.destroy_swapchain(swapchain, None);
                    return Err(native_error(e));
                }
            };

            let mut image_views = Vec::with_capacity(images.len());
            for &image in &images {
                let view_info = vk::ImageViewCreateInfo::default()
                    .image(image)
                    .view_type(vk::ImageViewType::TYPE_2D)
                    .format(format.format)
                    .components(vk::ComponentMapping {
                        r: vk::ComponentSwizzle::IDENTITY,
                        g: vk::ComponentSwizzle::IDENTITY,
                        b: vk::ComponentSwizzle::IDENTITY,
                        a: vk::ComponentSwizzle::IDENTITY,
                    })
                    .subresource_range(vk::ImageSubresourceRange {
                        aspect_mask: vk::ImageAspectFlags::COLOR,
                        base_mip_level: 0,
                        level_count: 1,
                        base_array_layer: 0,
                        layer_count: 1,
                    });

                match device.create_image_view(&view_info, None) {
                    Ok(view) => image_views.push(view),
                    Err(e) => {
                        ember_debug!(SOURCE, "Failed to create swapchain image view: {:?}", e);
                        for &view in &image_views {
                            device.destroy_image_view(view, None);
                        }
                        loader.destroy_swapchain(swapchain, None);
                        return Err(native_error(e));
                    }
                }
            }

            ember_debug!(
                SOURCE,
                "Swapchain: {} images, {:?}, {:?}, {}x{}",
                images.len(),
                format.format,
                present_mode,
                extent.width,
                extent.height
            );

            Ok(Self {
                loader: loader.clone(),
                swapchain,
                images,
                image_views,
                format,
                present_mode,
                extent,
            })
        }
    }

    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    pub fn loader(&self) -> &ash::khr::swapchain::Device {
        &self.loader
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    pub fn format(&self) -> vk::SurfaceFormatKHR {
        self.format
    }

    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.extent.width, self.extent.height)
    }

    /// Destroy image views, then the swapchain
    pub(crate) fn destroy(self, device: &ash::Device) {
        unsafe {
            for &view in &self.image_views {
                device.destroy_image_view(view, None);
            }
            self.loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

/// Prefer an sRGB 8-bit BGRA/RGBA format, else the first reported one
pub(crate) fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| f.format == vk::Format::B8G8R8A8_SRGB || f.format == vk::Format::R8G8B8A8_SRGB)
        .or_else(|| formats.first())
        .copied()
}

/// FIFO (vsync, guaranteed by every driver); first reported mode as a fallback
pub(crate) fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::FIFO) {
        vk::PresentModeKHR::FIFO
    } else {
        modes.first().copied().unwrap_or(vk::PresentModeKHR::FIFO)
    }
}

/// The surface's current extent, or `requested` clamped to the allowed range
/// when the surface leaves the extent to the swapchain (`u32::MAX`)
///
/// `None` when the result has no area; a swapchain cannot be created then.
pub(crate) fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, requested: Extent2D) -> Option<vk::Extent2D> {
    let extent = if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        clamp_extent(capabilities, requested)
    };

    (extent.width > 0 && extent.height > 0).then_some(extent)
}

fn clamp_extent(capabilities: &vk::SurfaceCapabilitiesKHR, requested: Extent2D) -> vk::Extent2D {
    vk::Extent2D {
        width: requested
            .width
            .clamp(capabilities.min_image_extent.width, capabilities.max_image_extent.width),
        height: requested
            .height
            .clamp(capabilities.min_image_extent.height, capabilities.max_image_extent.height),
    }
}

/// One more than the minimum, capped by the maximum (0 = unbounded)
pub(crate) fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

#[cfg(test)]
#[path = "vulkan_swapchain_tests.rs"]
mod tests;
