/// SwapchainBinding - presentable image chain bound to device + surface + extent

use crate::config::Extent2D;
use crate::device::driver::{DeviceOf, GpuInstance, SwapchainOf};
use crate::error::{Error, Result};
use crate::queue::QueueSelection;
use crate::{ember_debug, ember_err};

/// An owned swapchain together with the extent it was created for
///
/// Becomes stale when the surface is resized; see `Device::recreate_swapchain`.
#[derive(Debug)]
pub struct SwapchainBinding<S> {
    handle: S,
    requested_extent: Extent2D,
    extent: Extent2D,
}

/// Create a swapchain through the instance's swapchain layer
pub fn bind_swapchain<I: GpuInstance>(
    instance: &I,
    device: &DeviceOf<I>,
    surface: I::Surface,
    requested_extent: Extent2D,
    queues: &QueueSelection,
) -> Result<SwapchainBinding<SwapchainOf<I>>> {
    let (handle, extent) = instance
        .create_swapchain(device, surface, requested_extent, queues)
        .map_err(|e| ember_err!("ember::Swapchain", Error::SwapchainCreationFailed(e)))?;

    ember_debug!(
        "ember::Swapchain",
        "Swapchain created: requested {}x{}, actual {}x{}",
        requested_extent.width,
        requested_extent.height,
        extent.width,
        extent.height
    );

    Ok(SwapchainBinding { handle, requested_extent, extent })
}

impl<S> SwapchainBinding<S> {
    pub fn handle(&self) -> &S {
        &self.handle
    }

    /// Extent the caller asked for
    pub fn requested_extent(&self) -> Extent2D {
        self.requested_extent
    }

    /// Extent the images were actually created with
    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    /// Whether the images still fit a surface of `extent`
    pub fn matches_extent(&self, extent: Extent2D) -> bool {
        self.extent == extent
    }

    pub(crate) fn into_handle(self) -> S {
        self.handle
    }
}
