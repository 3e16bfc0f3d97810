/// Allocator binding - GPU memory allocator bound to (gpu, device, instance)

use crate::device::driver::{AllocatorOf, DeviceOf, GpuInstance};
use crate::error::{Error, Result};
use crate::{ember_debug, ember_err};

/// Bind the memory allocator to a freshly created logical device
///
/// A failed bind is fatal for device creation.
pub fn bind_allocator<I: GpuInstance>(instance: &I, device: &DeviceOf<I>) -> Result<AllocatorOf<I>> {
    let allocator = instance
        .create_allocator(device)
        .map_err(|msg| ember_err!("ember::Allocator", Error::AllocatorCreationFailed(msg)))?;
    ember_debug!("ember::Allocator", "GPU allocator bound to {:?}", instance.gpu());
    Ok(allocator)
}
