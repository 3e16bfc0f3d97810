/// RenderingResourcePool - per-frame command buffer + fence pairs

use slotmap::new_key_type;
use crate::device::driver::LogicalDevice;
use crate::error::{Error, NativeError, ResourceStage, Result};
use crate::{ember_err, ember_trace};

new_key_type! {
    /// Identifies a pair handed out by `Device::create_rendering_resource`
    pub struct RenderingResourceKey;
}

/// One command buffer and its completion fence
///
/// The fence starts unsignaled. Not `Clone`: a pair is given back exactly once
/// through `Device::destroy_rendering_resource`.
#[derive(Debug)]
pub struct RenderingResources<C, F> {
    key: RenderingResourceKey,
    command_buffer: C,
    fence: F,
}

impl<C: Copy, F: Copy> RenderingResources<C, F> {
    pub(crate) fn new(key: RenderingResourceKey, command_buffer: C, fence: F) -> Self {
        Self { key, command_buffer, fence }
    }

    pub fn key(&self) -> RenderingResourceKey {
        self.key
    }

    pub fn command_buffer(&self) -> C {
        self.command_buffer
    }

    pub fn fence(&self) -> F {
        self.fence
    }
}

fn stage_error(stage: ResourceStage, error: NativeError) -> Error {
    ember_err!("ember::RenderingResources", Error::ResourceAllocationFailed { stage, error })
}

/// Allocate a command buffer and a reset fence from `pool`
///
/// Atomic: if any step fails, whatever was created before it is released and
/// nothing is handed out.
pub(crate) fn acquire<D: LogicalDevice>(
    device: &D,
    pool: D::CommandPool,
) -> Result<(D::CommandBuffer, D::Fence)> {
    let command_buffer = device
        .allocate_command_buffer(pool)
        .map_err(|e| stage_error(ResourceStage::CommandBuffer, e))?;

    // Created signaled, then reset: the caller gets an unsignaled fence
    let fence = match device.create_fence(true) {
        Ok(fence) => fence,
        Err(e) => {
            device.free_command_buffer(pool, command_buffer);
            return Err(stage_error(ResourceStage::Fence, e));
        }
    };

    if let Err(e) = device.reset_fence(fence) {
        device.destroy_fence(fence);
        device.free_command_buffer(pool, command_buffer);
        return Err(stage_error(ResourceStage::FenceReset, e));
    }

    ember_trace!(
        "ember::RenderingResources",
        "Acquired command buffer {:?} with fence {:?}",
        command_buffer,
        fence
    );
    Ok((command_buffer, fence))
}

/// Give a pair back: fence first, then the command buffer
pub(crate) fn release<D: LogicalDevice>(
    device: &D,
    pool: D::CommandPool,
    command_buffer: D::CommandBuffer,
    fence: D::Fence,
) {
    device.destroy_fence(fence);
    device.free_command_buffer(pool, command_buffer);
    ember_trace!(
        "ember::RenderingResources",
        "Released command buffer {:?} with fence {:?}",
        command_buffer,
        fence
    );
}
