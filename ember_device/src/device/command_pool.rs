/// CommandPool - the device's single per-frame command pool

use crate::device::driver::{CommandPoolFlags, LogicalDevice};
use crate::error::{Error, Result};
use crate::{ember_debug, ember_err};

/// Flags of the device command pool: short-lived buffers, freed individually
pub const FRAME_POOL_FLAGS: CommandPoolFlags =
    CommandPoolFlags::TRANSIENT.union(CommandPoolFlags::RESET_COMMAND_BUFFER);

/// Create the command pool all rendering resources allocate from
pub fn create_command_pool<D: LogicalDevice>(device: &D, family_index: u32) -> Result<D::CommandPool> {
    let pool = device
        .create_command_pool(family_index, FRAME_POOL_FLAGS)
        .map_err(|e| ember_err!("ember::CommandPool", Error::PoolCreationFailed(e)))?;
    ember_debug!("ember::CommandPool", "Command pool {:?} created on family {}", pool, family_index);
    Ok(pool)
}
