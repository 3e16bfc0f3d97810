/// DeviceFactory - logical device creation and queue retrieval

use crate::device::driver::{DeviceOf, GpuInstance, LogicalDevice, QueueOf};
use crate::error::{Error, Result};
use crate::queue::{QueueHandle, QueueRequest, QueueSelection};
use crate::{ember_debug, ember_err};

pub struct DeviceFactory;

impl DeviceFactory {
    /// Create the logical device
    ///
    /// The request is issued exactly once. A rejected creation is reported as
    /// `DeviceCreationFailed`; adjusting requirements and retrying is up to the caller.
    ///
    /// Each request must carry one priority per queue (`count == priorities.len()`,
    /// `count > 0`); anything else is `InvalidConfig` and never reaches the driver.
    pub fn create<I: GpuInstance>(
        instance: &I,
        requests: &[QueueRequest],
        extensions: &[String],
    ) -> Result<DeviceOf<I>> {
        if requests.is_empty() {
            return Err(ember_err!(
                "ember::DeviceFactory",
                Error::InvalidConfig("at least one queue request is required".to_string())
            ));
        }
        if let Some(request) = requests
            .iter()
            .find(|r| r.count == 0 || r.count as usize != r.priorities.len())
        {
            return Err(ember_err!(
                "ember::DeviceFactory",
                Error::InvalidConfig(format!(
                    "queue family {}: {} queue(s) requested with {} priorities",
                    request.family_index,
                    request.count,
                    request.priorities.len()
                ))
            ));
        }

        ember_debug!(
            "ember::DeviceFactory",
            "Creating logical device on {:?}: queue families {:?}, extensions {:?}",
            instance.gpu(),
            requests.iter().map(|r| r.family_index).collect::<Vec<_>>(),
            extensions
        );

        instance
            .create_device(requests, extensions)
            .map_err(|e| ember_err!("ember::DeviceFactory", Error::DeviceCreationFailed(e)))
    }

    /// Retrieve queue 0 of the graphics family and, if selected, of the present family
    pub fn retrieve_queues<I: GpuInstance>(
        device: &DeviceOf<I>,
        selection: &QueueSelection,
    ) -> (QueueHandle<QueueOf<I>>, Option<QueueHandle<QueueOf<I>>>) {
        let graphics_family = selection.graphics_family();
        let graphics = QueueHandle {
            family_index: graphics_family,
            handle: device.get_queue(graphics_family, 0),
        };

        let present = selection.present_family().map(|family_index| {
            if family_index == graphics_family {
                QueueHandle { family_index, handle: graphics.handle }
            } else {
                QueueHandle { family_index, handle: device.get_queue(family_index, 0) }
            }
        });

        (graphics, present)
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
