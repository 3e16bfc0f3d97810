/// Device - aggregate owner of the logical device and everything created from it

use std::mem::ManuallyDrop;
use slotmap::SlotMap;
use crate::config::{DeviceConfig, Extent2D};
use crate::device::allocator::bind_allocator;
use crate::device::command_pool::create_command_pool;
use crate::device::creation_scope::CreationScope;
use crate::device::driver::{
    AllocatorOf, CommandBufferOf, CommandPoolOf, DeviceOf, FenceOf, GpuInstance, LogicalDevice,
    QueueOf, SwapchainOf,
};
use crate::device::factory::DeviceFactory;
use crate::device::rendering_resources::{self, RenderingResourceKey, RenderingResources};
use crate::device::swapchain::{bind_swapchain, SwapchainBinding};
use crate::error::{Error, Result};
use crate::queue::{PresentProbe, QueueHandle, QueueSelection, QueueSelector};
use crate::{ember_debug, ember_err, ember_info, ember_warn};

const SOURCE: &str = "ember::Device";

/// Lifecycle state of a device
///
/// `Uninitialized -> Creating -> Ready -> Destroyed`. A `Device` value only
/// exists while `Ready`; the earlier states are passed through inside
/// `Device::create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Uninitialized,
    Creating,
    Ready,
    Destroyed,
}

impl DeviceState {
    pub fn can_transition_to(self, next: DeviceState) -> bool {
        matches!(
            (self, next),
            (DeviceState::Uninitialized, DeviceState::Creating)
                | (DeviceState::Creating, DeviceState::Ready)
                | (DeviceState::Ready, DeviceState::Destroyed)
        )
    }

    /// Move to `next`; only the forward edges of the lifecycle are legal
    pub(crate) fn transition(self, next: DeviceState) -> DeviceState {
        debug_assert!(
            self.can_transition_to(next),
            "invalid device state transition {:?} -> {:?}",
            self,
            next
        );
        ember_debug!(SOURCE, "State {:?} -> {:?}", self, next);
        next
    }
}

/// Rendering resources handed out by a `Device<I>`
pub type RenderingResourcesOf<I> = RenderingResources<CommandBufferOf<I>, FenceOf<I>>;

/// A ready-to-render GPU device
///
/// Borrows its instance for `'i`: the device cannot outlive the instance it was
/// created from. Owns every handle it creates and releases them exactly once,
/// either through `destroy` or on drop.
pub struct Device<'i, I: GpuInstance> {
    instance: &'i I,
    selection: QueueSelection,
    graphics_queue: QueueHandle<QueueOf<I>>,
    present_queue: Option<QueueHandle<QueueOf<I>>>,
    command_pool: CommandPoolOf<I>,
    swapchain: Option<SwapchainBinding<SwapchainOf<I>>>,
    resources: SlotMap<RenderingResourceKey, (CommandBufferOf<I>, FenceOf<I>)>,
    allocator: ManuallyDrop<AllocatorOf<I>>,
    logical: ManuallyDrop<DeviceOf<I>>,
    state: DeviceState,
}

impl<'i, I: GpuInstance> Device<'i, I> {
    /// Bring a device up: queue selection, logical device, queues, allocator,
    /// command pool and (when presenting) the swapchain
    ///
    /// A swapchain is created only when `config.present` is set; the instance
    /// must then expose a surface, otherwise creation fails with `NoPresentQueue`.
    ///
    /// # Errors
    ///
    /// The first failing step aborts creation. Every handle created before it
    /// is released in reverse order before the error is returned.
    pub fn create(instance: &'i I, config: &DeviceConfig) -> Result<Self> {
        let state = DeviceState::Uninitialized.transition(DeviceState::Creating);

        config.validate().map_err(|e| ember_err!(SOURCE, e))?;

        let families = instance.queue_family_properties();
        let surface = instance.surface();
        let selection = match (config.present, surface) {
            (false, _) => QueueSelector::select(&families, PresentProbe::NotRequested)?,
            (true, None) => QueueSelector::select(&families, PresentProbe::Unavailable)?,
            (true, Some(surface)) => {
                let mut probe = |index: u32| instance.surface_support(index, surface);
                QueueSelector::select(&families, PresentProbe::Probe(&mut probe))?
            }
        };

        let extensions = config.resolved_extensions(I::PRESENT_EXTENSION);
        let requests = selection.queue_requests(config.queue_priority);

        let mut scope = CreationScope::<I>::new();
        let logical = &*scope.device.insert(DeviceFactory::create(instance, &requests, &extensions)?);
        let (graphics_queue, present_queue) = DeviceFactory::retrieve_queues::<I>(logical, &selection);

        scope.allocator = Some(bind_allocator(instance, logical)?);
        scope.command_pool = Some(create_command_pool(logical, selection.graphics_family())?);

        if let (true, Some(surface)) = (config.present, surface) {
            scope.swapchain = Some(bind_swapchain(instance, logical, surface, config.extent, &selection)?);
        }

        let state = state.transition(DeviceState::Ready);
        let parts = scope.finish();

        ember_info!(
            SOURCE,
            "Device ready on {:?}: graphics family {}, present family {:?}, swapchain {}",
            instance.gpu(),
            selection.graphics_family(),
            selection.present_family(),
            if parts.swapchain.is_some() { "yes" } else { "no" }
        );

        Ok(Self {
            instance,
            selection,
            graphics_queue,
            present_queue,
            command_pool: parts.command_pool,
            swapchain: parts.swapchain,
            resources: SlotMap::with_key(),
            allocator: ManuallyDrop::new(parts.allocator),
            logical: ManuallyDrop::new(parts.device),
            state,
        })
    }

    /// Tear the device down
    ///
    /// Waits for the GPU to go idle, releases rendering resources still
    /// outstanding, then destroys swapchain, command pool, allocator and logical
    /// device. Failures are logged, never returned.
    pub fn destroy(self) {
        ember_info!(SOURCE, "Destroying device on {:?}", self.instance.gpu());
        drop(self);
    }

    // ===== PER-FRAME RESOURCES =====

    /// Acquire a command buffer and an unsignaled fence for one in-flight frame
    pub fn create_rendering_resource(&mut self) -> Result<RenderingResourcesOf<I>> {
        let (command_buffer, fence) = rendering_resources::acquire(&*self.logical, self.command_pool)?;
        let key = self.resources.insert((command_buffer, fence));
        Ok(RenderingResources::new(key, command_buffer, fence))
    }

    /// Give a frame's resources back
    ///
    /// Never fails: a pair this device does not own is logged and ignored.
    pub fn destroy_rendering_resource(&mut self, resources: RenderingResourcesOf<I>) {
        if let Err(e) = self.check_owned(&resources) {
            ember_warn!(SOURCE, "Ignoring release: {}", e);
            return;
        }
        if let Some((command_buffer, fence)) = self.resources.remove(resources.key()) {
            rendering_resources::release(&*self.logical, self.command_pool, command_buffer, fence);
        }
    }

    /// Whether the frame's fence has been signaled by the GPU
    pub fn is_fence_signaled(&self, resources: &RenderingResourcesOf<I>) -> Result<bool> {
        self.check_owned(resources)?;
        self.logical.fence_signaled(resources.fence()).map_err(|e| {
            ember_err!(SOURCE, Error::BackendError(format!("fence status query failed: {}", e)))
        })
    }

    /// Number of rendering resources handed out and not yet given back
    pub fn outstanding_rendering_resources(&self) -> usize {
        self.resources.len()
    }

    fn check_owned(&self, resources: &RenderingResourcesOf<I>) -> Result<()> {
        match self.resources.get(resources.key()) {
            Some(&(command_buffer, fence))
                if command_buffer == resources.command_buffer() && fence == resources.fence() =>
            {
                Ok(())
            }
            _ => Err(Error::InvalidResource(format!(
                "rendering resource {:?} is not owned by this device",
                resources.key()
            ))),
        }
    }

    // ===== SWAPCHAIN =====

    /// Replace the swapchain after a surface resize
    ///
    /// On failure the device stays usable without a swapchain.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for a zero-sized extent
    /// - `NoPresentQueue` if the device was created without presentation
    /// - `BackendError` if the idle wait fails (the old swapchain is kept)
    /// - `SwapchainCreationFailed` if the new swapchain cannot be created
    pub fn recreate_swapchain(&mut self, extent: Extent2D) -> Result<()> {
        if extent.is_empty() {
            return Err(ember_err!(
                SOURCE,
                Error::InvalidConfig(format!("swapchain extent {}x{} is empty", extent.width, extent.height))
            ));
        }

        let surface = match (self.present_queue, self.instance.surface()) {
            (Some(_), Some(surface)) => surface,
            _ => return Err(ember_err!(SOURCE, Error::NoPresentQueue)),
        };

        self.wait_idle()?;

        if let Some(old) = self.swapchain.take() {
            self.logical.destroy_swapchain(old.into_handle());
        }

        let binding = bind_swapchain(self.instance, &*self.logical, surface, extent, &self.selection)?;
        self.swapchain = Some(binding);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn instance(&self) -> &'i I {
        self.instance
    }

    pub fn logical_device(&self) -> &DeviceOf<I> {
        &self.logical
    }

    pub fn queue_selection(&self) -> &QueueSelection {
        &self.selection
    }

    pub fn graphics_queue(&self) -> QueueHandle<QueueOf<I>> {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> Option<QueueHandle<QueueOf<I>>> {
        self.present_queue
    }

    pub fn command_pool(&self) -> CommandPoolOf<I> {
        self.command_pool
    }

    pub fn allocator(&self) -> &AllocatorOf<I> {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut AllocatorOf<I> {
        &mut self.allocator
    }

    pub fn swapchain(&self) -> Option<&SwapchainBinding<SwapchainOf<I>>> {
        self.swapchain.as_ref()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Block until the GPU has finished all submitted work
    pub fn wait_idle(&self) -> Result<()> {
        self.logical
            .wait_idle()
            .map_err(|e| ember_err!(SOURCE, Error::BackendError(format!("device wait idle failed: {}", e))))
    }
}

impl<'i, I: GpuInstance> Drop for Device<'i, I> {
    fn drop(&mut self) {
        if !self.state.can_transition_to(DeviceState::Destroyed) {
            return;
        }

        if let Err(e) = self.logical.wait_idle() {
            ember_warn!(SOURCE, "Wait idle failed during teardown: {}", e);
        }

        if !self.resources.is_empty() {
            ember_warn!(
                SOURCE,
                "{} rendering resource(s) still outstanding at teardown, releasing them",
                self.resources.len()
            );
        }
        for (_, (command_buffer, fence)) in self.resources.drain() {
            rendering_resources::release(&*self.logical, self.command_pool, command_buffer, fence);
        }

        if let Some(swapchain) = self.swapchain.take() {
            self.logical.destroy_swapchain(swapchain.into_handle());
        }

        self.logical.destroy_command_pool(self.command_pool);

        // SAFETY: guarded by `state`, this block runs once and nothing touches
        // `allocator` or `logical` afterwards.
        unsafe {
            let allocator = ManuallyDrop::take(&mut self.allocator);
            self.logical.release_allocator(allocator);

            let logical = ManuallyDrop::take(&mut self.logical);
            logical.destroy();
        }

        self.state = DeviceState::Destroyed;
        ember_debug!(SOURCE, "State {:?} -> {:?}", DeviceState::Ready, DeviceState::Destroyed);
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
