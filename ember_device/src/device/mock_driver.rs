/// Mock driver for unit tests (no GPU required)
///
/// `MockInstance` / `MockDevice` implement the driver seam and record every
/// create/destroy call in a shared ledger. Any step can be made to fail with
/// `MockInstance::fail_at`, so leak-freedom and teardown order are checked
/// without a GPU.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use crate::config::Extent2D;
use crate::device::driver::{CommandPoolFlags, GpuInstance, LogicalDevice};
use crate::error::{NativeError, NativeResult};
use crate::queue::{QueueCapabilities, QueueFamilyInfo, QueueRequest, QueueSelection};

// ============================================================================
// Ledger
// ============================================================================

/// Driver calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Device,
    Allocator,
    CommandPool,
    Swapchain,
    CommandBuffer,
    Fence,
    FenceReset,
    WaitIdle,
    FenceStatus,
}

/// Kinds of objects the mock hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Device,
    Allocator,
    CommandPool,
    Swapchain,
    CommandBuffer,
    Fence,
}

#[derive(Debug, Default)]
pub struct MockState {
    next_id: u64,
    live: HashMap<u64, ObjectKind>,
    fence_signaled: HashMap<u64, bool>,
    fail: HashSet<FailPoint>,

    /// Every driver call, in order
    pub events: Vec<&'static str>,

    /// Destroy/free calls on an id that was not live
    pub double_releases: usize,

    /// Objects created so far, per kind
    pub created: HashMap<ObjectKind, usize>,

    pub device_requests: Vec<QueueRequest>,
    pub device_extensions: Vec<String>,
    pub pool_flags: Vec<(u32, CommandPoolFlags)>,
    pub probed_families: Vec<u32>,
    pub swapchain_extents: Vec<Extent2D>,
}

impl MockState {
    fn create(&mut self, kind: ObjectKind, event: &'static str) -> u64 {
        self.next_id += 1;
        self.live.insert(self.next_id, kind);
        *self.created.entry(kind).or_insert(0) += 1;
        self.events.push(event);
        self.next_id
    }

    fn release(&mut self, id: u64, event: &'static str) {
        self.events.push(event);
        if self.live.remove(&id).is_none() {
            self.double_releases += 1;
        }
    }

    fn check(&self, point: FailPoint) -> NativeResult<()> {
        if self.fail.contains(&point) {
            Err(NativeError::new(-2, "ERROR_OUT_OF_DEVICE_MEMORY"))
        } else {
            Ok(())
        }
    }

    /// Objects of `kind` created and not yet released
    pub fn live_count(&self, kind: ObjectKind) -> usize {
        self.live.values().filter(|&&k| k == kind).count()
    }

    /// Total objects created and not yet released
    pub fn live_total(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self, kind: ObjectKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Position of the first occurrence of `event`
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|&e| e == event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|&&e| e == event).count()
    }
}

// ============================================================================
// Handles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockQueue {
    pub family_index: u32,
    pub queue_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCommandPool(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCommandBuffer(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFence(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSurface(pub u32);

#[derive(Debug)]
pub struct MockAllocator {
    pub id: u64,
    pub allocations: u32,
}

#[derive(Debug)]
pub struct MockSwapchain {
    pub id: u64,
    pub extent: Extent2D,
}

// ============================================================================
// Mock Device
// ============================================================================

#[derive(Debug)]
pub struct MockDevice {
    pub id: u64,
    state: Arc<Mutex<MockState>>,
}

impl MockDevice {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Simulate the GPU completing the work guarded by `fence`
    pub fn signal_fence(&self, fence: MockFence) {
        self.state().fence_signaled.insert(fence.0, true);
    }
}

impl LogicalDevice for MockDevice {
    type Queue = MockQueue;
    type CommandPool = MockCommandPool;
    type CommandBuffer = MockCommandBuffer;
    type Fence = MockFence;
    type Allocator = MockAllocator;
    type Swapchain = MockSwapchain;

    fn get_queue(&self, family_index: u32, queue_index: u32) -> MockQueue {
        self.state().events.push("get_queue");
        MockQueue { family_index, queue_index }
    }

    fn create_command_pool(&self, family_index: u32, flags: CommandPoolFlags) -> NativeResult<MockCommandPool> {
        let mut state = self.state();
        state.check(FailPoint::CommandPool)?;
        state.pool_flags.push((family_index, flags));
        Ok(MockCommandPool(state.create(ObjectKind::CommandPool, "create_command_pool")))
    }

    fn destroy_command_pool(&self, pool: MockCommandPool) {
        self.state().release(pool.0, "destroy_command_pool");
    }

    fn allocate_command_buffer(&self, _pool: MockCommandPool) -> NativeResult<MockCommandBuffer> {
        let mut state = self.state();
        state.check(FailPoint::CommandBuffer)?;
        Ok(MockCommandBuffer(state.create(ObjectKind::CommandBuffer, "allocate_command_buffer")))
    }

    fn free_command_buffer(&self, _pool: MockCommandPool, buffer: MockCommandBuffer) {
        self.state().release(buffer.0, "free_command_buffer");
    }

    fn create_fence(&self, signaled: bool) -> NativeResult<MockFence> {
        let mut state = self.state();
        state.check(FailPoint::Fence)?;
        let id = state.create(ObjectKind::Fence, "create_fence");
        state.fence_signaled.insert(id, signaled);
        Ok(MockFence(id))
    }

    fn reset_fence(&self, fence: MockFence) -> NativeResult<()> {
        let mut state = self.state();
        state.events.push("reset_fence");
        state.check(FailPoint::FenceReset)?;
        state.fence_signaled.insert(fence.0, false);
        Ok(())
    }

    fn fence_signaled(&self, fence: MockFence) -> NativeResult<bool> {
        let state = self.state();
        state.check(FailPoint::FenceStatus)?;
        Ok(state.fence_signaled.get(&fence.0).copied().unwrap_or(false))
    }

    fn destroy_fence(&self, fence: MockFence) {
        let mut state = self.state();
        state.fence_signaled.remove(&fence.0);
        state.release(fence.0, "destroy_fence");
    }

    fn wait_idle(&self) -> NativeResult<()> {
        let mut state = self.state();
        state.events.push("wait_idle");
        state.check(FailPoint::WaitIdle)
    }

    fn release_allocator(&self, allocator: MockAllocator) {
        self.state().release(allocator.id, "release_allocator");
    }

    fn destroy_swapchain(&self, swapchain: MockSwapchain) {
        self.state().release(swapchain.id, "destroy_swapchain");
    }

    fn destroy(self) {
        self.state().release(self.id, "destroy_device");
    }
}

// ============================================================================
// Mock Instance
// ============================================================================

pub struct MockInstance {
    families: Vec<QueueFamilyInfo>,
    present_support: Vec<bool>,
    surface: Option<MockSurface>,
    state: Arc<Mutex<MockState>>,
}

impl MockInstance {
    /// Headless instance (no surface)
    pub fn new(families: Vec<QueueFamilyInfo>) -> Self {
        Self {
            families,
            present_support: Vec::new(),
            surface: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Attach a surface; `present_support[i]` is the probe answer for family `i`
    pub fn with_surface(mut self, present_support: &[bool]) -> Self {
        self.surface = Some(MockSurface(1));
        self.present_support = present_support.to_vec();
        self
    }

    /// `[Compute, Graphics, Graphics|Compute|Transfer]`
    pub fn mixed_families() -> Vec<QueueFamilyInfo> {
        vec![
            QueueFamilyInfo::new(QueueCapabilities::COMPUTE, 1),
            QueueFamilyInfo::new(QueueCapabilities::GRAPHICS, 1),
            QueueFamilyInfo::new(
                QueueCapabilities::GRAPHICS | QueueCapabilities::COMPUTE | QueueCapabilities::TRANSFER,
                1,
            ),
        ]
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn fail_at(&self, point: FailPoint) {
        self.state().fail.insert(point);
    }

    pub fn clear_failures(&self) {
        self.state().fail.clear();
    }
}

impl GpuInstance for MockInstance {
    type PhysicalDevice = u32;
    type Surface = MockSurface;
    type Device = MockDevice;

    const PRESENT_EXTENSION: &'static str = "MOCK_KHR_swapchain";

    fn gpu(&self) -> u32 {
        0
    }

    fn surface(&self) -> Option<MockSurface> {
        self.surface
    }

    fn queue_family_properties(&self) -> Vec<QueueFamilyInfo> {
        self.families.clone()
    }

    fn surface_support(&self, family_index: u32, _surface: MockSurface) -> bool {
        self.state().probed_families.push(family_index);
        self.present_support.get(family_index as usize).copied().unwrap_or(false)
    }

    fn create_device(&self, requests: &[QueueRequest], extensions: &[String]) -> NativeResult<MockDevice> {
        let mut state = self.state();
        state.check(FailPoint::Device).map_err(|_| NativeError::new(-7, "ERROR_EXTENSION_NOT_PRESENT"))?;
        state.device_requests = requests.to_vec();
        state.device_extensions = extensions.to_vec();
        let id = state.create(ObjectKind::Device, "create_device");
        Ok(MockDevice { id, state: Arc::clone(&self.state) })
    }

    fn create_allocator(&self, _device: &MockDevice) -> Result<MockAllocator, String> {
        let mut state = self.state();
        if state.check(FailPoint::Allocator).is_err() {
            return Err("mock allocator refused".to_string());
        }
        let id = state.create(ObjectKind::Allocator, "create_allocator");
        Ok(MockAllocator { id, allocations: 0 })
    }

    fn create_swapchain(
        &self,
        _device: &MockDevice,
        _surface: MockSurface,
        extent: Extent2D,
        _queues: &QueueSelection,
    ) -> NativeResult<(MockSwapchain, Extent2D)> {
        let mut state = self.state();
        state.check(FailPoint::Swapchain)?;
        state.swapchain_extents.push(extent);
        let id = state.create(ObjectKind::Swapchain, "create_swapchain");
        Ok((MockSwapchain { id, extent }, extent))
    }
}
