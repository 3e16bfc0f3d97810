//! Ember demo - brings a presenting device up on a window, runs a few frames
//! of per-frame resources through the graphics queue, tears everything down.

use std::error::Error as StdError;
use ash::vk;
use ember_device::ember::{DeviceConfig, Extent2D};
use ember_device::{ember_error, ember_info};
use ember_device_vulkan::{SurfaceBinding, VulkanDevice, VulkanInstance};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

const SOURCE: &str = "ember::demo";
const FRAMES_IN_FLIGHT: usize = 2;
const FRAME_COUNT: usize = 8;

type DemoResult<T> = std::result::Result<T, Box<dyn StdError>>;

fn main() -> DemoResult<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::default();
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[derive(Default)]
struct App {
    window: Option<Window>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Ember Device Demo")
            .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(e) => {
                ember_error!(SOURCE, "Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = run(&window) {
            ember_error!(SOURCE, "Demo failed: {}", e);
        }

        self.window = Some(window);
        event_loop.exit();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }
}

/// Instance and surface bootstrap; both outlive the device created from them
fn run(window: &Window) -> DemoResult<()> {
    let entry = unsafe { ash::Entry::load()? };
    let display = window.display_handle()?.as_raw();
    let handle = window.window_handle()?.as_raw();

    let app_info = vk::ApplicationInfo::default()
        .application_name(c"ember_demo")
        .engine_name(c"ember")
        .api_version(vk::API_VERSION_1_2);
    let extensions = ash_window::enumerate_required_extensions(display)?;
    let create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(extensions);
    let instance = unsafe { entry.create_instance(&create_info, None)? };

    let result = with_instance(&entry, &instance, window, display, handle);

    unsafe { instance.destroy_instance(None) };
    result
}

fn with_instance(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window: &Window,
    display: raw_window_handle::RawDisplayHandle,
    handle: raw_window_handle::RawWindowHandle,
) -> DemoResult<()> {
    let surface = unsafe { ash_window::create_surface(entry, instance, display, handle, None)? };
    let loader = ash::khr::surface::Instance::new(entry, instance);

    let binding = SurfaceBinding { loader: loader.clone(), surface };
    let result = with_surface(instance, window, &binding);

    unsafe { loader.destroy_surface(surface, None) };
    result
}

fn with_surface(instance: &ash::Instance, window: &Window, surface: &SurfaceBinding) -> DemoResult<()> {
    let gpu = unsafe { instance.enumerate_physical_devices()? }
        .into_iter()
        .next()
        .ok_or("no Vulkan physical device available")?;

    let size = window.inner_size();
    let config = DeviceConfig::default()
        .with_present(true)
        .with_extent(Extent2D::new(size.width, size.height));

    let vulkan = VulkanInstance::new(instance, gpu, Some(surface));
    let mut device = VulkanDevice::create(&vulkan, &config)?;

    if let Some(swapchain) = device.swapchain() {
        ember_info!(
            SOURCE,
            "Swapchain {}x{} with {} images",
            swapchain.extent().width,
            swapchain.extent().height,
            swapchain.handle().images().len()
        );
    }

    let mut result = run_frames(&mut device);

    // Same path a resize event takes
    if result.is_ok() {
        let size = window.inner_size();
        result = device
            .recreate_swapchain(Extent2D::new(size.width, size.height))
            .map_err(Into::into);
    }

    device.destroy();
    result
}

/// Cycle in-flight frame slots: acquire, submit an empty command buffer, wait, release
fn run_frames(device: &mut VulkanDevice<'_>) -> DemoResult<()> {
    let mut slots = Vec::with_capacity(FRAMES_IN_FLIGHT);
    for _ in 0..FRAMES_IN_FLIGHT {
        slots.push(device.create_rendering_resource()?);
    }

    for frame in 0..FRAME_COUNT {
        let slot = &slots[frame % FRAMES_IN_FLIGHT];
        let raw = device.logical_device().raw();
        let command_buffers = [slot.command_buffer()];

        unsafe {
            if frame >= FRAMES_IN_FLIGHT {
                raw.wait_for_fences(&[slot.fence()], true, u64::MAX)?;
                raw.reset_fences(&[slot.fence()])?;
            }
            raw.begin_command_buffer(
                slot.command_buffer(),
                &vk::CommandBufferBeginInfo::default().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT),
            )?;
            raw.end_command_buffer(slot.command_buffer())?;

            let submit = vk::SubmitInfo::default().command_buffers(&command_buffers);
            raw.queue_submit(device.graphics_queue().handle, &[submit], slot.fence())?;
        }
    }

    device.wait_idle()?;
    for slot in slots {
        device.destroy_rendering_resource(slot);
    }

    ember_info!(SOURCE, "{} frames submitted across {} slots", FRAME_COUNT, FRAMES_IN_FLIGHT);
    Ok(())
}
