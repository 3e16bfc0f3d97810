//! Unit tests for swapchain parameter selection
//!
//! Pure helpers only: no Vulkan device required.

use super::*;

fn surface_format(format: vk::Format) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR {
        format,
        color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
    }
}

fn capabilities(current: (u32, u32), min: (u32, u32), max: (u32, u32)) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: 2,
        max_image_count: 0,
        current_extent: vk::Extent2D { width: current.0, height: current.1 },
        min_image_extent: vk::Extent2D { width: min.0, height: min.1 },
        max_image_extent: vk::Extent2D { width: max.0, height: max.1 },
        ..Default::default()
    }
}

// ============================================================================
// SURFACE FORMAT
// ============================================================================

#[test]
fn test_prefers_srgb_format() {
    let formats = [
        surface_format(vk::Format::R8G8B8A8_UNORM),
        surface_format(vk::Format::B8G8R8A8_SRGB),
    ];
    assert_eq!(choose_surface_format(&formats).unwrap().format, vk::Format::B8G8R8A8_SRGB);

    let formats = [
        surface_format(vk::Format::A2B10G10R10_UNORM_PACK32),
        surface_format(vk::Format::R8G8B8A8_SRGB),
    ];
    assert_eq!(choose_surface_format(&formats).unwrap().format, vk::Format::R8G8B8A8_SRGB);
}

#[test]
fn test_falls_back_to_first_format() {
    let formats = [
        surface_format(vk::Format::R16G16B16A16_SFLOAT),
        surface_format(vk::Format::R8G8B8A8_UNORM),
    ];
    assert_eq!(choose_surface_format(&formats).unwrap().format, vk::Format::R16G16B16A16_SFLOAT);
    assert!(choose_surface_format(&[]).is_none());
}

// ============================================================================
// PRESENT MODE
// ============================================================================

#[test]
fn test_present_mode_is_fifo() {
    let modes = [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE];
    assert_eq!(choose_present_mode(&modes), vk::PresentModeKHR::FIFO);
    assert_eq!(choose_present_mode(&[vk::PresentModeKHR::MAILBOX]), vk::PresentModeKHR::MAILBOX);
    assert_eq!(choose_present_mode(&[]), vk::PresentModeKHR::FIFO);
}

// ============================================================================
// EXTENT & IMAGE COUNT
// ============================================================================

#[test]
fn test_extent_follows_surface_when_defined() {
    let caps = capabilities((1920, 1080), (1, 1), (4096, 4096));
    let extent = choose_extent(&caps, Extent2D::new(1280, 720)).unwrap();
    assert_eq!((extent.width, extent.height), (1920, 1080));
}

#[test]
fn test_extent_clamped_when_surface_leaves_it_open() {
    let caps = capabilities((u32::MAX, u32::MAX), (64, 64), (1024, 768));

    let extent = choose_extent(&caps, Extent2D::new(1280, 720)).unwrap();
    assert_eq!((extent.width, extent.height), (1024, 720));

    let extent = choose_extent(&caps, Extent2D::new(16, 16)).unwrap();
    assert_eq!((extent.width, extent.height), (64, 64));
}

#[test]
fn test_minimized_surface_has_no_extent() {
    // Minimized windows report a defined 0x0 current extent on some platforms
    let caps = capabilities((0, 0), (0, 0), (0, 0));
    assert!(choose_extent(&caps, Extent2D::new(1280, 720)).is_none());

    let caps = capabilities((1280, 0), (0, 0), (4096, 4096));
    assert!(choose_extent(&caps, Extent2D::new(1280, 720)).is_none());

    // Open extent clamped down to nothing
    let caps = capabilities((u32::MAX, u32::MAX), (0, 0), (0, 0));
    assert!(choose_extent(&caps, Extent2D::new(1280, 720)).is_none());
}

#[test]
fn test_image_count() {
    let mut caps = capabilities((800, 600), (1, 1), (800, 600));
    assert_eq!(choose_image_count(&caps), 3);

    caps.max_image_count = 2;
    assert_eq!(choose_image_count(&caps), 2);
}
