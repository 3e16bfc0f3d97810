//! Unit tests for the Vulkan collaborator's conversions
//!
//! No Vulkan instance required.

use super::*;

#[test]
fn test_native_error_keeps_code_and_name() {
    let error = native_error(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
    assert_eq!(error.code, -2);
    assert_eq!(error.name, "ERROR_OUT_OF_DEVICE_MEMORY");
    assert_eq!(error.to_string(), "ERROR_OUT_OF_DEVICE_MEMORY (-2)");
}

#[test]
fn test_present_extension_matches_ash() {
    assert_eq!(
        Some(VulkanInstance::PRESENT_EXTENSION),
        ash::khr::swapchain::NAME.to_str().ok()
    );
}

#[test]
fn test_queue_capabilities_match_vulkan_bits() {
    let pairs = [
        (vk::QueueFlags::GRAPHICS, QueueCapabilities::GRAPHICS),
        (vk::QueueFlags::COMPUTE, QueueCapabilities::COMPUTE),
        (vk::QueueFlags::TRANSFER, QueueCapabilities::TRANSFER),
        (vk::QueueFlags::SPARSE_BINDING, QueueCapabilities::SPARSE_BINDING),
        (vk::QueueFlags::PROTECTED, QueueCapabilities::PROTECTED),
    ];

    for (vk_flag, capability) in pairs {
        assert_eq!(QueueCapabilities::from_bits_truncate(vk_flag.as_raw()), capability);
    }

    let mixed = vk::QueueFlags::GRAPHICS | vk::QueueFlags::VIDEO_DECODE_KHR;
    assert_eq!(QueueCapabilities::from_bits_truncate(mixed.as_raw()), QueueCapabilities::GRAPHICS);
}
