//! Unit tests for config.rs

use crate::config::{DeviceConfig, Extent2D};
use crate::error::Error;

// ============================================================================
// DEFAULTS
// ============================================================================

#[test]
fn test_default_config() {
    let config = DeviceConfig::default();
    assert!(!config.present);
    assert!(config.extensions.is_empty());
    assert_eq!(config.extent, Extent2D::new(1280, 720));
    assert_eq!(config.queue_priority, 0.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_extent_is_empty() {
    assert!(Extent2D::new(0, 720).is_empty());
    assert!(Extent2D::new(1280, 0).is_empty());
    assert!(!Extent2D::new(1, 1).is_empty());
}

// ============================================================================
// BUILDER
// ============================================================================

#[test]
fn test_builder_methods() {
    let config = DeviceConfig::default()
        .with_present(true)
        .with_extension("VK_KHR_swapchain")
        .with_extensions(["VK_KHR_maintenance1", "VK_EXT_memory_budget"])
        .with_extent(Extent2D::new(800, 600))
        .with_queue_priority(1.0);

    assert!(config.present);
    assert_eq!(config.extensions.len(), 3);
    assert_eq!(config.extent, Extent2D::new(800, 600));
    assert_eq!(config.queue_priority, 1.0);
    assert!(config.validate().is_ok());
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_validate_rejects_priority_out_of_range() {
    for priority in [-0.1, 1.5, f32::NAN] {
        let config = DeviceConfig::default().with_queue_priority(priority);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}

#[test]
fn test_validate_rejects_empty_extent_only_when_presenting() {
    let headless = DeviceConfig::default().with_extent(Extent2D::new(0, 0));
    assert!(headless.validate().is_ok());

    let presenting = headless.with_present(true);
    assert!(matches!(presenting.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_bad_extension_names() {
    let empty = DeviceConfig::default().with_extension("");
    assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));

    let duplicated = DeviceConfig::default()
        .with_extension("VK_KHR_swapchain")
        .with_extension("VK_KHR_swapchain");
    assert!(matches!(duplicated.validate(), Err(Error::InvalidConfig(_))));
}

// ============================================================================
// EXTENSION RESOLUTION
// ============================================================================

#[test]
fn test_resolved_extensions_appends_present_extension() {
    let config = DeviceConfig::default().with_present(true);
    assert_eq!(config.resolved_extensions("VK_KHR_swapchain"), vec!["VK_KHR_swapchain".to_string()]);
}

#[test]
fn test_resolved_extensions_does_not_duplicate() {
    let config = DeviceConfig::default()
        .with_present(true)
        .with_extension("VK_KHR_swapchain");
    assert_eq!(config.resolved_extensions("VK_KHR_swapchain").len(), 1);
}

#[test]
fn test_resolved_extensions_headless_untouched() {
    let config = DeviceConfig::default().with_extension("VK_KHR_maintenance1");
    assert_eq!(
        config.resolved_extensions("VK_KHR_swapchain"),
        vec!["VK_KHR_maintenance1".to_string()]
    );
}
