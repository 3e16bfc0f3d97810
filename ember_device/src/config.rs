/// Device configuration - plain values passed in by the caller

use std::collections::HashSet;
use crate::error::{Error, Result};

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero (e.g. a minimized window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Extent2D {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Device creation options
///
/// # Example
///
/// ```
/// use ember_device::ember::{DeviceConfig, Extent2D};
///
/// let config = DeviceConfig::default()
///     .with_present(true)
///     .with_extent(Extent2D::new(1920, 1080));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Create a presentation queue and swapchain (requires a surface)
    pub present: bool,

    /// Required device extension names
    pub extensions: Vec<String>,

    /// Requested swapchain extent
    pub extent: Extent2D,

    /// Priority given to every requested queue, in [0, 1]
    pub queue_priority: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            present: false,
            extensions: Vec::new(),
            extent: Extent2D::default(),
            queue_priority: 0.0,
        }
    }
}

impl DeviceConfig {
    pub fn with_present(mut self, present: bool) -> Self {
        self.present = present;
        self
    }

    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    pub fn with_extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_extent(mut self, extent: Extent2D) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_queue_priority(mut self, priority: f32) -> Self {
        self.queue_priority = priority;
        self
    }

    /// Check the configuration before any driver call is made
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - the queue priority is outside [0, 1] (or NaN)
    /// - presentation is requested with a zero-sized extent
    /// - an extension name is empty or listed twice
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.queue_priority) {
            return Err(Error::InvalidConfig(format!(
                "queue priority {} is outside [0, 1]",
                self.queue_priority
            )));
        }

        if self.present && self.extent.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "swapchain extent {}x{} is empty",
                self.extent.width, self.extent.height
            )));
        }

        let mut seen = HashSet::new();
        for name in &self.extensions {
            if name.is_empty() {
                return Err(Error::InvalidConfig("empty device extension name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidConfig(format!("device extension {} listed twice", name)));
            }
        }

        Ok(())
    }

    /// Extension list actually requested from the driver
    ///
    /// Appends `present_extension` when presentation is requested and the caller
    /// did not list it.
    pub fn resolved_extensions(&self, present_extension: &str) -> Vec<String> {
        let mut extensions = self.extensions.clone();
        if self.present && !extensions.iter().any(|name| name == present_extension) {
            extensions.push(present_extension.to_string());
        }
        extensions
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
