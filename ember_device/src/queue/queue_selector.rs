/// QueueSelector - picks the graphics and present queue families

use bitflags::bitflags;
use crate::error::{Error, Result};
use crate::{ember_debug, ember_err, ember_trace};

bitflags! {
    /// Capabilities of a queue family
    ///
    /// Bit values match `VkQueueFlagBits`, so driver flags convert with
    /// `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QueueCapabilities: u32 {
        const GRAPHICS = 0x1;
        const COMPUTE = 0x2;
        const TRANSFER = 0x4;
        const SPARSE_BINDING = 0x8;
        const PROTECTED = 0x10;
    }
}

/// Backend-neutral queue family properties, in driver index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyInfo {
    pub capabilities: QueueCapabilities,
    pub queue_count: u32,
}

impl QueueFamilyInfo {
    pub const fn new(capabilities: QueueCapabilities, queue_count: u32) -> Self {
        Self { capabilities, queue_count }
    }

    fn is_usable(&self) -> bool {
        self.queue_count > 0
    }
}

/// A chosen queue family and what it was chosen for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilySelection {
    pub family_index: u32,
    pub supports_graphics: bool,
    pub supports_present: bool,
}

/// One queue-create request per distinct family
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    pub family_index: u32,
    pub count: u32,
    pub priorities: Vec<f32>,
}

impl QueueRequest {
    /// Request a single queue with the given priority
    pub fn single(family_index: u32, priority: f32) -> Self {
        Self {
            family_index,
            count: 1,
            priorities: vec![priority],
        }
    }
}

/// A retrieved queue: family index plus the native handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueHandle<Q> {
    pub family_index: u32,
    pub handle: Q,
}

/// Outcome of queue selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSelection {
    pub graphics: QueueFamilySelection,
    pub present: Option<QueueFamilySelection>,
}

impl QueueSelection {
    pub fn graphics_family(&self) -> u32 {
        self.graphics.family_index
    }

    pub fn present_family(&self) -> Option<u32> {
        self.present.map(|p| p.family_index)
    }

    /// True when a present family exists and differs from the graphics family
    pub fn has_separate_present_family(&self) -> bool {
        self.present_family()
            .is_some_and(|index| index != self.graphics.family_index)
    }

    /// Distinct family indices in request order (graphics first)
    pub fn distinct_families(&self) -> Vec<u32> {
        let mut families = vec![self.graphics.family_index];
        if let Some(present) = self.present_family() {
            if present != self.graphics.family_index {
                families.push(present);
            }
        }
        families
    }

    /// Queue-create requests, one per distinct family
    pub fn queue_requests(&self, priority: f32) -> Vec<QueueRequest> {
        self.distinct_families()
            .into_iter()
            .map(|family_index| QueueRequest::single(family_index, priority))
            .collect()
    }
}

/// How presentation support is determined during selection
pub enum PresentProbe<'a> {
    /// Presentation was not requested
    NotRequested,

    /// Presentation was requested but no surface exists to probe against
    Unavailable,

    /// Surface-support query for a family index
    Probe(&'a mut dyn FnMut(u32) -> bool),
}

/// Queue family selection policy
///
/// Graphics: first family (in index order) with the graphics capability.
/// Present: the graphics family when it can present, otherwise the first
/// present-capable family. Presentation is never assumed without a probe.
pub struct QueueSelector;

impl QueueSelector {
    /// Select graphics and (optionally) present families
    ///
    /// # Errors
    ///
    /// - `NoGraphicsQueue` if no usable family supports graphics
    /// - `NoPresentQueue` if presentation was requested and no family passes the
    ///   probe, or there is nothing to probe against
    pub fn select(families: &[QueueFamilyInfo], present: PresentProbe<'_>) -> Result<QueueSelection> {
        let graphics_index = Self::first_graphics_family(families)
            .ok_or_else(|| ember_err!("ember::QueueSelector", Error::NoGraphicsQueue))?;

        let mut graphics = QueueFamilySelection {
            family_index: graphics_index,
            supports_graphics: true,
            supports_present: false,
        };

        let present = match present {
            PresentProbe::NotRequested => None,
            PresentProbe::Unavailable => {
                return Err(ember_err!("ember::QueueSelector", Error::NoPresentQueue));
            }
            PresentProbe::Probe(probe) => {
                let index = Self::present_family(families, graphics_index, probe)
                    .ok_or_else(|| ember_err!("ember::QueueSelector", Error::NoPresentQueue))?;
                if index == graphics_index {
                    graphics.supports_present = true;
                }
                Some(QueueFamilySelection {
                    family_index: index,
                    supports_graphics: families[index as usize]
                        .capabilities
                        .contains(QueueCapabilities::GRAPHICS),
                    supports_present: true,
                })
            }
        };

        let selection = QueueSelection { graphics, present };
        ember_debug!(
            "ember::QueueSelector",
            "Selected graphics family {}, present family {:?}",
            selection.graphics_family(),
            selection.present_family()
        );
        Ok(selection)
    }

    /// Lowest-index usable family with the graphics capability
    pub fn first_graphics_family(families: &[QueueFamilyInfo]) -> Option<u32> {
        families
            .iter()
            .enumerate()
            .find(|(_, family)| family.is_usable() && family.capabilities.contains(QueueCapabilities::GRAPHICS))
            .map(|(index, _)| index as u32)
    }

    fn present_family(
        families: &[QueueFamilyInfo],
        graphics_index: u32,
        probe: &mut dyn FnMut(u32) -> bool,
    ) -> Option<u32> {
        if probe(graphics_index) {
            return Some(graphics_index);
        }

        (0..families.len() as u32)
            .filter(|&index| index != graphics_index && families[index as usize].is_usable())
            .find(|&index| {
                let supported = probe(index);
                ember_trace!("ember::QueueSelector", "Family {} present support: {}", index, supported);
                supported
            })
    }
}

#[cfg(test)]
#[path = "queue_selector_tests.rs"]
mod tests;
