/// Queue module - queue family discovery and selection

pub mod queue_selector;

pub use queue_selector::*;
