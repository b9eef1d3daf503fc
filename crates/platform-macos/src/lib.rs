//! macOS platform scaffolding.
//!
//! This crate provides compile-safe placeholders for the Quartz display and
//! distributed-notification integrations planned for later milestones.

use scenewatch_common::error::{WatchError, WatchResult};
use scenewatch_platform_core::{DisplaySource, LockSource};

/// Create the macOS display source.
///
/// TODO(platform/macos): CGDisplayRegisterReconfigurationCallback with
/// CGGetActiveDisplayList enumeration.
pub fn create_display_source() -> WatchResult<Box<dyn DisplaySource>> {
    Err(WatchError::platform(
        "macOS display change detection is not implemented yet",
    ))
}

/// Create the macOS screen-lock source.
///
/// TODO(platform/macos): NSDistributedNotificationCenter observers for
/// com.apple.screenIsLocked / com.apple.screenIsUnlocked.
pub fn create_lock_source() -> WatchResult<Box<dyn LockSource>> {
    Err(WatchError::platform(
        "macOS screen lock detection is not implemented yet",
    ))
}

/// Placeholder for future display reconfiguration capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayReconfigurationSupport {
    pub available: bool,
}

/// Probe whether display reconfiguration callbacks are available.
pub fn probe_display_reconfiguration_support() -> DisplayReconfigurationSupport {
    DisplayReconfigurationSupport { available: false }
}
