//! Windows platform scaffolding.
//!
//! This crate intentionally ships compile-safe placeholders so the watcher
//! engine can depend on stable interfaces before full implementation.

use scenewatch_common::error::{WatchError, WatchResult};
use scenewatch_platform_core::DisplaySource;

/// Create the Windows display source.
///
/// TODO(platform/windows): hidden message-only window receiving
/// WM_DISPLAYCHANGE, re-enumerating via EnumDisplayDevices.
pub fn create_display_source() -> WatchResult<Box<dyn DisplaySource>> {
    Err(WatchError::platform(
        "Windows display change detection is not implemented yet",
    ))
}

/// Placeholder for future display-change notification capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayChangeSupport {
    pub available: bool,
}

/// Probe whether display-change notifications are available.
pub fn probe_display_change_support() -> DisplayChangeSupport {
    DisplayChangeSupport { available: false }
}
