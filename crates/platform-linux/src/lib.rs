//! Scenewatch Linux Platform Integration
//!
//! Display topology detection for Linux. Hotplug lands in the kernel's DRM
//! subsystem regardless of display server, so the connector status files
//! under `/sys/class/drm` are the one place that reflects the physical
//! display set on both Wayland and X11.

pub mod display;

pub use display::*;
