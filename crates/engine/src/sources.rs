//! Adapter pumps and source selection.
//!
//! Platform sources run on dedicated threads and funnel every event through
//! the engine's single channel. That channel is the one serialization
//! point: no adapter ever touches engine state directly, which keeps the
//! engine's single-threaded mutation model intact even with OS threads
//! underneath.

use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use scenewatch_platform_core::{DisplaySource, LockSource, StubDisplaySource, StubLockSource};

use crate::engine::EngineEvent;

/// Cadence for poll-based sources.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Pick the best display source for this system.
pub fn detect_best_display_source() -> Box<dyn DisplaySource> {
    #[cfg(target_os = "linux")]
    {
        use scenewatch_platform_linux::DrmDisplaySource;
        if DrmDisplaySource::is_supported() {
            tracing::info!("Using drm-sysfs display source");
            return Box::new(DrmDisplaySource::new());
        }
        tracing::warn!("/sys/class/drm not present, falling back to stub display source");
    }

    #[cfg(target_os = "windows")]
    {
        match scenewatch_platform_windows::create_display_source() {
            Ok(source) => return source,
            Err(e) => tracing::warn!(error = %e, "Windows display source unavailable"),
        }
    }

    #[cfg(target_os = "macos")]
    {
        match scenewatch_platform_macos::create_display_source() {
            Ok(source) => return source,
            Err(e) => tracing::warn!(error = %e, "macOS display source unavailable"),
        }
    }

    tracing::warn!("Using stub display source — display changes will not be detected");
    Box::new(StubDisplaySource::empty())
}

/// Pick the best screen-lock source for this system.
pub fn detect_best_lock_source() -> Box<dyn LockSource> {
    #[cfg(target_os = "macos")]
    {
        match scenewatch_platform_macos::create_lock_source() {
            Ok(source) => return source,
            Err(e) => tracing::debug!(error = %e, "macOS lock source unavailable"),
        }
    }

    tracing::debug!("Screen lock events are not supported on this platform");
    Box::new(StubLockSource)
}

/// Drive a display source on a dedicated thread, forwarding each event into
/// the engine channel. The thread exits when the engine side hangs up.
pub fn spawn_display_pump(
    mut source: Box<dyn DisplaySource>,
    events: UnboundedSender<EngineEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        tracing::debug!(source = source.name(), "Display pump started");
        loop {
            match source.poll() {
                Ok(Some(event)) => {
                    if events.send(EngineEvent::Display(event)).is_err() {
                        break;
                    }
                    // Drain pending events before sleeping again.
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "Display source poll failed")
                }
            }
            if events.is_closed() {
                break;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        tracing::debug!(source = source.name(), "Display pump stopped");
    })
}

/// Drive a lock source on a dedicated thread, forwarding each transition
/// into the engine channel.
pub fn spawn_lock_pump(
    mut source: Box<dyn LockSource>,
    events: UnboundedSender<EngineEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        tracing::debug!(source = source.name(), "Lock pump started");
        loop {
            match source.poll() {
                Ok(Some(event)) => {
                    if events.send(EngineEvent::Lock(event)).is_err() {
                        break;
                    }
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "Lock source poll failed")
                }
            }
            if events.is_closed() {
                break;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        tracing::debug!(source = source.name(), "Lock pump stopped");
    })
}
