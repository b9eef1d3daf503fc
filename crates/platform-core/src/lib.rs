//! Scenewatch platform core contracts.
//!
//! This crate contains the cross-platform source traits and event types the
//! watcher engine consumes, without coupling to a concrete OS backend. Each
//! platform crate implements these contracts; the engine never branches on
//! the platform itself.

use serde::{Deserialize, Serialize};

use scenewatch_common::error::WatchResult;

/// A change in the set of connected displays, as reported by a platform
/// source.
///
/// Sources that only see "something changed" (no deltas) re-enumerate and
/// report `Replaced`; sources with per-connector events report `Added` /
/// `Removed`. Duplicate reports for the same physical change are allowed —
/// consumers treat them idempotently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayEvent {
    /// A display identified by this connector name was attached.
    Added(String),
    /// A display identified by this connector name was detached.
    Removed(String),
    /// The full authoritative display set, from a fresh enumeration.
    Replaced(Vec<String>),
}

/// A screen lock state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockEvent {
    Locked,
    Unlocked,
}

/// Trait for display topology sources.
///
/// `poll` is non-blocking from the caller's perspective: it returns the next
/// pending event if one is available and `None` otherwise. The caller owns
/// the polling cadence.
pub trait DisplaySource: Send {
    /// Enumerate the currently connected displays (authoritative full set).
    fn enumerate(&mut self) -> WatchResult<Vec<String>>;

    /// Poll for the next topology change. Returns `None` if nothing changed.
    fn poll(&mut self) -> WatchResult<Option<DisplayEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if the source is usable on this system.
    fn is_available(&self) -> bool;
}

/// Trait for screen lock/unlock sources.
pub trait LockSource: Send {
    /// Poll for the next lock state transition. Returns `None` if the state
    /// is unchanged.
    fn poll(&mut self) -> WatchResult<Option<LockEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if the source is usable on this system.
    fn is_available(&self) -> bool;
}

/// Stub display source — reports a fixed set once and never changes.
///
/// Used on platforms without a real source and in tests.
pub struct StubDisplaySource {
    displays: Vec<String>,
    pending: Vec<DisplayEvent>,
}

impl StubDisplaySource {
    /// Create a stub reporting the given display set.
    pub fn new(displays: Vec<String>) -> Self {
        Self {
            displays,
            pending: Vec::new(),
        }
    }

    /// Create an empty stub that reports no displays.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Queue an event for the next `poll` call (test hook).
    pub fn push_event(&mut self, event: DisplayEvent) {
        self.pending.push(event);
    }
}

impl DisplaySource for StubDisplaySource {
    fn enumerate(&mut self) -> WatchResult<Vec<String>> {
        Ok(self.displays.clone())
    }

    fn poll(&mut self) -> WatchResult<Option<DisplayEvent>> {
        if self.pending.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.pending.remove(0)))
        }
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Stub lock source — never reports a transition.
pub struct StubLockSource;

impl LockSource for StubLockSource {
    fn poll(&mut self) -> WatchResult<Option<LockEvent>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Display server / platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayServer {
    Wayland,
    X11,
    Windows,
    MacOS,
    #[default]
    Unknown,
}

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    if cfg!(target_os = "windows") {
        DisplayServer::Windows
    } else if cfg!(target_os = "macos") {
        DisplayServer::MacOS
    } else if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}
