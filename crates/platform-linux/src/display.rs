//! DRM connector scanning via sysfs.
//!
//! Each connector appears as `/sys/class/drm/card<N>-<CONNECTOR>` with a
//! `status` file reading `connected` or `disconnected`. Scanning that tree
//! needs no privileges and no display-server connection.
//!
//! TODO(platform/linux): subscribe to the udev DRM socket instead of
//! rescanning, so changes surface without a polling cadence.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use scenewatch_common::error::WatchResult;
use scenewatch_platform_core::{DisplayEvent, DisplaySource};

const DRM_SYSFS_ROOT: &str = "/sys/class/drm";

/// Display source backed by the sysfs DRM connector tree.
///
/// `poll` diffs the current scan against the last seen one and reports each
/// connector change as a separate event.
pub struct DrmDisplaySource {
    root: PathBuf,
    last_seen: Option<BTreeSet<String>>,
    pending: Vec<DisplayEvent>,
}

impl DrmDisplaySource {
    pub fn new() -> Self {
        Self::with_root(DRM_SYSFS_ROOT)
    }

    /// Create a source scanning an alternate sysfs root (test hook).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last_seen: None,
            pending: Vec::new(),
        }
    }

    pub fn is_supported() -> bool {
        Path::new(DRM_SYSFS_ROOT).is_dir()
    }

    fn scan(&self) -> WatchResult<BTreeSet<String>> {
        let mut connected = BTreeSet::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(connector) = connector_name(&file_name.to_string_lossy()) else {
                continue;
            };

            // A connector directory without a readable status file is in
            // flux (mid-hotplug); treat it as disconnected this scan.
            match std::fs::read_to_string(entry.path().join("status")) {
                Ok(status) if status.trim() == "connected" => {
                    connected.insert(connector);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::trace!(connector = %connector, error = %e, "Unreadable connector status");
                }
            }
        }

        Ok(connected)
    }
}

impl Default for DrmDisplaySource {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySource for DrmDisplaySource {
    fn enumerate(&mut self) -> WatchResult<Vec<String>> {
        let connected = self.scan()?;
        self.last_seen = Some(connected.clone());
        Ok(connected.into_iter().collect())
    }

    fn poll(&mut self) -> WatchResult<Option<DisplayEvent>> {
        if !self.pending.is_empty() {
            return Ok(Some(self.pending.remove(0)));
        }

        let current = self.scan()?;
        let Some(last) = self.last_seen.as_ref() else {
            // First scan is the baseline, not a change.
            self.last_seen = Some(current);
            return Ok(None);
        };

        for added in current.difference(last) {
            self.pending.push(DisplayEvent::Added(added.clone()));
        }
        for removed in last.difference(&current) {
            self.pending.push(DisplayEvent::Removed(removed.clone()));
        }
        self.last_seen = Some(current);

        if self.pending.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.pending.remove(0)))
        }
    }

    fn name(&self) -> &str {
        "drm-sysfs"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

/// Extract the connector name from a sysfs entry name.
///
/// `card0-HDMI-A-1` → `HDMI-A-1`; bare devices (`card0`, `renderD128`)
/// yield `None`.
fn connector_name(entry: &str) -> Option<String> {
    let rest = entry.strip_prefix("card")?;
    let (index, connector) = rest.split_once('-')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if connector.is_empty() {
        return None;
    }
    Some(connector.to_string())
}
