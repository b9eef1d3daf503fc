//! Configuration file change watching.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use scenewatch_common::error::{WatchError, WatchResult};

use crate::engine::EngineEvent;

/// Watches the configuration file on disk and funnels changes into the
/// engine channel as [`EngineEvent::ConfigFileChanged`].
///
/// The parent directory is watched rather than the file itself: editors
/// that save via write-temp-then-rename replace the inode, which would
/// silently detach a file-level watch. Events for other paths in the
/// directory are filtered out, so unrelated filesystem activity never
/// reaches the engine.
///
/// Dropping the watcher releases the underlying OS watch; keep it alive for
/// as long as reloads should happen.
#[derive(Debug)]
pub struct ConfigFileWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigFileWatcher {
    pub fn new(config_path: &Path, events: UnboundedSender<EngineEvent>) -> WatchResult<Self> {
        let config_path = config_path.canonicalize().map_err(|e| {
            WatchError::watch(format!("cannot resolve {}: {e}", config_path.display()))
        })?;
        let watch_dir = config_path
            .parent()
            .ok_or_else(|| {
                WatchError::watch(format!(
                    "config path has no parent directory: {}",
                    config_path.display()
                ))
            })?
            .to_path_buf();

        let watched = config_path.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    // Renamed-into-place saves surface as creates.
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    if event.paths.iter().any(|p| p == &watched) {
                        // A send failure means the engine is gone; the
                        // watcher is about to be dropped with it.
                        let _ = events.send(EngineEvent::ConfigFileChanged);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Config watch error"),
            }
        })
        .map_err(|e| WatchError::watch(e.to_string()))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::watch(format!("cannot watch {}: {e}", watch_dir.display())))?;

        tracing::debug!(path = %config_path.display(), "Watching configuration file");
        Ok(Self { _watcher: watcher })
    }
}
