//! The watcher engine: debounced display-set matching and action dispatch.

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time;

use scenewatch_platform_core::{DisplayEvent, LockEvent};

use crate::config::ConfigStore;
use crate::debounce::DebounceTimer;
use crate::dispatch::{Dispatch, ObsCommand};
use crate::displays::{DisplaySet, DisplaySetTracker};

/// Events funnelled into the engine's single serialization point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A display topology change from a platform source.
    Display(DisplayEvent),
    /// The configuration file changed on disk.
    ConfigFileChanged,
    /// A screen lock state transition.
    Lock(LockEvent),
    /// Stop the engine from any state.
    Shutdown,
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Waiting for display or configuration changes.
    Watching,
    /// Performing the dispatch side effect for a settled match.
    Applying,
    /// Terminal: no further events or timer firings are processed.
    Stopped,
}

/// Wires display-set changes and config changes to the debounce timer, and
/// the timer's settle signal to preset matching and action dispatch.
///
/// All state mutation happens inside [`run`](Self::run) on the calling
/// task; asynchronous sources (display pumps, the config file watcher,
/// signal handlers) only ever send [`EngineEvent`]s.
pub struct WatcherEngine {
    store: ConfigStore,
    tracker: DisplaySetTracker,
    debounce: DebounceTimer,
    dispatcher: Box<dyn Dispatch>,
    state: EngineState,
}

impl WatcherEngine {
    pub fn new(
        store: ConfigStore,
        dispatcher: Box<dyn Dispatch>,
        initial_displays: DisplaySet,
    ) -> Self {
        let debounce = DebounceTimer::new(store.current().grace_period());
        Self {
            store,
            tracker: DisplaySetTracker::new(initial_displays),
            debounce,
            dispatcher,
            state: EngineState::Watching,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run until shutdown or until every event sender hangs up.
    ///
    /// Every error encountered while running is logged and absorbed; the
    /// engine keeps watching with previously-known-good state.
    pub async fn run(mut self, mut events: UnboundedReceiver<EngineEvent>) -> EngineState {
        tracing::info!(displays = %self.tracker.current(), "Watching display configuration");

        // Match the startup configuration once it has been stable for one
        // grace period.
        self.debounce.restart();

        while self.state != EngineState::Stopped {
            let event = match self.debounce.deadline() {
                Some(deadline) => {
                    tokio::select! {
                        event = events.recv() => match event {
                            Some(event) => Some(event),
                            None => break,
                        },
                        _ = time::sleep_until(deadline) => None,
                    }
                }
                None => match events.recv().await {
                    Some(event) => Some(event),
                    None => break,
                },
            };

            match event {
                Some(event) => self.handle_event(event),
                None => {
                    self.debounce.fired();
                    self.apply_changes();
                }
            }
        }

        self.state = EngineState::Stopped;
        tracing::info!("Watcher engine stopped");
        self.state
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Display(change) => {
                self.note_display_change(change);
                self.debounce.restart();
            }
            EngineEvent::ConfigFileChanged => {
                // A changed grace period or preset table must re-arm
                // matching against the current display set.
                if self.store.reload() {
                    self.debounce.set_duration(self.store.current().grace_period());
                    self.debounce.restart();
                }
            }
            EngineEvent::Lock(LockEvent::Locked) => {
                tracing::info!("Screen locked, pausing recording");
                self.dispatch(ObsCommand::PauseRecord);
            }
            EngineEvent::Lock(LockEvent::Unlocked) => {
                tracing::info!("Screen unlocked, resuming recording");
                self.dispatch(ObsCommand::ResumeRecord);
            }
            EngineEvent::Shutdown => {
                tracing::info!("Shutdown requested");
                self.state = EngineState::Stopped;
            }
        }
    }

    fn note_display_change(&mut self, change: DisplayEvent) {
        match change {
            DisplayEvent::Added(id) => {
                let new = self.tracker.note_added(id.clone());
                if new {
                    tracing::info!(display = %id, "Display added");
                } else {
                    tracing::debug!(display = %id, "Display added (already known)");
                }
            }
            DisplayEvent::Removed(id) => {
                let known = self.tracker.note_removed(&id);
                if known {
                    tracing::info!(display = %id, "Display removed");
                } else {
                    tracing::debug!(display = %id, "Display removed (not known)");
                }
            }
            DisplayEvent::Replaced(ids) => {
                let changed = self.tracker.replace(ids.into_iter().collect());
                tracing::info!(
                    displays = %self.tracker.current(),
                    changed,
                    "Display set replaced"
                );
            }
        }
    }

    /// The display set has been stable for a full grace period: match it
    /// and act only on an unambiguous result.
    fn apply_changes(&mut self) {
        tracing::debug!("Display set settled, applying changes");
        let current = self.tracker.current();

        let command = {
            let matches = self.store.current().presets().matching(&current);
            match matches.as_slice() {
                [] => {
                    tracing::warn!(displays = %current, "No preset found");
                    None
                }
                [preset] => {
                    tracing::debug!(
                        preset = %preset.name,
                        profile = %preset.profile_name,
                        scene_collection = %preset.scene_collection_name,
                        "Applying preset"
                    );
                    Some(ObsCommand::SwitchProfileAndSceneCollection {
                        profile: preset.profile_name.clone(),
                        scene_collection: preset.scene_collection_name.clone(),
                    })
                }
                ambiguous => {
                    let names: Vec<&str> =
                        ambiguous.iter().map(|p| p.name.as_str()).collect();
                    tracing::warn!(
                        displays = %current,
                        presets = ?names,
                        "Multiple presets found"
                    );
                    None
                }
            }
        };

        let Some(command) = command else { return };
        self.state = EngineState::Applying;
        self.dispatch(command);
        self.state = EngineState::Watching;
    }

    fn dispatch(&mut self, command: ObsCommand) {
        let obws_config = self.store.current().obws_config().to_path_buf();
        // Failures are logged and swallowed: the engine does not retry, it
        // waits for the next settle cycle.
        if let Err(e) = self.dispatcher.dispatch(&obws_config, &command) {
            tracing::error!(command = %command, error = %e, "Dispatch failed");
        }
    }
}
