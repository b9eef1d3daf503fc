//! Scenewatch Engine
//!
//! The display-set matching and debounce core:
//! - **Presets:** named display sets mapped to OBS profile/scene targets,
//!   matched case-insensitively, order-independently, cardinality-exactly
//! - **Config:** TOML-backed store with validated hot reload that keeps the
//!   last good configuration on error
//! - **Debounce:** coalesces bursts of change events into one settle signal
//! - **Engine:** a single-task event loop tying sources to dispatch
//!
//! Platform adapters feed the engine through one channel and never touch
//! its state directly.

pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod displays;
pub mod engine;
pub mod preset;
pub mod sources;
pub mod watch;

pub use config::{Config, ConfigStore, SubscriptionId};
pub use debounce::DebounceTimer;
pub use dispatch::{
    Dispatch, DispatchRecord, ObsCommand, ObwsCliDispatcher, RecordingDispatch,
    DEFAULT_OBWS_PROGRAM,
};
pub use displays::{DisplaySet, DisplaySetTracker};
pub use engine::{EngineEvent, EngineState, WatcherEngine};
pub use sources::{
    detect_best_display_source, detect_best_lock_source, spawn_display_pump, spawn_lock_pump,
};
pub use watch::ConfigFileWatcher;
