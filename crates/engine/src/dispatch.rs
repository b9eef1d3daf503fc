//! External action dispatch via the obws command-line tool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use scenewatch_common::error::{WatchError, WatchResult};

/// Default name of the external obws CLI binary, resolved via PATH.
pub const DEFAULT_OBWS_PROGRAM: &str = "obws-cmd";

/// A command for the external OBS websocket CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObsCommand {
    SwitchProfileAndSceneCollection {
        profile: String,
        scene_collection: String,
    },
    PauseRecord,
    ResumeRecord,
}

impl ObsCommand {
    /// The CLI subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SwitchProfileAndSceneCollection { .. } => "switch-profile-and-scene-collection",
            Self::PauseRecord => "pause-record",
            Self::ResumeRecord => "resume-record",
        }
    }

    /// Positional arguments following the subcommand name.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Self::SwitchProfileAndSceneCollection {
                profile,
                scene_collection,
            } => vec![profile.as_str(), scene_collection.as_str()],
            Self::PauseRecord | Self::ResumeRecord => Vec::new(),
        }
    }
}

impl fmt::Display for ObsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Trait for action dispatchers.
///
/// Dispatch is synchronous from the engine's viewpoint: it completes,
/// successfully or not, before the next queued event is processed. The
/// engine never retries a failed dispatch — it logs and waits for the next
/// settle cycle.
pub trait Dispatch: Send {
    fn dispatch(&mut self, obws_config: &Path, command: &ObsCommand) -> WatchResult<()>;
}

/// Dispatcher that spawns the external obws CLI and waits for it to exit.
pub struct ObwsCliDispatcher {
    program: PathBuf,
    dry_run: bool,
}

impl ObwsCliDispatcher {
    pub fn new(program: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            program: program.into(),
            dry_run,
        }
    }
}

impl Dispatch for ObwsCliDispatcher {
    fn dispatch(&mut self, obws_config: &Path, command: &ObsCommand) -> WatchResult<()> {
        tracing::debug!(command = %command, "Running obws command");

        if self.dry_run {
            tracing::debug!("Dry run, skipping");
            return Ok(());
        }

        let status = Command::new(&self.program)
            .arg("--config")
            .arg(obws_config)
            .arg(command.name())
            .args(command.args())
            .status()
            .map_err(|e| {
                WatchError::dispatch(format!(
                    "failed to spawn {}: {e}",
                    self.program.display()
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(WatchError::dispatch(format!(
                "{} {} exited with {status}",
                self.program.display(),
                command.name()
            )))
        }
    }
}

/// One dispatched command, as seen by [`RecordingDispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub obws_config: PathBuf,
    pub command: ObsCommand,
    pub at: tokio::time::Instant,
}

/// Recording dispatcher for tests — stores every dispatched command and can
/// be told to fail.
#[derive(Clone, Default)]
pub struct RecordingDispatch {
    calls: Arc<Mutex<Vec<DispatchRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DispatchRecord> {
        self.calls.lock().unwrap().clone()
    }

    /// Make every subsequent dispatch fail with the given message
    /// (or succeed again when `None`).
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&mut self, obws_config: &Path, command: &ObsCommand) -> WatchResult<()> {
        self.calls.lock().unwrap().push(DispatchRecord {
            obws_config: obws_config.to_path_buf(),
            command: command.clone(),
            at: tokio::time::Instant::now(),
        });

        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(WatchError::dispatch(message)),
            None => Ok(()),
        }
    }
}
