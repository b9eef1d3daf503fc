//! Configuration loading, validation, and hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use scenewatch_common::error::{WatchError, WatchResult};

use crate::preset::{Preset, PresetTable};

/// Raw on-disk schema. Parsed first, validated into [`Config`] second.
#[derive(Debug, Deserialize)]
struct RawConfig {
    obws: RawObws,
    settings: RawSettings,
    #[serde(default)]
    presets: toml::Table,
}

#[derive(Debug, Deserialize)]
struct RawObws {
    config: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    grace_period: i64,
}

#[derive(Debug, Deserialize)]
struct RawPreset {
    displays: Vec<String>,
    profile: String,
    scene_collection: String,
}

/// A validated configuration snapshot.
///
/// Replaced wholesale on reload, never mutated field by field.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    obws_config: PathBuf,
    grace_period: Duration,
    presets: PresetTable,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: impl Into<PathBuf>) -> WatchResult<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WatchError::FileNotFound { path: path.clone() }
            } else {
                e.into()
            }
        })?;

        let raw: RawConfig = toml::from_str(&contents)
            .map_err(|e| WatchError::parse(format!("{}: {e}", path.display())))?;

        Self::from_raw(path, raw)
    }

    fn from_raw(path: PathBuf, raw: RawConfig) -> WatchResult<Self> {
        if raw.settings.grace_period <= 0 {
            return Err(WatchError::validation(format!(
                "grace_period must be a positive number of seconds, got {}",
                raw.settings.grace_period
            )));
        }

        if !raw.obws.config.is_file() {
            return Err(WatchError::validation(format!(
                "obws config not found: {}",
                raw.obws.config.display()
            )));
        }

        // Table order is file order, which keeps validation errors
        // deterministic across loads of the same file.
        let mut presets = Vec::with_capacity(raw.presets.len());
        for (name, value) in raw.presets {
            let raw_preset: RawPreset = value
                .try_into()
                .map_err(|e| WatchError::parse(format!("preset \"{name}\": {e}")))?;
            presets.push(Preset {
                name,
                displays: raw_preset.displays,
                profile_name: raw_preset.profile,
                scene_collection_name: raw_preset.scene_collection,
            });
        }

        Ok(Self {
            path,
            obws_config: raw.obws.config,
            grace_period: Duration::from_secs(raw.settings.grace_period as u64),
            presets: PresetTable::new(presets)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn obws_config(&self) -> &Path {
        &self.obws_config
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Structural equality for change detection. The config path is
    /// excluded and the preset table is compared unordered, so reloading a
    /// file that was only reformatted or reordered compares equal.
    pub fn same_effective(&self, other: &Config) -> bool {
        self.obws_config == other.obws_config
            && self.grace_period == other.grace_period
            && self.presets.same_presets(&other.presets)
    }
}

/// Identifies a subscription for later removal.
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Config) + Send>;

/// Owns the current [`Config`] and notifies subscribers of changes.
pub struct ConfigStore {
    current: Config,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl ConfigStore {
    /// Load the initial configuration. Failure here is fatal to startup:
    /// there is no previously valid state to fall back to.
    pub fn open(path: impl Into<PathBuf>) -> WatchResult<Self> {
        Ok(Self {
            current: Config::load(path)?,
            listeners: Vec::new(),
            next_id: 0,
        })
    }

    pub fn current(&self) -> &Config {
        &self.current
    }

    /// Register a listener invoked synchronously, in subscription order,
    /// after each effective configuration change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Config) + Send + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unsubscribing an id that is not present is a
    /// no-op, so teardown races stay quiet.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Attempt to reload the backing file.
    ///
    /// Any load error keeps the previous configuration authoritative and is
    /// logged, never propagated: a transient bad edit must not take the
    /// watcher down. Returns true iff an effectively different
    /// configuration was swapped in (and listeners were notified).
    pub fn reload(&mut self) -> bool {
        let new_config = match Config::load(self.current.path()) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = %self.current.path().display(),
                    error = %e,
                    "Config reload failed, keeping previous configuration"
                );
                return false;
            }
        };

        if self.current.same_effective(&new_config) {
            tracing::debug!(
                path = %self.current.path().display(),
                "Config file rewritten without effective changes"
            );
            return false;
        }

        tracing::info!(
            path = %self.current.path().display(),
            presets = new_config.presets().len(),
            grace_period_secs = new_config.grace_period().as_secs(),
            "Configuration changed"
        );
        self.current = new_config;

        for (_, listener) in &mut self.listeners {
            listener(&self.current);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn write_obws_config(dir: &Path) -> PathBuf {
        let path = dir.join("obws.toml");
        std::fs::write(&path, "# obws settings\n").unwrap();
        path
    }

    fn config_toml(obws: &Path, grace_period: i64, presets: &str) -> String {
        format!(
            "[obws]\nconfig = {:?}\n\n[settings]\ngrace_period = {grace_period}\n{presets}",
            obws.display().to_string()
        )
    }

    const HOME_AWAY: &str = "\n[presets.Home]\ndisplays = [\"eDP-1\", \"HDMI-1\"]\nprofile = \"HomeProfile\"\nscene_collection = \"HomeScenes\"\n\n[presets.Away]\ndisplays = [\"eDP-1\"]\nprofile = \"AwayProfile\"\nscene_collection = \"AwayScenes\"\n";

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_parses_presets_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let path = write_config(dir.path(), &config_toml(&obws, 2, HOME_AWAY));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.grace_period(), Duration::from_secs(2));
        assert_eq!(config.obws_config(), obws);

        let names: Vec<_> = config.presets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Away"]);
    }

    #[test]
    fn load_rejects_non_positive_grace_period() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());

        for bad in [0, -3] {
            let path = write_config(dir.path(), &config_toml(&obws, bad, HOME_AWAY));
            let err = Config::load(&path).unwrap_err();
            assert!(matches!(err, WatchError::Validation { .. }), "got: {err}");
        }
    }

    #[test]
    fn load_rejects_missing_obws_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let path = write_config(dir.path(), &config_toml(&missing, 2, HOME_AWAY));

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, WatchError::Validation { .. }), "got: {err}");
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[obws\nconfig = broken");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, WatchError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn load_rejects_colliding_presets_as_a_whole() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let presets = "\n[presets.Desk]\ndisplays = [\"HDMI-1\", \"DP-2\"]\nprofile = \"P1\"\nscene_collection = \"S1\"\n\n[presets.Dock]\ndisplays = [\"dp-2\", \"hdmi-1\"]\nprofile = \"P2\"\nscene_collection = \"S2\"\n";
        let path = write_config(dir.path(), &config_toml(&obws, 2, presets));

        let err = Config::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"Desk\" and \"Dock\""), "got: {message}");
    }

    #[test]
    fn missing_config_file_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, WatchError::FileNotFound { .. }), "got: {err}");
    }

    #[test]
    fn reload_ignores_cosmetic_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let path = write_config(dir.path(), &config_toml(&obws, 2, HOME_AWAY));

        let mut store = ConfigStore::open(&path).unwrap();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Comment and whitespace edits parse to the same structure.
        let cosmetic = format!("# rewritten\n{}", config_toml(&obws, 2, HOME_AWAY));
        std::fs::write(&path, cosmetic).unwrap();
        assert!(!store.reload());

        // Reordering the preset tables is still the same configuration.
        let reordered = config_toml(
            &obws,
            2,
            "\n[presets.Away]\ndisplays = [\"eDP-1\"]\nprofile = \"AwayProfile\"\nscene_collection = \"AwayScenes\"\n\n[presets.Home]\ndisplays = [\"HDMI-1\", \"eDP-1\"]\nprofile = \"HomeProfile\"\nscene_collection = \"HomeScenes\"\n",
        );
        std::fs::write(&path, reordered).unwrap();
        assert!(!store.reload());

        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reload_keeps_previous_config_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let path = write_config(dir.path(), &config_toml(&obws, 2, HOME_AWAY));

        let mut store = ConfigStore::open(&path).unwrap();

        std::fs::write(&path, "this is not toml [").unwrap();
        assert!(!store.reload());
        assert_eq!(store.current().grace_period(), Duration::from_secs(2));
        assert_eq!(store.current().presets().len(), 2);
    }

    #[test]
    fn reload_swaps_and_notifies_in_subscription_order() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let path = write_config(dir.path(), &config_toml(&obws, 2, HOME_AWAY));

        let mut store = ConfigStore::open(&path).unwrap();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let first = order.clone();
        store.subscribe(move |config| {
            first
                .lock()
                .unwrap()
                .push(("first", config.grace_period().as_secs()));
        });
        let second = order.clone();
        store.subscribe(move |config| {
            second
                .lock()
                .unwrap()
                .push(("second", config.grace_period().as_secs()));
        });

        std::fs::write(&path, config_toml(&obws, 5, HOME_AWAY)).unwrap();
        assert!(store.reload());
        assert_eq!(store.current().grace_period(), Duration::from_secs(5));
        assert_eq!(
            order.lock().unwrap().as_slice(),
            &[("first", 5), ("second", 5)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery_and_tolerates_absent_ids() {
        let dir = tempfile::tempdir().unwrap();
        let obws = write_obws_config(dir.path());
        let path = write_config(dir.path(), &config_toml(&obws, 2, HOME_AWAY));

        let mut store = ConfigStore::open(&path).unwrap();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.unsubscribe(id);
        store.unsubscribe(id); // absent id is a no-op
        store.unsubscribe(1234);

        std::fs::write(&path, config_toml(&obws, 7, HOME_AWAY)).unwrap();
        assert!(store.reload());
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }
}
