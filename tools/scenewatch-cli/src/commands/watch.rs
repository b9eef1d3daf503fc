//! Run the watcher until interrupted.

use std::path::PathBuf;

use scenewatch_engine::{
    detect_best_display_source, detect_best_lock_source, spawn_display_pump, spawn_lock_pump,
    ConfigFileWatcher, ConfigStore, DisplaySet, EngineEvent, ObwsCliDispatcher, WatcherEngine,
};
use scenewatch_platform_core::DisplaySource;

pub async fn run(config: PathBuf, dry_run: bool, obws_bin: PathBuf) -> anyhow::Result<()> {
    // The initial load is the only fatal one: without it there is no
    // known-good state to fall back to.
    let store = ConfigStore::open(&config)
        .map_err(|e| anyhow::anyhow!("cannot load configuration: {e}"))?;
    tracing::info!(
        path = %store.current().path().display(),
        presets = store.current().presets().len(),
        grace_period_secs = store.current().grace_period().as_secs(),
        "Configuration loaded"
    );

    let (events, rx) = tokio::sync::mpsc::unbounded_channel();

    // Keep the watcher guard alive for the whole run; dropping it on any
    // exit path releases the OS watch.
    let _config_watch = ConfigFileWatcher::new(store.current().path(), events.clone())?;

    let mut display_source = detect_best_display_source();
    let initial: DisplaySet = match display_source.enumerate() {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Display enumeration failed, starting with an empty set");
            DisplaySet::new()
        }
    };
    for id in initial.iter() {
        tracing::info!(display = %id, "Connected display");
    }

    spawn_display_pump(display_source, events.clone());
    spawn_lock_pump(detect_best_lock_source(), events.clone());

    let shutdown = events.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(EngineEvent::Shutdown);
        }
    });

    if dry_run {
        tracing::info!("Dry run: matching runs, but no obws command is executed");
    }

    let dispatcher = ObwsCliDispatcher::new(obws_bin, dry_run);
    let engine = WatcherEngine::new(store, Box::new(dispatcher), initial);
    engine.run(rx).await;

    Ok(())
}
