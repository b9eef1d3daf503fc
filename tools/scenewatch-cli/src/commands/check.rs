//! Validate a configuration file.

use std::path::PathBuf;

use scenewatch_engine::Config;

pub fn run(config: PathBuf) -> anyhow::Result<()> {
    println!("Checking configuration at: {}", config.display());

    let config =
        Config::load(&config).map_err(|e| anyhow::anyhow!("Configuration is invalid: {e}"))?;

    println!("  obws config: {}", config.obws_config().display());
    println!("  Grace period: {}s", config.grace_period().as_secs());
    println!("  Presets: {}", config.presets().len());
    for preset in config.presets().iter() {
        println!("    {preset}");
    }

    println!("\nConfiguration is valid.");
    Ok(())
}
