//! List currently connected displays.

use scenewatch_engine::detect_best_display_source;
use scenewatch_platform_core::{detect_display_server, DisplaySource};

pub fn run() -> anyhow::Result<()> {
    let server = detect_display_server();
    tracing::debug!(?server, "Detected display server");

    let mut source = detect_best_display_source();
    let displays = source
        .enumerate()
        .map_err(|e| anyhow::anyhow!("display enumeration failed: {e}"))?;

    println!("{}", serde_json::to_string_pretty(&displays)?);
    Ok(())
}
