//! Walks through every lifecycle and error-handling scenario.
//!
//! Run with `RUST_LOG=debug` for more detail. The program always exits
//! successfully: every failure it provokes is expected and handled.

use resguard::{global_monitor, LoggingConfig};
use resguard_examples::run_all;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingConfig::new().init()?;

    for report in run_all() {
        println!("\n{report}");
    }

    let stats = serde_json::to_string(&global_monitor().stats())?;
    tracing::info!(%stats, "Lifecycle summary");

    Ok(())
}
