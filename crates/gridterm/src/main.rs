//! # gridterm
//!
//! Terminal-graphics demo: paints a cell grid at a fixed refresh rate and
//! reacts to mouse input.
//!
//! ## Architecture
//!
//! This is Layer 4 - the binary that ties together:
//! - gridterm-core: Cell, geometry and configuration types
//! - gridterm-render: Buffers, pipeline and console output
//! - gridterm-input: Pointer hook and dispatch
//! - gridterm-engine: Run/stop lifecycle

use gridterm::{init_logging, CliOptions, Demo, USAGE};
use gridterm_engine::Engine;

fn main() -> anyhow::Result<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.help {
        print!("{}", USAGE);
        return Ok(());
    }

    let config = options.load_config()?;
    init_logging(&config.logging)?;

    tracing::info!(
        "gridterm v{} starting: {}x{} refresh={}ms",
        env!("CARGO_PKG_VERSION"),
        config.engine.width,
        config.engine.height,
        config.engine.refresh_interval_ms
    );

    let engine = Engine::with_terminal(config.engine.clone());
    let demo = Demo::install(&engine);

    engine.run_configured().map_err(|e| {
        tracing::error!("Engine run failed: {}", e);
        e
    })?;

    tracing::info!(
        "gridterm shutting down after {} frames ({} marks)",
        demo.frames(),
        demo.marks().len()
    );

    Ok(())
}
