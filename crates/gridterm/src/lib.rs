//! gridterm demo library
//!
//! Command-line handling, logging setup and the demo application wired
//! onto the engine. The binary entry point is in main.rs.

pub mod cli;
pub mod demo;
pub mod logging;

// Re-export commonly used types
pub use cli::{CliOptions, USAGE};
pub use demo::Demo;
pub use logging::init_logging;
