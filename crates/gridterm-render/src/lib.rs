//! # gridterm-render
//!
//! Rendering pipeline for the gridterm engine.
//!
//! This crate provides:
//! - Fixed-size grid buffers of character/attribute cells
//! - The triple-buffer pipeline (`active` == `back`, `front`)
//! - The render loop (paint, then snapshot) and display loop (flush front)
//! - The console device contract and its crossterm implementation
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on gridterm-core
//! and is driven by gridterm-engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod console;
pub mod crossterm_console;
pub mod display_loop;
pub mod grid;
pub mod pipeline;
pub mod render_loop;
pub mod testing;

// Re-export commonly used types
pub use console::ConsoleDevice;
pub use crossterm_console::{CrosstermConsole, TerminalMetrics};
pub use display_loop::{spawn_display_loop, DisplaySettings};
pub use grid::GridBuffer;
pub use pipeline::{BufferPipeline, PendingClear};
pub use render_loop::{render_iteration, spawn_render_loop, PaintContext, PaintFn};
