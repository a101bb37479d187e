//! # gridterm-input
//!
//! Pointer input for the gridterm engine.
//!
//! This crate provides:
//! - The pointer hook contract (`PointerHook`, `HookSink`)
//! - A crossterm-backed hook using terminal mouse reporting
//! - Client-coordinate to grid-cell mapping
//! - Dispatch of mapped events to per-kind handler lists
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on gridterm-core for
//! event types and on gridterm-render for the console geometry contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod crossterm_hook;
pub mod dispatcher;
pub mod hook;
pub mod mapper;
pub mod testing;

// Re-export commonly used types
pub use crossterm_hook::CrosstermHook;
pub use dispatcher::{InterruptFn, PointerDispatcher, PointerEvents, PointerHandler};
pub use hook::{HookSink, PointerHook, RawPointerEvent, RawPointerKind};
pub use mapper::{map_to_cell, scale_axis};
