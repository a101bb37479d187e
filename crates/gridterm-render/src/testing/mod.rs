//! Testing utilities for gridterm rendering.
//!
//! Provides an in-memory console device so the render pipeline and the
//! engine lifecycle can be exercised without a TTY.

pub mod memory_console;

pub use memory_console::MemoryConsole;
