//! Testing utilities for gridterm input.
//!
//! Provides a hook that test code drives directly, so pointer dispatch and
//! the engine lifecycle can be exercised without a terminal.

pub mod manual_hook;

pub use manual_hook::ManualHook;
