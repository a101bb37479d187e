//! # gridterm-engine
//!
//! Lifecycle controller for the gridterm engine.
//!
//! This crate provides:
//! - The `Engine` context object owning buffers, flag and event lists
//! - Run/stop lifecycle with a blocking stop signal
//! - Pointer hook installation and dispatch wiring
//! - Termination-signal cleanup
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on gridterm-core,
//! gridterm-render and gridterm-input and ties them into one run loop.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod events;
pub mod id;
pub mod signal;
pub mod termination;

// Re-export commonly used types
pub use engine::{Engine, EngineHandle};
pub use events::{EngineEvents, StartingHandler, StoppedHandler};
pub use id::EngineId;
pub use signal::StopSignal;
pub use termination::{CleanupFn, TerminationGuard};
