//! # gridterm-core
//!
//! Core types for the gridterm terminal-graphics engine.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other gridterm crates. It provides:
//!
//! - Geometry types (Position, Dimensions, Bounds, ScreenPoint, ClientRect)
//! - Cell, style and color types for the grid buffer
//! - Pointer event types delivered to applications
//! - Ordered observer lists for event subscriptions
//! - Configuration and error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other gridterm crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod observer;

// Re-export commonly used types
pub use cell::{Cell, CellAttributes, CellStyle, Color};
pub use config::{EngineConfig, EngineSettings, LoggingSettings};
pub use error::{Error, Result};
pub use event::{PointerEvent, PointerEventKind};
pub use geometry::{Bounds, ClientRect, Dimensions, Position, ScreenPoint};
pub use observer::{EventList, HandlerId};
