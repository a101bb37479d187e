//! Pointer events delivered to application handlers.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer moved (including drags)
    Move,
    /// Primary (left) button pressed
    PrimaryDown,
    /// Primary (left) button released
    PrimaryUp,
    /// Secondary (right) button pressed
    SecondaryDown,
    /// Secondary (right) button released
    SecondaryUp,
    /// Wheel scrolled; positive delta is away from the user
    Scroll {
        /// Wheel notches
        delta: i16,
    },
}

/// A pointer event in grid coordinates.
///
/// The position is always inside the active buffer: events that map outside
/// of it are discarded before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Event kind
    pub kind: PointerEventKind,
    /// Cell under the pointer
    pub position: Position,
}

impl PointerEvent {
    /// Create a new pointer event.
    pub fn new(kind: PointerEventKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Column of the cell under the pointer.
    pub fn col(&self) -> u16 {
        self.position.col
    }

    /// Row of the cell under the pointer.
    pub fn row(&self) -> u16 {
        self.position.row
    }
}
