//! Pointer hook contract.
//!
//! A hook intercepts pointer input for the whole console and hands raw
//! screen-space events to a [`HookSink`]. Hooks must be explicitly
//! uninstalled; an installed hook keeps its delivery thread and the
//! terminal's mouse reporting alive.

use std::sync::Arc;

use gridterm_core::{PointerEventKind, Result, ScreenPoint};

/// Raw pointer event kind, as reported by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawPointerKind {
    /// Pointer moved
    Move,
    /// Left button pressed
    LeftDown,
    /// Left button released
    LeftUp,
    /// Right button pressed
    RightDown,
    /// Right button released
    RightUp,
    /// Wheel scrolled by `delta` notches (positive = away from the user)
    Wheel(i16),
}

impl From<RawPointerKind> for PointerEventKind {
    fn from(kind: RawPointerKind) -> Self {
        match kind {
            RawPointerKind::Move => PointerEventKind::Move,
            RawPointerKind::LeftDown => PointerEventKind::PrimaryDown,
            RawPointerKind::LeftUp => PointerEventKind::PrimaryUp,
            RawPointerKind::RightDown => PointerEventKind::SecondaryDown,
            RawPointerKind::RightUp => PointerEventKind::SecondaryUp,
            RawPointerKind::Wheel(delta) => PointerEventKind::Scroll { delta },
        }
    }
}

/// Raw pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawPointerEvent {
    /// Event kind
    pub kind: RawPointerKind,
    /// Screen position
    pub position: ScreenPoint,
}

impl RawPointerEvent {
    /// Create a new raw event.
    pub fn new(kind: RawPointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Receiver of raw hook notifications.
///
/// Called synchronously on the hook's delivery thread. Implementations must
/// return quickly: while a sink runs, no further input is delivered.
pub trait HookSink: Send + Sync {
    /// A pointer event was intercepted.
    fn pointer(&self, event: RawPointerEvent);

    /// The user requested termination through the input stream (for
    /// example Ctrl+C while the terminal is in raw mode).
    fn interrupt(&self) {}
}

/// Installable pointer hook.
pub trait PointerHook: Send {
    /// Start delivering events to `sink`.
    ///
    /// Fails with `Error::HookAlreadyInstalled` if already installed.
    fn install(&mut self, sink: Arc<dyn HookSink>) -> Result<()>;

    /// Stop delivering events. Idempotent.
    fn uninstall(&mut self) -> Result<()>;

    /// True while installed.
    fn is_installed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_kind_conversion() {
        assert_eq!(PointerEventKind::from(RawPointerKind::Move), PointerEventKind::Move);
        assert_eq!(
            PointerEventKind::from(RawPointerKind::LeftDown),
            PointerEventKind::PrimaryDown
        );
        assert_eq!(
            PointerEventKind::from(RawPointerKind::RightUp),
            PointerEventKind::SecondaryUp
        );
        assert_eq!(
            PointerEventKind::from(RawPointerKind::Wheel(-2)),
            PointerEventKind::Scroll { delta: -2 }
        );
    }
}
