//! Pointer dispatch: raw hook events to typed grid-cell events.

use std::sync::Arc;

use tracing::{debug, trace};

use gridterm_core::{Dimensions, EventList, PointerEvent, PointerEventKind, Result};
use gridterm_render::ConsoleDevice;

use crate::hook::{HookSink, RawPointerEvent};
use crate::mapper::map_to_cell;

/// Pointer handler signature.
pub type PointerHandler = dyn Fn(&PointerEvent) + Send + Sync;

/// Interrupt callback signature.
pub type InterruptFn = dyn Fn() + Send + Sync;

/// Handler lists, one per pointer event kind.
#[derive(Default)]
pub struct PointerEvents {
    /// Pointer moved
    pub pointer_move: EventList<PointerHandler>,
    /// Primary button pressed
    pub primary_down: EventList<PointerHandler>,
    /// Primary button released
    pub primary_up: EventList<PointerHandler>,
    /// Secondary button pressed
    pub secondary_down: EventList<PointerHandler>,
    /// Secondary button released
    pub secondary_up: EventList<PointerHandler>,
    /// Wheel scrolled
    pub scroll: EventList<PointerHandler>,
}

impl PointerEvents {
    /// Create empty handler lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// The list handlers for `kind` are registered on.
    pub fn list_for(&self, kind: PointerEventKind) -> &EventList<PointerHandler> {
        match kind {
            PointerEventKind::Move => &self.pointer_move,
            PointerEventKind::PrimaryDown => &self.primary_down,
            PointerEventKind::PrimaryUp => &self.primary_up,
            PointerEventKind::SecondaryDown => &self.secondary_down,
            PointerEventKind::SecondaryUp => &self.secondary_up,
            PointerEventKind::Scroll { .. } => &self.scroll,
        }
    }

    /// Remove every handler from every list.
    pub fn clear(&self) {
        self.pointer_move.clear();
        self.primary_down.clear();
        self.primary_up.clear();
        self.secondary_down.clear();
        self.secondary_up.clear();
        self.scroll.clear();
    }
}

/// Turns raw hook events into [`PointerEvent`]s and runs the matching
/// handler list.
///
/// The console's client geometry is queried on every event, so a window
/// moved or resized mid-run is mapped correctly.
pub struct PointerDispatcher {
    console: Arc<dyn ConsoleDevice>,
    grid: Dimensions,
    events: Arc<PointerEvents>,
    on_interrupt: Option<Arc<InterruptFn>>,
}

impl PointerDispatcher {
    /// Create a dispatcher for a grid of `grid` cells.
    pub fn new(console: Arc<dyn ConsoleDevice>, grid: Dimensions, events: Arc<PointerEvents>) -> Self {
        Self {
            console,
            grid,
            events,
            on_interrupt: None,
        }
    }

    /// Run `callback` when the hook reports an interrupt.
    pub fn with_interrupt(mut self, callback: Arc<InterruptFn>) -> Self {
        self.on_interrupt = Some(callback);
        self
    }

    /// Map a raw event onto the grid.
    ///
    /// Returns `Ok(None)` for events outside the grid.
    pub fn translate(&self, raw: RawPointerEvent) -> Result<Option<PointerEvent>> {
        let client_point = self.console.screen_to_client(raw.position)?;
        let client_rect = self.console.client_rect()?;
        Ok(map_to_cell(client_point, client_rect, self.grid)
            .map(|position| PointerEvent::new(raw.kind.into(), position)))
    }

    /// Dispatch a raw event, returning the number of handlers invoked.
    pub fn dispatch(&self, raw: RawPointerEvent) -> usize {
        match self.translate(raw) {
            Ok(Some(event)) => {
                let invoked = self.events.list_for(event.kind).emit(&event);
                trace!(?event, invoked, "pointer event dispatched");
                invoked
            }
            Ok(None) => {
                trace!(?raw, "pointer event outside grid discarded");
                0
            }
            Err(e) => {
                debug!("failed to query console geometry: {}", e);
                0
            }
        }
    }
}

impl HookSink for PointerDispatcher {
    fn pointer(&self, event: RawPointerEvent) {
        self.dispatch(event);
    }

    fn interrupt(&self) {
        if let Some(callback) = &self.on_interrupt {
            callback();
        }
    }
}
