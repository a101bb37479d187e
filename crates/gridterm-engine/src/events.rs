//! Engine event lists.

use std::sync::Arc;

use gridterm_core::{Dimensions, EventList};
use gridterm_input::PointerEvents;
use gridterm_render::{PaintContext, PaintFn};

use crate::id::EngineId;

/// `starting` handler: receives the grid dimensions of the run.
pub type StartingHandler = dyn Fn(&Dimensions) + Send + Sync;

/// `stopped` handler: receives the id of the engine that stopped.
pub type StoppedHandler = dyn Fn(&EngineId) + Send + Sync;

/// Every subscribable engine event.
///
/// Delivery order within a list is registration order. Handlers may
/// subscribe or unsubscribe (themselves included) while being delivered.
#[derive(Default)]
pub struct EngineEvents {
    /// Fired once per run, after the buffers exist and before the loops start
    pub starting: EventList<StartingHandler>,
    /// Fired once per render iteration, before the snapshot copy
    pub paint: Arc<EventList<PaintFn>>,
    /// Pointer events, already mapped onto the grid
    pub pointer: Arc<PointerEvents>,
    /// Fired once when a successfully started run returns
    pub stopped: EventList<StoppedHandler>,
}

impl EngineEvents {
    /// Create empty event lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint callback for the render loop: runs every `paint` handler in
    /// order against the same context.
    pub fn paint_dispatcher(&self) -> Arc<PaintFn> {
        let paint = Arc::clone(&self.paint);
        Arc::new(move |ctx: &mut PaintContext<'_>| {
            for handler in paint.snapshot() {
                handler(&mut *ctx);
            }
        })
    }

    /// Remove every handler from every list.
    pub fn clear(&self) {
        self.starting.clear();
        self.paint.clear();
        self.pointer.clear();
        self.stopped.clear();
    }
}
