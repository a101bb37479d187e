//! Render loop: paint into the active buffer, then snapshot it.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};

use gridterm_core::CellStyle;

use crate::grid::GridBuffer;
use crate::pipeline::{BufferPipeline, PendingClear};

/// Surface handed to paint callbacks.
///
/// Gives mutable access to the active buffer for the duration of one
/// render iteration. A clear requested on the pipeline from inside the
/// callback is applied before the next buffer access.
pub struct PaintContext<'a> {
    buffer: &'a mut GridBuffer,
    frame: u64,
    pending: Option<&'a PendingClear>,
}

impl<'a> PaintContext<'a> {
    /// Wrap a detached buffer for one iteration.
    pub fn new(buffer: &'a mut GridBuffer, frame: u64) -> Self {
        Self {
            buffer,
            frame,
            pending: None,
        }
    }

    pub(crate) fn attached(
        buffer: &'a mut GridBuffer,
        frame: u64,
        pending: &'a PendingClear,
    ) -> Self {
        Self {
            buffer,
            frame,
            pending: Some(pending),
        }
    }

    fn sync(&mut self) {
        if let Some(pending) = self.pending {
            pending.apply(self.buffer);
        }
    }

    /// Render iteration counter, starting at 0.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Width of the active buffer.
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Height of the active buffer.
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Reset the active buffer to empty cells carrying `style`.
    pub fn clear(&mut self, style: CellStyle) {
        self.sync();
        self.buffer.clear(style);
    }

    /// Read-only view of the active buffer.
    pub fn buffer(&mut self) -> &GridBuffer {
        self.sync();
        self.buffer
    }

    /// Mutable view of the active buffer.
    pub fn buffer_mut(&mut self) -> &mut GridBuffer {
        self.sync();
        self.buffer
    }
}

/// Paint callback signature.
pub type PaintFn = dyn Fn(&mut PaintContext<'_>) + Send + Sync;

/// One render iteration: paint (if a callback is present), then snapshot.
///
/// Paint always completes before the snapshot starts.
pub fn render_iteration(pipeline: &BufferPipeline, paint: Option<&PaintFn>, frame: u64) {
    if let Some(paint) = paint {
        pipeline.paint(frame, |ctx| paint(ctx));
    }

    if let Err(e) = pipeline.snapshot_to_front() {
        warn!("snapshot failed on frame {}: {}", frame, e);
    }
}

/// Spawn the render loop on a dedicated thread.
///
/// The loop checks `enabled` at the top of every iteration, so it exits at
/// most one `interval` after the flag is cleared.
pub fn spawn_render_loop(
    pipeline: Arc<BufferPipeline>,
    enabled: Arc<AtomicBool>,
    interval: Duration,
    paint: Option<Arc<PaintFn>>,
) -> io::Result<JoinHandle<()>> {
    let interval = interval.max(Duration::from_millis(1));
    thread::Builder::new()
        .name("gridterm-render".to_string())
        .spawn(move || {
            debug!("render loop started: interval={:?}", interval);
            let mut frame = 0u64;
            while enabled.load(Ordering::Acquire) {
                render_iteration(&pipeline, paint.as_deref(), frame);
                trace!(frame, "render iteration complete");
                frame = frame.wrapping_add(1);
                thread::sleep(interval);
            }
            debug!("render loop exited after {} iterations", frame);
        })
}
