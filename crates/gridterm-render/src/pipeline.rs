//! Buffer pipeline: the hand-off between the surface the application paints
//! and the snapshot the display loop transmits.
//!
//! The pipeline owns three logical buffers: `active`, `back` and `front`.
//! `active` and `back` are the same instance, so the application paints
//! directly into what the next snapshot copies. `front` is an immutable,
//! reference-counted copy of the last complete snapshot.
//!
//! A snapshot copies `back` into a spare buffer and then swaps it in as the
//! new `front` under a short write lock. Readers clone the `front` pointer
//! under a short read lock and do their I/O with no lock held, so a slow
//! console never holds up the render loop and a reader never sees a torn
//! frame. Frames can still be dropped (the display loop may skip a
//! generation) but are never queued or reordered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use tracing::{trace, warn};

use gridterm_core::{CellStyle, Dimensions, Error, Result};

use crate::grid::GridBuffer;
use crate::render_loop::PaintContext;

/// Clear requested while the active buffer is being painted.
///
/// Applied to the painted buffer at the paint context's next access, or
/// when painting ends.
#[derive(Debug, Default)]
pub struct PendingClear {
    style: Mutex<Option<CellStyle>>,
}

impl PendingClear {
    /// Record a clear. A later request replaces an earlier one.
    pub fn request(&self, style: CellStyle) {
        *self.style.lock().unwrap_or_else(PoisonError::into_inner) = Some(style);
    }

    /// Apply and forget the requested clear, if any.
    pub fn apply(&self, buffer: &mut GridBuffer) -> bool {
        let style = self
            .style
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match style {
            Some(style) => {
                buffer.clear(style);
                true
            }
            None => false,
        }
    }
}

/// Triple-buffer pipeline with fixed dimensions.
#[derive(Debug)]
pub struct BufferPipeline {
    /// Active == back buffer
    back: Mutex<GridBuffer>,
    /// Last completed snapshot
    front: RwLock<Arc<GridBuffer>>,
    /// Previous front, recycled once no reader holds it
    spare: Mutex<Option<GridBuffer>>,
    /// Thread currently painting `back`
    painter: Mutex<Option<ThreadId>>,
    pending: PendingClear,
    /// Number of completed snapshots
    generation: AtomicU64,
    dimensions: Dimensions,
}

impl BufferPipeline {
    /// Allocate `active`/`back` and `front`, each cleared to `style`.
    pub fn initialize(dimensions: Dimensions, style: CellStyle) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(Error::InvalidDimensions {
                rows: dimensions.rows,
                cols: dimensions.cols,
            });
        }

        Ok(Self {
            back: Mutex::new(GridBuffer::filled(dimensions, style)),
            front: RwLock::new(Arc::new(GridBuffer::filled(dimensions, style))),
            spare: Mutex::new(None),
            painter: Mutex::new(None),
            pending: PendingClear::default(),
            generation: AtomicU64::new(0),
            dimensions,
        })
    }

    /// Dimensions shared by every buffer in the pipeline.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    // A panicking paint handler poisons `back`; the cells are still valid.
    fn lock_back(&self) -> MutexGuard<'_, GridBuffer> {
        self.back.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_painter(&self, painter: Option<ThreadId>) {
        *self.painter.lock().unwrap_or_else(PoisonError::into_inner) = painter;
    }

    /// True when the calling thread is inside [`BufferPipeline::paint`].
    pub fn is_painting(&self) -> bool {
        *self.painter.lock().unwrap_or_else(PoisonError::into_inner)
            == Some(thread::current().id())
    }

    /// Run `f` with exclusive access to the active buffer.
    ///
    /// Returns `None` when called from inside a paint callback on the same
    /// thread, which already has the active buffer through its
    /// [`PaintContext`].
    pub fn with_active<R>(&self, f: impl FnOnce(&mut GridBuffer) -> R) -> Option<R> {
        if self.is_painting() {
            warn!("active buffer requested from inside a paint callback");
            return None;
        }
        let mut back = self.lock_back();
        Some(f(&mut back))
    }

    /// Paint the active buffer through a [`PaintContext`].
    ///
    /// A [`BufferPipeline::clear`] issued by the same thread while `f` runs
    /// is applied to the buffer being painted.
    pub fn paint<R>(&self, frame: u64, f: impl FnOnce(&mut PaintContext<'_>) -> R) -> R {
        let mut back = self.lock_back();
        self.set_painter(Some(thread::current().id()));
        let result = {
            let mut ctx = PaintContext::attached(&mut back, frame, &self.pending);
            f(&mut ctx)
        };
        self.pending.apply(&mut back);
        self.set_painter(None);
        result
    }

    /// Reset every cell of the active buffer to an empty character with `style`.
    pub fn clear(&self, style: CellStyle) {
        if self.is_painting() {
            self.pending.request(style);
            return;
        }
        self.lock_back().clear(style);
    }

    fn take_spare(&self) -> GridBuffer {
        self.spare
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| GridBuffer::new(self.dimensions))
    }

    /// Copy every cell of `back` into a fresh `front`.
    ///
    /// Returns the new snapshot generation.
    pub fn snapshot_to_front(&self) -> Result<u64> {
        let back = self.lock_back();
        let mut next = self.take_spare();
        next.copy_from(&back)?;

        let (previous, generation) = {
            let mut front = self.front.write().unwrap_or_else(PoisonError::into_inner);
            let previous = std::mem::replace(&mut *front, Arc::new(next));
            (previous, self.generation.fetch_add(1, Ordering::AcqRel) + 1)
        };
        drop(back);

        // Still held by a reader: let it go and allocate next time
        if let Ok(buffer) = Arc::try_unwrap(previous) {
            *self.spare.lock().unwrap_or_else(PoisonError::into_inner) = Some(buffer);
        }
        trace!(generation, "snapshot copied to front buffer");
        Ok(generation)
    }

    /// The current front buffer with its generation.
    ///
    /// The buffer stays valid and unchanged however many snapshots follow.
    pub fn front(&self) -> (u64, Arc<GridBuffer>) {
        let front = self.front.read().unwrap_or_else(PoisonError::into_inner);
        (self.generation.load(Ordering::Acquire), Arc::clone(&front))
    }

    /// Run `f` with shared access to the front buffer.
    pub fn with_front<R>(&self, f: impl FnOnce(&GridBuffer) -> R) -> R {
        let (_, front) = self.front();
        f(&front)
    }

    /// Clone of the front buffer.
    pub fn front_snapshot(&self) -> GridBuffer {
        self.with_front(GridBuffer::clone)
    }

    /// Clone of the active buffer.
    pub fn active_snapshot(&self) -> GridBuffer {
        self.lock_back().clone()
    }

    /// Number of snapshots copied so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
