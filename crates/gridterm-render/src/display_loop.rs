//! Display loop: flush the latest front snapshot to the console.
//!
//! The write region is computed once from the console size when the loop
//! starts. Console resizes after that are not picked up: the region stays
//! stale until the next run. This is a known limitation.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};

use gridterm_core::Bounds;

use crate::console::ConsoleDevice;
use crate::pipeline::BufferPipeline;

/// Display loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Sleep between flushes
    pub interval: Duration,
    /// Skip flushing a generation that was already written
    pub skip_unchanged_frames: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1),
            skip_unchanged_frames: true,
        }
    }
}

/// Compute the fixed write region for a display loop run.
///
/// Uses the console's current size, falling back to the pipeline dimensions
/// when the console cannot report one.
pub fn write_region(console: &dyn ConsoleDevice, pipeline: &BufferPipeline) -> Bounds {
    match console.size() {
        Ok(size) => size.bounds(),
        Err(e) => {
            warn!("console size unavailable, using grid size: {}", e);
            pipeline.dimensions().bounds()
        }
    }
}

/// Spawn the display loop on a dedicated thread.
pub fn spawn_display_loop(
    pipeline: Arc<BufferPipeline>,
    console: Arc<dyn ConsoleDevice>,
    enabled: Arc<AtomicBool>,
    settings: DisplaySettings,
) -> io::Result<JoinHandle<()>> {
    let interval = settings.interval.max(Duration::from_millis(1));
    thread::Builder::new()
        .name("gridterm-display".to_string())
        .spawn(move || {
            let region = write_region(console.as_ref(), &pipeline);
            debug!("display loop started: region={:?}, interval={:?}", region, interval);

            let mut last_flushed: Option<u64> = None;
            let mut failures = 0u64;
            while enabled.load(Ordering::Acquire) {
                let generation = pipeline.generation();
                if !settings.skip_unchanged_frames || last_flushed != Some(generation) {
                    // No pipeline lock is held while the console writes
                    let (generation, front) = pipeline.front();
                    match console.write_region(&front, region) {
                        Ok(()) => {
                            trace!(generation, "front buffer flushed");
                            last_flushed = Some(generation);
                        }
                        Err(e) => {
                            failures += 1;
                            if failures == 1 {
                                warn!("console write failed: {}", e);
                            } else {
                                trace!(failures, "console write failed: {}", e);
                            }
                        }
                    }
                }
                thread::sleep(interval);
            }
            debug!("display loop exited ({} failed writes)", failures);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryConsole;
    use gridterm_core::{Cell, CellStyle, Dimensions};
    use std::time::Instant;

    #[test]
    fn test_write_region_uses_console_size() {
        let console = MemoryConsole::new(Dimensions::new(10, 20));
        let pipeline =
            BufferPipeline::initialize(Dimensions::new(25, 80), CellStyle::default()).unwrap();
        assert_eq!(write_region(&console, &pipeline), Bounds::new(0, 0, 20, 10));
    }

    #[test]
    fn test_display_loop_flushes_latest_snapshot() {
        let console = Arc::new(MemoryConsole::new(Dimensions::new(2, 4)));
        let pipeline = Arc::new(
            BufferPipeline::initialize(Dimensions::new(2, 4), CellStyle::default()).unwrap(),
        );
        pipeline.with_active(|buffer| buffer.set(0, 0, Cell::new('Z')));
        pipeline.snapshot_to_front().unwrap();

        let enabled = Arc::new(AtomicBool::new(true));
        let handle = spawn_display_loop(
            Arc::clone(&pipeline),
            console.clone(),
            Arc::clone(&enabled),
            DisplaySettings::default(),
        )
        .unwrap();

        while console.frame_count() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        // Same generation: nothing new is written
        thread::sleep(Duration::from_millis(10));
        enabled.store(false, Ordering::Release);
        handle.join().unwrap();

        assert_eq!(console.frame_count(), 1);
        assert_eq!(console.last_frame().unwrap(), "Z\n");
    }

    #[test]
    fn test_display_loop_rewrites_when_not_skipping() {
        let console = Arc::new(MemoryConsole::new(Dimensions::new(1, 1)));
        let pipeline = Arc::new(
            BufferPipeline::initialize(Dimensions::new(1, 1), CellStyle::default()).unwrap(),
        );

        let enabled = Arc::new(AtomicBool::new(true));
        let handle = spawn_display_loop(
            pipeline,
            console.clone(),
            Arc::clone(&enabled),
            DisplaySettings {
                interval: Duration::from_millis(1),
                skip_unchanged_frames: false,
            },
        )
        .unwrap();

        while console.frame_count() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        enabled.store(false, Ordering::Release);
        handle.join().unwrap();
        assert!(console.frame_count() >= 3);
    }

    #[test]
    fn test_slow_console_does_not_hold_up_snapshots() {
        let console = Arc::new(MemoryConsole::new(Dimensions::new(2, 4)));
        console.set_write_delay(Duration::from_millis(200));
        let pipeline = Arc::new(
            BufferPipeline::initialize(Dimensions::new(2, 4), CellStyle::default()).unwrap(),
        );

        let enabled = Arc::new(AtomicBool::new(true));
        let handle = spawn_display_loop(
            Arc::clone(&pipeline),
            console.clone(),
            Arc::clone(&enabled),
            DisplaySettings {
                interval: Duration::from_millis(1),
                skip_unchanged_frames: false,
            },
        )
        .unwrap();

        // Let the display loop get stuck inside a write
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        for _ in 0..50 {
            pipeline.snapshot_to_front().unwrap();
        }
        let elapsed = started.elapsed();

        enabled.store(false, Ordering::Release);
        handle.join().unwrap();
        assert!(elapsed < Duration::from_millis(150), "snapshots took {:?}", elapsed);
        assert_eq!(pipeline.generation(), 50);
    }
}
