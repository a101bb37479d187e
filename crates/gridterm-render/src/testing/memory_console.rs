//! In-memory console device that records everything written to it.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use gridterm_core::{Bounds, ClientRect, Dimensions, Error, Result, ScreenPoint};

use crate::console::ConsoleDevice;
use crate::grid::GridBuffer;

#[derive(Debug)]
struct MemoryState {
    size: Dimensions,
    configured: Option<Dimensions>,
    cursor_visible: bool,
    restored: bool,
    client_rect: ClientRect,
    frames: Vec<String>,
    last_buffer: Option<GridBuffer>,
    fail_configure: bool,
    fail_writes: bool,
    write_delay: Duration,
}

/// Console that keeps every flushed frame as plain text.
///
/// The client rect defaults to one device unit per cell at the origin, so
/// screen points map 1:1 onto cells until a test changes it.
#[derive(Debug)]
pub struct MemoryConsole {
    state: Mutex<MemoryState>,
}

impl MemoryConsole {
    /// Create a console of `size` cells.
    pub fn new(size: Dimensions) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                size,
                configured: None,
                cursor_visible: true,
                restored: false,
                client_rect: ClientRect::new(0, 0, size.cols as u32, size.rows as u32),
                frames: Vec::new(),
                last_buffer: None,
                fail_configure: false,
                fail_writes: false,
                write_delay: Duration::ZERO,
            }),
        }
    }

    /// Replace the reported client rectangle.
    pub fn set_client_rect(&self, rect: ClientRect) {
        self.state.lock().unwrap().client_rect = rect;
    }

    /// Make `configure` fail, as an unsupported terminal would.
    pub fn fail_configure(&self, fail: bool) {
        self.state.lock().unwrap().fail_configure = fail;
    }

    /// Make `write_region` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// Sleep this long in every `write_region`, as a slow terminal would.
    pub fn set_write_delay(&self, delay: Duration) {
        self.state.lock().unwrap().write_delay = delay;
    }

    /// Dimensions passed to the last `configure` call.
    pub fn configured(&self) -> Option<Dimensions> {
        self.state.lock().unwrap().configured
    }

    /// Current cursor visibility.
    pub fn cursor_visible(&self) -> bool {
        self.state.lock().unwrap().cursor_visible
    }

    /// True once `restore` has been called.
    pub fn restored(&self) -> bool {
        self.state.lock().unwrap().restored
    }

    /// Number of frames written.
    pub fn frame_count(&self) -> usize {
        self.state.lock().unwrap().frames.len()
    }

    /// Plain text of the most recent frame.
    pub fn last_frame(&self) -> Option<String> {
        self.state.lock().unwrap().frames.last().cloned()
    }

    /// Copy of the buffer from the most recent write.
    pub fn last_buffer(&self) -> Option<GridBuffer> {
        self.state.lock().unwrap().last_buffer.clone()
    }
}

impl ConsoleDevice for MemoryConsole {
    fn configure(&self, dimensions: Dimensions) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_configure {
            return Err(Error::Console("memory console refused configure".to_string()));
        }
        state.configured = Some(dimensions);
        state.restored = false;
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<()> {
        self.state.lock().unwrap().cursor_visible = visible;
        Ok(())
    }

    fn size(&self) -> Result<Dimensions> {
        Ok(self.state.lock().unwrap().size)
    }

    fn write_region(&self, buffer: &GridBuffer, region: Bounds) -> Result<()> {
        let delay = self.state.lock().unwrap().write_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(Error::Console("memory console refused write".to_string()));
        }
        state.frames.push(buffer.extract_text(&region));
        state.last_buffer = Some(buffer.clone());
        Ok(())
    }

    fn client_rect(&self) -> Result<ClientRect> {
        Ok(self.state.lock().unwrap().client_rect)
    }

    fn screen_to_client(&self, point: ScreenPoint) -> Result<ScreenPoint> {
        Ok(self.state.lock().unwrap().client_rect.to_client(point))
    }

    fn restore(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.cursor_visible = true;
        state.restored = true;
        Ok(())
    }
}
