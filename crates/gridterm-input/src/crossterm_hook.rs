//! Pointer hook backed by crossterm mouse reporting.
//!
//! Installing enables mouse capture and starts a delivery thread that polls
//! the terminal input queue. Mouse reports arrive in cell units; they are
//! converted to device units through [`TerminalMetrics`] so the mapper sees
//! the same coordinate space the console reports as its client rect.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::{debug, trace, warn};

use gridterm_core::{Error, Result, ScreenPoint};
use gridterm_render::TerminalMetrics;

use crate::hook::{HookSink, PointerHook, RawPointerEvent, RawPointerKind};

/// Translate a crossterm mouse event kind.
///
/// Drags are reported as moves. Middle-button and horizontal scroll
/// events have no counterpart and yield `None`.
pub fn raw_kind(kind: MouseEventKind) -> Option<RawPointerKind> {
    match kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(RawPointerKind::Move),
        MouseEventKind::Down(MouseButton::Left) => Some(RawPointerKind::LeftDown),
        MouseEventKind::Up(MouseButton::Left) => Some(RawPointerKind::LeftUp),
        MouseEventKind::Down(MouseButton::Right) => Some(RawPointerKind::RightDown),
        MouseEventKind::Up(MouseButton::Right) => Some(RawPointerKind::RightUp),
        MouseEventKind::ScrollUp => Some(RawPointerKind::Wheel(1)),
        MouseEventKind::ScrollDown => Some(RawPointerKind::Wheel(-1)),
        _ => None,
    }
}

/// True for Ctrl+C presses, which raw mode delivers as key input.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

fn device_point(mouse: &MouseEvent) -> ScreenPoint {
    match TerminalMetrics::query() {
        Ok(metrics) => metrics.cell_to_device(mouse.column, mouse.row),
        Err(_) => ScreenPoint::new(mouse.column as i32, mouse.row as i32),
    }
}

fn deliver(event: Event, sink: &dyn HookSink) {
    match event {
        Event::Mouse(mouse) => {
            if let Some(kind) = raw_kind(mouse.kind) {
                let position = device_point(&mouse);
                trace!(?kind, x = position.x, y = position.y, "pointer event");
                sink.pointer(RawPointerEvent { kind, position });
            }
        }
        Event::Key(key) if is_interrupt(&key) => {
            debug!("interrupt key received");
            sink.interrupt();
        }
        _ => {}
    }
}

/// Crossterm-based [`PointerHook`].
#[derive(Debug)]
pub struct CrosstermHook {
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CrosstermHook {
    /// Create a hook that polls for input every `poll_interval`.
    ///
    /// The interval bounds how long `uninstall` waits for the delivery
    /// thread to notice it should exit.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }
}

impl Default for CrosstermHook {
    fn default() -> Self {
        Self::new(Duration::from_millis(25))
    }
}

impl PointerHook for CrosstermHook {
    fn install(&mut self, sink: Arc<dyn HookSink>) -> Result<()> {
        if self.thread.is_some() {
            return Err(Error::HookAlreadyInstalled);
        }

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnableMouseCapture)
            .map_err(|e| Error::Hook(format!("failed to enable mouse capture: {}", e)))?;

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let poll_interval = self.poll_interval;

        let spawned = thread::Builder::new()
            .name("gridterm-input".to_string())
            .spawn(move || {
                debug!("input thread started");
                while running.load(Ordering::Acquire) {
                    match event::poll(poll_interval) {
                        Ok(true) => match event::read() {
                            Ok(event) => deliver(event, sink.as_ref()),
                            Err(e) => {
                                warn!("failed to read terminal input: {}", e);
                                break;
                            }
                        },
                        Ok(false) => {}
                        Err(e) => {
                            warn!("failed to poll terminal input: {}", e);
                            break;
                        }
                    }
                }
                debug!("input thread exited");
            });

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                let mut stdout = io::stdout();
                let _ = crossterm::execute!(stdout, DisableMouseCapture);
                Err(Error::Hook(format!("failed to spawn input thread: {}", e)))
            }
        }
    }

    fn uninstall(&mut self) -> Result<()> {
        let Some(handle) = self.thread.take() else {
            return Ok(());
        };

        self.running.store(false, Ordering::Release);
        // Uninstalling from a sink callback runs on the delivery thread
        // itself; it exits on its own once the flag is observed.
        if handle.thread().id() != thread::current().id() && handle.join().is_err() {
            warn!("input thread panicked");
        }

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, DisableMouseCapture)
            .map_err(|e| Error::Hook(format!("failed to disable mouse capture: {}", e)))?;
        debug!("pointer hook uninstalled");
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for CrosstermHook {
    fn drop(&mut self) {
        if let Err(e) = self.uninstall() {
            warn!("failed to uninstall pointer hook on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<RawPointerEvent>>,
        interrupts: Mutex<usize>,
    }

    impl HookSink for RecordingSink {
        fn pointer(&self, event: RawPointerEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn interrupt(&self) {
            *self.interrupts.lock().unwrap() += 1;
        }
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_raw_kind_mapping() {
        assert_eq!(raw_kind(MouseEventKind::Moved), Some(RawPointerKind::Move));
        assert_eq!(
            raw_kind(MouseEventKind::Drag(MouseButton::Left)),
            Some(RawPointerKind::Move)
        );
        assert_eq!(
            raw_kind(MouseEventKind::Down(MouseButton::Left)),
            Some(RawPointerKind::LeftDown)
        );
        assert_eq!(
            raw_kind(MouseEventKind::Up(MouseButton::Right)),
            Some(RawPointerKind::RightUp)
        );
        assert_eq!(raw_kind(MouseEventKind::ScrollUp), Some(RawPointerKind::Wheel(1)));
        assert_eq!(raw_kind(MouseEventKind::ScrollDown), Some(RawPointerKind::Wheel(-1)));
        assert_eq!(raw_kind(MouseEventKind::Down(MouseButton::Middle)), None);
        assert_eq!(raw_kind(MouseEventKind::ScrollLeft), None);
    }

    #[test]
    fn test_interrupt_detection() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_interrupt(&ctrl_c));

        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!is_interrupt(&plain_c));
    }

    #[test]
    fn test_deliver_routes_events() {
        let sink = RecordingSink::default();
        deliver(Event::Mouse(mouse(MouseEventKind::Down(MouseButton::Left))), &sink);
        deliver(Event::Mouse(mouse(MouseEventKind::Down(MouseButton::Middle))), &sink);
        deliver(
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            &sink,
        );
        deliver(Event::FocusGained, &sink);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RawPointerKind::LeftDown);
        assert_eq!(*sink.interrupts.lock().unwrap(), 1);
    }

    #[test]
    fn test_uninstall_without_install_is_noop() {
        let mut hook = CrosstermHook::default();
        assert!(!hook.is_installed());
        assert!(hook.uninstall().is_ok());
        assert!(hook.uninstall().is_ok());
    }
}
