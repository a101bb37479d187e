//! Pointer hook driven by test code instead of a terminal.

use std::sync::{Arc, Mutex};

use gridterm_core::{Error, Result};

use crate::hook::{HookSink, PointerHook, RawPointerEvent};

#[derive(Default)]
struct ManualState {
    sink: Option<Arc<dyn HookSink>>,
    installs: usize,
    uninstalls: usize,
    fail_install: bool,
}

/// Hook whose events are injected by hand.
///
/// Clones share state: hand one clone to the engine and keep another to
/// inject events and inspect install/uninstall calls.
#[derive(Clone, Default)]
pub struct ManualHook {
    state: Arc<Mutex<ManualState>>,
}

impl ManualHook {
    /// Create an uninstalled hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `install` calls fail.
    pub fn fail_install(&self, fail: bool) {
        self.state.lock().unwrap().fail_install = fail;
    }

    /// Deliver `event` to the installed sink.
    ///
    /// Returns false if no sink is installed.
    pub fn inject(&self, event: RawPointerEvent) -> bool {
        // Release the lock before calling out; sinks may uninstall.
        let sink = self.state.lock().unwrap().sink.clone();
        match sink {
            Some(sink) => {
                sink.pointer(event);
                true
            }
            None => false,
        }
    }

    /// Deliver an interrupt to the installed sink.
    pub fn interrupt(&self) -> bool {
        let sink = self.state.lock().unwrap().sink.clone();
        match sink {
            Some(sink) => {
                sink.interrupt();
                true
            }
            None => false,
        }
    }

    /// Number of successful installs.
    pub fn install_count(&self) -> usize {
        self.state.lock().unwrap().installs
    }

    /// Number of uninstalls that removed a sink.
    pub fn uninstall_count(&self) -> usize {
        self.state.lock().unwrap().uninstalls
    }
}

impl PointerHook for ManualHook {
    fn install(&mut self, sink: Arc<dyn HookSink>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_install {
            return Err(Error::Hook("manual hook refused install".to_string()));
        }
        if state.sink.is_some() {
            return Err(Error::HookAlreadyInstalled);
        }
        state.sink = Some(sink);
        state.installs += 1;
        Ok(())
    }

    fn uninstall(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.sink.take().is_some() {
            state.uninstalls += 1;
        }
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.state.lock().unwrap().sink.is_some()
    }
}
