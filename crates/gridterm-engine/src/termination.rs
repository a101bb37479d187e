//! Termination-signal handling.
//!
//! On unix a dedicated thread waits for SIGINT, SIGTERM and SIGHUP. When one
//! arrives it runs the engine's cleanup callback and then re-applies the
//! signal's default disposition, so the process still terminates the way it
//! would have without the engine. Cleanup is best effort: nothing waits for
//! the render or display threads before the process goes away.
//!
//! On other platforms the guard is inert.

use std::sync::Arc;

use gridterm_core::Result;

/// Cleanup callback run on a termination signal.
pub type CleanupFn = dyn Fn() + Send + Sync;

#[cfg(unix)]
mod imp {
    use std::thread::{self, JoinHandle};

    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::{Handle, Signals};
    use tracing::{debug, error, warn};

    use super::*;

    /// Signals that trigger cleanup.
    pub const TERMINATION_SIGNALS: [i32; 3] = [SIGINT, SIGTERM, SIGHUP];

    /// Installed termination handler. Dropping it unregisters the handler.
    #[derive(Debug)]
    pub struct TerminationGuard {
        handle: Handle,
        thread: Option<JoinHandle<()>>,
    }

    impl TerminationGuard {
        /// Register `cleanup` for the termination signals.
        pub fn install(cleanup: Arc<CleanupFn>) -> Result<Self> {
            let mut signals = Signals::new(TERMINATION_SIGNALS)?;
            let handle = signals.handle();
            let thread = thread::Builder::new()
                .name("gridterm-signals".to_string())
                .spawn(move || {
                    for signal in signals.forever() {
                        warn!(signal, "termination signal received, cleaning up");
                        cleanup();
                        if let Err(e) = signal_hook::low_level::emulate_default_handler(signal) {
                            error!("failed to apply default handler for signal {}: {}", signal, e);
                        }
                    }
                    debug!("signal thread exited");
                })?;

            debug!("termination handler installed");
            Ok(Self {
                handle,
                thread: Some(thread),
            })
        }
    }

    impl Drop for TerminationGuard {
        fn drop(&mut self) {
            self.handle.close();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
            debug!("termination handler removed");
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    /// Inert termination handler.
    #[derive(Debug)]
    pub struct TerminationGuard;

    impl TerminationGuard {
        /// No signals are watched on this platform.
        pub fn install(_cleanup: Arc<CleanupFn>) -> Result<Self> {
            Ok(Self)
        }
    }
}

pub use imp::TerminationGuard;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_install_and_drop_without_signal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let guard = TerminationGuard::install(Arc::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

        drop(guard);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_signal_set() {
        assert_eq!(imp::TERMINATION_SIGNALS.len(), 3);
        assert!(imp::TERMINATION_SIGNALS.contains(&signal_hook::consts::SIGTERM));
    }
}
