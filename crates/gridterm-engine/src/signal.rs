//! Blocking stop signal.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct SignalState {
    armed: bool,
    stopped: bool,
}

/// Latch the `run` thread blocks on until a stop is requested.
///
/// The latch only records a stop while it is armed, i.e. between `arm` and
/// `disarm`. Arming and clearing happen under one lock, so a stop issued
/// any time after `arm` succeeds is never lost, and a stop issued while no
/// run is in progress is not carried into the next one.
#[derive(Debug, Default)]
pub struct StopSignal {
    state: Mutex<SignalState>,
    condvar: Condvar,
}

impl StopSignal {
    /// Create a disarmed latch.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm the latch for a new run, dropping any earlier stop.
    ///
    /// Returns false if it is already armed.
    pub fn arm(&self) -> bool {
        let mut state = self.lock();
        if state.armed {
            return false;
        }
        state.armed = true;
        state.stopped = false;
        true
    }

    /// Disarm the latch once the run is over.
    pub fn disarm(&self) {
        let mut state = self.lock();
        state.armed = false;
        state.stopped = false;
    }

    /// True between `arm` and `disarm`.
    pub fn is_armed(&self) -> bool {
        self.lock().armed
    }

    /// Release every waiter. Idempotent; ignored while disarmed.
    pub fn notify(&self) {
        let mut state = self.lock();
        if state.armed {
            state.stopped = true;
            self.condvar.notify_all();
        }
    }

    /// True once `notify` has been called since the last `arm`.
    pub fn is_notified(&self) -> bool {
        self.lock().stopped
    }

    /// Block until notified.
    pub fn wait(&self) {
        let mut state = self.lock();
        while !state.stopped {
            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until notified or `timeout` elapses. Returns true if notified.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let state = self.lock();
        let (state, _) = self
            .condvar
            .wait_timeout_while(state, timeout, |state| !state.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        state.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_notify_releases_waiter() {
        let signal = Arc::new(StopSignal::new());
        assert!(signal.arm());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait())
        };

        signal.notify();
        waiter.join().unwrap();
        assert!(signal.is_notified());
    }

    #[test]
    fn test_notify_before_wait() {
        let signal = StopSignal::new();
        signal.arm();
        signal.notify();
        signal.notify();
        signal.wait();
        assert!(signal.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn test_arm_twice_fails() {
        let signal = StopSignal::new();
        assert!(signal.arm());
        assert!(!signal.arm());
        assert!(signal.is_armed());
        signal.disarm();
        assert!(!signal.is_armed());
        assert!(signal.arm());
    }

    #[test]
    fn test_notify_while_disarmed_is_dropped() {
        let signal = StopSignal::new();
        signal.notify();
        assert!(!signal.is_notified());

        assert!(signal.arm());
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn test_stop_right_after_arm_is_kept() {
        let signal = Arc::new(StopSignal::new());
        assert!(signal.arm());
        let stopper = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.notify())
        };
        stopper.join().unwrap();

        assert!(signal.wait_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn test_disarm_clears_stop() {
        let signal = StopSignal::new();
        signal.arm();
        signal.notify();
        signal.disarm();
        assert!(!signal.is_notified());
        signal.arm();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }
}
