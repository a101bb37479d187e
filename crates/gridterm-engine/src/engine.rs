//! The engine context: buffers, loops, input hook and lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn};

use gridterm_core::{
    CellStyle, Dimensions, EngineSettings, Error, HandlerId, PointerEvent, Result,
};
use gridterm_input::{CrosstermHook, PointerDispatcher, PointerHook};
use gridterm_render::{
    spawn_display_loop, spawn_render_loop, BufferPipeline, ConsoleDevice, CrosstermConsole,
    DisplaySettings, GridBuffer, PaintContext,
};

use crate::events::EngineEvents;
use crate::id::EngineId;
use crate::signal::StopSignal;
use crate::termination::{CleanupFn, TerminationGuard};

/// Cloneable handle for stopping an engine from handlers or other threads.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    enabled: Arc<AtomicBool>,
    signal: Arc<StopSignal>,
}

impl EngineHandle {
    /// Request a stop. Non-blocking and idempotent.
    ///
    /// The loops observe the request on their next iteration; the blocked
    /// `run` call wakes up immediately.
    pub fn stop(&self) {
        if self.enabled.swap(false, Ordering::AcqRel) {
            info!("stop requested");
        }
        self.signal.notify();
    }

    /// True while the loops are meant to run.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Terminal-graphics engine.
///
/// Owns the buffer pipeline, the enabled flag and the event lists. Several
/// engines may coexist; each run gets a fresh pipeline.
pub struct Engine {
    id: EngineId,
    settings: EngineSettings,
    console: Arc<dyn ConsoleDevice>,
    hook: Arc<Mutex<Box<dyn PointerHook>>>,
    handle: EngineHandle,
    pipeline: RwLock<Option<Arc<BufferPipeline>>>,
    events: EngineEvents,
}

impl Engine {
    /// Create an engine on the given console device and pointer hook.
    pub fn new(
        settings: EngineSettings,
        console: Arc<dyn ConsoleDevice>,
        hook: Box<dyn PointerHook>,
    ) -> Self {
        Self {
            id: EngineId::new(),
            settings,
            console,
            hook: Arc::new(Mutex::new(hook)),
            handle: EngineHandle {
                enabled: Arc::new(AtomicBool::new(false)),
                signal: Arc::new(StopSignal::new()),
            },
            pipeline: RwLock::new(None),
            events: EngineEvents::new(),
        }
    }

    /// Create an engine on the controlling terminal.
    pub fn with_terminal(settings: EngineSettings) -> Self {
        let hook = CrosstermHook::new(Duration::from_millis(settings.hook_poll_ms));
        Self::new(settings, Arc::new(CrosstermConsole::new()), Box::new(hook))
    }

    /// Engine identifier.
    pub fn id(&self) -> EngineId {
        self.id
    }

    /// Settings the engine was created with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Event lists.
    pub fn events(&self) -> &EngineEvents {
        &self.events
    }

    /// Handle for stopping the engine from elsewhere.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// True while the loops are meant to run.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_enabled()
    }

    /// True while a `run` call is in progress.
    pub fn is_running(&self) -> bool {
        self.handle.signal.is_armed()
    }

    /// Request a stop. See [`EngineHandle::stop`].
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Pipeline of the current or most recent run.
    pub fn pipeline(&self) -> Option<Arc<BufferPipeline>> {
        self.pipeline.read().unwrap().clone()
    }

    /// Active buffer dimensions, once a run has allocated the buffers.
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.pipeline().map(|pipeline| pipeline.dimensions())
    }

    /// Mutate the active buffer outside of a paint handler.
    ///
    /// Returns `None` before the first run, or when called from a paint
    /// handler: the render loop holds the active buffer while painting, so
    /// handlers go through their [`PaintContext`] instead.
    pub fn with_active<R>(&self, f: impl FnOnce(&mut GridBuffer) -> R) -> Option<R> {
        self.pipeline().and_then(|pipeline| pipeline.with_active(f))
    }

    /// Clear the active buffer to empty cells carrying `style`.
    ///
    /// Safe to call at any time, including from a paint handler, where the
    /// clear lands on the frame being painted before the handler's next
    /// access through its [`PaintContext`]. Returns false before the first
    /// run.
    pub fn clear(&self, style: CellStyle) -> bool {
        match self.pipeline() {
            Some(pipeline) => {
                pipeline.clear(style);
                true
            }
            None => false,
        }
    }

    /// Subscribe to `starting`.
    pub fn on_starting<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Dimensions) + Send + Sync + 'static,
    {
        self.events.starting.subscribe(Arc::new(handler))
    }

    /// Subscribe to `paint`.
    pub fn on_paint<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&mut PaintContext<'_>) + Send + Sync + 'static,
    {
        self.events.paint.subscribe(Arc::new(handler))
    }

    /// Subscribe to pointer moves.
    pub fn on_pointer_move<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.pointer_move.subscribe(Arc::new(handler))
    }

    /// Subscribe to primary button presses.
    pub fn on_primary_down<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.primary_down.subscribe(Arc::new(handler))
    }

    /// Subscribe to primary button releases.
    pub fn on_primary_up<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.primary_up.subscribe(Arc::new(handler))
    }

    /// Subscribe to secondary button presses.
    pub fn on_secondary_down<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.secondary_down.subscribe(Arc::new(handler))
    }

    /// Subscribe to secondary button releases.
    pub fn on_secondary_up<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.secondary_up.subscribe(Arc::new(handler))
    }

    /// Subscribe to wheel scrolls.
    pub fn on_scroll<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        self.events.pointer.scroll.subscribe(Arc::new(handler))
    }

    /// Subscribe to `stopped`.
    pub fn on_stopped<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&EngineId) + Send + Sync + 'static,
    {
        self.events.stopped.subscribe(Arc::new(handler))
    }

    /// Run with the width, height and refresh interval from the settings.
    pub fn run_configured(&self) -> Result<()> {
        self.run(
            self.settings.width,
            self.settings.height,
            self.settings.refresh_interval_ms,
        )
    }

    /// Start the engine and block until it is stopped.
    ///
    /// Arguments are validated before the console is touched or any thread
    /// is spawned. When this returns, the render and display threads have
    /// exited, the hook is uninstalled and the console is restored.
    pub fn run(&self, width: u16, height: u16, refresh_interval_ms: u64) -> Result<()> {
        let span = info_span!("engine", id = %self.id);
        let _enter = span.enter();

        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                rows: height,
                cols: width,
            });
        }
        if refresh_interval_ms == 0 {
            return Err(Error::InvalidRefreshInterval(refresh_interval_ms));
        }
        // Arming claims the run; stops from here on are honored
        if !self.handle.signal.arm() {
            return Err(Error::AlreadyRunning);
        }

        let result = self.run_inner(Dimensions::new(height, width), refresh_interval_ms);
        self.handle.signal.disarm();
        result
    }

    fn run_inner(&self, dimensions: Dimensions, refresh_interval_ms: u64) -> Result<()> {
        info!(
            "engine starting: dimensions={}, refresh={}ms",
            dimensions, refresh_interval_ms
        );
        if let Err(e) = self.prepare_console(dimensions) {
            error!("console setup failed: {}", e);
            self.restore_console();
            return Err(e);
        }

        let pipeline = match BufferPipeline::initialize(dimensions, self.settings.clear_style) {
            Ok(pipeline) => Arc::new(pipeline),
            Err(e) => {
                self.restore_console();
                return Err(e);
            }
        };
        *self.pipeline.write().unwrap() = Some(Arc::clone(&pipeline));

        self.events.starting.emit(&dimensions);
        self.handle.enabled.store(true, Ordering::Release);

        let mut workers = Vec::with_capacity(2);
        let guard = match self.start(&pipeline, dimensions, refresh_interval_ms, &mut workers) {
            Ok(guard) => guard,
            Err(e) => {
                error!("engine start failed: {}", e);
                self.handle.stop();
                self.teardown(workers, None);
                return Err(e);
            }
        };

        info!("engine running");
        self.handle.signal.wait();

        self.handle.stop();
        self.teardown(workers, guard);
        info!("engine stopped");
        self.events.stopped.emit(&self.id);
        Ok(())
    }

    fn prepare_console(&self, dimensions: Dimensions) -> Result<()> {
        self.console.configure(dimensions)?;
        self.console.set_cursor_visible(false)
    }

    fn start(
        &self,
        pipeline: &Arc<BufferPipeline>,
        dimensions: Dimensions,
        refresh_interval_ms: u64,
        workers: &mut Vec<JoinHandle<()>>,
    ) -> Result<Option<TerminationGuard>> {
        workers.push(spawn_render_loop(
            Arc::clone(pipeline),
            Arc::clone(&self.handle.enabled),
            Duration::from_millis(refresh_interval_ms),
            Some(self.events.paint_dispatcher()),
        )?);

        workers.push(spawn_display_loop(
            Arc::clone(pipeline),
            Arc::clone(&self.console),
            Arc::clone(&self.handle.enabled),
            DisplaySettings {
                interval: Duration::from_millis(self.settings.display_interval_ms),
                skip_unchanged_frames: self.settings.skip_unchanged_frames,
            },
        )?);
        debug!("render and display loops spawned");

        let handle = self.handle();
        let dispatcher = PointerDispatcher::new(
            Arc::clone(&self.console),
            dimensions,
            Arc::clone(&self.events.pointer),
        )
        .with_interrupt(Arc::new(move || handle.stop()));
        self.hook.lock().unwrap().install(Arc::new(dispatcher))?;
        debug!("pointer hook installed");

        if !self.settings.handle_termination {
            return Ok(None);
        }
        TerminationGuard::install(self.termination_cleanup()).map(Some)
    }

    fn termination_cleanup(&self) -> Arc<CleanupFn> {
        let hook = Arc::clone(&self.hook);
        let handle = self.handle();
        let console = Arc::clone(&self.console);
        Arc::new(move || {
            if let Err(e) = hook.lock().unwrap().uninstall() {
                warn!("failed to uninstall pointer hook: {}", e);
            }
            handle.stop();
            if let Err(e) = console.restore() {
                warn!("failed to restore console: {}", e);
            }
        })
    }

    fn teardown(&self, workers: Vec<JoinHandle<()>>, guard: Option<TerminationGuard>) {
        drop(guard);

        for worker in workers {
            if worker.join().is_err() {
                error!("engine worker thread panicked");
            }
        }
        debug!("render and display loops joined");

        if let Err(e) = self.hook.lock().unwrap().uninstall() {
            warn!("failed to uninstall pointer hook: {}", e);
        }
        self.restore_console();
    }

    fn restore_console(&self) {
        if let Err(e) = self.console.restore() {
            warn!("failed to restore console: {}", e);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("enabled", &self.is_enabled())
            .field("running", &self.is_running())
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridterm_input::testing::ManualHook;
    use gridterm_render::testing::MemoryConsole;

    fn test_settings() -> EngineSettings {
        EngineSettings {
            handle_termination: false,
            ..EngineSettings::default()
        }
    }

    fn engine() -> (Engine, Arc<MemoryConsole>, ManualHook) {
        let console = Arc::new(MemoryConsole::new(Dimensions::new(25, 80)));
        let hook = ManualHook::new();
        let engine = Engine::new(test_settings(), console.clone(), Box::new(hook.clone()));
        (engine, console, hook)
    }

    #[test]
    fn test_new_engine_is_idle() {
        let (engine, _console, hook) = engine();
        assert!(!engine.is_enabled());
        assert!(!engine.is_running());
        assert!(engine.pipeline().is_none());
        assert!(engine.dimensions().is_none());
        assert!(!engine.clear(CellStyle::default()));
        assert!(!hook.is_installed());
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let (engine, console, _hook) = engine();
        assert!(matches!(
            engine.run(80, 25, 0),
            Err(Error::InvalidRefreshInterval(0))
        ));
        assert!(console.configured().is_none());
    }

    #[test]
    fn test_stop_from_starting_handler() {
        let (engine, console, hook) = engine();
        let handle = engine.handle();
        engine.on_starting(move |_| handle.stop());

        engine.run(10, 5, 1).unwrap();

        assert!(!engine.is_enabled());
        assert!(!engine.is_running());
        assert!(!hook.is_installed());
        assert!(console.restored());
        assert_eq!(engine.dimensions(), Some(Dimensions::new(5, 10)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (engine, _console, _hook) = engine();
        engine.stop();
        engine.stop();
        assert!(!engine.is_enabled());
    }

    #[test]
    fn test_debug_output() {
        let (engine, _console, _hook) = engine();
        let debug = format!("{:?}", engine);
        assert!(debug.contains("Engine"));
        assert!(debug.contains(&engine.id().to_string()));
    }
}
