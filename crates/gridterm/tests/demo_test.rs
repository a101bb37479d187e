//! Integration tests for the demo application and configuration loading.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gridterm::{CliOptions, Demo};
use gridterm_core::{Color, Dimensions, EngineSettings, Position};
use gridterm_engine::Engine;
use gridterm_input::testing::ManualHook;
use gridterm_input::{PointerHook, RawPointerEvent, RawPointerKind};
use gridterm_render::testing::MemoryConsole;

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

#[test]
fn test_demo_reacts_to_pointer_and_paints() {
    let settings = EngineSettings {
        width: 40,
        height: 10,
        refresh_interval_ms: 1,
        handle_termination: false,
        ..EngineSettings::default()
    };
    let console = Arc::new(MemoryConsole::new(Dimensions::new(10, 40)));
    let hook = ManualHook::new();
    let engine = Arc::new(Engine::new(settings, console.clone(), Box::new(hook.clone())));
    let demo = Demo::install(&engine);

    let runner = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.run_configured())
    };
    assert!(wait_until(Duration::from_secs(5), || hook.is_installed()));

    hook.inject(RawPointerEvent::new(RawPointerKind::LeftDown, 7, 4));
    hook.inject(RawPointerEvent::new(RawPointerKind::Wheel(1), 7, 4));
    assert_eq!(demo.marks(), vec![Position::new(4, 7)]);
    assert_eq!(demo.pointer(), Some(Position::new(4, 7)));
    assert_eq!(demo.color(), Color::Yellow);

    assert!(wait_until(Duration::from_secs(5), || {
        console
            .last_buffer()
            .and_then(|buffer| buffer.cell(4, 7).map(|cell| cell.character))
            == Some('#')
    }));
    assert!(console.last_frame().unwrap().starts_with(" gridterm"));

    assert!(hook.interrupt());
    runner.join().unwrap().unwrap();
    assert!(demo.frames() > 0);
}

#[test]
fn test_config_file_with_overrides() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "engine:\n  width: 100\n  height: 40\n  refresh_interval_ms: 7\nlogging:\n  level: debug"
    )
    .unwrap();

    let path = file.path().to_string_lossy().to_string();
    let options = CliOptions::parse(["--config", path.as_str(), "--height", "20"]).unwrap();
    let config = options.load_config().unwrap();

    assert_eq!(config.engine.width, 100);
    assert_eq!(config.engine.height, 20);
    assert_eq!(config.engine.refresh_interval_ms, 7);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_config_file_fails() {
    let options = CliOptions::parse(["--config", "/nonexistent/gridterm.yaml"]).unwrap();
    assert!(options.load_config().is_err());
}
