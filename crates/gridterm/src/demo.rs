//! Demo application: a mark board driven by the mouse.
//!
//! Left click toggles a mark under the pointer, right click clears the
//! board, the wheel cycles the mark color. The pointer cell is drawn as a
//! crosshair and the bottom row shows frame and pointer status.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use gridterm_core::{Cell, CellAttributes, CellStyle, Color, PointerEvent, PointerEventKind, Position};
use gridterm_engine::Engine;
use gridterm_render::PaintContext;

const TITLE: &str = " gridterm | click: mark | right click: clear | wheel: color | ctrl+c: quit";

const PALETTE: [Color; 6] = [
    Color::Green,
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

#[derive(Debug, Default)]
struct DemoState {
    pointer: Option<Position>,
    marks: BTreeSet<Position>,
    palette: usize,
    frames: u64,
}

impl DemoState {
    fn mark_style(&self) -> CellStyle {
        CellStyle::new(PALETTE[self.palette], Color::Default)
            .with_attrs(CellAttributes::default().with_bold())
    }

    fn scroll(&mut self, delta: i16) {
        let len = PALETTE.len() as i64;
        self.palette = (self.palette as i64 + delta as i64).rem_euclid(len) as usize;
    }

    fn paint(&mut self, ctx: &mut PaintContext<'_>) {
        self.frames = ctx.frame() + 1;
        ctx.clear(CellStyle::default());

        let mark_style = self.mark_style();
        let buffer = ctx.buffer_mut();
        for mark in &self.marks {
            buffer.set(mark.row, mark.col, Cell::styled('#', mark_style));
        }

        if let Some(pointer) = self.pointer {
            let cursor = CellStyle::default().with_attrs(CellAttributes::default().with_reverse());
            let ch = if self.marks.contains(&pointer) { '#' } else { '+' };
            buffer.set(pointer.row, pointer.col, Cell::styled(ch, cursor));
        }

        let bar = CellStyle::new(Color::Black, Color::White);
        let width = buffer.width();
        let height = buffer.height();
        buffer.put_str(0, 0, &format!("{:<1$}", TITLE, width as usize), bar);

        let pointer = match self.pointer {
            Some(p) => format!("{},{}", p.col, p.row),
            None => "-".to_string(),
        };
        let status = format!(
            " frame {}  marks {}  pointer {}  {}x{}",
            self.frames,
            self.marks.len(),
            pointer,
            width,
            height
        );
        if height > 1 {
            buffer.put_str(height - 1, 0, &format!("{:<1$}", status, width as usize), bar);
        }
    }

    fn pointer(&mut self, event: &PointerEvent) {
        self.pointer = Some(event.position);
        match event.kind {
            PointerEventKind::PrimaryDown => {
                if !self.marks.remove(&event.position) {
                    self.marks.insert(event.position);
                }
            }
            PointerEventKind::SecondaryDown => self.marks.clear(),
            PointerEventKind::Scroll { delta } => self.scroll(delta),
            _ => {}
        }
    }
}

/// Demo handlers attached to an engine.
#[derive(Debug, Clone)]
pub struct Demo {
    state: Arc<Mutex<DemoState>>,
}

impl Demo {
    /// Subscribe the demo's paint and pointer handlers.
    pub fn install(engine: &Engine) -> Self {
        let state = Arc::new(Mutex::new(DemoState::default()));

        let paint_state = Arc::clone(&state);
        engine.on_paint(move |ctx: &mut PaintContext<'_>| {
            paint_state.lock().unwrap().paint(ctx);
        });

        let subscribe = |handler_state: Arc<Mutex<DemoState>>| {
            move |event: &PointerEvent| handler_state.lock().unwrap().pointer(event)
        };
        engine.on_pointer_move(subscribe(Arc::clone(&state)));
        engine.on_primary_down(subscribe(Arc::clone(&state)));
        engine.on_secondary_down(subscribe(Arc::clone(&state)));
        engine.on_scroll(subscribe(Arc::clone(&state)));

        Self { state }
    }

    /// Frames painted so far.
    pub fn frames(&self) -> u64 {
        self.state.lock().unwrap().frames
    }

    /// Marked cells, in row-major order.
    pub fn marks(&self) -> Vec<Position> {
        self.state.lock().unwrap().marks.iter().copied().collect()
    }

    /// Last cell under the pointer.
    pub fn pointer(&self) -> Option<Position> {
        self.state.lock().unwrap().pointer
    }

    /// Current mark color.
    pub fn color(&self) -> Color {
        PALETTE[self.state.lock().unwrap().palette]
    }
}
