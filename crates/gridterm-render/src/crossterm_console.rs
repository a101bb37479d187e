//! Console device backed by crossterm escape sequences.
//!
//! | Primitive | Sequence / call |
//! |-----------|-----------------|
//! | configure | raw mode, `CSI ? 1049 h`, clear, `CSI 8 ; rows ; cols t` (best effort) |
//! | cursor | `CSI ? 25 h` / `CSI ? 25 l` |
//! | write region | `CSI ? 2026 h`, per-row `CUP` + SGR + text, `CSI ? 2026 l` |
//! | client rect | `TIOCGWINSZ` pixel size, falling back to cell units |
//!
//! Terminals report pointer positions relative to their own surface, so the
//! client origin is always (0, 0) and `screen_to_client` is the identity.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use tracing::{debug, info, warn};

use gridterm_core::{Bounds, CellStyle, ClientRect, Color, Dimensions, Error, Result, ScreenPoint};

use crate::console::ConsoleDevice;
use crate::grid::GridBuffer;

/// Terminal geometry: cell grid size plus pixel size when the terminal
/// reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalMetrics {
    /// Columns
    pub columns: u16,
    /// Rows
    pub rows: u16,
    /// Surface width in pixels (0 if unknown)
    pub pixel_width: u16,
    /// Surface height in pixels (0 if unknown)
    pub pixel_height: u16,
}

impl TerminalMetrics {
    /// Query the controlling terminal.
    pub fn query() -> io::Result<Self> {
        match terminal::window_size() {
            Ok(size) => Ok(Self {
                columns: size.columns,
                rows: size.rows,
                pixel_width: size.width,
                pixel_height: size.height,
            }),
            Err(_) => {
                let (columns, rows) = terminal::size()?;
                Ok(Self {
                    columns,
                    rows,
                    pixel_width: 0,
                    pixel_height: 0,
                })
            }
        }
    }

    /// True if pixel geometry is available.
    pub fn has_pixels(&self) -> bool {
        self.pixel_width > 0 && self.pixel_height > 0 && self.columns > 0 && self.rows > 0
    }

    /// Client rectangle in device units (pixels, or cells without pixel info).
    pub fn client_rect(&self) -> ClientRect {
        if self.has_pixels() {
            ClientRect::new(0, 0, self.pixel_width as u32, self.pixel_height as u32)
        } else {
            ClientRect::new(0, 0, self.columns as u32, self.rows as u32)
        }
    }

    /// Device-space point at the centre of a terminal cell.
    pub fn cell_to_device(&self, col: u16, row: u16) -> ScreenPoint {
        if self.has_pixels() {
            let cell_w = self.pixel_width as i64 * 1_000 / self.columns as i64;
            let cell_h = self.pixel_height as i64 * 1_000 / self.rows as i64;
            ScreenPoint::new(
                ((col as i64 * cell_w + cell_w / 2) / 1_000) as i32,
                ((row as i64 * cell_h + cell_h / 2) / 1_000) as i32,
            )
        } else {
            ScreenPoint::new(col as i32, row as i32)
        }
    }
}

#[derive(Debug, Default)]
struct ConsoleState {
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
}

/// Real terminal console.
#[derive(Debug, Default)]
pub struct CrosstermConsole {
    state: Mutex<ConsoleState>,
}

impl CrosstermConsole {
    /// Create a console handle. Nothing is changed until `configure`.
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(bytes: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
    }
}

fn console_error(context: &str, err: io::Error) -> Error {
    Error::Console(format!("{context}: {err}"))
}

impl ConsoleDevice for CrosstermConsole {
    fn configure(&self, dimensions: Dimensions) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        if !state.raw_mode {
            terminal::enable_raw_mode().map_err(|e| console_error("enable raw mode", e))?;
            state.raw_mode = true;
            debug!("terminal raw mode enabled");
        }

        let mut out = Vec::new();
        if !state.alternate_screen {
            queue!(out, terminal::EnterAlternateScreen)?;
            state.alternate_screen = true;
        }
        queue!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
        Self::flush(&out).map_err(|e| console_error("configure", e))?;

        // Many terminals ignore resize requests; the display loop clips to
        // whatever size is actually in effect.
        let mut stdout = io::stdout();
        if let Err(e) = crossterm::execute!(stdout, terminal::SetSize(dimensions.cols, dimensions.rows))
        {
            debug!("terminal resize request to {} ignored: {}", dimensions, e);
        }

        info!("console configured for {} grid", dimensions);
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<()> {
        let mut out = Vec::new();
        if visible {
            queue!(out, cursor::Show)?;
        } else {
            queue!(out, cursor::Hide)?;
        }
        Self::flush(&out).map_err(|e| console_error("cursor visibility", e))?;
        self.state.lock().unwrap().cursor_hidden = !visible;
        Ok(())
    }

    fn size(&self) -> Result<Dimensions> {
        let (cols, rows) = terminal::size().map_err(|e| console_error("query size", e))?;
        Ok(Dimensions::new(rows, cols))
    }

    fn write_region(&self, buffer: &GridBuffer, region: Bounds) -> Result<()> {
        let mut out = Vec::with_capacity(buffer.cells().len() * 4);
        encode_region(buffer, region, &mut out)?;
        Self::flush(&out).map_err(|e| console_error("write region", e))
    }

    fn client_rect(&self) -> Result<ClientRect> {
        let metrics = TerminalMetrics::query().map_err(|e| console_error("query geometry", e))?;
        Ok(metrics.client_rect())
    }

    fn screen_to_client(&self, point: ScreenPoint) -> Result<ScreenPoint> {
        Ok(point)
    }

    fn restore(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let mut out = Vec::new();
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, cursor::Show)?;
        state.cursor_hidden = false;
        if state.alternate_screen {
            queue!(out, terminal::LeaveAlternateScreen)?;
            state.alternate_screen = false;
        }
        if let Err(e) = Self::flush(&out) {
            warn!("failed to restore terminal screen: {}", e);
        }
        if state.raw_mode {
            terminal::disable_raw_mode().map_err(|e| console_error("disable raw mode", e))?;
            state.raw_mode = false;
            debug!("terminal raw mode disabled");
        }
        Ok(())
    }
}

impl Drop for CrosstermConsole {
    fn drop(&mut self) {
        let needs_restore = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.raw_mode || state.alternate_screen || state.cursor_hidden
        };
        if needs_restore {
            let _ = self.restore();
        }
    }
}

/// Encode one region of `buffer` as escape sequences.
///
/// Style changes are only emitted when the style differs from the previous
/// cell. The whole region is wrapped in a synchronized update.
pub fn encode_region<W: Write>(buffer: &GridBuffer, region: Bounds, out: &mut W) -> io::Result<()> {
    let clipped = region.clip_to(buffer.dimensions());
    if clipped.is_empty() {
        return Ok(());
    }

    queue!(out, terminal::BeginSynchronizedUpdate)?;
    let mut last_style: Option<CellStyle> = None;
    for row in clipped.row..clipped.row + clipped.height {
        queue!(out, cursor::MoveTo(clipped.col, row))?;
        let Some(cells) = buffer.row(row) else {
            continue;
        };
        let span = &cells[clipped.col as usize..(clipped.col + clipped.width) as usize];
        for cell in span {
            if last_style != Some(cell.style) {
                write_style(out, cell.style)?;
                last_style = Some(cell.style);
            }
            let ch = if cell.character.is_control() { ' ' } else { cell.character };
            queue!(out, Print(ch))?;
        }
    }
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        ResetColor,
        terminal::EndSynchronizedUpdate
    )?;
    Ok(())
}

fn write_style<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(to_crossterm_color(style.fg)),
        SetBackgroundColor(to_crossterm_color(style.bg))
    )?;
    let attrs = style.attrs;
    if attrs.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if attrs.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if attrs.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if attrs.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

/// Map a cell color onto crossterm's palette.
pub fn to_crossterm_color(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as Ct;
    match color {
        Color::Default => Ct::Reset,
        Color::Black => Ct::Black,
        Color::Red => Ct::DarkRed,
        Color::Green => Ct::DarkGreen,
        Color::Yellow => Ct::DarkYellow,
        Color::Blue => Ct::DarkBlue,
        Color::Magenta => Ct::DarkMagenta,
        Color::Cyan => Ct::DarkCyan,
        Color::White => Ct::Grey,
        Color::BrightBlack => Ct::DarkGrey,
        Color::BrightRed => Ct::Red,
        Color::BrightGreen => Ct::Green,
        Color::BrightYellow => Ct::Yellow,
        Color::BrightBlue => Ct::Blue,
        Color::BrightMagenta => Ct::Magenta,
        Color::BrightCyan => Ct::Cyan,
        Color::BrightWhite => Ct::White,
        Color::Indexed(value) => Ct::AnsiValue(value),
        Color::Rgb { r, g, b } => Ct::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridterm_core::{Cell, CellAttributes};

    fn encode(buffer: &GridBuffer, region: Bounds) -> String {
        let mut out = Vec::new();
        encode_region(buffer, region, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_region_contains_text_and_positions() {
        let mut buffer = GridBuffer::new(Dimensions::new(2, 4));
        buffer.put_str(0, 0, "ab", CellStyle::default());
        buffer.put_str(1, 0, "cd", CellStyle::default());

        let encoded = encode(&buffer, buffer.dimensions().bounds());
        assert!(encoded.contains("ab  "));
        assert!(encoded.contains("cd  "));
        // CUP is 1-based: row 2, col 1
        assert!(encoded.contains("\x1b[2;1H"));
        assert!(encoded.starts_with("\x1b[?2026h"));
        assert!(encoded.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn test_encode_region_emits_style_once_per_run() {
        let mut buffer = GridBuffer::new(Dimensions::new(1, 6));
        let style = CellStyle::new(Color::Indexed(42), Color::Default)
            .with_attrs(CellAttributes::default().with_bold());
        buffer.put_str(0, 0, "xyz", style);

        let encoded = encode(&buffer, buffer.dimensions().bounds());
        assert_eq!(encoded.matches("38;5;42").count(), 1);
        assert!(encoded.contains("xyz"));
    }

    #[test]
    fn test_encode_region_clips_and_sanitizes() {
        let mut buffer = GridBuffer::new(Dimensions::new(2, 3));
        buffer.set(0, 0, Cell::new('\x07'));

        let encoded = encode(&buffer, Bounds::new(0, 0, 200, 200));
        assert!(!encoded.contains('\x07'));

        let empty = encode(&buffer, Bounds::new(5, 5, 1, 1));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_metrics_without_pixels_use_cells() {
        let metrics = TerminalMetrics {
            columns: 80,
            rows: 25,
            pixel_width: 0,
            pixel_height: 0,
        };
        assert!(!metrics.has_pixels());
        assert_eq!(metrics.client_rect(), ClientRect::new(0, 0, 80, 25));
        assert_eq!(metrics.cell_to_device(10, 3), ScreenPoint::new(10, 3));
    }

    #[test]
    fn test_metrics_with_pixels_center_cells() {
        let metrics = TerminalMetrics {
            columns: 80,
            rows: 25,
            pixel_width: 640,
            pixel_height: 400,
        };
        assert_eq!(metrics.client_rect(), ClientRect::new(0, 0, 640, 400));
        assert_eq!(metrics.cell_to_device(0, 0), ScreenPoint::new(4, 8));
        assert_eq!(metrics.cell_to_device(79, 24), ScreenPoint::new(636, 392));
    }

    #[test]
    fn test_color_mapping() {
        use crossterm::style::Color as Ct;
        assert_eq!(to_crossterm_color(Color::Default), Ct::Reset);
        assert_eq!(to_crossterm_color(Color::Red), Ct::DarkRed);
        assert_eq!(to_crossterm_color(Color::BrightRed), Ct::Red);
        assert_eq!(to_crossterm_color(Color::Indexed(7)), Ct::AnsiValue(7));
        assert_eq!(
            to_crossterm_color(Color::Rgb { r: 1, g: 2, b: 3 }),
            Ct::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
