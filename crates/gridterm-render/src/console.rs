//! Console device contract.
//!
//! These are the only primitives the engine needs from the host console.
//! [`crate::CrosstermConsole`] implements them on a real terminal and
//! [`crate::testing::MemoryConsole`] records them for tests.

use gridterm_core::{Bounds, ClientRect, Dimensions, Result, ScreenPoint};

use crate::grid::GridBuffer;

/// A console surface that cell regions can be written to.
///
/// Implementations are shared between the display thread, the input hook
/// and the lifecycle controller, so every method takes `&self`.
pub trait ConsoleDevice: Send + Sync {
    /// Prepare the surface for a grid of `dimensions` cells.
    fn configure(&self, dimensions: Dimensions) -> Result<()>;

    /// Show or hide the text cursor.
    fn set_cursor_visible(&self, visible: bool) -> Result<()>;

    /// Current console size in cells.
    fn size(&self) -> Result<Dimensions>;

    /// Write one rectangular region of `buffer` to the surface.
    ///
    /// Parts of `region` outside the buffer are clipped.
    fn write_region(&self, buffer: &GridBuffer, region: Bounds) -> Result<()>;

    /// Client-area rectangle of the console window, in device units.
    fn client_rect(&self) -> Result<ClientRect>;

    /// Convert a screen point to coordinates relative to the client origin.
    fn screen_to_client(&self, point: ScreenPoint) -> Result<ScreenPoint>;

    /// Undo [`ConsoleDevice::configure`] and show the cursor again.
    fn restore(&self) -> Result<()>;
}
