//! Client-coordinate to grid-cell mapping.

use gridterm_core::{ClientRect, Dimensions, Position, ScreenPoint};

/// Scale one axis: `raw * cells / extent`, truncated toward zero.
///
/// Integer arithmetic keeps the result exact and monotonic in `raw`.
/// Returns `None` for a zero extent.
pub fn scale_axis(raw: i32, extent: u32, cells: u16) -> Option<i64> {
    if extent == 0 {
        return None;
    }
    Some(raw as i64 * cells as i64 / extent as i64)
}

/// Map a client-relative point onto a grid cell.
///
/// Returns `None` when the client rect is empty or the resulting cell lies
/// outside `[0, cols) x [0, rows)`.
pub fn map_to_cell(point: ScreenPoint, client: ClientRect, grid: Dimensions) -> Option<Position> {
    let col = scale_axis(point.x, client.width, grid.cols)?;
    let row = scale_axis(point.y, client.height, grid.rows)?;

    if col < 0 || row < 0 || col >= grid.cols as i64 || row >= grid.rows as i64 {
        return None;
    }

    Some(Position::new(row as u16, col as u16))
}
