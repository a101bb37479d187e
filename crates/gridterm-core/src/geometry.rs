//! Geometry types for grid coordinates, console regions and pointer positions.

use serde::{Deserialize, Serialize};

/// Position in the cell grid (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0-based)
    pub row: u16,
    /// Column index (0-based)
    pub col: u16,
}

impl Position {
    /// Create a new position.
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Dimensions of a grid buffer or console surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows
    pub rows: u16,
    /// Number of columns
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Total cell count (rows * cols).
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// True if either axis is zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Check if a position lies inside `[0, cols) x [0, rows)`.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Bounds covering the full surface, anchored at the origin.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0, 0, self.cols, self.rows)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(25, 80)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Bounding box for a grid region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Starting row
    pub row: u16,
    /// Starting column
    pub col: u16,
    /// Width in columns
    pub width: u16,
    /// Height in rows
    pub height: u16,
}

impl Bounds {
    /// Create new bounds.
    pub fn new(row: u16, col: u16, width: u16, height: u16) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    /// Check if a position is contained within these bounds.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.row >= self.row
            && (pos.row as u32) < self.row as u32 + self.height as u32
            && pos.col >= self.col
            && (pos.col as u32) < self.col as u32 + self.width as u32
    }

    /// Clip these bounds so they lie within `dims`.
    ///
    /// Returns bounds with zero width/height when there is no overlap.
    pub fn clip_to(&self, dims: Dimensions) -> Bounds {
        let row = self.row.min(dims.rows);
        let col = self.col.min(dims.cols);
        let bottom = (self.row as u32 + self.height as u32).min(dims.rows as u32) as u16;
        let right = (self.col as u32 + self.width as u32).min(dims.cols as u32) as u16;
        Bounds::new(row, col, right.saturating_sub(col), bottom.saturating_sub(row))
    }

    /// True if the region covers no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A point in device space (pixels, or cells for terminals that do not
/// report pixel geometry).
///
/// Signed because pointer hooks report positions outside the console window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Client-area rectangle of the console window, in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClientRect {
    /// Screen x of the client origin
    pub left: i32,
    /// Screen y of the client origin
    pub top: i32,
    /// Client width
    pub width: u32,
    /// Client height
    pub height: u32,
}

impl ClientRect {
    /// Create a new client rectangle.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Translate a screen point into coordinates relative to the client origin.
    pub fn to_client(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.x.saturating_sub(self.left),
            point.y.saturating_sub(self.top),
        )
    }

    /// True if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
