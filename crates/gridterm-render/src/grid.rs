//! Fixed-size grid buffer of character/attribute cells.

use gridterm_core::{Bounds, Cell, CellStyle, Dimensions, Error, Result};

/// A full frame of cells.
///
/// Dimensions are fixed for the buffer's lifetime; there is no resize.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBuffer {
    /// Cell storage (row-major order)
    cells: Vec<Cell>,
    /// Grid dimensions
    dimensions: Dimensions,
}

impl GridBuffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to default (empty space).
    pub fn new(dimensions: Dimensions) -> Self {
        Self::filled(dimensions, CellStyle::default())
    }

    /// Create a new buffer with every cell cleared to `style`.
    pub fn filled(dimensions: Dimensions, style: CellStyle) -> Self {
        Self {
            cells: vec![Cell::blank(style); dimensions.cell_count()],
            dimensions,
        }
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.dimensions.rows && col < self.dimensions.cols {
            Some(row as usize * self.dimensions.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// Get cell at position (immutable).
    ///
    /// Returns None if position is out of bounds.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).and_then(|idx| self.cells.get(idx))
    }

    /// Get mutable cell at position.
    ///
    /// Returns None if position is out of bounds.
    pub fn cell_mut(&mut self, row: u16, col: u16) -> Option<&mut Cell> {
        self.index(row, col).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Set a cell. Out-of-bounds writes are ignored and return false.
    pub fn set(&mut self, row: u16, col: u16, cell: Cell) -> bool {
        match self.cell_mut(row, col) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Get entire row as a slice.
    ///
    /// Returns None if row is out of bounds.
    pub fn row(&self, row: u16) -> Option<&[Cell]> {
        if row < self.dimensions.rows {
            let start = row as usize * self.dimensions.cols as usize;
            let end = start + self.dimensions.cols as usize;
            Some(&self.cells[start..end])
        } else {
            None
        }
    }

    /// Raw cell grid in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable raw cell grid in row-major order.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Get dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width in columns.
    pub fn width(&self) -> u16 {
        self.dimensions.cols
    }

    /// Height in rows.
    pub fn height(&self) -> u16 {
        self.dimensions.rows
    }

    /// Reset every cell to an empty character carrying `style`.
    pub fn clear(&mut self, style: CellStyle) {
        self.cells.fill(Cell::blank(style));
    }

    /// Clear a specific region to `style`, clipped to the buffer.
    pub fn clear_region(&mut self, bounds: &Bounds, style: CellStyle) {
        let clipped = bounds.clip_to(self.dimensions);
        for row in clipped.row..clipped.row + clipped.height {
            for col in clipped.col..clipped.col + clipped.width {
                if let Some(cell) = self.cell_mut(row, col) {
                    *cell = Cell::blank(style);
                }
            }
        }
    }

    /// Write `text` starting at (row, col), clipping at the right edge.
    ///
    /// Returns the number of cells written.
    pub fn put_str(&mut self, row: u16, col: u16, text: &str, style: CellStyle) -> usize {
        let mut written = 0;
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            let Some(target) = col.checked_add(offset) else {
                break;
            };
            if !self.set(row, target, Cell::styled(ch, style)) {
                break;
            }
            written += 1;
        }
        written
    }

    /// Copy every cell from `source`.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the dimensions differ.
    pub fn copy_from(&mut self, source: &GridBuffer) -> Result<()> {
        if source.dimensions != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: source.dimensions,
            });
        }
        self.cells.copy_from_slice(&source.cells);
        Ok(())
    }

    /// Extract text from a specific region.
    ///
    /// Trailing whitespace is trimmed from each line.
    pub fn extract_text(&self, bounds: &Bounds) -> String {
        let clipped = bounds.clip_to(self.dimensions);
        let mut lines = Vec::with_capacity(clipped.height as usize);
        for row_idx in clipped.row..clipped.row + clipped.height {
            let mut line = String::new();
            for col_idx in clipped.col..clipped.col + clipped.width {
                if let Some(cell) = self.cell(row_idx, col_idx) {
                    line.push(cell.character);
                }
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    /// Convert entire buffer to plain text.
    pub fn to_plain_text(&self) -> String {
        self.extract_text(&self.dimensions.bounds())
    }
}
