//! Cell, style and color types for the grid buffer.

use serde::{Deserialize, Serialize};

/// Terminal color supporting ANSI, 256-color palette, and true RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default terminal color
    #[default]
    Default,

    /// Standard ANSI colors (0-7)
    Black,
    /// ANSI Red
    Red,
    /// ANSI Green
    Green,
    /// ANSI Yellow
    Yellow,
    /// ANSI Blue
    Blue,
    /// ANSI Magenta
    Magenta,
    /// ANSI Cyan
    Cyan,
    /// ANSI White
    White,

    /// Bright ANSI colors (8-15)
    BrightBlack,
    /// Bright Red
    BrightRed,
    /// Bright Green
    BrightGreen,
    /// Bright Yellow
    BrightYellow,
    /// Bright Blue
    BrightBlue,
    /// Bright Magenta
    BrightMagenta,
    /// Bright Cyan
    BrightCyan,
    /// Bright White
    BrightWhite,

    /// 256-color palette index (0-255)
    Indexed(u8),

    /// True color RGB (24-bit)
    Rgb {
        /// Red component
        r: u8,
        /// Green component
        g: u8,
        /// Blue component
        b: u8,
    },
}

/// Text attributes for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellAttributes {
    /// Bold/bright text
    pub bold: bool,
    /// Dimmed text
    pub dim: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl CellAttributes {
    /// Check if attributes are all default (no formatting).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Create attributes with bold enabled.
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Create attributes with underline enabled.
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Create attributes with reverse video enabled.
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Display attributes of a cell: colors plus text attributes.
///
/// This is the "attribute value" passed to `GridBuffer::clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text attributes
    pub attrs: CellAttributes,
}

impl CellStyle {
    /// Create a style from foreground and background colors.
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: CellAttributes::default(),
        }
    }

    /// Replace the text attributes.
    pub fn with_attrs(mut self, attrs: CellAttributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// Single character cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unicode character (space if empty)
    pub character: char,
    /// Display attributes
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(CellStyle::default())
    }
}

impl Cell {
    /// Create a new cell with a character and default styling.
    pub fn new(character: char) -> Self {
        Self {
            character,
            style: CellStyle::default(),
        }
    }

    /// Create a cell with a character and style.
    pub fn styled(character: char, style: CellStyle) -> Self {
        Self { character, style }
    }

    /// Empty cell (space) carrying the given style.
    pub fn blank(style: CellStyle) -> Self {
        Self {
            character: ' ',
            style,
        }
    }

    /// Check if cell is empty (space with default attributes).
    pub fn is_empty(&self) -> bool {
        self.character == ' ' && self.style == CellStyle::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_serialization() {
        let color = Color::Rgb {
            r: 255,
            g: 128,
            b: 0,
        };
        let json = serde_json::to_string(&color).unwrap();
        let deserialized: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(color, deserialized);

        assert_eq!(
            serde_json::to_string(&Color::BrightBlue).unwrap(),
            "\"bright_blue\""
        );
    }

    #[test]
    fn test_cell_attributes_with_methods() {
        let attrs = CellAttributes::default().with_bold().with_underline();

        assert!(attrs.bold);
        assert!(attrs.underline);
        assert!(!attrs.italic);
        assert!(!attrs.is_default());
    }

    #[test]
    fn test_cell_default() {
        let cell = Cell::default();
        assert_eq!(cell.character, ' ');
        assert_eq!(cell.style.fg, Color::Default);
        assert_eq!(cell.style.bg, Color::Default);
        assert!(cell.style.attrs.is_default());
        assert!(cell.is_empty());
    }

    #[test]
    fn test_cell_blank_keeps_style() {
        let style = CellStyle::new(Color::White, Color::Blue);
        let cell = Cell::blank(style);
        assert_eq!(cell.character, ' ');
        assert_eq!(cell.style, style);
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_style_partial_deserialize() {
        let style: CellStyle = serde_json::from_str(r#"{"bg":"blue"}"#).unwrap();
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Blue);
        assert!(style.attrs.is_default());
    }
}
