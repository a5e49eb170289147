//! Cell: The atomic unit of terminal display.
//!
//! A cell is one code point plus a [`Style`]. Cells are small `Copy` values
//! compared structurally; the diff renderer relies on that equality to decide
//! which screen positions need to be rewritten.

use super::style::{Color, Modifiers, Style};

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character to display.
    pub ch: char,
    /// Colours and attributes.
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space character with the default style).
    ///
    /// Empty cells are transparent when z-planes are composited.
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: Style::DEFAULT,
    };

    /// Create a cell from a character and a style.
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// Create a cell with the default style.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self::new(ch, Style::DEFAULT)
    }

    /// A space with the default style.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Copy with a different character (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    /// Copy with a different style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.style = self.style.with_fg(fg);
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.style = self.style.with_bg(bg);
        self
    }

    /// Add modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.style = self.style.with_modifiers(modifiers);
        self
    }

    /// Reset the cell to empty.
    #[inline]
    pub const fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.style.fg)
            .field("bg", &self.style.bg)
            .field("modifiers", &self.style.modifiers)
            .finish()
    }
}
