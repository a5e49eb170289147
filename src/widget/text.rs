//! Text Widget: static, optionally wrapped, aligned text.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Style};
use crate::layout::{align, Alignment, Rect, Size};

/// A static text label.
///
/// Newlines start new lines. With wrapping on, lines wider than the area
/// are broken at whitespace; a single word wider than the area is clipped.
#[derive(Debug, Clone, Default)]
pub struct Text {
    text: String,
    style: Style,
    alignment: Alignment,
    wrap: bool,
}

impl Text {
    /// Create a text widget.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the style.
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the horizontal alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Enable or disable word wrapping.
    #[must_use]
    pub const fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Replace the content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The lines drawn in an area `max_width` cells wide.
    pub fn lines(&self, max_width: usize) -> Vec<String> {
        if !self.wrap || max_width == 0 {
            return self.text.split('\n').map(str::to_string).collect();
        }

        let mut lines = Vec::new();
        for line in self.text.split('\n') {
            if text_width(line) <= max_width {
                lines.push(line.to_string());
                continue;
            }
            let mut current = String::new();
            for word in line.split_whitespace() {
                if current.is_empty() {
                    current.push_str(word);
                } else if text_width(&current) + 1 + text_width(word) <= max_width {
                    current.push(' ');
                    current.push_str(word);
                } else {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }
}

impl Widget for Text {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let width = usize::from(area.width);
        for (line, y) in self.lines(width).iter().zip(area.y..area.bottom()) {
            let line_width = u16::try_from(text_width(line)).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(align(line_width, area.width, self.alignment));
            draw_graphemes(buffer, x, y, area.z, line, self.style, width);
        }
    }

    fn preferred_size(&self) -> Size {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let width = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
        Size::new(
            u16::try_from(width).unwrap_or(u16::MAX),
            u16::try_from(lines.len()).unwrap_or(u16::MAX),
        )
    }
}
