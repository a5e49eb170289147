//! Spinner Widget: an indeterminate activity indicator.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Style};
use crate::layout::{Rect, Size};

/// Braille dots turning clockwise.
const DOTS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// A one-cell animation followed by an optional label.
///
/// The spinner does not animate itself; call [`Spinner::advance`] from a
/// tick callback.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: Vec<char>,
    current: usize,
    label: String,
    style: Style,
}

impl Spinner {
    /// A braille-dot spinner with no label.
    pub fn new() -> Self {
        Self {
            frames: DOTS.to_vec(),
            current: 0,
            label: String::new(),
            style: Style::DEFAULT,
        }
    }

    /// Replace the animation frames.
    #[must_use]
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = char>) -> Self {
        self.frames = frames.into_iter().collect();
        self.current = 0;
        self
    }

    /// Set the label drawn after the frame.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the style of frame and label.
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Step to the next frame, wrapping around.
    pub fn advance(&mut self) {
        if !self.frames.is_empty() {
            self.current = (self.current + 1) % self.frames.len();
        }
    }

    /// The frame currently shown, if there are frames.
    pub fn frame(&self) -> Option<char> {
        self.frames.get(self.current).copied()
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Spinner {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let Some(frame) = self.frame() else {
            return;
        };
        if area.is_empty() {
            return;
        }
        let (x, y, z) = (i32::from(area.x), i32::from(area.y), i32::from(area.z));
        buffer.set(x, y, z, Cell::new(frame, self.style));
        if !self.label.is_empty() && area.width > 2 {
            let room = usize::from(area.width - 2);
            let x = area.x.saturating_add(2);
            draw_graphemes(buffer, x, area.y, area.z, &self.label, self.style, room);
        }
    }

    fn preferred_size(&self) -> Size {
        let label = if self.label.is_empty() {
            0
        } else {
            text_width(&self.label) + 1
        };
        Size::new(u16::try_from(label + 1).unwrap_or(u16::MAX), 1)
    }
}
