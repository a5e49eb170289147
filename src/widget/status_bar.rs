//! Status Bar Widget: Three-section status bar.
//!
//! A horizontal status bar with left, center, and right sections.
//! Commonly used at the top or bottom of the terminal.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Color, Rgb, Style};
use crate::layout::{align, Alignment, Rect, Size};

/// Configuration for the status bar widget.
#[derive(Debug, Clone)]
pub struct StatusBarConfig {
    /// Style of the bar's empty cells.
    pub background: Style,
    /// Left section style.
    pub left: Style,
    /// Center section style.
    pub center: Style,
    /// Right section style.
    pub right: Style,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        let bg = Color::Rgb(Rgb::new(40, 40, 40));
        Self {
            background: Style::DEFAULT.with_bg(bg),
            left: Style::foreground(Color::Rgb(Rgb::new(255, 255, 255))).with_bg(bg),
            center: Style::foreground(Color::Rgb(Rgb::new(150, 150, 150))).with_bg(bg),
            right: Style::foreground(Color::Rgb(Rgb::new(100, 200, 100))).with_bg(bg),
        }
    }
}

/// A three-section status bar (left, center, right).
///
/// Each section gets at most a third of the width; the right section is
/// drawn last and wins where sections would overlap.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    /// Left section content.
    left: String,
    /// Center section content.
    center: String,
    /// Right section content.
    right: String,
    /// Configuration.
    config: StatusBarConfig,
}

impl StatusBar {
    /// Create an empty status bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new status bar with custom configuration.
    pub const fn with_config(config: StatusBarConfig) -> Self {
        Self {
            left: String::new(),
            center: String::new(),
            right: String::new(),
            config,
        }
    }

    /// Set the left section content.
    pub fn set_left(&mut self, text: impl Into<String>) {
        self.left = text.into();
    }

    /// Set the center section content.
    pub fn set_center(&mut self, text: impl Into<String>) {
        self.center = text.into();
    }

    /// Set the right section content.
    pub fn set_right(&mut self, text: impl Into<String>) {
        self.right = text.into();
    }

    /// Set all sections at once.
    pub fn set_all(
        &mut self,
        left: impl Into<String>,
        center: impl Into<String>,
        right: impl Into<String>,
    ) {
        self.left = left.into();
        self.center = center.into();
        self.right = right.into();
    }

    /// Get the left section content.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Get the center section content.
    pub fn center(&self) -> &str {
        &self.center
    }

    /// Get the right section content.
    pub fn right(&self) -> &str {
        &self.right
    }
}

impl Widget for StatusBar {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        if area.is_empty() {
            return;
        }
        let line = Rect::new(area.x, area.y, area.width, 1);
        buffer.fill_rect(line, i32::from(area.z), Cell::new(' ', self.config.background));

        let third = area.width / 3;
        for (text, style, alignment) in [
            (&self.left, self.config.left, Alignment::Start),
            (&self.center, self.config.center, Alignment::Center),
            (&self.right, self.config.right, Alignment::End),
        ] {
            let len = u16::try_from(text_width(text)).unwrap_or(u16::MAX).min(third);
            let x = area.x.saturating_add(align(len, area.width, alignment));
            draw_graphemes(buffer, x, area.y, area.z, text, style, usize::from(len));
        }
    }

    fn preferred_size(&self) -> Size {
        let widest = [&self.left, &self.center, &self.right]
            .iter()
            .map(|s| text_width(s))
            .max()
            .unwrap_or(0);
        Size::new(u16::try_from(widest * 3).unwrap_or(u16::MAX), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_basic() {
        let mut bar = StatusBar::new();

        bar.set_left("Left");
        bar.set_center("Center");
        bar.set_right("Right");

        assert_eq!(bar.left(), "Left");
        assert_eq!(bar.center(), "Center");
        assert_eq!(bar.right(), "Right");
    }

    #[test]
    fn test_status_bar_set_all() {
        let mut bar = StatusBar::new();

        bar.set_all("A", "B", "C");

        assert_eq!(bar.left(), "A");
        assert_eq!(bar.center(), "B");
        assert_eq!(bar.right(), "C");
    }

    #[test]
    fn test_status_bar_layout() {
        let mut buffer = Buffer::new(15, 2);
        let mut bar = StatusBar::new();
        bar.set_all("ab", "mid", "toolong");
        bar.render(&mut buffer, Rect::new(0, 1, 15, 1));
        // A third of 15 is 5, so the right section is clipped.
        assert_eq!(buffer.flatten().row_text(1), "ab    mid toolo");
        assert!(!buffer.get(14, 1, 0).is_empty());
        assert!(buffer.get(0, 0, 0).is_empty());
    }
}
