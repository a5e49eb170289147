//! Progress Bar Widget: Horizontal progress indicator.
//!
//! A horizontal progress bar with customizable styling and optional
//! percentage/label display.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Color, Rgb, Style};
use crate::layout::{Rect, Size};

/// Visual style for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStyle {
    /// Classic solid bar: ████████░░░░
    Solid,
    /// ASCII style: ========
    Ascii,
    /// Block characters: ▓▓▓▓▓▓░░░░
    #[default]
    Block,
    /// Thin line: ───────────
    Line,
}

impl ProgressStyle {
    /// Filled and empty glyphs.
    const fn glyphs(self) -> (char, char) {
        match self {
            Self::Solid => ('█', '░'),
            Self::Ascii => ('=', ' '),
            Self::Block => ('▓', '░'),
            Self::Line => ('─', '─'),
        }
    }
}

/// Configuration for the progress bar widget.
#[derive(Debug, Clone)]
pub struct ProgressBarConfig {
    /// Glyph set of the bar.
    pub glyphs: ProgressStyle,
    /// Filled portion style.
    pub filled: Style,
    /// Empty portion style.
    pub empty: Style,
    /// Whether to show percentage text.
    pub show_percentage: bool,
    /// Percentage text style.
    pub percentage: Style,
    /// Optional label drawn before the bar.
    pub label: Option<String>,
    /// Label style.
    pub label_style: Style,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            glyphs: ProgressStyle::Block,
            filled: Style::foreground(Color::Rgb(Rgb::new(0, 200, 100))),
            empty: Style::foreground(Color::Rgb(Rgb::new(60, 60, 60))),
            show_percentage: true,
            percentage: Style::DEFAULT,
            label: None,
            label_style: Style::foreground(Color::Rgb(Rgb::new(150, 150, 150))),
        }
    }
}

/// A horizontal progress bar widget.
#[derive(Debug, Clone, Default)]
pub struct ProgressBar {
    /// Current progress (0.0 to 1.0).
    progress: f32,
    /// Configuration.
    config: ProgressBarConfig,
}

impl ProgressBar {
    /// Create an empty progress bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new progress bar with custom configuration.
    pub const fn with_config(config: ProgressBarConfig) -> Self {
        Self {
            progress: 0.0,
            config,
        }
    }

    /// Set the progress value (clamped to 0.0-1.0).
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Get the current progress value.
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Set the label text.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.config.label = Some(label.into());
    }

    /// Increment progress by a delta (clamped).
    pub fn increment(&mut self, delta: f32) {
        self.set_progress(self.progress + delta);
    }

    /// Check if progress is complete (>= 1.0).
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

impl Widget for ProgressBar {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let width = usize::from(area.width);
        let (y, z) = (area.y, area.z);

        // Calculate space for label and percentage
        let label_len = self
            .config
            .label
            .as_ref()
            .map_or(0, |l| text_width(l).min(width / 3) + 1);
        let pct_len = if self.config.show_percentage { 5 } else { 0 }; // " 100%"
        let bar_width = width.saturating_sub(label_len + pct_len);
        if bar_width == 0 {
            return;
        }

        let mut x = area.x;
        if let Some(label) = &self.config.label {
            draw_graphemes(buffer, x, y, z, label, self.config.label_style, label_len - 1);
            x = x.saturating_add(label_len as u16);
        }

        let (filled_char, empty_char) = self.config.glyphs.glyphs();
        let filled_count = (self.progress * bar_width as f32).round() as usize;
        for i in 0..bar_width {
            let cell = if i < filled_count {
                Cell::new(filled_char, self.config.filled)
            } else {
                Cell::new(empty_char, self.config.empty)
            };
            buffer.set(i32::from(x) + i as i32, i32::from(y), i32::from(z), cell);
        }
        x = x.saturating_add(bar_width as u16);

        if self.config.show_percentage {
            let pct = format!(" {:>3}%", (self.progress * 100.0).round() as u32);
            draw_graphemes(buffer, x, y, z, &pct, self.config.percentage, pct_len);
        }
    }

    fn preferred_size(&self) -> Size {
        Size::new(20, 1)
    }

    fn minimum_size(&self) -> Size {
        let pct = if self.config.show_percentage { 5 } else { 0 };
        Size::new(pct + 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_basic() {
        let mut bar = ProgressBar::new();

        assert_eq!(bar.progress(), 0.0);

        bar.set_progress(0.5);
        assert_eq!(bar.progress(), 0.5);

        bar.set_progress(1.5); // Should clamp
        assert_eq!(bar.progress(), 1.0);
    }

    #[test]
    fn test_progress_bar_increment() {
        let mut bar = ProgressBar::new();

        bar.increment(0.25);
        assert!((bar.progress() - 0.25).abs() < f32::EPSILON);

        bar.increment(0.25);
        assert!((bar.progress() - 0.5).abs() < f32::EPSILON);
        assert!(!bar.is_complete());
    }

    #[test]
    fn test_progress_bar_render() {
        let mut buffer = Buffer::new(15, 1);
        let mut bar = ProgressBar::with_config(ProgressBarConfig {
            glyphs: ProgressStyle::Ascii,
            ..ProgressBarConfig::default()
        });
        bar.set_label("dl");
        bar.set_progress(0.5);
        bar.render(&mut buffer, Rect::new(0, 0, 15, 1));
        // 15 - 3 (label) - 5 (percentage) leaves 7 cells; half rounds to 4.
        assert_eq!(buffer.flatten().row_text(0), "dl ====     50%");
    }
}
