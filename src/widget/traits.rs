//! Widget trait and the text helpers shared by widget implementations.

use crate::buffer::{Buffer, Style};
use crate::input::Event;
use crate::layout::{Rect, Size};
use unicode_segmentation::UnicodeSegmentation;

/// A UI component that can be rendered to a buffer and handle input.
///
/// Widgets are handed their area (including the z-plane to draw on) at
/// render time; they keep no bounds of their own. All widgets implement
/// this trait, so containers hold them as `Box<dyn Widget>` and user code
/// can add new kinds freely.
pub trait Widget {
    /// Draw into `buffer`, staying inside `area` on plane `area.z`.
    fn render(&self, buffer: &mut Buffer, area: Rect);

    /// Handle an input event.
    ///
    /// Returns `true` if the event was consumed (and the screen should be
    /// redrawn), `false` if it should propagate to other widgets.
    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }

    /// Size the widget would like to have.
    fn preferred_size(&self) -> Size;

    /// Smallest size the widget can render in.
    fn minimum_size(&self) -> Size {
        Size::new(1, 1)
    }

    /// Whether the widget has keyboard focus.
    fn is_focused(&self) -> bool {
        false
    }

    /// Give or take keyboard focus. Ignored by non-interactive widgets.
    fn set_focused(&mut self, _focused: bool) {}

    /// Whether the widget can take focus.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Display width of `text` in cells: one cell per grapheme cluster.
pub fn text_width(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Truncate `text` to at most `width` cells.
pub fn truncate(text: &str, width: usize) -> &str {
    match text.grapheme_indices(true).nth(width) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Draw `text` one grapheme per cell, at most `max_width` cells.
///
/// A cell holds a single `char`, so a multi-codepoint grapheme is drawn as
/// its base character.
pub(crate) fn draw_graphemes(
    buffer: &mut Buffer,
    x: u16,
    y: u16,
    z: u16,
    text: &str,
    style: Style,
    max_width: usize,
) {
    let chars: String = text
        .graphemes(true)
        .take(max_width)
        .filter_map(|g| g.chars().next())
        .collect();
    buffer.draw_text(i32::from(x), i32::from(y), i32::from(z), &chars, style);
}

/// First visible row so that `cursor` lies inside a window of `visible`
/// rows, moving `offset` as little as possible.
pub(crate) const fn scroll_into_view(offset: usize, cursor: usize, visible: usize) -> usize {
    if visible == 0 || cursor < offset {
        cursor
    } else if cursor >= offset + visible {
        cursor + 1 - visible
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_counts_graphemes() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width("e\u{301}x"), 2);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hi", 5), "hi");
        assert_eq!(truncate("e\u{301}xy", 1), "e\u{301}");
    }

    #[test]
    fn test_draw_graphemes_clips() {
        let mut buffer = Buffer::new(10, 1);
        draw_graphemes(&mut buffer, 1, 0, 0, "e\u{301}xyz", Style::DEFAULT, 3);
        assert_eq!(buffer.flatten().row_text(0), " exy      ");
    }

    #[test]
    fn test_scroll_into_view() {
        assert_eq!(scroll_into_view(0, 3, 5), 0);
        assert_eq!(scroll_into_view(0, 7, 5), 3);
        assert_eq!(scroll_into_view(4, 2, 5), 2);
        assert_eq!(scroll_into_view(4, 2, 0), 2);
    }
}
