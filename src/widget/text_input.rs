//! Text Input Widget: Single-line text input with cursor.
//!
//! Characters are inserted at the cursor; Backspace/Delete remove around it
//! and Left/Right/Home/End move it. The content scrolls horizontally to
//! keep the cursor visible. Enter fires the submit callback.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Color, Rgb, Style};
use crate::input::{Event, KeyCode, KeyModifiers};
use crate::layout::{Rect, Size};
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for the text input widget.
#[derive(Debug, Clone)]
pub struct TextInputConfig {
    /// Style of the typed text.
    pub text: Style,
    /// Style of the cell under the cursor.
    pub cursor: Style,
    /// Placeholder text shown when empty.
    pub placeholder: String,
    /// Placeholder text style.
    pub placeholder_style: Style,
    /// Prompt prefix (e.g., "> ").
    pub prompt: String,
    /// Prompt style.
    pub prompt_style: Style,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        let bg = Color::Rgb(Rgb::new(30, 30, 30));
        Self {
            text: Style::DEFAULT.with_bg(bg),
            cursor: Style::DEFAULT.with_reverse(),
            placeholder: String::new(),
            placeholder_style: Style::foreground(Color::Rgb(Rgb::new(100, 100, 100))).with_bg(bg),
            prompt: String::from("> "),
            prompt_style: Style::foreground(Color::Rgb(Rgb::new(0, 255, 255))).with_bg(bg),
        }
    }
}

/// A single-line text input widget with cursor and editing support.
pub struct TextInput {
    /// Current text content.
    content: String,
    /// Cursor position as a byte offset on a grapheme boundary.
    cursor: usize,
    /// Whether this widget has focus.
    focused: bool,
    /// Configuration.
    config: TextInputConfig,
    /// Called with the content when Enter is pressed.
    on_submit: Option<Box<dyn FnMut(&str)>>,
}

impl TextInput {
    /// Create an empty, unfocused input.
    pub fn new() -> Self {
        Self::with_config(TextInputConfig::default())
    }

    /// Create an input with custom configuration.
    pub const fn with_config(config: TextInputConfig) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            focused: false,
            config,
            on_submit: None,
        }
    }

    /// Set the placeholder shown while empty.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    /// Set the submit callback.
    #[must_use]
    pub fn on_submit(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    /// Get the current text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Set the content, moving cursor to end.
    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.cursor = self.content.len();
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cursor position in cells from the start of the content.
    pub fn cursor_column(&self) -> usize {
        text_width(&self.content[..self.cursor])
    }

    /// Insert a character at the cursor position.
    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Byte offset of the grapheme boundary before the cursor.
    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    /// Byte offset of the grapheme boundary after the cursor.
    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.cursor, |g| self.cursor + g.len())
    }

    /// Delete the grapheme before the cursor.
    fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    /// Delete the grapheme at the cursor.
    fn delete(&mut self) {
        let next = self.next_boundary();
        self.content.replace_range(self.cursor..next, "");
    }

    fn cursor_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    fn cursor_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    fn submit(&mut self) {
        if let Some(f) = self.on_submit.as_mut() {
            f(&self.content);
        }
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TextInput {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        if area.is_empty() {
            return;
        }
        let z = area.z;
        let width = usize::from(area.width);

        // Clear the line with the text background
        buffer.fill_rect(
            Rect::new(area.x, area.y, area.width, 1),
            i32::from(z),
            Cell::new(' ', self.config.text),
        );

        // Draw prompt
        let prompt_len = text_width(&self.config.prompt).min(width);
        draw_graphemes(buffer, area.x, area.y, z, &self.config.prompt, self.config.prompt_style, width);

        let text_start = area.x.saturating_add(u16::try_from(prompt_len).unwrap_or(u16::MAX));
        let text_width_avail = width - prompt_len;
        if text_width_avail == 0 {
            return;
        }

        if self.content.is_empty() && !self.config.placeholder.is_empty() {
            draw_graphemes(
                buffer,
                text_start,
                area.y,
                z,
                &self.config.placeholder,
                self.config.placeholder_style,
                text_width_avail,
            );
        } else {
            // Scroll so the cursor stays inside the visible window
            let cursor_col = self.cursor_column();
            let scroll = (cursor_col + 1).saturating_sub(text_width_avail);
            let visible: String = self.content.graphemes(true).skip(scroll).collect();
            draw_graphemes(buffer, text_start, area.y, z, &visible, self.config.text, text_width_avail);
        }

        if self.focused {
            let cursor_col = self.cursor_column();
            let scroll = (cursor_col + 1).saturating_sub(text_width_avail);
            let offset = u16::try_from(cursor_col - scroll).unwrap_or(u16::MAX);
            let (cx, cy, cz) = (
                i32::from(text_start.saturating_add(offset)),
                i32::from(area.y),
                i32::from(z),
            );
            let under = buffer.get(cx, cy, cz);
            buffer.set(cx, cy, cz, under.with_style(self.config.cursor));
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        let Some(key) = event.as_key() else {
            return false;
        };

        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                self.insert_char(c);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.len(),
            KeyCode::Enter => self.submit(),
            _ => return false,
        }
        true
    }

    fn preferred_size(&self) -> Size {
        let width = text_width(&self.config.prompt)
            + text_width(&self.content).max(text_width(&self.config.placeholder))
            + 1;
        Size::new(u16::try_from(width).unwrap_or(u16::MAX), 1)
    }

    fn minimum_size(&self) -> Size {
        let width = text_width(&self.config.prompt) + 1;
        Size::new(u16::try_from(width).unwrap_or(u16::MAX), 1)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for TextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInput")
            .field("content", &self.content)
            .field("cursor", &self.cursor)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn focused() -> TextInput {
        let mut input = TextInput::new();
        input.set_focused(true);
        input
    }

    #[test]
    fn test_text_input_basic() {
        let mut input = focused();
        assert!(input.handle_event(&key(KeyCode::Char('H'))));
        assert!(input.handle_event(&key(KeyCode::Char('i'))));
        assert_eq!(input.content(), "Hi");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_text_input_backspace() {
        let mut input = focused();
        input.set_content("Hello");

        input.handle_event(&key(KeyCode::Backspace));
        assert_eq!(input.content(), "Hell");
    }

    #[test]
    fn test_text_input_cursor_movement() {
        let mut input = focused();
        input.set_content("Hello");

        input.handle_event(&key(KeyCode::Left));
        assert_eq!(input.cursor, 4);

        input.handle_event(&key(KeyCode::Home));
        assert_eq!(input.cursor, 0);
        input.handle_event(&key(KeyCode::Delete));
        assert_eq!(input.content(), "ello");

        input.handle_event(&key(KeyCode::End));
        assert_eq!(input.cursor, 4);
    }

    #[test]
    fn test_edits_whole_graphemes() {
        let mut input = focused();
        input.set_content("ae\u{301}");
        input.handle_event(&key(KeyCode::Left));
        assert_eq!(input.cursor, 1);
        input.handle_event(&key(KeyCode::Right));
        input.handle_event(&key(KeyCode::Backspace));
        assert_eq!(input.content(), "a");
    }

    #[test]
    fn test_unfocused_and_ctrl_keys_ignored() {
        let mut input = TextInput::new();
        assert!(!input.handle_event(&key(KeyCode::Char('x'))));
        input.set_focused(true);
        assert!(!input.handle_event(&Event::Key(KeyEvent::ctrl('a'))));
        assert!(input.is_empty());
    }

    #[test]
    fn test_submit_receives_content() {
        let submitted = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&submitted);
        let mut input = TextInput::new().on_submit(move |s| *sink.borrow_mut() = s.to_string());
        input.set_focused(true);
        input.set_content("query");
        assert!(input.handle_event(&key(KeyCode::Enter)));
        assert_eq!(*submitted.borrow(), "query");
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut buffer = Buffer::new(8, 1);
        let mut input = focused();
        input.set_content("abcdefghij");
        input.render(&mut buffer, Rect::new(0, 0, 8, 1));
        let frame = buffer.flatten();
        // Prompt takes 2 cells, 6 remain; the cursor cell is the last one.
        assert_eq!(frame.row_text(0), "> fghij ");
        assert_eq!(frame.get(7, 0).style, Style::DEFAULT.with_reverse());
    }

    #[test]
    fn test_render_placeholder() {
        let mut buffer = Buffer::new(10, 1);
        TextInput::new()
            .with_placeholder("search")
            .render(&mut buffer, Rect::new(0, 0, 10, 1));
        assert_eq!(buffer.flatten().row_text(0), "> search  ");
    }
}
