//! Button Widget: a focusable `[ label ]` that fires a callback.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{align, Alignment, Rect, Size};

/// A pressable button, activated with Enter or Space while focused.
pub struct Button {
    label: String,
    on_press: Option<Box<dyn FnMut()>>,
    style: Style,
    focused_style: Style,
    width: u16,
    focused: bool,
}

impl Button {
    /// Create a button. Focused buttons are drawn reversed.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_press: None,
            style: Style::DEFAULT,
            focused_style: Style::DEFAULT.with_reverse(),
            width: 0,
            focused: false,
        }
    }

    /// Set the press callback.
    #[must_use]
    pub fn on_press(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_press = Some(Box::new(f));
        self
    }

    /// Set the unfocused and focused styles.
    #[must_use]
    pub const fn with_styles(mut self, style: Style, focused_style: Style) -> Self {
        self.style = style;
        self.focused_style = focused_style;
        self
    }

    /// Pad the button to `width` cells; zero means fit the label.
    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// The label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Run the press callback, if any.
    pub fn press(&mut self) {
        if let Some(f) = self.on_press.as_mut() {
            f();
        }
    }

    fn face(&self) -> String {
        let face = format!("[ {} ]", self.label);
        let len = text_width(&face);
        let width = usize::from(self.width);
        if len >= width {
            return face;
        }
        let left = (width - len) / 2;
        format!("{:left$}{face}{:right$}", "", "", right = width - len - left)
    }
}

impl Widget for Button {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let face = self.face();
        let style = if self.focused {
            self.focused_style
        } else {
            self.style
        };
        let len = u16::try_from(text_width(&face)).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(align(len, area.width, Alignment::Center));
        draw_graphemes(buffer, x, area.y, area.z, &face, style, usize::from(area.width));
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        match event.as_key() {
            Some(key) if key.code == KeyCode::Enter || key.is_char(' ') => {
                self.press();
                true
            }
            _ => false,
        }
    }

    fn preferred_size(&self) -> Size {
        let fit = u16::try_from(text_width(&self.label) + 4).unwrap_or(u16::MAX);
        Size::new(fit.max(self.width), 1)
    }

    fn minimum_size(&self) -> Size {
        Size::new(u16::try_from(text_width(&self.label) + 4).unwrap_or(u16::MAX), 1)
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

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("focused", &self.focused)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;
    use std::cell::Cell as Counter;
    use std::rc::Rc;

    #[test]
    fn test_press_requires_focus() {
        let presses = Rc::new(Counter::new(0));
        let seen = Rc::clone(&presses);
        let mut button = Button::new("OK").on_press(move || seen.set(seen.get() + 1));

        let enter = Event::Key(KeyEvent::plain(KeyCode::Enter));
        assert!(!button.handle_event(&enter));
        button.set_focused(true);
        assert!(button.handle_event(&enter));
        assert!(button.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Char(' ')))));
        assert!(!button.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Char('x')))));
        assert_eq!(presses.get(), 2);
    }

    #[test]
    fn test_render_centered_and_reversed_when_focused() {
        let mut buffer = Buffer::new(10, 1);
        let mut button = Button::new("Go");
        button.set_focused(true);
        button.render(&mut buffer, Rect::new(0, 0, 10, 1));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "  [ Go ]  ");
        assert_eq!(frame.get(2, 0).style, Style::DEFAULT.with_reverse());
    }

    #[test]
    fn test_sizes() {
        let button = Button::new("Save").with_width(12);
        assert_eq!(button.preferred_size(), Size::new(12, 1));
        assert_eq!(button.minimum_size(), Size::new(8, 1));
        assert_eq!(button.face(), "  [ Save ]  ");
    }
}
