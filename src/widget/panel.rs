//! Panel Widget: a bordered, optionally titled frame around one child.

use super::traits::{draw_graphemes, Widget};
use crate::buffer::{Buffer, Style};
use crate::input::Event;
use crate::layout::{Rect, Size};

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// `┌─┐` box drawing.
    #[default]
    Single,
    /// `╔═╗` box drawing.
    Double,
}

/// A border with an optional title, wrapping a single child.
///
/// The child is rendered one cell inside the border on the same z-plane;
/// focus and events pass straight through to it.
#[derive(Default)]
pub struct Panel {
    title: Option<String>,
    border: Border,
    style: Style,
    child: Option<Box<dyn Widget>>,
}

impl Panel {
    /// An empty single-bordered panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title drawn into the top border.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the border style.
    #[must_use]
    pub const fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Set the style of the border and title.
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the child.
    #[must_use]
    pub fn with_child(mut self, child: impl Widget + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// The child, if any.
    pub fn child_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        self.child.as_deref_mut()
    }
}

impl Widget for Panel {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let (x, y, z) = (i32::from(area.x), i32::from(area.y), i32::from(area.z));
        let (w, h) = (i32::from(area.width), i32::from(area.height));
        match self.border {
            Border::Single => buffer.draw_box(x, y, z, w, h, self.style),
            Border::Double => buffer.draw_double_box(x, y, z, w, h, self.style),
        }

        if let Some(title) = &self.title {
            if area.width > 4 {
                let text = format!(" {title} ");
                let max = usize::from(area.width - 4);
                let x = area.x.saturating_add(2);
                draw_graphemes(buffer, x, area.y, area.z, &text, self.style, max);
            }
        }

        if let Some(child) = &self.child {
            let inner = area.shrink(1);
            if !inner.is_empty() {
                child.render(buffer, inner);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        self.child.as_mut().is_some_and(|c| c.handle_event(event))
    }

    fn preferred_size(&self) -> Size {
        let inner = self.child.as_ref().map_or(Size::default(), |c| c.preferred_size());
        Size::new(inner.width.saturating_add(2), inner.height.saturating_add(2))
    }

    fn minimum_size(&self) -> Size {
        let inner = self.child.as_ref().map_or(Size::default(), |c| c.minimum_size());
        Size::new(inner.width.saturating_add(2), inner.height.saturating_add(2))
    }

    fn is_focused(&self) -> bool {
        self.child.as_ref().is_some_and(|c| c.is_focused())
    }

    fn set_focused(&mut self, focused: bool) {
        if let Some(child) = self.child.as_mut() {
            child.set_focused(focused);
        }
    }

    fn is_interactive(&self) -> bool {
        self.child.as_ref().is_some_and(|c| c.is_interactive())
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("title", &self.title)
            .field("border", &self.border)
            .field("has_child", &self.child.is_some())
            .finish()
    }
}
