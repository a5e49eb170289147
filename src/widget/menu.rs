//! Menu Widget: a vertical list of actions with keyboard shortcuts.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{Rect, Size};

/// One entry of a [`Menu`].
pub struct MenuItem {
    label: String,
    shortcut: Option<String>,
    disabled: bool,
    action: Option<Box<dyn FnMut()>>,
}

impl MenuItem {
    /// An enabled item with no shortcut or action.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
            disabled: false,
            action: None,
        }
    }

    /// A disabled horizontal rule.
    pub fn separator() -> Self {
        Self::new("─".repeat(16)).disabled()
    }

    /// Show a shortcut hint, right-aligned.
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Run `f` when the item is activated.
    #[must_use]
    pub fn on_activate(mut self, f: impl FnMut() + 'static) -> Self {
        self.action = Some(Box::new(f));
        self
    }

    /// Make the item unselectable.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// The label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the item can be selected.
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn width(&self) -> usize {
        text_width(&self.label) + self.shortcut.as_deref().map_or(0, |s| text_width(s) + 2)
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("shortcut", &self.shortcut)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Styles for the menu widget.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Items and border.
    pub style: Style,
    /// Selected item while focused.
    pub selected: Style,
    /// Disabled items and separators.
    pub disabled: Style,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            style: Style::DEFAULT,
            selected: Style::DEFAULT.with_reverse(),
            disabled: Style::DEFAULT.with_dim(),
        }
    }
}

/// A bordered menu. Up/Down move over enabled items, wrapping at either
/// end; Enter runs the selected item's action.
pub struct Menu {
    items: Vec<MenuItem>,
    selected: usize,
    /// Inner width; zero fits the widest item.
    width: u16,
    border: bool,
    focused: bool,
    config: MenuConfig,
    on_select: Option<Box<dyn FnMut(usize, &str)>>,
}

impl Menu {
    /// An empty bordered menu.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            width: 0,
            border: true,
            focused: false,
            config: MenuConfig::default(),
            on_select: None,
        }
    }

    /// Append an item.
    #[must_use]
    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.push(item);
        self
    }

    /// Replace the styles.
    #[must_use]
    pub fn with_config(mut self, config: MenuConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the inner width instead of fitting the widest item.
    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Draw or omit the border.
    #[must_use]
    pub const fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Called with the index and label of every activated item, after its
    /// own action.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(usize, &str) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Append an item. The selection skips to it if nothing enabled was
    /// selected before.
    pub fn push(&mut self, item: MenuItem) {
        self.items.push(item);
        self.skip_disabled(true);
    }

    /// The items.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Index of the selected item.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Select `index`, clamped to the last item. Disabled items are
    /// skipped forwards.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self.skip_disabled(true);
    }

    /// Run the selected item's action and the select callback. Does nothing
    /// on a disabled item.
    pub fn activate(&mut self) {
        let Some(item) = self.items.get_mut(self.selected) else {
            return;
        };
        if item.disabled {
            return;
        }
        tracing::debug!(item = %item.label, "menu item activated");
        if let Some(action) = item.action.as_mut() {
            action();
        }
        if let Some(f) = self.on_select.as_mut() {
            f(self.selected, &self.items[self.selected].label);
        }
    }

    fn step(&mut self, forward: bool) {
        let n = self.items.len();
        if n == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % n
        } else {
            (self.selected + n - 1) % n
        };
        self.skip_disabled(forward);
    }

    fn skip_disabled(&mut self, forward: bool) {
        let n = self.items.len();
        for _ in 0..n {
            if self.items.get(self.selected).is_some_and(MenuItem::is_enabled) {
                return;
            }
            self.selected = if forward {
                (self.selected + 1) % n
            } else {
                (self.selected + n - 1) % n
            };
        }
    }

    fn inner_width(&self) -> u16 {
        if self.width > 0 {
            return self.width;
        }
        let widest = self.items.iter().map(MenuItem::width).max().unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX)
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Menu {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let frame = u16::from(self.border) * 2;
        let width = self.inner_width().min(area.width.saturating_sub(frame));
        let rows = u16::try_from(self.items.len()).unwrap_or(u16::MAX);
        let height = rows.min(area.height.saturating_sub(frame));

        let inner = if self.border {
            let (x, y, z) = (i32::from(area.x), i32::from(area.y), i32::from(area.z));
            let (w, h) = (i32::from(width) + 2, i32::from(height) + 2);
            buffer.draw_box(x, y, z, w, h, self.config.style);
            Rect::new(area.x.saturating_add(1), area.y.saturating_add(1), width, height)
                .with_z(area.z)
        } else {
            Rect::new(area.x, area.y, width, height).with_z(area.z)
        };
        if inner.is_empty() {
            return;
        }

        let room = usize::from(inner.width);
        for (i, (item, y)) in self.items.iter().zip(inner.y..inner.bottom()).enumerate() {
            let style = if item.disabled {
                self.config.disabled
            } else if self.focused && i == self.selected {
                self.config.selected
            } else {
                self.config.style
            };
            let z = i32::from(inner.z);
            buffer.fill_rect(Rect::new(inner.x, y, inner.width, 1), z, Cell::new(' ', style));
            draw_graphemes(buffer, inner.x, y, inner.z, &item.label, style, room);

            if let Some(shortcut) = &item.shortcut {
                let len = text_width(shortcut);
                if room > text_width(&item.label) + len + 1 {
                    let x = inner.x.saturating_add(u16::try_from(room - len).unwrap_or(0));
                    draw_graphemes(buffer, x, y, inner.z, shortcut, style.with_dim(), len);
                }
            }
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
            KeyCode::Up => self.step(false),
            KeyCode::Down => self.step(true),
            KeyCode::Enter => self.activate(),
            _ => return false,
        }
        true
    }

    fn preferred_size(&self) -> Size {
        let rows = u16::try_from(self.items.len()).unwrap_or(u16::MAX);
        let frame = u16::from(self.border) * 2;
        Size::new(
            self.inner_width().saturating_add(frame),
            rows.saturating_add(frame),
        )
    }

    fn minimum_size(&self) -> Size {
        if self.border {
            Size::new(5, 3)
        } else {
            Size::new(3, 1)
        }
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

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("items", &self.items)
            .field("selected", &self.selected)
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

    fn file_menu(log: &Rc<RefCell<Vec<String>>>) -> Menu {
        let opened = Rc::clone(log);
        Menu::new()
            .with_item(MenuItem::new("Open").with_shortcut("^O").on_activate(move || {
                opened.borrow_mut().push("open".into());
            }))
            .with_item(MenuItem::new("Save").disabled())
            .with_item(MenuItem::separator())
            .with_item(MenuItem::new("Quit").with_shortcut("^Q"))
    }

    #[test]
    fn test_navigation_skips_disabled_and_wraps() {
        let log = Rc::default();
        let mut menu = file_menu(&log);
        menu.set_focused(true);
        assert_eq!(menu.selected(), 0);
        menu.handle_event(&key(KeyCode::Down));
        assert_eq!(menu.selected(), 3);
        menu.handle_event(&key(KeyCode::Down));
        assert_eq!(menu.selected(), 0);
        menu.handle_event(&key(KeyCode::Up));
        assert_eq!(menu.selected(), 3);
        assert!(!menu.handle_event(&key(KeyCode::Left)));
    }

    #[test]
    fn test_activate_runs_action_then_callback() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let picks = Rc::clone(&log);
        let mut menu = file_menu(&log)
            .on_select(move |i, label| picks.borrow_mut().push(format!("{i}:{label}")));

        assert!(!menu.handle_event(&key(KeyCode::Enter)));
        menu.set_focused(true);
        menu.handle_event(&key(KeyCode::Enter));
        menu.handle_event(&key(KeyCode::Up));
        menu.handle_event(&key(KeyCode::Enter));
        assert_eq!(*log.borrow(), vec!["open", "0:Open", "3:Quit"]);
    }

    #[test]
    fn test_first_enabled_item_selected() {
        let menu = Menu::new()
            .with_item(MenuItem::separator())
            .with_item(MenuItem::new("Only"));
        assert_eq!(menu.selected(), 1);
        let mut empty = Menu::new();
        empty.activate();
        assert_eq!(empty.preferred_size(), Size::new(2, 2));
    }

    #[test]
    fn test_render_border_labels_and_shortcuts() {
        let log = Rc::default();
        let mut menu = file_menu(&log).with_width(10);
        menu.set_focused(true);
        let mut buffer = Buffer::new(14, 6);
        menu.render(&mut buffer, Rect::new(0, 0, 14, 6));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "┌──────────┐  ");
        assert_eq!(frame.row_text(1), "│Open    ^O│  ");
        assert_eq!(frame.row_text(2), "│Save      │  ");
        assert_eq!(frame.row_text(3), "│──────────│  ");
        assert_eq!(frame.row_text(4), "│Quit    ^Q│  ");
        assert_eq!(frame.row_text(5), "└──────────┘  ");
        assert_eq!(frame.get(1, 1).style, Style::DEFAULT.with_reverse());
        assert_eq!(frame.get(1, 2).style, Style::DEFAULT.with_dim());
    }

    #[test]
    fn test_preferred_size_fits_widest_item() {
        let log = Rc::default();
        let menu = file_menu(&log);
        assert_eq!(menu.preferred_size(), Size::new(18, 6));
    }
}
