//! List Widget: a scrollable list with a cursor and multi-selection.
//!
//! Up/Down/PageUp/PageDown/Home/End move the cursor; Enter or Space toggles
//! the item under it. How many items may be selected at once is bounded by
//! [`List::with_max_selected`]; selecting past the bound drops the oldest.

use super::traits::{draw_graphemes, scroll_into_view, text_width, Widget};
use crate::buffer::{BasicColor, Buffer, Cell, Color, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{Rect, Size};

/// Styles for the list widget.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Unselected rows.
    pub style: Style,
    /// Row under the cursor while focused.
    pub cursor: Style,
    /// Selected rows.
    pub selected: Style,
    /// Scrollbar track.
    pub track: Style,
    /// Scrollbar thumb.
    pub thumb: Style,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            style: Style::DEFAULT,
            cursor: Style::DEFAULT.with_reverse(),
            selected: Style::DEFAULT.with_bg(Color::Basic(BasicColor::Green)),
            track: Style::DEFAULT.with_dim(),
            thumb: Style::DEFAULT.with_reverse(),
        }
    }
}

/// A scrollable, selectable list of text items.
pub struct List {
    items: Vec<String>,
    cursor: usize,
    /// First visible row as of the last cursor move.
    offset: usize,
    /// Selected indexes, oldest first.
    selected: Vec<usize>,
    /// Zero means no limit.
    max_selected: usize,
    /// Rows shown at most, and the PageUp/PageDown step.
    height: u16,
    border: bool,
    focused: bool,
    config: ListConfig,
    on_select: Option<Box<dyn FnMut(usize, &str)>>,
    on_change: Option<Box<dyn FnMut(usize, &str)>>,
}

impl List {
    /// An empty list allowing one selection and showing up to ten rows.
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// An empty list with custom styles.
    pub const fn with_config(config: ListConfig) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            offset: 0,
            selected: Vec::new(),
            max_selected: 1,
            height: 10,
            border: false,
            focused: false,
            config,
            on_select: None,
            on_change: None,
        }
    }

    /// Replace the items.
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_items(items);
        self
    }

    /// Limit how many items can be selected; zero means no limit.
    #[must_use]
    pub fn with_max_selected(mut self, max: usize) -> Self {
        self.max_selected = max;
        if max > 0 && self.selected.len() > max {
            self.selected.drain(..self.selected.len() - max);
        }
        self
    }

    /// Show at most `height` rows.
    #[must_use]
    pub const fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Draw a single-line border around the rows.
    #[must_use]
    pub const fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Called with the index and text of the item toggled by Enter/Space.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(usize, &str) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Called with the index and text of the item under the cursor whenever
    /// the cursor moves.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(usize, &str) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Replace the items. Selections survive for items whose text is still
    /// present; the cursor is clamped to the new length.
    pub fn set_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let mut kept = Vec::with_capacity(self.selected.len());
        for &old in &self.selected {
            let Some(text) = self.items.get(old) else {
                continue;
            };
            if let Some(new) = items.iter().position(|item| item == text) {
                if !kept.contains(&new) {
                    kept.push(new);
                }
            }
        }
        self.items = items;
        self.selected = kept;
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
        self.offset = scroll_into_view(self.offset, self.cursor, usize::from(self.height));
    }

    /// The items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the item under the cursor.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected indexes, oldest selection first.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Text of the selected items, oldest selection first.
    pub fn selected_items(&self) -> Vec<&str> {
        self.selected
            .iter()
            .filter_map(|&i| self.items.get(i).map(String::as_str))
            .collect()
    }

    /// Whether the item at `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Toggle the selection of `index`, clamped to the last item.
    ///
    /// When the selection is full the oldest entry is dropped first.
    pub fn toggle(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        let index = index.min(self.items.len() - 1);
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            return;
        }
        if self.max_selected > 0 && self.selected.len() >= self.max_selected {
            self.selected.remove(0);
        }
        self.selected.push(index);
    }

    /// Move the cursor to `index`, clamped to the last item.
    pub fn set_cursor(&mut self, index: usize) {
        let index = index.min(self.items.len().saturating_sub(1));
        if index == self.cursor {
            return;
        }
        self.cursor = index;
        self.offset = scroll_into_view(self.offset, self.cursor, usize::from(self.height));
        if let (Some(f), Some(item)) = (self.on_change.as_mut(), self.items.get(self.cursor)) {
            f(self.cursor, item);
        }
    }

    fn activate(&mut self) {
        if self.cursor >= self.items.len() {
            return;
        }
        self.toggle(self.cursor);
        if let Some(f) = self.on_select.as_mut() {
            f(self.cursor, &self.items[self.cursor]);
        }
    }

    fn row_style(&self, index: usize) -> Style {
        let under_cursor = self.focused && index == self.cursor;
        match (self.is_selected(index), under_cursor) {
            (true, true) => self.config.selected.with_reverse(),
            (true, false) => self.config.selected,
            (false, true) => self.config.cursor,
            (false, false) => self.config.style,
        }
    }

    fn draw_scrollbar(&self, buffer: &mut Buffer, area: Rect, offset: usize, visible: usize) {
        let total = self.items.len();
        let thumb = (visible * visible / total).max(1);
        let pos = offset * (visible - thumb) / (total - visible);
        let x = i32::from(area.right()) - 1;
        for (row, y) in (0..visible).zip(i32::from(area.y)..) {
            let cell = if (pos..pos + thumb).contains(&row) {
                Cell::new('█', self.config.thumb)
            } else {
                Cell::new('│', self.config.track)
            };
            buffer.set(x, y, i32::from(area.z), cell);
        }
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for List {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        let inner = if self.border {
            let (x, y, z) = (i32::from(area.x), i32::from(area.y), i32::from(area.z));
            let (w, h) = (i32::from(area.width), i32::from(area.height));
            buffer.draw_box(x, y, z, w, h, self.config.style);
            area.shrink(1)
        } else {
            area
        };
        if inner.is_empty() {
            return;
        }

        let visible = usize::from(inner.height.min(self.height));
        let offset = scroll_into_view(self.offset, self.cursor, visible);
        let scrollbar = self.items.len() > visible && visible > 0;
        let room = usize::from(inner.width) - usize::from(scrollbar);

        for (row, index) in (offset..self.items.len()).take(visible).enumerate() {
            let style = self.row_style(index);
            let y = inner.y.saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            buffer.fill_rect(
                Rect::new(inner.x, y, inner.width, 1),
                i32::from(inner.z),
                Cell::new(' ', style),
            );
            draw_graphemes(buffer, inner.x, y, inner.z, &self.items[index], style, room);
        }

        if scrollbar {
            self.draw_scrollbar(buffer, inner, offset, visible);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        let Some(key) = event.as_key() else {
            return false;
        };
        let page = usize::from(self.height.max(1));
        match key.code {
            KeyCode::Up => self.set_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Down => self.set_cursor(self.cursor + 1),
            KeyCode::PageUp => self.set_cursor(self.cursor.saturating_sub(page)),
            KeyCode::PageDown => self.set_cursor(self.cursor + page),
            KeyCode::Home => self.set_cursor(0),
            KeyCode::End => self.set_cursor(usize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => return false,
        }
        true
    }

    fn preferred_size(&self) -> Size {
        let width = self.items.iter().map(|item| text_width(item)).max().unwrap_or(0);
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        let height = u16::try_from(self.items.len()).unwrap_or(u16::MAX).min(self.height);
        if self.border {
            Size::new(width.saturating_add(2), height.saturating_add(2))
        } else {
            Size::new(width, height)
        }
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

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("List")
            .field("items", &self.items.len())
            .field("cursor", &self.cursor)
            .field("selected", &self.selected)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> Event {
        Event::Key(crate::input::KeyEvent::plain(code))
    }

    fn fruit() -> List {
        List::new().with_items(["apple", "banana", "cherry", "damson", "elder"])
    }

    #[test]
    fn test_ignores_keys_without_focus() {
        let mut list = fruit();
        assert!(!list.handle_event(&key(KeyCode::Down)));
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut list = fruit().with_height(2);
        list.set_focused(true);
        assert!(list.handle_event(&key(KeyCode::Up)));
        assert_eq!(list.cursor(), 0);
        list.handle_event(&key(KeyCode::PageDown));
        assert_eq!(list.cursor(), 2);
        list.handle_event(&key(KeyCode::End));
        assert_eq!(list.cursor(), 4);
        list.handle_event(&key(KeyCode::Down));
        assert_eq!(list.cursor(), 4);
        list.handle_event(&key(KeyCode::Home));
        assert_eq!(list.cursor(), 0);
        assert!(!list.handle_event(&key(KeyCode::Char('x'))));
    }

    #[test]
    fn test_single_selection_replaces_previous() {
        let mut list = fruit();
        list.set_focused(true);
        list.handle_event(&key(KeyCode::Enter));
        list.handle_event(&key(KeyCode::Down));
        list.handle_event(&key(KeyCode::Char(' ')));
        assert_eq!(list.selected_items(), vec!["banana"]);

        list.handle_event(&key(KeyCode::Enter));
        assert!(list.selected().is_empty());
    }

    #[test]
    fn test_bounded_selection_drops_oldest() {
        let mut list = fruit().with_max_selected(2);
        list.toggle(0);
        list.toggle(3);
        list.toggle(1);
        assert_eq!(list.selected(), &[3, 1]);

        let mut unbounded = fruit().with_max_selected(0);
        for i in 0..5 {
            unbounded.toggle(i);
        }
        assert_eq!(unbounded.selected().len(), 5);
    }

    #[test]
    fn test_set_items_keeps_surviving_selection() {
        let mut list = fruit().with_max_selected(0);
        list.toggle(1);
        list.toggle(4);
        list.set_cursor(4);
        list.set_items(["banana", "fig"]);
        assert_eq!(list.selected_items(), vec!["banana"]);
        assert_eq!(list.cursor(), 1);
    }

    #[test]
    fn test_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let changes = Rc::clone(&seen);
        let picks = Rc::clone(&seen);
        let mut list = fruit()
            .on_change(move |i, item| changes.borrow_mut().push(format!("change {i} {item}")))
            .on_select(move |i, item| picks.borrow_mut().push(format!("select {i} {item}")));
        list.set_focused(true);
        list.handle_event(&key(KeyCode::Down));
        list.handle_event(&key(KeyCode::Up));
        list.handle_event(&key(KeyCode::Up));
        list.handle_event(&key(KeyCode::Enter));
        assert_eq!(
            *seen.borrow(),
            vec!["change 1 banana", "change 0 apple", "select 0 apple"]
        );
    }

    #[test]
    fn test_render_scrolls_to_cursor_with_scrollbar() {
        let mut list = fruit().with_height(3);
        list.set_focused(true);
        list.handle_event(&key(KeyCode::End));

        let mut buffer = Buffer::new(8, 3);
        list.render(&mut buffer, Rect::new(0, 0, 8, 3));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "cherry │");
        assert_eq!(frame.row_text(1), "damson │");
        assert_eq!(frame.row_text(2), "elder  █");
        assert_eq!(frame.get(0, 2).style, ListConfig::default().cursor);
        assert_eq!(frame.get(0, 0).style, Style::DEFAULT);
    }

    #[test]
    fn test_render_border_and_selection_style() {
        let mut list = List::new().with_items(["one", "two"]).with_border(true);
        list.toggle(1);
        let mut buffer = Buffer::new(7, 4);
        list.render(&mut buffer, Rect::new(0, 0, 7, 4));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "┌─────┐");
        assert_eq!(frame.row_text(1), "│one  │");
        assert_eq!(frame.row_text(2), "│two  │");
        assert_eq!(frame.get(1, 2).style, ListConfig::default().selected);
        assert_eq!(list.preferred_size(), Size::new(5, 4));
    }
}
