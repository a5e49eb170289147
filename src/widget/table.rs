//! Table Widget: rows of cells under a header, one row selected.
//!
//! Column widths come from the flex layout: fixed columns take their
//! width, flexible ones share what is left, and one cell of separator
//! sits between neighbours.

use super::traits::{draw_graphemes, scroll_into_view, text_width, truncate, Widget};
use crate::buffer::{Buffer, Cell, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{align, Alignment, Flex, FlexChild, Rect, Size};

/// Width given to a flexible column when asked for a preferred size.
const FLEX_COLUMN_WIDTH: u16 = 10;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub title: String,
    /// Exact width in cells; zero makes the column flexible.
    pub width: u16,
    /// Share of the free width for a flexible column.
    pub flex: u16,
    /// Placement of cell text inside the column.
    pub align: Alignment,
}

impl Column {
    /// A column exactly `width` cells wide.
    pub fn fixed(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
            flex: 0,
            align: Alignment::Start,
        }
    }

    /// A column taking `flex` shares of the width left by fixed columns.
    pub fn flex(title: impl Into<String>, flex: u16) -> Self {
        Self {
            title: title.into(),
            width: 0,
            flex,
            align: Alignment::Start,
        }
    }

    /// Set the text alignment.
    #[must_use]
    pub const fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    const fn rule(&self) -> FlexChild {
        if self.width > 0 {
            FlexChild::fixed(self.width)
        } else {
            FlexChild::flex(self.flex)
        }
    }
}

/// Styles for the table widget.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Body cells and separators.
    pub style: Style,
    /// Header row.
    pub header: Style,
    /// Selected row while focused.
    pub selected: Style,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: Style::DEFAULT,
            header: Style::DEFAULT.with_bold(),
            selected: Style::DEFAULT.with_reverse(),
        }
    }
}

/// A table with a header and a selectable row.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    selected: usize,
    offset: usize,
    /// Body rows shown at most, and the PageUp/PageDown step.
    height: u16,
    header: bool,
    border: bool,
    focused: bool,
    config: TableConfig,
    on_select: Option<Box<dyn FnMut(usize)>>,
    on_change: Option<Box<dyn FnMut(usize)>>,
}

impl Table {
    /// An empty table with a header, showing up to ten body rows.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            selected: 0,
            offset: 0,
            height: 10,
            header: true,
            border: false,
            focused: false,
            config: TableConfig::default(),
            on_select: None,
            on_change: None,
        }
    }

    /// Replace the styles.
    #[must_use]
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rows.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Show at most `height` body rows.
    #[must_use]
    pub const fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Show or hide the header and its rule.
    #[must_use]
    pub const fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Draw a single-line border around the table.
    #[must_use]
    pub const fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Called with the selected row when Enter is pressed.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Called with the newly selected row whenever the selection moves.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Replace the rows, keeping the selection in range.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.offset = scroll_into_view(self.offset, self.selected, usize::from(self.height));
    }

    /// The columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of the selected row.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Cells of the selected row, if there are rows.
    pub fn selected_row(&self) -> Option<&[String]> {
        self.rows.get(self.selected).map(Vec::as_slice)
    }

    /// Select `row`, clamped to the last row.
    pub fn select(&mut self, row: usize) {
        let row = row.min(self.rows.len().saturating_sub(1));
        if row == self.selected {
            return;
        }
        self.selected = row;
        self.offset = scroll_into_view(self.offset, self.selected, usize::from(self.height));
        if let Some(f) = self.on_change.as_mut() {
            f(row);
        }
    }

    fn column_areas(&self, x: u16, y: u16, z: u16, width: u16) -> Vec<Rect> {
        let rules: Vec<FlexChild> = self.columns.iter().map(Column::rule).collect();
        Flex::horizontal()
            .with_gap(1)
            .layout(Rect::new(x, y, width, 1).with_z(z), &rules)
    }

    fn draw_row<S: AsRef<str>>(
        &self,
        buffer: &mut Buffer,
        cols: &[Rect],
        y: u16,
        cells: &[S],
        style: Style,
    ) {
        for (i, (col, column)) in cols.iter().zip(&self.columns).enumerate() {
            let z = i32::from(col.z);
            buffer.fill_rect(Rect::new(col.x, y, col.width, 1), z, Cell::new(' ', style));
            if let Some(text) = cells.get(i) {
                let text = truncate(text.as_ref(), usize::from(col.width));
                let len = u16::try_from(text_width(text)).unwrap_or(u16::MAX);
                let x = col.x.saturating_add(align(len, col.width, column.align));
                draw_graphemes(buffer, x, y, col.z, text, style, usize::from(col.width));
            }
            if i + 1 < cols.len() {
                buffer.set(i32::from(col.right()), i32::from(y), z, Cell::new('│', style));
            }
        }
    }

    fn draw_rule(&self, buffer: &mut Buffer, cols: &[Rect], y: u16) {
        let style = self.config.style;
        for (i, col) in cols.iter().enumerate() {
            let (x, y, z) = (i32::from(col.x), i32::from(y), i32::from(col.z));
            buffer.draw_hline(x, y, z, i32::from(col.width), '─', style);
            if i + 1 < cols.len() {
                buffer.set(i32::from(col.right()), y, z, Cell::new('┼', style));
            }
        }
    }
}

impl Widget for Table {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        if self.columns.is_empty() {
            return;
        }
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

        let cols = self.column_areas(inner.x, inner.y, inner.z, inner.width);
        let mut body = inner;
        if self.header {
            let titles: Vec<&str> = self.columns.iter().map(|c| c.title.as_str()).collect();
            self.draw_row(buffer, &cols, inner.y, &titles, self.config.header);
            if inner.height > 1 {
                self.draw_rule(buffer, &cols, inner.y + 1);
            }
            body = inner.inset(2, 0, 0, 0);
        }

        let visible = usize::from(body.height.min(self.height));
        let offset = scroll_into_view(self.offset, self.selected, visible);
        for (row, index) in (offset..self.rows.len()).take(visible).enumerate() {
            let style = if self.focused && index == self.selected {
                self.config.selected
            } else {
                self.config.style
            };
            let y = body.y.saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            self.draw_row(buffer, &cols, y, &self.rows[index], style);
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
            KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down => self.select(self.selected + 1),
            KeyCode::PageUp => self.select(self.selected.saturating_sub(page)),
            KeyCode::PageDown => self.select(self.selected + page),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter => {
                if let Some(f) = self.on_select.as_mut() {
                    f(self.selected);
                }
            }
            _ => return false,
        }
        true
    }

    fn preferred_size(&self) -> Size {
        let columns: u32 = self
            .columns
            .iter()
            .map(|c| u32::from(if c.width > 0 { c.width } else { FLEX_COLUMN_WIDTH }))
            .sum();
        let separators = u32::try_from(self.columns.len().saturating_sub(1)).unwrap_or(u32::MAX);
        let width = u16::try_from(columns.saturating_add(separators)).unwrap_or(u16::MAX);
        let mut height = u16::try_from(self.rows.len()).unwrap_or(u16::MAX).min(self.height);
        if self.header {
            height = height.saturating_add(2);
        }
        if self.border {
            Size::new(width.saturating_add(2), height.saturating_add(2))
        } else {
            Size::new(width, height)
        }
    }

    fn minimum_size(&self) -> Size {
        let n = u16::try_from(self.columns.len()).unwrap_or(u16::MAX);
        let width = n.saturating_mul(4).saturating_sub(1);
        if self.border {
            Size::new(width.saturating_add(2), 5)
        } else {
            Size::new(width, 3)
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

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
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

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn stock() -> Table {
        Table::new(vec![
            Column::fixed("Name", 6),
            Column::flex("Qty", 1).with_align(Alignment::End),
        ])
        .with_rows(vec![
            row(&["apple", "3"]),
            row(&["banana", "12"]),
            row(&["cherry", "140"]),
        ])
    }

    #[test]
    fn test_render_header_rule_and_columns() {
        let mut buffer = Buffer::new(12, 5);
        stock().render(&mut buffer, Rect::new(0, 0, 12, 5));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "Name  │  Qty");
        assert_eq!(frame.row_text(1), "──────┼─────");
        assert_eq!(frame.row_text(2), "apple │    3");
        assert_eq!(frame.row_text(4), "cherry│  140");
        assert_eq!(frame.get(0, 0).style, Style::DEFAULT.with_bold());
    }

    #[test]
    fn test_selected_row_highlighted_when_focused() {
        let mut table = stock();
        table.set_focused(true);
        table.handle_event(&key(KeyCode::Down));
        let mut buffer = Buffer::new(12, 5);
        table.render(&mut buffer, Rect::new(0, 0, 12, 5));
        let frame = buffer.flatten();
        assert_eq!(frame.get(0, 3).style, Style::DEFAULT.with_reverse());
        assert_eq!(frame.get(0, 2).style, Style::DEFAULT);
    }

    #[test]
    fn test_body_scrolls_to_selection() {
        let mut table = stock().with_header(false).with_height(2);
        table.set_focused(true);
        table.handle_event(&key(KeyCode::End));
        let mut buffer = Buffer::new(12, 2);
        table.render(&mut buffer, Rect::new(0, 0, 12, 2));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "banana│   12");
        assert_eq!(frame.row_text(1), "cherry│  140");
    }

    #[test]
    fn test_navigation_and_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let changes = Rc::clone(&seen);
        let picks = Rc::clone(&seen);
        let mut table = stock()
            .on_change(move |r| changes.borrow_mut().push(format!("change {r}")))
            .on_select(move |r| picks.borrow_mut().push(format!("select {r}")));

        assert!(!table.handle_event(&key(KeyCode::Down)));
        table.set_focused(true);
        table.handle_event(&key(KeyCode::PageDown));
        table.handle_event(&key(KeyCode::Down));
        table.handle_event(&key(KeyCode::Enter));
        table.handle_event(&key(KeyCode::Home));
        assert_eq!(*seen.borrow(), vec!["change 2", "select 2", "change 0"]);
        assert_eq!(table.selected_row(), Some(&row(&["apple", "3"])[..]));
    }

    #[test]
    fn test_set_rows_clamps_selection() {
        let mut table = stock();
        table.select(2);
        table.set_rows(vec![row(&["fig", "1"])]);
        assert_eq!(table.selected(), 0);
        table.set_rows(Vec::new());
        assert_eq!(table.selected_row(), None);
    }

    #[test]
    fn test_sizes() {
        let table = stock();
        assert_eq!(table.preferred_size(), Size::new(17, 5));
        assert_eq!(table.with_border(true).minimum_size(), Size::new(9, 5));
    }
}
