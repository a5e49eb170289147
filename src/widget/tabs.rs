//! Tabs Widget: one titled page visible at a time.
//!
//! The first row shows the titles; the rest belongs to the active page.
//! Keys go to the active page first. Alt+Left/Alt+Right always switch
//! pages; plain Left/Right switch only when the page leaves them unused.

use super::traits::{draw_graphemes, text_width, Widget};
use crate::buffer::{Buffer, Cell, Color, Rgb, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{Rect, Size};

/// Styles for the tab bar.
#[derive(Debug, Clone)]
pub struct TabsConfig {
    /// Inactive titles and the rest of the bar.
    pub bar: Style,
    /// Title of the active page.
    pub active: Style,
}

impl Default for TabsConfig {
    fn default() -> Self {
        let bg = Color::Rgb(Rgb::new(40, 40, 40));
        Self {
            bar: Style::DEFAULT.with_bg(bg),
            active: Style::DEFAULT.with_bg(bg).with_bold().with_reverse(),
        }
    }
}

/// Titled pages with a tab bar.
pub struct Tabs {
    pages: Vec<(String, Box<dyn Widget>)>,
    active: usize,
    focused: bool,
    config: TabsConfig,
}

impl Tabs {
    /// No pages yet.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            active: 0,
            focused: false,
            config: TabsConfig::default(),
        }
    }

    /// Append a page.
    #[must_use]
    pub fn with_tab(mut self, title: impl Into<String>, page: impl Widget + 'static) -> Self {
        self.pages.push((title.into(), Box::new(page)));
        self
    }

    /// Replace the styles.
    #[must_use]
    pub fn with_config(mut self, config: TabsConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Index of the visible page.
    pub const fn active(&self) -> usize {
        self.active
    }

    /// Title of the visible page.
    pub fn active_title(&self) -> Option<&str> {
        self.pages.get(self.active).map(|(title, _)| title.as_str())
    }

    /// The page at `index`.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.pages.get_mut(index).map(|(_, page)| page.as_mut())
    }

    /// Show page `index`, clamped to the last page. Focus moves with it.
    pub fn select(&mut self, index: usize) {
        let index = index.min(self.pages.len().saturating_sub(1));
        if index == self.active || self.pages.is_empty() {
            return;
        }
        self.pages[self.active].1.set_focused(false);
        self.active = index;
        let focused = self.focused;
        self.pages[index].1.set_focused(focused);
        tracing::debug!(tab = %self.pages[index].0, "tab selected");
    }

    fn step(&mut self, forward: bool) -> bool {
        let n = self.pages.len();
        if n < 2 {
            return false;
        }
        let next = if forward {
            (self.active + 1) % n
        } else {
            (self.active + n - 1) % n
        };
        self.select(next);
        true
    }
}

impl Default for Tabs {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Tabs {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        if area.is_empty() {
            return;
        }
        let z = i32::from(area.z);
        let bar = Rect::new(area.x, area.y, area.width, 1);
        buffer.fill_rect(bar, z, Cell::new(' ', self.config.bar));

        let mut x = area.x;
        for (i, (title, _)) in self.pages.iter().enumerate() {
            if x >= area.right() {
                break;
            }
            let style = if i == self.active {
                self.config.active
            } else {
                self.config.bar
            };
            let label = format!(" {title} ");
            let room = usize::from(area.right() - x);
            draw_graphemes(buffer, x, area.y, area.z, &label, style, room);
            let len = u16::try_from(text_width(&label)).unwrap_or(u16::MAX);
            x = x.saturating_add(len);
            if i + 1 < self.pages.len() && x < area.right() {
                buffer.set(i32::from(x), i32::from(area.y), z, Cell::new('│', self.config.bar));
                x = x.saturating_add(1);
            }
        }

        let body = area.inset(1, 0, 0, 0);
        if let Some((_, page)) = self.pages.get(self.active) {
            if !body.is_empty() {
                page.render(buffer, body);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        let key = event.as_key();
        if let Some(key) = key {
            if key.is_alt() && matches!(key.code, KeyCode::Left | KeyCode::Right) {
                return self.step(key.code == KeyCode::Right);
            }
        }
        if let Some((_, page)) = self.pages.get_mut(self.active) {
            if page.handle_event(event) {
                return true;
            }
        }
        match key.map(|k| k.code) {
            Some(KeyCode::Left) => self.step(false),
            Some(KeyCode::Right) => self.step(true),
            _ => false,
        }
    }

    fn preferred_size(&self) -> Size {
        let titles: usize = self.pages.iter().map(|(t, _)| text_width(t) + 3).sum();
        let mut size = Size::new(u16::try_from(titles).unwrap_or(u16::MAX), 0);
        for (_, page) in &self.pages {
            let page = page.preferred_size();
            size.width = size.width.max(page.width);
            size.height = size.height.max(page.height);
        }
        Size::new(size.width, size.height.saturating_add(1))
    }

    fn minimum_size(&self) -> Size {
        Size::new(1, 2)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if let Some((_, page)) = self.pages.get_mut(self.active) {
            page.set_focused(focused);
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for Tabs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let titles: Vec<&str> = self.pages.iter().map(|(t, _)| t.as_str()).collect();
        f.debug_struct("Tabs")
            .field("titles", &titles)
            .field("active", &self.active)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}
