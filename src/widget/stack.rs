//! Stack Widget: a flex container that owns focus among its children.
//!
//! Children are laid out with [`Flex`] along one axis. Tab and Shift+Tab
//! (`ESC [ Z`) move focus between interactive children; other events go to
//! the focused child only.

use super::traits::Widget;
use crate::buffer::Buffer;
use crate::input::{Event, KeyCode};
use crate::layout::{Direction, Flex, FlexChild, Rect, Size};

/// A flex container with keyboard focus cycling.
pub struct Stack {
    flex: Flex,
    children: Vec<(FlexChild, Box<dyn Widget>)>,
    focus: Option<usize>,
    cycle: bool,
}

impl Stack {
    /// An empty stack along `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            flex: Flex::new(direction),
            children: Vec::new(),
            focus: None,
            cycle: true,
        }
    }

    /// An empty top-to-bottom stack.
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// An empty left-to-right stack.
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// Set the gap between children.
    #[must_use]
    pub const fn with_gap(mut self, gap: u16) -> Self {
        self.flex.gap = gap;
        self
    }

    /// Whether focus wraps from the last child to the first. A nested
    /// stack should not wrap, so Tab past its end moves on in the parent.
    #[must_use]
    pub const fn with_focus_cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// Append a child sized by `rule`.
    #[must_use]
    pub fn with(mut self, rule: FlexChild, child: impl Widget + 'static) -> Self {
        self.push(rule, Box::new(child));
        self
    }

    /// Append a child sized by `rule`. The first interactive child gets
    /// focus.
    pub fn push(&mut self, rule: FlexChild, mut child: Box<dyn Widget>) {
        if self.focus.is_none() && child.is_interactive() {
            child.set_focused(true);
            self.focus = Some(self.children.len());
        } else {
            child.set_focused(false);
        }
        self.children.push((rule, child));
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the stack has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the focused child.
    pub const fn focused_index(&self) -> Option<usize> {
        self.focus
    }

    /// Mutable access to a child.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.children.get_mut(index).map(|(_, c)| c.as_mut())
    }

    /// Rectangles the children occupy inside `area`.
    pub fn layout(&self, area: Rect) -> Vec<Rect> {
        let rules: Vec<FlexChild> = self.children.iter().map(|(rule, _)| *rule).collect();
        self.flex.layout(area, &rules)
    }

    /// Move focus to the next interactive child. Returns `false` if focus
    /// would have to wrap and wrapping is off; focus is then released.
    pub fn focus_next(&mut self) -> bool {
        let start = self.focus.map_or(0, |i| i + 1);
        let order: Vec<usize> = (start..self.children.len())
            .chain(if self.cycle { 0..start } else { 0..0 })
            .collect();
        self.move_focus(&order)
    }

    /// Move focus to the previous interactive child. Returns `false` if
    /// focus would have to wrap and wrapping is off.
    pub fn focus_prev(&mut self) -> bool {
        let len = self.children.len();
        let start = self.focus.unwrap_or(len);
        let order: Vec<usize> = (0..start)
            .rev()
            .chain(if self.cycle { (start..len).rev() } else { (0..0).rev() })
            .collect();
        self.move_focus(&order)
    }

    fn move_focus(&mut self, order: &[usize]) -> bool {
        let next = order
            .iter()
            .copied()
            .find(|&i| self.children[i].1.is_interactive());
        if let Some(current) = self.focus {
            self.children[current].1.set_focused(false);
        }
        self.focus = next;
        match next {
            Some(i) => {
                self.children[i].1.set_focused(true);
                true
            }
            None => false,
        }
    }
}

impl Widget for Stack {
    fn render(&self, buffer: &mut Buffer, area: Rect) {
        for ((_, child), rect) in self.children.iter().zip(self.layout(area)) {
            if !rect.is_empty() {
                child.render(buffer, rect);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if let Some(i) = self.focus {
            if self.children[i].1.handle_event(event) {
                return true;
            }
        }
        match event.as_key() {
            Some(key) if key.code == KeyCode::Tab => {
                if key.is_shift() {
                    self.focus_prev()
                } else {
                    self.focus_next()
                }
            }
            _ => false,
        }
    }

    fn preferred_size(&self) -> Size {
        let mut main = 0u32;
        let mut cross = 0u16;
        for (rule, child) in &self.children {
            let size = child.preferred_size();
            let (along, across) = match self.flex.direction {
                Direction::Horizontal => (size.width, size.height),
                Direction::Vertical => (size.height, size.width),
            };
            main += u32::from(if rule.fixed > 0 { rule.fixed } else { along });
            cross = cross.max(across);
        }
        let gaps = u32::from(self.flex.gap) * (self.children.len().saturating_sub(1) as u32);
        let main = u16::try_from(main + gaps).unwrap_or(u16::MAX);
        match self.flex.direction {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        }
    }

    fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        if focused {
            if self.focus.is_none() {
                self.focus_next();
            }
        } else if let Some(i) = self.focus.take() {
            self.children[i].1.set_focused(false);
        }
    }

    fn is_interactive(&self) -> bool {
        self.children.iter().any(|(_, c)| c.is_interactive())
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("flex", &self.flex)
            .field("children", &self.children.len())
            .field("focus", &self.focus)
            .finish()
    }
}
