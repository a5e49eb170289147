//! Form Widget: labelled fields above a row of buttons.
//!
//! Focus moves through the interactive fields and then the buttons:
//! Tab/Shift+Tab cycle through everything, Up/Down move between fields
//! (Down from the last field reaches the buttons) and Left/Right move
//! between buttons. Enter in a field advances to the next one; in the
//! last field it submits the form.

use super::button::Button;
use super::text_input::TextInput;
use super::traits::{draw_graphemes, text_width, truncate, Widget};
use crate::buffer::{Buffer, Style};
use crate::input::{Event, KeyCode};
use crate::layout::{align, Alignment, Rect, Size};

/// Columns between buttons on the button row.
const BUTTON_GAP: u16 = 2;

/// Width given to a field's control when asked for a preferred size.
const CONTROL_WIDTH: u16 = 20;

/// Styles for the form widget.
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Border.
    pub style: Style,
    /// Field labels.
    pub label: Style,
    /// Title line.
    pub title: Style,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            style: Style::DEFAULT,
            label: Style::DEFAULT.with_bold(),
            title: Style::DEFAULT.with_bold(),
        }
    }
}

enum Control {
    Input(TextInput),
    Other(Box<dyn Widget>),
}

impl Control {
    fn widget(&self) -> &dyn Widget {
        match self {
            Self::Input(input) => input,
            Self::Other(widget) => widget.as_ref(),
        }
    }

    fn widget_mut(&mut self) -> &mut (dyn Widget + 'static) {
        match self {
            Self::Input(input) => input,
            Self::Other(widget) => widget.as_mut(),
        }
    }
}

struct Field {
    label: String,
    control: Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Field(usize),
    Button(usize),
}

/// Submitted `(label, content)` pairs, one per text input, in field order.
pub type FormValues = Vec<(String, String)>;

/// A form of labelled fields and a button row.
pub struct Form {
    fields: Vec<Field>,
    buttons: Vec<Button>,
    focus: Option<Slot>,
    /// Columns reserved for labels, including the `": "` suffix.
    label_width: u16,
    title: Option<String>,
    border: bool,
    focused: bool,
    config: FormConfig,
    on_submit: Option<Box<dyn FnMut(&FormValues)>>,
}

impl Form {
    /// An empty form with a fifteen-column label area.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            buttons: Vec::new(),
            focus: None,
            label_width: 15,
            title: None,
            border: false,
            focused: false,
            config: FormConfig::default(),
            on_submit: None,
        }
    }

    /// Append a text input field.
    #[must_use]
    pub fn with_input(mut self, label: impl Into<String>, input: TextInput) -> Self {
        self.push_field(label.into(), Control::Input(input));
        self
    }

    /// Append a field holding any widget.
    #[must_use]
    pub fn with_field(mut self, label: impl Into<String>, widget: impl Widget + 'static) -> Self {
        self.push_field(label.into(), Control::Other(Box::new(widget)));
        self
    }

    /// Append a button to the button row.
    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        if self.focus.is_none() {
            self.focus = Some(Slot::Button(self.buttons.len() - 1));
        }
        self
    }

    /// Set the label column width.
    #[must_use]
    pub const fn with_label_width(mut self, width: u16) -> Self {
        self.label_width = width;
        self
    }

    /// Show a centred title above the fields.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Draw a single-line border around the form.
    #[must_use]
    pub const fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Replace the styles.
    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with the current values when Enter is pressed in the last
    /// field.
    #[must_use]
    pub fn on_submit(mut self, f: impl FnMut(&FormValues) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    fn push_field(&mut self, label: String, control: Control) {
        let interactive = control.widget().is_interactive();
        self.fields.push(Field { label, control });
        let first_button = matches!(self.focus, Some(Slot::Button(_)));
        if interactive && (self.focus.is_none() || first_button) {
            self.move_focus(Slot::Field(self.fields.len() - 1));
        }
    }

    /// Content of every text input, keyed by label, in field order.
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .filter_map(|field| match &field.control {
                Control::Input(input) => Some((field.label.clone(), input.content().to_string())),
                Control::Other(_) => None,
            })
            .collect()
    }

    /// The text input labelled `label`.
    pub fn input(&self, label: &str) -> Option<&TextInput> {
        self.fields.iter().find_map(|field| match &field.control {
            Control::Input(input) if field.label == label => Some(input),
            _ => None,
        })
    }

    /// The text input labelled `label`, mutably.
    pub fn input_mut(&mut self, label: &str) -> Option<&mut TextInput> {
        self.fields.iter_mut().find_map(|field| match &mut field.control {
            Control::Input(input) if field.label == label => Some(input),
            _ => None,
        })
    }

    /// Label of the focused field, if focus is on a field.
    pub fn focused_field(&self) -> Option<&str> {
        match self.focus {
            Some(Slot::Field(i)) => Some(self.fields[i].label.as_str()),
            _ => None,
        }
    }

    /// Index of the focused button, if focus is on the button row.
    pub const fn focused_button(&self) -> Option<usize> {
        match self.focus {
            Some(Slot::Button(i)) => Some(i),
            _ => None,
        }
    }

    /// Run the submit callback with the current values.
    pub fn submit(&mut self) {
        let values = self.values();
        tracing::debug!(fields = values.len(), "form submitted");
        if let Some(f) = self.on_submit.as_mut() {
            f(&values);
        }
    }

    fn slot_widget(&mut self, slot: Slot) -> Option<&mut (dyn Widget + 'static)> {
        match slot {
            Slot::Field(i) => self.fields.get_mut(i).map(|f| f.control.widget_mut()),
            Slot::Button(i) => self.buttons.get_mut(i).map(|b| b as &mut (dyn Widget + 'static)),
        }
    }

    fn move_focus(&mut self, slot: Slot) {
        if let Some(current) = self.focus {
            if let Some(widget) = self.slot_widget(current) {
                widget.set_focused(false);
            }
        }
        self.focus = Some(slot);
        let focused = self.focused;
        if let Some(widget) = self.slot_widget(slot) {
            widget.set_focused(focused);
        }
    }

    /// Interactive fields then buttons: the Tab order.
    fn order(&self) -> Vec<Slot> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.control.widget().is_interactive())
            .map(|(i, _)| Slot::Field(i))
            .chain((0..self.buttons.len()).map(Slot::Button))
            .collect()
    }

    fn cycle(&mut self, forward: bool) -> bool {
        let order = self.order();
        if order.is_empty() {
            return false;
        }
        let n = order.len();
        let next = match self.focus.and_then(|s| order.iter().position(|&o| o == s)) {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        self.move_focus(order[next]);
        true
    }

    fn interactive_fields(&self) -> Vec<usize> {
        self.order()
            .into_iter()
            .filter_map(|s| match s {
                Slot::Field(i) => Some(i),
                Slot::Button(_) => None,
            })
            .collect()
    }

    fn field_key(&mut self, index: usize, event: &Event, code: KeyCode) -> bool {
        let fields = self.interactive_fields();
        let pos = fields.iter().position(|&i| i == index);
        let next = pos.and_then(|p| fields.get(p + 1)).copied();
        let prev = pos.and_then(|p| p.checked_sub(1)).and_then(|p| fields.get(p)).copied();
        match code {
            KeyCode::Up => {
                if let Some(prev) = prev {
                    self.move_focus(Slot::Field(prev));
                }
                true
            }
            KeyCode::Down => {
                if let Some(next) = next {
                    self.move_focus(Slot::Field(next));
                } else if !self.buttons.is_empty() {
                    self.move_focus(Slot::Button(0));
                }
                true
            }
            KeyCode::Enter => {
                match next {
                    Some(next) => self.move_focus(Slot::Field(next)),
                    None => self.submit(),
                }
                true
            }
            KeyCode::Left | KeyCode::Right => {
                self.fields[index].control.widget_mut().handle_event(event);
                true
            }
            _ => self.fields[index].control.widget_mut().handle_event(event),
        }
    }

    fn button_key(&mut self, index: usize, event: &Event, code: KeyCode) -> bool {
        let n = self.buttons.len();
        match code {
            KeyCode::Left => self.move_focus(Slot::Button((index + n - 1) % n)),
            KeyCode::Right => self.move_focus(Slot::Button((index + 1) % n)),
            KeyCode::Up => {
                if let Some(&last) = self.interactive_fields().last() {
                    self.move_focus(Slot::Field(last));
                }
            }
            KeyCode::Down => {}
            _ => return self.buttons[index].handle_event(event),
        }
        true
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Form {
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

        let mut y = inner.y;
        if let Some(title) = &self.title {
            let title = truncate(title, usize::from(inner.width));
            let len = u16::try_from(text_width(title)).unwrap_or(u16::MAX);
            let x = inner.x.saturating_add(align(len, inner.width, Alignment::Center));
            let room = usize::from(inner.width);
            draw_graphemes(buffer, x, y, inner.z, title, self.config.title, room);
            y = y.saturating_add(1);
        }

        let label_room = usize::from(self.label_width.saturating_sub(2));
        let control_x = inner.x.saturating_add(self.label_width);
        let control_width = inner.width.saturating_sub(self.label_width);
        for field in &self.fields {
            if y >= inner.bottom() {
                return;
            }
            let label = format!("{}: ", truncate(&field.label, label_room));
            let room = usize::from(inner.width);
            draw_graphemes(buffer, inner.x, y, inner.z, &label, self.config.label, room);
            if control_width > 0 {
                let area = Rect::new(control_x, y, control_width, 1).with_z(inner.z);
                field.control.widget().render(buffer, area);
            }
            y = y.saturating_add(1);
        }

        if self.buttons.is_empty() {
            return;
        }
        let y = y.saturating_add(1);
        if y >= inner.bottom() {
            return;
        }
        let mut x = inner.x;
        for button in &self.buttons {
            let width = button.preferred_size().width.min(inner.right().saturating_sub(x));
            if width == 0 {
                break;
            }
            button.render(buffer, Rect::new(x, y, width, 1).with_z(inner.z));
            x = x.saturating_add(width).saturating_add(BUTTON_GAP);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        let Some(key) = event.as_key() else {
            return false;
        };
        if key.code == KeyCode::Tab {
            return self.cycle(!key.is_shift());
        }
        match self.focus {
            Some(Slot::Field(i)) => self.field_key(i, event, key.code),
            Some(Slot::Button(i)) => self.button_key(i, event, key.code),
            None => false,
        }
    }

    fn preferred_size(&self) -> Size {
        let mut height = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        if self.title.is_some() {
            height = height.saturating_add(1);
        }
        if !self.buttons.is_empty() {
            height = height.saturating_add(2);
        }
        let width = self.label_width.saturating_add(CONTROL_WIDTH);
        if self.border {
            Size::new(width.saturating_add(2), height.saturating_add(2))
        } else {
            Size::new(width, height)
        }
    }

    fn minimum_size(&self) -> Size {
        let fields = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        Size::new(self.label_width.saturating_add(10), fields.saturating_add(2))
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if let Some(slot) = self.focus {
            if let Some(widget) = self.slot_widget(slot) {
                widget.set_focused(focused);
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.fields.iter().map(|f| f.label.as_str()).collect();
        f.debug_struct("Form")
            .field("fields", &labels)
            .field("buttons", &self.buttons)
            .field("focus", &self.focus)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyEvent, KeyModifiers};
    use crate::widget::Text;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            assert!(form.handle_event(&key(KeyCode::Char(c))));
        }
    }

    fn login(log: &Rc<RefCell<Vec<String>>>) -> Form {
        let pressed = Rc::clone(log);
        let submitted = Rc::clone(log);
        Form::new()
            .with_label_width(7)
            .with_field("Note", Text::new("hi"))
            .with_input("Name", TextInput::new())
            .with_input("Pass", TextInput::new())
            .with_button(
                Button::new("OK").on_press(move || pressed.borrow_mut().push("ok".into())),
            )
            .with_button(Button::new("Cancel"))
            .on_submit(move |values| {
                let line: Vec<String> = values.iter().map(|(k, v)| format!("{k}={v}")).collect();
                submitted.borrow_mut().push(line.join(","));
            })
    }

    #[test]
    fn test_first_interactive_field_takes_focus() {
        let log = Rc::default();
        let mut form = login(&log);
        assert_eq!(form.focused_field(), Some("Name"));
        assert!(!form.input("Name").is_some_and(Widget::is_focused));
        form.set_focused(true);
        assert!(form.input("Name").is_some_and(Widget::is_focused));
        assert_eq!(Form::new().with_button(Button::new("Go")).focused_button(), Some(0));
    }

    #[test]
    fn test_tab_cycles_fields_then_buttons() {
        let log = Rc::default();
        let mut form = login(&log);
        form.set_focused(true);
        let tab = key(KeyCode::Tab);
        form.handle_event(&tab);
        assert_eq!(form.focused_field(), Some("Pass"));
        assert!(!form.input("Name").is_some_and(Widget::is_focused));
        form.handle_event(&tab);
        assert_eq!(form.focused_button(), Some(0));
        form.handle_event(&tab);
        form.handle_event(&tab);
        assert_eq!(form.focused_field(), Some("Name"));
        form.handle_event(&Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)));
        assert_eq!(form.focused_button(), Some(1));
    }

    #[test]
    fn test_typing_enter_and_submit() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut form = login(&log);
        assert!(!form.handle_event(&key(KeyCode::Char('x'))));
        form.set_focused(true);
        type_text(&mut form, "ann");
        form.handle_event(&key(KeyCode::Enter));
        assert_eq!(form.focused_field(), Some("Pass"));
        type_text(&mut form, "pw");
        form.handle_event(&key(KeyCode::Enter));
        assert_eq!(*log.borrow(), vec!["Name=ann,Pass=pw"]);
        assert_eq!(form.input("Pass").map(TextInput::content), Some("pw"));
    }

    #[test]
    fn test_arrows_move_between_fields_and_buttons() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut form = login(&log);
        form.set_focused(true);
        assert!(form.handle_event(&key(KeyCode::Up)));
        assert_eq!(form.focused_field(), Some("Name"));
        form.handle_event(&key(KeyCode::Down));
        form.handle_event(&key(KeyCode::Down));
        assert_eq!(form.focused_button(), Some(0));
        form.handle_event(&key(KeyCode::Left));
        assert_eq!(form.focused_button(), Some(1));
        form.handle_event(&key(KeyCode::Right));
        assert!(form.handle_event(&key(KeyCode::Enter)));
        assert_eq!(*log.borrow(), vec!["ok"]);
        form.handle_event(&key(KeyCode::Up));
        assert_eq!(form.focused_field(), Some("Pass"));
    }

    #[test]
    fn test_render_labels_controls_and_buttons() {
        let log = Rc::default();
        let mut form = login(&log).with_title("Login");
        if let Some(name) = form.input_mut("Name") {
            name.set_content("ann");
        }
        let mut buffer = Buffer::new(24, 6);
        form.render(&mut buffer, Rect::new(0, 0, 24, 6));
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "         Login          ");
        assert_eq!(frame.row_text(1), "Note:  hi               ");
        assert_eq!(frame.row_text(2), "Name:  > ann            ");
        assert_eq!(frame.row_text(5), "[ OK ]  [ Cancel ]      ");
        assert_eq!(frame.get(0, 1).style, Style::DEFAULT.with_bold());
        assert_eq!(form.preferred_size(), Size::new(27, 6));
    }
}
