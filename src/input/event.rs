//! Event types produced by the input decoder.
//!
//! Events are plain immutable values. They carry no reference back to the
//! terminal they were decoded from.

use bitflags::bitflags;
use std::fmt;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, or a letter combined with Ctrl / Alt.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Enter/Return key.
    Enter,
    /// Tab key. Shift+Tab arrives as `Tab` with [`KeyModifiers::SHIFT`].
    Tab,
    /// Backspace key.
    Backspace,
    /// Escape key.
    Escape,
    /// Delete key.
    Delete,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Insert key.
    Insert,
}

impl KeyCode {
    /// Human-readable key name, e.g. `"PageUp"`, `"F5"` or `"a"`.
    pub fn name(&self) -> String {
        match self {
            Self::Char(' ') => "Space".to_string(),
            Self::Char(c) => c.to_string(),
            Self::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }
}

bitflags! {
    /// Modifier keys held during a key or mouse event.
    ///
    /// The low three bits match the xterm `;n` encoding, where `n - 1` is the
    /// mask.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0001;
        /// Alt/Option key held.
        const ALT = 0b0010;
        /// Control key held.
        const CTRL = 0b0100;
        /// Meta key held.
        const META = 0b1000;
    }
}

impl fmt::Debug for KeyModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl KeyModifiers {
    /// Decode the xterm modifier parameter (`2` = Shift, `5` = Ctrl, ...).
    ///
    /// Values of 1 or less mean no modifiers.
    pub const fn from_xterm(n: u32) -> Self {
        if n <= 1 {
            return Self::empty();
        }
        Self::from_bits_truncate(((n - 1) & 0b111) as u8)
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key.
    pub code: KeyCode,
    /// Modifiers held during the key press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key event.
    #[inline]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event with no modifiers.
    #[inline]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Ctrl + `c`.
    #[inline]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// Whether Ctrl was held.
    #[inline]
    pub const fn is_ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    /// Whether Alt was held.
    #[inline]
    pub const fn is_alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }

    /// Whether Shift was held.
    #[inline]
    pub const fn is_shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Exact match on key and modifiers.
    #[inline]
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.code == code && self.modifiers == modifiers
    }

    /// An unmodified character key.
    #[inline]
    pub fn is_char(&self, c: char) -> bool {
        self.matches(KeyCode::Char(c), KeyModifiers::empty())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, label) in [
            (KeyModifiers::CTRL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
            (KeyModifiers::META, "Meta+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(label)?;
            }
        }
        f.write_str(&self.code.name())
    }
}

/// Mouse button state reported with a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Motion with no button held.
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// Scroll wheel up.
    WheelUp,
    /// Scroll wheel down.
    WheelDown,
    /// A button was released.
    Release,
}

/// Mouse event details. Coordinates are 0-based cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Button involved.
    pub button: MouseButton,
    /// Modifiers held.
    pub modifiers: KeyModifiers,
}

/// Everything the input path can deliver to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// A mouse report.
    Mouse(MouseEvent),
    /// Reading input failed; the stream may still continue.
    Error(String),
    /// The input stream ended or the application asked to stop.
    Quit,
}

impl Event {
    /// The key event, if this is one.
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

impl From<MouseEvent> for Event {
    fn from(mouse: MouseEvent) -> Self {
        Self::Mouse(mouse)
    }
}

/// The byte a terminal sends for Ctrl + `c` (`'c'` → `0x03`).
///
/// Letters of either case map to 1-26; anything else has no Ctrl byte.
pub const fn ctrl_byte(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        _ => None,
    }
}

/// The letter a Ctrl byte stands for (`0x03` → `'c'`).
pub const fn ctrl_to_letter(b: u8) -> Option<char> {
    match b {
        1..=26 => Some((b'a' + b - 1) as char),
        _ => None,
    }
}

/// Whether `b` is a C0 control byte.
#[inline]
pub const fn is_ctrl_byte(b: u8) -> bool {
    b < 0x20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xterm_modifiers() {
        assert_eq!(KeyModifiers::from_xterm(0), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm(1), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm(2), KeyModifiers::SHIFT);
        assert_eq!(KeyModifiers::from_xterm(3), KeyModifiers::ALT);
        assert_eq!(KeyModifiers::from_xterm(5), KeyModifiers::CTRL);
        assert_eq!(
            KeyModifiers::from_xterm(8),
            KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CTRL
        );
        // Only the low three bits carry meaning.
        assert_eq!(KeyModifiers::from_xterm(9), KeyModifiers::empty());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCode::Up.name(), "Up");
        assert_eq!(KeyCode::PageDown.name(), "PageDown");
        assert_eq!(KeyCode::F(11).name(), "F11");
        assert_eq!(KeyCode::Char('x').name(), "x");
        assert_eq!(KeyCode::Char(' ').name(), "Space");
    }

    #[test]
    fn test_key_event_display() {
        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::CTRL | KeyModifiers::SHIFT);
        assert_eq!(key.to_string(), "Ctrl+Shift+Up");
        assert_eq!(KeyEvent::ctrl('c').to_string(), "Ctrl+c");
    }

    #[test]
    fn test_key_event_predicates() {
        let key = KeyEvent::ctrl('q');
        assert!(key.is_ctrl());
        assert!(!key.is_alt());
        assert!(key.matches(KeyCode::Char('q'), KeyModifiers::CTRL));
        assert!(!key.is_char('q'));
        assert!(KeyEvent::plain(KeyCode::Char('q')).is_char('q'));
    }

    #[test]
    fn test_ctrl_helpers() {
        assert_eq!(ctrl_byte('c'), Some(3));
        assert_eq!(ctrl_byte('C'), Some(3));
        assert_eq!(ctrl_byte('1'), None);
        assert_eq!(ctrl_to_letter(3), Some('c'));
        assert_eq!(ctrl_to_letter(27), None);
        for c in 'a'..='z' {
            assert_eq!(ctrl_byte(c).and_then(ctrl_to_letter), Some(c));
        }
        assert!(is_ctrl_byte(0x1f));
        assert!(!is_ctrl_byte(b' '));
    }
}
