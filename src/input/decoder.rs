//! Byte-stream decoder: raw terminal input to [`Event`]s.
//!
//! [`decode`] looks at the front of a byte slice and returns at most one
//! event plus the number of bytes it used. It is total: every non-empty
//! input consumes at least one byte, and nothing it is fed makes it fail.
//!
//! Rules, in priority order:
//!
//! ```text
//! ESC                     lone, at end of input      → Escape (1 byte)
//! ESC [ params inter F    CSI                        → arrows, Home/End, ~ keys, F1-F4, mouse
//! ESC O x                 SS3                        → arrows, Home/End, F1-F4
//! ESC x                   anything else              → decode(x) with Alt added
//! 0x00-0x1F               control bytes              → Tab, Enter, Ctrl+letter
//! 0x7F                    DEL                        → Backspace
//! otherwise               UTF-8                      → Char
//! ```
//!
//! Ambiguous input is resolved immediately instead of waiting for more bytes:
//! a lone trailing ESC is an Escape key press, and a multi-byte UTF-8 lead
//! byte without its continuation bytes becomes a single best-effort char.

use super::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

#[inline]
fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
    Some(Event::Key(KeyEvent::new(code, modifiers)))
}

#[inline]
fn escape() -> Option<Event> {
    key(KeyCode::Escape, KeyModifiers::empty())
}

/// Decode the event at the front of `data`.
///
/// Returns the event (if the bytes form one) and the number of bytes
/// consumed. The count is 0 only when `data` is empty.
pub fn decode(data: &[u8]) -> (Option<Event>, usize) {
    let Some(&first) = data.first() else {
        return (None, 0);
    };
    match first {
        ESC => decode_escape(data),
        DEL => (key(KeyCode::Backspace, KeyModifiers::empty()), 1),
        b if b < 0x20 => (decode_control(b), 1),
        _ => decode_utf8(data),
    }
}

fn decode_escape(data: &[u8]) -> (Option<Event>, usize) {
    match data.get(1) {
        None => return (escape(), 1),
        Some(b'[') => return decode_csi(data),
        Some(b'O') => return decode_ss3(data),
        Some(_) => {}
    }
    // A run of ESC prefixes collapses into a single Alt. Counted
    // iteratively so arbitrarily long runs cannot exhaust the stack.
    let prefix = data
        .windows(2)
        .take_while(|pair| pair[0] == ESC && !matches!(pair[1], b'[' | b'O'))
        .count();
    let (event, used) = decode(&data[prefix..]);
    let event = match event {
        Some(Event::Key(mut k)) => {
            k.modifiers |= KeyModifiers::ALT;
            Some(Event::Key(k))
        }
        other => other,
    };
    (event, used + prefix)
}

fn decode_control(b: u8) -> Option<Event> {
    match b {
        0x00 => key(KeyCode::Char(' '), KeyModifiers::CTRL),
        0x09 => key(KeyCode::Tab, KeyModifiers::empty()),
        0x0a | 0x0d => key(KeyCode::Enter, KeyModifiers::empty()),
        1..=26 => key(KeyCode::Char(char::from(b'a' + b - 1)), KeyModifiers::CTRL),
        // 0x1C-0x1F have no conventional meaning here.
        _ => None,
    }
}

fn decode_utf8(data: &[u8]) -> (Option<Event>, usize) {
    let first = data[0];
    let len = match first {
        0x00..=0x7f => 1,
        0x80..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    };
    let Some(bytes) = data.get(..len) else {
        // Not enough bytes yet: take the lead byte on its own.
        return (key(KeyCode::Char(char::from(first)), KeyModifiers::empty()), 1);
    };
    let ch = std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    (key(KeyCode::Char(ch), KeyModifiers::empty()), len)
}

/// `ESC [` sequences. `data[..2]` is known to be `ESC [`.
fn decode_csi(data: &[u8]) -> (Option<Event>, usize) {
    if data.len() < 3 {
        return (escape(), 1);
    }
    // Legacy X10 mouse: ESC [ M cb cx cy, raw bytes rather than digits.
    if data[2] == b'M' {
        return decode_x10_mouse(data);
    }

    let mut i = 2;
    while i < data.len() && (0x30..=0x3f).contains(&data[i]) {
        i += 1;
    }
    while i < data.len() && (0x20..=0x2f).contains(&data[i]) {
        i += 1;
    }
    let Some(&fin) = data.get(i) else {
        return (escape(), 1);
    };
    let params = &data[2..i];
    let used = i + 1;

    let event = match fin {
        b'A' => key(KeyCode::Up, csi_modifiers(params)),
        b'B' => key(KeyCode::Down, csi_modifiers(params)),
        b'C' => key(KeyCode::Right, csi_modifiers(params)),
        b'D' => key(KeyCode::Left, csi_modifiers(params)),
        b'H' => key(KeyCode::Home, csi_modifiers(params)),
        b'F' => key(KeyCode::End, csi_modifiers(params)),
        b'Z' => key(KeyCode::Tab, KeyModifiers::SHIFT),
        b'P'..=b'S' => key(KeyCode::F(fin - b'P' + 1), csi_modifiers(params)),
        b'~' => decode_tilde(params),
        b'M' | b'm' if params.first() == Some(&b'<') => decode_sgr_mouse(&params[1..], fin == b'm'),
        // Unknown final: only the ESC is taken, the rest decodes as keys.
        _ => return (escape(), 1),
    };
    match event {
        Some(event) => (Some(event), used),
        None => (escape(), 1),
    }
}

/// `ESC [ n ; m ~` keys.
#[allow(clippy::cast_possible_truncation)]
fn decode_tilde(params: &[u8]) -> Option<Event> {
    let mut fields = params.split(|&b| b == b';');
    let code = fields.next().map_or(0, parse_number);
    let modifiers = fields.next().map_or(KeyModifiers::empty(), |m| {
        KeyModifiers::from_xterm(parse_number(m))
    });
    let code = match code {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::F((code - 10) as u8),
        17..=21 => KeyCode::F((code - 11) as u8),
        23 | 24 => KeyCode::F((code - 12) as u8),
        _ => return escape(),
    };
    key(code, modifiers)
}

/// Modifier from the second CSI parameter (`ESC [ 1 ; 5 A` → Ctrl).
fn csi_modifiers(params: &[u8]) -> KeyModifiers {
    params
        .split(|&b| b == b';')
        .nth(1)
        .map_or(KeyModifiers::empty(), |m| {
            KeyModifiers::from_xterm(parse_number(m))
        })
}

/// Decimal digits of `field`, ignoring anything else. Saturates instead of
/// overflowing on absurdly long parameters.
fn parse_number(field: &[u8]) -> u32 {
    field
        .iter()
        .filter(|b| b.is_ascii_digit())
        .fold(0u32, |n, &b| {
            n.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}

/// `ESC O x` keys.
fn decode_ss3(data: &[u8]) -> (Option<Event>, usize) {
    let Some(&b) = data.get(2) else {
        return (escape(), 1);
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P'..=b'S' => KeyCode::F(b - b'P' + 1),
        _ => return (escape(), 1),
    };
    (key(code, KeyModifiers::empty()), 3)
}

/// Button byte shared by the SGR and X10 encodings.
fn mouse_button(cb: u32, release: bool) -> (MouseButton, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    if cb & 4 != 0 {
        modifiers |= KeyModifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers |= KeyModifiers::ALT;
    }
    if cb & 16 != 0 {
        modifiers |= KeyModifiers::CTRL;
    }

    let button = if cb & 64 != 0 {
        if cb & 1 == 0 {
            MouseButton::WheelUp
        } else {
            MouseButton::WheelDown
        }
    } else if release {
        MouseButton::Release
    } else {
        match cb & 3 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            // Motion with nothing held, or an X10 release.
            _ if cb & 32 != 0 => MouseButton::None,
            _ => MouseButton::Release,
        }
    };
    (button, modifiers)
}

/// `ESC [ < b ; x ; y (M|m)`, `params` without the leading `<`. `None` if
/// a field is missing.
fn decode_sgr_mouse(params: &[u8], release: bool) -> Option<Event> {
    let mut fields = params.split(|&b| b == b';').map(parse_number);
    let (Some(cb), Some(x), Some(y)) = (fields.next(), fields.next(), fields.next()) else {
        return None;
    };
    let (button, modifiers) = mouse_button(cb, release);
    Some(Event::Mouse(MouseEvent {
        x: to_cell(x),
        y: to_cell(y),
        button,
        modifiers,
    }))
}

/// `ESC [ M cb cx cy` with every byte offset by 32.
fn decode_x10_mouse(data: &[u8]) -> (Option<Event>, usize) {
    let Some(&[cb, cx, cy]) = data.get(3..6) else {
        return (escape(), 1);
    };
    let (button, modifiers) = mouse_button(u32::from(cb.saturating_sub(32)), false);
    let event = Event::Mouse(MouseEvent {
        x: to_cell(u32::from(cx.saturating_sub(32))),
        y: to_cell(u32::from(cy.saturating_sub(32))),
        button,
        modifiers,
    });
    (Some(event), 6)
}

/// 1-based terminal coordinate to a 0-based cell index.
fn to_cell(n: u32) -> u16 {
    u16::try_from(n.saturating_sub(1)).unwrap_or(u16::MAX)
}

/// Incremental decoder over a stream of read chunks.
///
/// Bytes that do not yet form a complete event are carried over to the next
/// [`Decoder::feed`]. With the immediate-resolution rules of [`decode`] that
/// carry-over is empty after every call; it exists so a chunk boundary can
/// never lose bytes.
#[derive(Debug, Default)]
pub struct Decoder {
    pending: Vec<u8>,
}

impl Decoder {
    /// Create a decoder with an empty carry-over buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode everything available in `pending + chunk`, in byte order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();
        let mut offset = 0;
        while offset < self.pending.len() {
            let (event, used) = decode(&self.pending[offset..]);
            if used == 0 {
                break;
            }
            events.extend(event);
            offset += used;
        }
        self.pending.drain(..offset);
        events
    }

    /// Bytes waiting for the next chunk.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}
