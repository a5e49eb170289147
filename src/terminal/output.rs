//! `OutputBuffer`: single-syscall output buffer for ANSI sequences.
//!
//! Escape codes emitted here follow xterm conventions exactly:
//!
//! | Sequence          | Meaning                          |
//! |-------------------|----------------------------------|
//! | `ESC[row;colH`    | cursor position (1-indexed)      |
//! | `ESC[H`           | cursor home                      |
//! | `ESC[2J`          | clear screen                     |
//! | `ESC[?1049h/l`    | enter / leave alternate screen   |
//! | `ESC[?25h/l`      | show / hide cursor               |
//! | `ESC[?1000h/l`    | mouse button tracking            |
//! | `ESC[?1006h/l`    | SGR extended mouse reports       |
//! | `ESC[0m`          | reset attributes                 |

use crate::buffer::Style;
use std::io::Write;

/// Cursor home.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
/// Clear the whole screen.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
/// Reset all SGR attributes.
pub const RESET_ATTRS: &[u8] = b"\x1b[0m";
/// Hide the cursor.
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
/// Show the cursor.
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
/// Switch to the alternate screen buffer.
pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
/// Return to the main screen buffer.
pub const ALT_SCREEN_EXIT: &[u8] = b"\x1b[?1049l";
/// Enable button tracking with SGR-encoded reports.
pub const MOUSE_ENABLE: &[u8] = b"\x1b[?1000h\x1b[?1006h";
/// Disable mouse reporting.
pub const MOUSE_DISABLE: &[u8] = b"\x1b[?1006l\x1b[?1000l";

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write one character as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.data
            .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move the cursor to 0-based `(x, y)`; emitted 1-indexed.
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // Writes into a Vec cannot fail.
        let _ = write!(
            self.data,
            "\x1b[{};{}H",
            u32::from(y) + 1,
            u32::from(x) + 1
        );
    }

    /// Move the cursor to the top-left corner.
    #[inline]
    pub fn cursor_home(&mut self) {
        self.write_raw(CURSOR_HOME);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.write_raw(CURSOR_HIDE);
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.write_raw(CURSOR_SHOW);
    }

    /// Write the full SGR sequence for `style`.
    #[inline]
    pub fn write_style(&mut self, style: &Style) {
        style.write_sgr(&mut self.data);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.write_raw(RESET_ATTRS);
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.write_raw(CLEAR_SCREEN);
    }

    /// Switch to the alternate screen buffer.
    #[inline]
    pub fn alt_screen_enter(&mut self) {
        self.write_raw(ALT_SCREEN_ENTER);
    }

    /// Return to the main screen buffer.
    #[inline]
    pub fn alt_screen_exit(&mut self) {
        self.write_raw(ALT_SCREEN_EXIT);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("len", &self.data.len())
            .field("capacity", &self.data.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::new();
        out.cursor_move(0, 0);
        out.cursor_move(10, 5);
        out.cursor_move(u16::MAX, u16::MAX);
        assert_eq!(out.as_bytes(), b"\x1b[1;1H\x1b[6;11H\x1b[65536;65536H");
    }

    #[test]
    fn test_write_char_utf8() {
        let mut out = OutputBuffer::new();
        out.write_char('a');
        out.write_char('═');
        assert_eq!(out.as_bytes(), "a═".as_bytes());
    }

    #[test]
    fn test_screen_sequences() {
        let mut out = OutputBuffer::new();
        out.alt_screen_enter();
        out.clear_screen();
        out.cursor_hide();
        out.cursor_show();
        out.alt_screen_exit();
        assert_eq!(
            out.as_bytes(),
            b"\x1b[?1049h\x1b[2J\x1b[?25l\x1b[?25h\x1b[?1049l"
        );
    }

    #[test]
    fn test_write_style() {
        let mut out = OutputBuffer::new();
        out.write_style(&Style::foreground(Color::Indexed(9)).with_bold());
        assert_eq!(out.as_bytes(), b"\x1b[0m\x1b[38;5;9m\x1b[1m");
    }

    #[test]
    fn test_flush_to_writes_everything() {
        let mut out = OutputBuffer::new();
        out.write_str("hello");
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");
        out.clear();
        assert!(out.is_empty());
    }
}
