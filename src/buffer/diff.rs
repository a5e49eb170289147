//! Diffing Engine: Generate minimal ANSI sequences from frame changes.
//!
//! This module implements the core anti-flicker logic:
//! 1. Compare the front (on-screen) and back (just flattened) frames
//! 2. Emit a cursor move only when the next changed cell is not directly
//!    after the last one written on the same row
//! 3. Emit a style sequence only when it differs from the last one emitted
//! 4. Reset attributes once at the end if any style was emitted
//!
//! All output is accumulated in a single buffer and flushed with one syscall,
//! so the bytes written grow with the number of changed cells rather than
//! with the screen area.

use super::cell::Cell;
use super::frame::Frame;
use super::style::Style;
use crate::terminal::OutputBuffer;

/// Result of a diff operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of style sequences emitted.
    pub style_changes: usize,
}

impl DiffResult {
    /// Whether this frame produced no output at all.
    #[inline]
    pub const fn is_noop(&self) -> bool {
        self.cells_changed == 0
    }
}

/// Per-frame emission state.
///
/// Nothing is carried between frames: the first changed cell of every frame
/// always gets an explicit cursor move and style.
#[derive(Default)]
struct Emitter {
    last_pos: Option<(u16, u16)>,
    last_style: Option<Style>,
}

impl Emitter {
    /// Write `cell` at `(x, y)` with the minimal amount of escape codes.
    fn put(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: Cell, result: &mut DiffResult) {
        let adjacent = matches!(self.last_pos, Some((lx, ly)) if ly == y && lx.checked_add(1) == Some(x));
        if !adjacent {
            out.cursor_move(x, y);
            result.cursor_moves += 1;
        }
        if self.last_style != Some(cell.style) {
            out.write_style(&cell.style);
            self.last_style = Some(cell.style);
            result.style_changes += 1;
        }
        out.write_char(cell.ch);
        self.last_pos = Some((x, y));
    }

    fn finish(&self, out: &mut OutputBuffer) {
        if self.last_style.is_some() {
            out.reset_attrs();
        }
    }
}

/// Render the difference between two frames into `output`.
///
/// `front` is what the terminal is believed to show and `back` what it
/// should show. Frames of different sizes are treated as if `front` were
/// entirely empty at `back`'s size.
pub fn render_diff(front: &Frame, back: &Frame, output: &mut OutputBuffer) -> DiffResult {
    let mut result = DiffResult::default();
    let mut emitter = Emitter::default();
    let same_size = front.width() == back.width() && front.height() == back.height();
    let width = usize::from(back.width().max(1));

    for (i, &cell) in back.cells().iter().enumerate() {
        let old = if same_size { front.cells()[i] } else { Cell::EMPTY };
        if cell == old {
            continue;
        }
        result.cells_changed += 1;
        // Both fit in u16: they are bounded by the frame's own dimensions.
        let (x, y) = ((i % width) as u16, (i / width) as u16);
        emitter.put(output, x, y, cell, &mut result);
    }

    emitter.finish(output);
    result
}

/// Generate a full redraw sequence (no diffing).
///
/// Homes the cursor, writes every cell row by row with `\r\n` between rows,
/// and resets attributes at the end. Used for the first frame and after a
/// resize, when the previous front frame no longer matches the screen.
pub fn render_full(frame: &Frame, output: &mut OutputBuffer) -> DiffResult {
    let mut result = DiffResult {
        cursor_moves: 1,
        ..DiffResult::default()
    };
    let mut last_style: Option<Style> = None;

    output.cursor_home();
    for (y, row) in frame.rows().enumerate() {
        if y > 0 {
            output.write_raw(b"\r\n");
        }
        for cell in row {
            if last_style != Some(cell.style) {
                output.write_style(&cell.style);
                last_style = Some(cell.style);
                result.style_changes += 1;
            }
            output.write_char(cell.ch);
            result.cells_changed += 1;
        }
    }
    output.reset_attrs();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::style::{BasicColor, Color};
    use crate::buffer::Buffer;

    fn diff(front: &Frame, back: &Frame) -> (DiffResult, String) {
        let mut out = OutputBuffer::new();
        let result = render_diff(front, back, &mut out);
        (result, String::from_utf8(out.as_bytes().to_vec()).unwrap())
    }

    #[test]
    fn test_diff_identical_frames() {
        let a = Frame::new(10, 5);
        let (result, out) = diff(&a, &a.clone());
        assert!(result.is_noop());
        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let front = Frame::new(10, 5);
        let mut buffer = Buffer::new(10, 5);
        buffer.set(5, 2, 0, Cell::from_char('X'));
        let back = buffer.flatten();

        let (result, out) = diff(&front, &back);
        assert_eq!(result.cells_changed, 1);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(result.style_changes, 1);
        assert_eq!(out, "\x1b[3;6H\x1b[0mX\x1b[0m");
    }

    #[test]
    fn test_diff_adjacent_cells_share_cursor_move() {
        let front = Frame::new(10, 5);
        let mut buffer = Buffer::new(10, 5);
        buffer.draw_text(2, 1, 0, "ABC", Style::DEFAULT);

        let (result, out) = diff(&front, &buffer.flatten());
        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(result.style_changes, 1);
        assert_eq!(out, "\x1b[2;3H\x1b[0mABC\x1b[0m");
    }

    #[test]
    fn test_diff_gap_forces_cursor_move() {
        let front = Frame::new(10, 2);
        let mut buffer = Buffer::new(10, 2);
        buffer.set(0, 0, 0, Cell::from_char('a'));
        buffer.set(2, 0, 0, Cell::from_char('b'));
        // Last column of row 0 then first column of row 1 is not adjacent.
        buffer.set(9, 0, 0, Cell::from_char('c'));
        buffer.set(0, 1, 0, Cell::from_char('d'));

        let (result, out) = diff(&front, &buffer.flatten());
        assert_eq!(result.cursor_moves, 4);
        assert_eq!(
            out,
            "\x1b[1;1H\x1b[0ma\x1b[1;3Hb\x1b[1;10Hc\x1b[2;1Hd\x1b[0m"
        );
    }

    #[test]
    fn test_diff_style_tracking() {
        let front = Frame::new(10, 1);
        let red = Style::foreground(Color::Basic(BasicColor::Red));
        let mut buffer = Buffer::new(10, 1);
        buffer.draw_text(0, 0, 0, "ab", red);
        buffer.draw_text(2, 0, 0, "c", Style::DEFAULT);

        let (result, out) = diff(&front, &buffer.flatten());
        assert_eq!(result.style_changes, 2);
        assert_eq!(out, "\x1b[1;1H\x1b[0m\x1b[31mab\x1b[0mc\x1b[0m");
    }

    #[test]
    fn test_diff_erasure_writes_space() {
        let mut before = Buffer::new(3, 1);
        before.set(1, 0, 0, Cell::from_char('x'));
        let front = before.flatten();

        let (result, out) = diff(&front, &Frame::new(3, 1));
        assert_eq!(result.cells_changed, 1);
        assert_eq!(out, "\x1b[1;2H\x1b[0m \x1b[0m");
    }

    #[test]
    fn test_diff_size_mismatch_treats_front_as_empty() {
        let mut buffer = Buffer::new(2, 1);
        buffer.set(1, 0, 0, Cell::from_char('z'));
        let (result, _) = diff(&Frame::new(5, 5), &buffer.flatten());
        assert_eq!(result.cells_changed, 1);
    }

    #[test]
    fn test_render_full() {
        let mut buffer = Buffer::new(3, 2);
        buffer.draw_text(0, 0, 0, "ABC", Style::DEFAULT);

        let mut out = OutputBuffer::new();
        let result = render_full(&buffer.flatten(), &mut out);

        assert_eq!(result.cells_changed, 6);
        assert_eq!(out.as_bytes(), b"\x1b[H\x1b[0mABC\r\n   \x1b[0m");
    }
}
