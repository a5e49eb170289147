//! Buffer: a stack of z-planes holding everything drawn in one frame.
//!
//! Cells live in one contiguous allocation indexed `[z][y][x]`:
//!
//! ```text
//! index = (z * height + y) * width + x
//!
//!   z=2  ┌──────────┐
//!   z=1  │┌──────────┐       flatten()       ┌──────────┐
//!   z=0  ││┌──────────┐   ───────────────▶   │  Frame   │
//!        └││          │   higher non-empty   │  (2D)    │
//!         └│          │   cells win          └──────────┘
//!          └──────────┘
//! ```
//!
//! Every coordinate is a signed `i32` so widgets can compute positions left of
//! or above the screen without wrapping. Writes outside
//! `[0, width) × [0, height) × [0, depth)` are ignored and reads there return
//! [`Cell::EMPTY`].

use super::cell::Cell;
use super::frame::Frame;
use super::style::Style;
use crate::layout::Rect;

/// Number of z-planes a buffer has unless told otherwise.
pub const DEFAULT_DEPTH: u16 = 10;

/// Box-drawing glyphs: corners (tl, tr, bl, br), horizontal, vertical.
struct BoxGlyphs {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const SINGLE: BoxGlyphs = BoxGlyphs {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: BoxGlyphs = BoxGlyphs {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

/// A layered grid of cells.
///
/// The buffer is pure data: drawing never touches the terminal. The
/// [`Renderer`](crate::Renderer) flattens it once per frame and diffs the
/// result against what is on screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage, plane after plane, each plane row-major.
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    depth: u16,
}

impl Buffer {
    /// Create a buffer with [`DEFAULT_DEPTH`] planes.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_depth(width, height, DEFAULT_DEPTH)
    }

    /// Create a buffer with an explicit number of z-planes.
    ///
    /// All cells start empty. Zero-sized dimensions are allowed; such a
    /// buffer ignores every write.
    pub fn with_depth(width: u16, height: u16, depth: u16) -> Self {
        let len = usize::from(width) * usize::from(height) * usize::from(depth);
        Self {
            cells: vec![Cell::EMPTY; len],
            width,
            height,
            depth,
        }
    }

    /// Width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of z-planes.
    #[inline]
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    /// The full-screen rectangle at z = 0.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn plane_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Linear index of `(x, y, z)`, or `None` when out of range.
    #[inline]
    fn index_of(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let z = usize::try_from(z).ok()?;
        let (w, h, d) = (
            usize::from(self.width),
            usize::from(self.height),
            usize::from(self.depth),
        );
        (x < w && y < h && z < d).then(|| (z * h + y) * w + x)
    }

    /// Write a cell. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, cell: Cell) {
        if let Some(i) = self.index_of(x, y, z) {
            self.cells[i] = cell;
        }
    }

    /// Read a cell, or [`Cell::EMPTY`] when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Cell {
        self.index_of(x, y, z).map_or(Cell::EMPTY, |i| self.cells[i])
    }

    /// Write `text` one code point per column starting at `x`.
    ///
    /// No wrapping or clipping; characters past the right edge are dropped
    /// by the bounds check in [`Buffer::set`].
    pub fn draw_text(&mut self, x: i32, y: i32, z: i32, text: &str, style: Style) {
        for (dx, ch) in (0..).zip(text.chars()) {
            self.set(x.saturating_add(dx), y, z, Cell::new(ch, style));
        }
    }

    /// Like [`Buffer::draw_text`], writing at most `max_width` cells.
    pub fn draw_text_clipped(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        text: &str,
        style: Style,
        max_width: usize,
    ) {
        for (dx, ch) in (0..).zip(text.chars().take(max_width)) {
            self.set(x.saturating_add(dx), y, z, Cell::new(ch, style));
        }
    }

    /// Draw `len` copies of `ch` to the right of `(x, y)`.
    pub fn draw_hline(&mut self, x: i32, y: i32, z: i32, len: i32, ch: char, style: Style) {
        let cell = Cell::new(ch, style);
        for dx in 0..len {
            self.set(x.saturating_add(dx), y, z, cell);
        }
    }

    /// Draw `len` copies of `ch` downward from `(x, y)`.
    pub fn draw_vline(&mut self, x: i32, y: i32, z: i32, len: i32, ch: char, style: Style) {
        let cell = Cell::new(ch, style);
        for dy in 0..len {
            self.set(x, y.saturating_add(dy), z, cell);
        }
    }

    /// Draw a single-line box outline. No-op when `w < 2 || h < 2`.
    pub fn draw_box(&mut self, x: i32, y: i32, z: i32, w: i32, h: i32, style: Style) {
        self.draw_outline(x, y, z, w, h, style, &SINGLE);
    }

    /// Draw a double-line box outline. No-op when `w < 2 || h < 2`.
    pub fn draw_double_box(&mut self, x: i32, y: i32, z: i32, w: i32, h: i32, style: Style) {
        self.draw_outline(x, y, z, w, h, style, &DOUBLE);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_outline(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        w: i32,
        h: i32,
        style: Style,
        glyphs: &BoxGlyphs,
    ) {
        if w < 2 || h < 2 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);

        self.set(x, y, z, Cell::new(glyphs.top_left, style));
        self.draw_hline(x.saturating_add(1), y, z, w - 2, glyphs.horizontal, style);
        self.set(right, y, z, Cell::new(glyphs.top_right, style));

        self.draw_vline(x, y.saturating_add(1), z, h - 2, glyphs.vertical, style);
        self.draw_vline(right, y.saturating_add(1), z, h - 2, glyphs.vertical, style);

        self.set(x, bottom, z, Cell::new(glyphs.bottom_left, style));
        self.draw_hline(x.saturating_add(1), bottom, z, w - 2, glyphs.horizontal, style);
        self.set(right, bottom, z, Cell::new(glyphs.bottom_right, style));
    }

    /// Set every cell of every plane to `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Fill a rectangle on one plane. The rectangle's own `z` is ignored.
    pub fn fill_rect(&mut self, area: Rect, z: i32, cell: Cell) {
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(i32::from(x), i32::from(y), z, cell);
            }
        }
    }

    /// Reset every plane to empty cells.
    pub fn clear(&mut self) {
        self.fill(Cell::EMPTY);
    }

    /// Composite all planes into a 2D [`Frame`].
    ///
    /// Planes are applied from z = 0 upward; a non-empty cell overwrites
    /// whatever lies beneath it and an empty cell is transparent.
    pub fn flatten(&self) -> Frame {
        let mut frame = Frame::new(self.width, self.height);
        self.flatten_into(&mut frame);
        frame
    }

    /// Composite into an existing frame, reusing its allocation.
    ///
    /// `frame` is reset when its dimensions differ from the buffer's.
    pub fn flatten_into(&self, frame: &mut Frame) {
        if frame.width() != self.width || frame.height() != self.height {
            *frame = Frame::new(self.width, self.height);
        } else {
            frame.cells_mut().fill(Cell::EMPTY);
        }
        let plane_len = self.plane_len();
        if plane_len == 0 {
            return;
        }
        let out = frame.cells_mut();
        for plane in self.cells.chunks_exact(plane_len) {
            for (dst, src) in out.iter_mut().zip(plane) {
                if !src.is_empty() {
                    *dst = *src;
                }
            }
        }
    }

    /// A new buffer of the given size, carrying over the overlapping region
    /// of every shared plane.
    pub fn resized(&self, width: u16, height: u16, depth: u16) -> Self {
        let mut next = Self::with_depth(width, height, depth);
        let copy_w = usize::from(self.width.min(width));
        for z in 0..self.depth.min(depth) {
            for y in 0..self.height.min(height) {
                let (z, y) = (i32::from(z), i32::from(y));
                if let (Some(src), Some(dst)) = (self.index_of(0, y, z), next.index_of(0, y, z)) {
                    next.cells[dst..dst + copy_w].copy_from_slice(&self.cells[src..src + copy_w]);
                }
            }
        }
        next
    }

    /// Copy `region` of `src` so its top-left lands at `(dst_x, dst_y)` on
    /// plane `dst_z`.
    ///
    /// Cells are copied verbatim, empty ones included. Both the reads and
    /// the writes are bounds-checked like [`Buffer::get`] and [`Buffer::set`].
    pub fn blit(&mut self, src: &Frame, region: Rect, dst_x: i32, dst_y: i32, dst_z: i32) {
        for dy in 0..region.height {
            for dx in 0..region.width {
                let cell = src.get(
                    i32::from(region.x) + i32::from(dx),
                    i32::from(region.y) + i32::from(dy),
                );
                self.set(
                    dst_x.saturating_add(i32::from(dx)),
                    dst_y.saturating_add(i32::from(dy)),
                    dst_z,
                    cell,
                );
            }
        }
    }

    /// Copy the whole of `src` to `(dst_x, dst_y)` on plane `dst_z`.
    pub fn blit_frame(&mut self, src: &Frame, dst_x: i32, dst_y: i32, dst_z: i32) {
        let region = Rect::from_size(src.width(), src.height());
        self.blit(src, region, dst_x, dst_y, dst_z);
    }

    /// Approximate memory used by the cell storage, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.cells.len() * std::mem::size_of::<Cell>() + std::mem::size_of::<Self>()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("memory_bytes", &self.memory_usage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::style::{BasicColor, Color};
    use proptest::prelude::*;

    fn red() -> Style {
        Style::foreground(Color::Basic(BasicColor::Red))
    }

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.depth(), DEFAULT_DEPTH);
        assert_eq!(buffer.get(0, 0, 0), Cell::EMPTY);
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buffer = Buffer::new(80, 24);
        buffer.set(5, 10, 3, Cell::from_char('X'));
        assert_eq!(buffer.get(5, 10, 3).ch, 'X');
        assert_eq!(buffer.get(5, 10, 2), Cell::EMPTY);
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut buffer = Buffer::with_depth(4, 3, 2);
        buffer.set(1, 1, 0, Cell::from_char('k'));
        let before = buffer.clone();

        buffer.set(-1, -1, 0, Cell::from_char('a'));
        buffer.set(4, 3, 2, Cell::from_char('b'));
        buffer.set(0, 0, -1, Cell::from_char('c'));
        buffer.set(i32::MAX, i32::MIN, 0, Cell::from_char('d'));

        assert_eq!(buffer, before);
        assert_eq!(buffer.get(-1, 0, 0), Cell::EMPTY);
        assert_eq!(buffer.get(0, 0, 2), Cell::EMPTY);
    }

    #[test]
    fn test_zero_sized_buffer() {
        let mut buffer = Buffer::with_depth(0, 0, 0);
        buffer.set(0, 0, 0, Cell::from_char('x'));
        buffer.draw_text(0, 0, 0, "hello", Style::DEFAULT);
        let frame = buffer.flatten();
        assert!(frame.cells().is_empty());
    }

    #[test]
    fn test_draw_text() {
        let mut buffer = Buffer::new(10, 2);
        buffer.draw_text(7, 0, 0, "héllo", red());
        assert_eq!(buffer.get(7, 0, 0), Cell::new('h', red()));
        assert_eq!(buffer.get(8, 0, 0).ch, 'é');
        assert_eq!(buffer.get(9, 0, 0).ch, 'l');
        // Clipped by the right edge, not wrapped.
        assert_eq!(buffer.get(0, 1, 0), Cell::EMPTY);
    }

    #[test]
    fn test_draw_text_negative_start() {
        let mut buffer = Buffer::new(10, 1);
        buffer.draw_text(-2, 0, 0, "abcd", Style::DEFAULT);
        assert_eq!(buffer.flatten().row_text(0), "cd        ");
    }

    #[test]
    fn test_draw_text_clipped() {
        let mut buffer = Buffer::new(10, 1);
        buffer.draw_text_clipped(0, 0, 0, "abcdef", Style::DEFAULT, 3);
        assert_eq!(buffer.flatten().row_text(0), "abc       ");
    }

    #[test]
    fn test_draw_box() {
        let mut buffer = Buffer::new(5, 4);
        buffer.draw_box(0, 0, 0, 5, 4, Style::DEFAULT);
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "┌───┐");
        assert_eq!(frame.row_text(1), "│   │");
        assert_eq!(frame.row_text(2), "│   │");
        assert_eq!(frame.row_text(3), "└───┘");
    }

    #[test]
    fn test_draw_double_box_minimum() {
        let mut buffer = Buffer::new(3, 3);
        buffer.draw_double_box(0, 0, 0, 2, 2, Style::DEFAULT);
        let frame = buffer.flatten();
        assert_eq!(frame.row_text(0), "╔╗ ");
        assert_eq!(frame.row_text(1), "╚╝ ");
    }

    #[test]
    fn test_degenerate_box_is_noop() {
        let mut buffer = Buffer::new(5, 5);
        buffer.draw_box(0, 0, 0, 1, 5, Style::DEFAULT);
        buffer.draw_double_box(0, 0, 0, 5, 1, Style::DEFAULT);
        buffer.draw_box(0, 0, 0, -3, -3, Style::DEFAULT);
        assert_eq!(buffer, Buffer::new(5, 5));
    }

    #[test]
    fn test_fill_and_clear() {
        let mut buffer = Buffer::with_depth(3, 3, 3);
        buffer.fill(Cell::from_char('#'));
        assert_eq!(buffer.get(2, 2, 2).ch, '#');
        buffer.clear();
        assert_eq!(buffer, Buffer::with_depth(3, 3, 3));
    }

    #[test]
    fn test_fill_rect() {
        let mut buffer = Buffer::new(10, 10);
        buffer.fill_rect(Rect::new(8, 8, 5, 5), 1, Cell::from_char('x'));
        assert_eq!(buffer.get(8, 8, 1).ch, 'x');
        assert_eq!(buffer.get(9, 9, 1).ch, 'x');
        assert_eq!(buffer.get(7, 8, 1), Cell::EMPTY);
        assert_eq!(buffer.get(8, 8, 0), Cell::EMPTY);
    }

    #[test]
    fn test_flatten_override() {
        let mut buffer = Buffer::new(4, 4);
        buffer.set(1, 1, 0, Cell::from_char('a'));
        buffer.set(1, 1, 5, Cell::from_char('b'));
        assert_eq!(buffer.flatten().get(1, 1).ch, 'b');
    }

    #[test]
    fn test_flatten_empty_is_transparent() {
        let mut buffer = Buffer::new(4, 4);
        buffer.set(1, 1, 0, Cell::from_char('a'));
        buffer.set(1, 1, 3, Cell::EMPTY);
        assert_eq!(buffer.flatten().get(1, 1).ch, 'a');
    }

    #[test]
    fn test_flatten_styled_space_is_opaque() {
        let mut buffer = Buffer::new(4, 4);
        let shade = Cell::from_char(' ').with_bg(Color::Indexed(236));
        buffer.set(1, 1, 0, Cell::from_char('a'));
        buffer.set(1, 1, 1, shade);
        assert_eq!(buffer.flatten().get(1, 1), shade);
    }

    #[test]
    fn test_flatten_is_side_effect_free() {
        let mut buffer = Buffer::new(6, 3);
        buffer.draw_text(0, 0, 2, "top", red());
        buffer.draw_text(0, 0, 0, "bottom", Style::DEFAULT);
        let before = buffer.clone();
        let first = buffer.flatten();
        let second = buffer.flatten();
        assert_eq!(first, second);
        assert_eq!(buffer, before);
        assert_eq!(first.row_text(0), "toptom");
    }

    #[test]
    fn test_overlapping_double_boxes() {
        let mut buffer = Buffer::new(80, 24);
        buffer.draw_double_box(0, 0, 0, 10, 5, Style::DEFAULT);
        buffer.draw_double_box(5, 2, 1, 10, 5, Style::DEFAULT);
        let frame = buffer.flatten();

        // Lower box outline outside the overlap survives.
        assert_eq!(frame.get(0, 0).ch, '╔');
        assert_eq!(frame.get(9, 0).ch, '╗');
        assert_eq!(frame.get(9, 1).ch, '║');
        // Upper box covers the lower box's right edge and bottom edge.
        assert_eq!(frame.get(5, 2).ch, '╔');
        assert_eq!(frame.get(9, 2).ch, '═');
        assert_eq!(frame.get(5, 4).ch, '║');
        // Where the upper box is empty inside, the lower box shows through.
        assert_eq!(frame.get(9, 3).ch, '║');
        assert_eq!(frame.get(7, 4).ch, '═');
        assert_eq!(frame.get(14, 6).ch, '╝');
    }

    #[test]
    fn test_resized_keeps_overlap() {
        let mut buffer = Buffer::with_depth(10, 10, 3);
        buffer.set(2, 2, 1, Cell::from_char('x'));
        buffer.set(8, 8, 2, Cell::from_char('y'));

        let smaller = buffer.resized(5, 5, 2);
        assert_eq!(smaller.width(), 5);
        assert_eq!(smaller.depth(), 2);
        assert_eq!(smaller.get(2, 2, 1).ch, 'x');
        assert_eq!(smaller.get(8, 8, 2), Cell::EMPTY);

        let larger = buffer.resized(20, 20, 4);
        assert_eq!(larger.get(2, 2, 1).ch, 'x');
        assert_eq!(larger.get(8, 8, 2).ch, 'y');
        assert_eq!(larger.get(15, 15, 3), Cell::EMPTY);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut buffer = Buffer::new(3, 3);
        let copy = buffer.clone();
        buffer.set(0, 0, 0, Cell::from_char('z'));
        assert_eq!(copy.get(0, 0, 0), Cell::EMPTY);
    }

    #[test]
    fn test_blit() {
        let mut src = Buffer::new(4, 4);
        src.draw_text(0, 1, 0, "wxyz", Style::DEFAULT);
        let frame = src.flatten();

        let mut dst = Buffer::new(6, 3);
        dst.blit(&frame, Rect::new(1, 1, 3, 1), 4, 0, 2);
        assert_eq!(dst.get(4, 0, 2).ch, 'x');
        assert_eq!(dst.get(5, 0, 2).ch, 'y');
        // 'z' lands past the right edge.
        assert_eq!(dst.flatten().row_text(0), "    xy");

        dst.blit_frame(&frame, -1, -1, 0);
        assert_eq!(dst.get(0, 0, 0).ch, 'x');
    }

    proptest! {
        #[test]
        fn prop_flatten_transparency(
            x in 0i32..16, y in 0i32..8,
            others in prop::collection::vec((0i32..16, 0i32..8, 0i32..10, any::<char>()), 0..40),
        ) {
            let mut buffer = Buffer::new(16, 8);
            let base = Cell::from_char('@');
            buffer.set(x, y, 0, base);
            for (ox, oy, oz, ch) in others {
                if (ox, oy) != (x, y) {
                    buffer.set(ox, oy, oz, Cell::from_char(ch));
                }
            }
            prop_assert_eq!(buffer.flatten().get(x, y), base);
        }

        #[test]
        fn prop_flatten_highest_non_empty_wins(
            layers in prop::collection::vec(prop::option::of(any::<char>()), 10),
        ) {
            let mut buffer = Buffer::new(1, 1);
            for (z, ch) in (0..).zip(&layers) {
                if let Some(ch) = ch {
                    buffer.set(0, 0, z, Cell::from_char(*ch));
                }
            }
            let expected = layers
                .iter()
                .rev()
                .flatten()
                .map(|&ch| Cell::from_char(ch))
                .find(|c| !c.is_empty())
                .unwrap_or(Cell::EMPTY);
            prop_assert_eq!(buffer.flatten().get(0, 0), expected);
        }

        #[test]
        fn prop_out_of_range_never_alters(
            x in any::<i32>(), y in any::<i32>(), z in any::<i32>(),
        ) {
            let mut buffer = Buffer::with_depth(8, 6, 4);
            buffer.set(3, 3, 1, Cell::from_char('k'));
            let in_range = (0..8).contains(&x) && (0..6).contains(&y) && (0..4).contains(&z);
            let before = buffer.clone();
            buffer.set(x, y, z, Cell::from_char('!'));
            if !in_range {
                prop_assert_eq!(&buffer, &before);
                prop_assert_eq!(buffer.get(x, y, z), Cell::EMPTY);
            }
        }
    }
}
