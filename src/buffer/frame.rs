//! Frame: a flattened, two-dimensional snapshot of what the terminal shows.

use super::cell::Cell;

/// A composited 2D image, stored row-major: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Frame {
    /// Create a frame filled with empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Cell::EMPTY)
    }

    /// Create a frame filled with `cell`.
    pub fn filled(width: u16, height: u16, cell: Cell) -> Self {
        Self {
            cells: vec![cell; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Frame width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cell at `(x, y)`, or [`Cell::EMPTY`] when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index_of(x, y).map_or(Cell::EMPTY, |i| self.cells[i])
    }

    /// Linear index of `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        (x < w && y < h).then(|| y * w + x)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero size; a zero-width frame has no cells anyway.
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    /// The characters of row `y`, for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// Number of positions whose cells differ from `other`.
    ///
    /// Frames of different sizes differ everywhere.
    pub fn diff_count(&self, other: &Self) -> usize {
        if self.width != other.width || self.height != other.height {
            return self.cells.len().max(other.cells.len());
        }
        self.cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bounds() {
        let frame = Frame::new(4, 3);
        assert_eq!(frame.index_of(3, 2), Some(11));
        assert_eq!(frame.index_of(4, 0), None);
        assert_eq!(frame.index_of(-1, 0), None);
        assert_eq!(frame.get(100, 100), Cell::EMPTY);
    }

    #[test]
    fn test_frame_row_text() {
        let mut frame = Frame::new(3, 2);
        frame.cells_mut()[3] = Cell::from_char('a');
        assert_eq!(frame.row_text(0), "   ");
        assert_eq!(frame.row_text(1), "a  ");
        assert_eq!(frame.row_text(5), "");
    }

    #[test]
    fn test_diff_count() {
        let a = Frame::new(5, 5);
        let mut b = a.clone();
        assert_eq!(a.diff_count(&b), 0);
        b.cells_mut()[7] = Cell::from_char('x');
        assert_eq!(a.diff_count(&b), 1);
        assert_eq!(a.diff_count(&Frame::new(2, 2)), 25);
    }
}
