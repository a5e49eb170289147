//! Flex and grid layout.
//!
//! Both are pure functions from a container [`Rect`] to child rectangles,
//! recomputed whenever the container changes. Children inherit the
//! container's z-plane.

use super::rect::Rect;

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Children side by side, left to right.
    #[default]
    Horizontal,
    /// Children stacked, top to bottom.
    Vertical,
}

/// Sizing rule for one flex child along the main axis.
///
/// A non-zero `fixed` wins over `flex`. Zero `min`/`max` mean unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlexChild {
    /// Exact size in cells.
    pub fixed: u16,
    /// Share of the space left after fixed children; zero counts as one.
    pub flex: u16,
    /// Lower bound for a flexible child.
    pub min: u16,
    /// Upper bound for any child.
    pub max: u16,
}

impl FlexChild {
    /// A child of exactly `size` cells.
    pub const fn fixed(size: u16) -> Self {
        Self {
            fixed: size,
            flex: 0,
            min: 0,
            max: 0,
        }
    }

    /// A child taking `flex` shares of the free space.
    pub const fn flex(flex: u16) -> Self {
        Self {
            fixed: 0,
            flex,
            min: 0,
            max: 0,
        }
    }

    /// A flexible child clamped to `min..=max`.
    pub const fn bounded(flex: u16, min: u16, max: u16) -> Self {
        Self {
            fixed: 0,
            flex,
            min,
            max,
        }
    }

    const fn share(&self) -> u32 {
        if self.flex == 0 {
            1
        } else {
            self.flex as u32
        }
    }
}

/// A one-dimensional flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flex {
    /// Main axis.
    pub direction: Direction,
    /// Empty cells between adjacent children.
    pub gap: u16,
}

impl Flex {
    /// A container laid out along `direction` with no gap.
    pub const fn new(direction: Direction) -> Self {
        Self { direction, gap: 0 }
    }

    /// A left-to-right container.
    pub const fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// A top-to-bottom container.
    pub const fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Set the gap between children.
    #[must_use]
    pub const fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// Compute one rectangle per child inside `container`.
    ///
    /// Fixed children are placed first, in order, each capped by its `max`
    /// and by what is left. The remainder is divided among flexible children
    /// in proportion to their shares, rounding down, then clamped to each
    /// child's bounds and to the space not yet handed out, so the children
    /// never extend past the container. Children are laid out consecutively with `gap`
    /// between them and span the whole cross axis.
    pub fn layout(&self, container: Rect, children: &[FlexChild]) -> Vec<Rect> {
        if children.is_empty() {
            return Vec::new();
        }

        let total = match self.direction {
            Direction::Horizontal => container.width,
            Direction::Vertical => container.height,
        };
        let gaps = u32::from(self.gap) * (children.len() as u32 - 1);
        let mut remaining = u32::from(total).saturating_sub(gaps);

        // First pass: fixed sizes and total flex shares
        let mut sizes = vec![0u32; children.len()];
        let mut shares = 0u32;
        for (size, child) in sizes.iter_mut().zip(children) {
            if child.fixed > 0 {
                let mut wanted = u32::from(child.fixed);
                if child.max > 0 {
                    wanted = wanted.min(u32::from(child.max));
                }
                *size = wanted.min(remaining);
                remaining -= *size;
            } else {
                shares += child.share();
            }
        }

        // Second pass: split the remainder among flexible children
        if shares > 0 && remaining > 0 {
            let mut left = remaining;
            for (size, child) in sizes.iter_mut().zip(children) {
                if child.fixed > 0 {
                    continue;
                }
                let mut s = remaining * child.share() / shares;
                if child.min > 0 {
                    s = s.max(u32::from(child.min));
                }
                if child.max > 0 {
                    s = s.min(u32::from(child.max));
                }
                // Minimums may ask for more than is left; earlier children win.
                *size = s.min(left);
                left -= *size;
            }
        }

        let mut offset = 0u32;
        sizes
            .into_iter()
            .map(|size| {
                let size = clamp_u16(size);
                let start = clamp_u16(offset);
                offset += u32::from(size) + u32::from(self.gap);
                match self.direction {
                    Direction::Horizontal => Rect::new(
                        container.x.saturating_add(start),
                        container.y,
                        size,
                        container.height,
                    ),
                    Direction::Vertical => Rect::new(
                        container.x,
                        container.y.saturating_add(start),
                        container.width,
                        size,
                    ),
                }
                .with_z(container.z)
            })
            .collect()
    }
}

/// Divide `container` into `n` equal parts along `direction`.
pub fn split(container: Rect, n: usize, direction: Direction, gap: u16) -> Vec<Rect> {
    let children = vec![FlexChild::flex(1); n];
    Flex { direction, gap }.layout(container, &children)
}

/// A uniform grid of equally sized cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Number of rows.
    pub rows: u16,
    /// Number of columns.
    pub cols: u16,
    /// Empty rows between grid rows.
    pub row_gap: u16,
    /// Empty columns between grid columns.
    pub col_gap: u16,
    /// Inset applied to the container on every side.
    pub padding: u16,
}

impl Grid {
    /// A `rows` x `cols` grid with no gaps or padding.
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            row_gap: 0,
            col_gap: 0,
            padding: 0,
        }
    }

    /// Set row and column gaps.
    #[must_use]
    pub const fn with_gaps(mut self, row_gap: u16, col_gap: u16) -> Self {
        self.row_gap = row_gap;
        self.col_gap = col_gap;
        self
    }

    /// Set the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    /// Cell rectangles, indexed `[row][col]`. Space that does not divide
    /// evenly is left at the right and bottom.
    pub fn layout(&self, container: Rect) -> Vec<Vec<Rect>> {
        if self.rows == 0 || self.cols == 0 {
            return Vec::new();
        }
        let inner = container.shrink(self.padding);
        let cell_w = cell_span(inner.width, self.cols, self.col_gap);
        let cell_h = cell_span(inner.height, self.rows, self.row_gap);

        (0..u32::from(self.rows))
            .map(|row| {
                (0..u32::from(self.cols))
                    .map(|col| {
                        let x = col * (u32::from(cell_w) + u32::from(self.col_gap));
                        let y = row * (u32::from(cell_h) + u32::from(self.row_gap));
                        Rect::new(
                            inner.x.saturating_add(clamp_u16(x)),
                            inner.y.saturating_add(clamp_u16(y)),
                            cell_w,
                            cell_h,
                        )
                        .with_z(container.z)
                    })
                    .collect()
            })
            .collect()
    }

    /// The rectangle of one cell, or [`Rect::ZERO`] outside the grid.
    pub fn cell_at(&self, container: Rect, row: u16, col: u16) -> Rect {
        self.layout(container)
            .get(usize::from(row))
            .and_then(|r| r.get(usize::from(col)))
            .copied()
            .unwrap_or(Rect::ZERO)
    }
}

fn cell_span(total: u16, count: u16, gap: u16) -> u16 {
    let gaps = u32::from(gap) * (u32::from(count) - 1);
    clamp_u16(u32::from(total).saturating_sub(gaps) / u32::from(count))
}

fn clamp_u16(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_then_flex() {
        let flex = Flex::horizontal();
        let rects = flex.layout(
            Rect::new(0, 0, 20, 3).with_z(2),
            &[FlexChild::fixed(4), FlexChild::flex(1), FlexChild::flex(3)],
        );
        assert_eq!(rects[0], Rect::new(0, 0, 4, 3).with_z(2));
        assert_eq!(rects[1], Rect::new(4, 0, 4, 3).with_z(2));
        assert_eq!(rects[2], Rect::new(8, 0, 12, 3).with_z(2));
    }

    #[test]
    fn test_gap_and_vertical() {
        let rects = Flex::vertical()
            .with_gap(1)
            .layout(Rect::new(2, 2, 10, 11), &[FlexChild::flex(1), FlexChild::flex(1)]);
        assert_eq!(rects[0], Rect::new(2, 2, 10, 5));
        assert_eq!(rects[1], Rect::new(2, 8, 10, 5));
    }

    #[test]
    fn test_bounds_and_overflow() {
        let rects = Flex::horizontal().layout(
            Rect::new(0, 0, 10, 1),
            &[FlexChild::fixed(30), FlexChild::bounded(1, 3, 5)],
        );
        // The fixed child takes everything; the min still applies afterwards
        // only when space remains.
        assert_eq!(rects[0].width, 10);
        assert_eq!(rects[1].width, 0);

        let rects = Flex::horizontal().layout(
            Rect::new(0, 0, 40, 1),
            &[FlexChild::bounded(1, 0, 5), FlexChild::flex(1)],
        );
        assert_eq!(rects[0].width, 5);
        assert_eq!(rects[1].width, 20);
    }

    #[test]
    fn test_minimums_never_overflow_container() {
        let container = Rect::new(0, 0, 10, 1);
        let rects = Flex::horizontal().with_gap(1).layout(
            container,
            &[
                FlexChild::bounded(1, 6, 0),
                FlexChild::bounded(1, 6, 0),
                FlexChild::bounded(1, 6, 0),
            ],
        );
        let widths: Vec<u16> = rects.iter().map(|r| r.width).collect();
        assert_eq!(widths, vec![6, 2, 0]);
        for rect in &rects {
            assert!(rect.right() <= container.right());
        }
    }

    #[test]
    fn test_split_even() {
        let parts = split(Rect::new(0, 0, 9, 1), 3, Direction::Horizontal, 0);
        let widths: Vec<u16> = parts.iter().map(|r| r.width).collect();
        assert_eq!(widths, vec![3, 3, 3]);
        assert!(split(Rect::new(0, 0, 9, 1), 0, Direction::Horizontal, 0).is_empty());
    }

    #[test]
    fn test_grid() {
        let grid = Grid::new(2, 3).with_gaps(1, 1).with_padding(1);
        let cells = grid.layout(Rect::new(0, 0, 14, 9));
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0][0], Rect::new(1, 1, 3, 3));
        assert_eq!(cells[1][2], Rect::new(9, 5, 3, 3));
        assert_eq!(grid.cell_at(Rect::new(0, 0, 14, 9), 5, 0), Rect::ZERO);
    }
}
