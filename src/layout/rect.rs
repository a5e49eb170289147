//! Rect: A rectangle primitive for layout calculations.

/// A rectangle defined by position, size and the z-plane it draws on.
///
/// Every rectangle derived from another (inset, split, intersection,
/// offset) keeps the source's `z`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: u16,
    /// Y coordinate (row) of the top-left corner.
    pub y: u16,
    /// Z-plane widgets inside this rectangle draw on.
    pub z: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle on z-plane 0.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            z: 0,
            width,
            height,
        }
    }

    /// Create a rectangle from a terminal size (full screen).
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Copy with a different z-plane.
    #[inline]
    #[must_use]
    pub const fn with_z(mut self, z: u16) -> Self {
        self.z = z;
        self
    }

    /// Get the area (number of cells).
    #[inline]
    pub const fn area(&self) -> u32 {
        (self.width as u32) * (self.height as u32)
    }

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Centre point, rounded towards the top-left.
    #[inline]
    pub const fn center(&self) -> (u16, u16) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// The overlapping part of both rectangles, or [`Rect::ZERO`].
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Self::ZERO;
        }
        Self::new(x, y, right - x, bottom - y).with_z(self.z)
    }

    /// The smallest rectangle covering both. Empty inputs are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y).with_z(self.z)
    }

    /// Shrink each side by its own amount. Collapses to zero size rather
    /// than underflowing.
    #[must_use]
    pub const fn inset(&self, top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            x: self.x.saturating_add(left),
            y: self.y.saturating_add(top),
            z: self.z,
            width: self.width.saturating_sub(left.saturating_add(right)),
            height: self.height.saturating_sub(top.saturating_add(bottom)),
        }
    }

    /// Shrink the rectangle by a margin on all sides.
    #[inline]
    #[must_use]
    pub const fn shrink(&self, margin: u16) -> Self {
        self.inset(margin, margin, margin, margin)
    }

    /// Move by `(dx, dy)`, saturating at the coordinate limits.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: shift(self.x, dx),
            y: shift(self.y, dy),
            ..*self
        }
    }

    /// Split horizontally at a given column offset into left and right.
    pub fn split_horizontal(&self, at: u16) -> (Self, Self) {
        let at = at.min(self.width);
        (
            Self::new(self.x, self.y, at, self.height).with_z(self.z),
            Self::new(self.x.saturating_add(at), self.y, self.width - at, self.height)
                .with_z(self.z),
        )
    }

    /// Split vertically at a given row offset into top and bottom.
    pub fn split_vertical(&self, at: u16) -> (Self, Self) {
        let at = at.min(self.height);
        (
            Self::new(self.x, self.y, self.width, at).with_z(self.z),
            Self::new(self.x, self.y.saturating_add(at), self.width, self.height - at)
                .with_z(self.z),
        )
    }
}

const fn shift(v: u16, d: i32) -> u16 {
    let moved = v as i32 + d;
    if moved < 0 {
        0
    } else if moved > u16::MAX as i32 {
        u16::MAX
    } else {
        moved as u16
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, z{} {}x{})",
            self.x, self.y, self.z, self.width, self.height
        )
    }
}
