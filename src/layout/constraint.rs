//! Sizes, size constraints and alignment.

/// A width and height in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl Size {
    /// Create a size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Inclusive bounds on a widget's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    /// Smallest allowed width.
    pub min_width: u16,
    /// Largest allowed width.
    pub max_width: u16,
    /// Smallest allowed height.
    pub min_height: u16,
    /// Largest allowed height.
    pub max_height: u16,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl Constraint {
    /// No limits.
    pub const UNCONSTRAINED: Self = Self {
        min_width: 0,
        max_width: u16::MAX,
        min_height: 0,
        max_height: u16::MAX,
    };

    /// Exactly `width` x `height`.
    pub const fn exact(width: u16, height: u16) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
        }
    }

    /// At most `width` x `height`.
    pub const fn at_most(width: u16, height: u16) -> Self {
        Self {
            min_width: 0,
            max_width: width,
            min_height: 0,
            max_height: height,
        }
    }

    /// At least `width` x `height`.
    pub const fn at_least(width: u16, height: u16) -> Self {
        Self {
            min_width: width,
            max_width: u16::MAX,
            min_height: height,
            max_height: u16::MAX,
        }
    }

    /// Clamp `size` into the bounds. A minimum wins over a smaller maximum.
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(self.constrain_width(size.width), self.constrain_height(size.height))
    }

    /// Clamp a width.
    pub fn constrain_width(&self, width: u16) -> u16 {
        width.min(self.max_width).max(self.min_width)
    }

    /// Clamp a height.
    pub fn constrain_height(&self, height: u16) -> u16 {
        height.min(self.max_height).max(self.min_height)
    }

    /// Bounds reduced by `width` and `height`, for content inside a border
    /// or padding.
    #[must_use]
    pub const fn shrink(&self, width: u16, height: u16) -> Self {
        Self {
            min_width: self.min_width.saturating_sub(width),
            max_width: self.max_width.saturating_sub(width),
            min_height: self.min_height.saturating_sub(height),
            max_height: self.max_height.saturating_sub(height),
        }
    }

    /// Whether min and max agree in both dimensions.
    pub const fn is_tight(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }
}

/// Placement of content inside a larger span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Left or top.
    #[default]
    Start,
    /// Centred, rounding towards the start.
    Center,
    /// Right or bottom.
    End,
    /// Fill the span; positioned like `Start`.
    Stretch,
}

/// Offset of content of `content` length inside a `container` span.
///
/// Content larger than the container is placed at the start.
pub const fn align(content: u16, container: u16, alignment: Alignment) -> u16 {
    let free = container.saturating_sub(content);
    match alignment {
        Alignment::Center => free / 2,
        Alignment::End => free,
        Alignment::Start | Alignment::Stretch => 0,
    }
}
