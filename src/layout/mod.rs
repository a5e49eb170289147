//! Layout: rectangles, size constraints, flex and grid placement.
//!
//! Layouts are plain arithmetic recomputed on every frame or resize; there
//! is no persistent layout tree. Every rectangle carries the z-plane its
//! content is drawn on.

mod constraint;
mod flex;
mod rect;

pub use constraint::{align, Alignment, Constraint, Size};
pub use flex::{split, Direction, Flex, FlexChild, Grid};
pub use rect::Rect;
