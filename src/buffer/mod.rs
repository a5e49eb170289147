//! Buffer module: Core data structures for the double-buffer rendering system.
//!
//! This module contains:
//! - [`Style`] / [`Color`] / [`Modifiers`]: colours and attributes, with SGR serialisation
//! - [`Cell`]: The atomic unit of display, a code point plus a style
//! - [`Buffer`]: A layered grid of cells, composited by z-order
//! - [`Frame`]: The flattened 2D image the terminal should show
//! - [`diff`]: Diffing engine for generating minimal ANSI sequences

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;
mod frame;
mod style;

pub use buffer::{Buffer, DEFAULT_DEPTH};
pub use cell::Cell;
pub use diff::DiffResult;
pub use frame::Frame;
pub use style::{BasicColor, Color, Modifiers, Rgb, Style};
