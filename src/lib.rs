//! # Stratum
//!
//! A layered, diff-rendered terminal UI toolkit.
//!
//! Stratum draws into a z-ordered grid of styled cells, flattens it into a
//! single frame, and writes only the cells that changed since the previous
//! frame. Input arrives as raw bytes from the terminal and is decoded into
//! typed key, mouse and resize events on a dedicated thread.
//!
//! ## Core Concepts
//!
//! - **Layered buffer**: widgets draw on z-planes; higher planes win where
//!   they are not empty
//! - **Minimal diff**: cursor moves and style changes are emitted only when
//!   needed, in one write per frame
//! - **Byte-stream decoder**: ESC sequences, control characters, UTF-8 and
//!   SGR mouse reports without relying on terminfo
//! - **Single-threaded drawing**: the event loop owns the renderer; other
//!   threads send messages
//!
//! ## Example
//!
//! ```rust
//! use stratum::{Buffer, Renderer, Style};
//!
//! let mut renderer = Renderer::new(10, 2, 2, Vec::new());
//! renderer.buffer_mut().draw_text(0, 0, 0, "hi", Style::default());
//! renderer.render().unwrap();
//! assert_eq!(renderer.front().row_text(0), "hi        ");
//!
//! let _ = Buffer::new(80, 24);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod buffer;
pub mod error;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use app::{App, AppConfig, QuitHandle, RenderHandle, Tick};
pub use buffer::{Buffer, Cell, Color, Frame, Modifiers, Rgb, Style};
pub use error::{Error, Result};
pub use input::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
pub use layout::{Rect, Size};
pub use renderer::{RenderStats, Renderer};
pub use widget::Widget;
