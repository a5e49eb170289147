//! Widgets: retained view objects drawn into the layered buffer.
//!
//! Every widget implements [`Widget`]. Widgets receive their area at render
//! time, draw on the z-plane the area names, and report whether they
//! consumed an event so the caller knows when to redraw.
//!
//! # Example
//!
//! ```rust
//! use stratum::layout::{FlexChild, Rect};
//! use stratum::widget::{Button, Panel, Stack, Text, Widget};
//! use stratum::Buffer;
//!
//! let root = Panel::new().with_title("Demo").with_child(
//!     Stack::vertical()
//!         .with(FlexChild::fixed(1), Text::new("Hello"))
//!         .with(FlexChild::fixed(1), Button::new("OK")),
//! );
//!
//! let mut buffer = Buffer::new(20, 5);
//! root.render(&mut buffer, Rect::from_size(20, 5));
//! assert_eq!(buffer.flatten().row_text(1), "│Hello             │");
//! ```

mod button;
mod form;
mod list;
mod menu;
mod panel;
mod progress_bar;
mod spinner;
mod stack;
mod status_bar;
mod table;
mod tabs;
mod text;
mod text_input;
mod traits;

pub use button::Button;
pub use form::{Form, FormConfig, FormValues};
pub use list::{List, ListConfig};
pub use menu::{Menu, MenuConfig, MenuItem};
pub use panel::{Border, Panel};
pub use progress_bar::{ProgressBar, ProgressBarConfig, ProgressStyle};
pub use spinner::Spinner;
pub use stack::Stack;
pub use status_bar::{StatusBar, StatusBarConfig};
pub use table::{Column, Table, TableConfig};
pub use tabs::{Tabs, TabsConfig};
pub use text::Text;
pub use text_input::{TextInput, TextInputConfig};
pub use traits::{text_width, truncate, Widget};
