//! Input: from raw terminal bytes to typed events.
//!
//! - [`decode`] / [`Decoder`]: the byte-stream state machine
//! - [`Event`] and friends: the values it produces
//! - [`InputReader`]: the dedicated thread feeding decoded events into a
//!   bounded channel

mod decoder;
mod event;
mod reader;

pub use decoder::{decode, Decoder};
pub use event::{
    ctrl_byte, ctrl_to_letter, is_ctrl_byte, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent,
};
pub use reader::InputReader;
