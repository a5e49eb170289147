//! Terminal I/O.
//!
//! - [`OutputBuffer`]: batches escape sequences into one write per frame
//! - [`Terminal`]: raw mode, alternate screen, cursor and mouse modes
//! - [`TtySource`]: a stdin reader with a poll timeout, for the input thread
//! - [`SignalWatcher`]: resize and termination signals as channel messages

pub mod output;
mod raw;
mod signals;

pub use output::OutputBuffer;
pub use raw::{install_panic_hook, make_raw, window_size, Terminal, TtySource};
pub use signals::{SignalEvent, SignalWatcher};
