//! Raw-mode terminal driver.
//!
//! [`Terminal`] switches the controlling terminal into raw mode, toggles the
//! alternate screen, cursor visibility and mouse reporting, and puts every
//! one of them back when it is dropped. A panic hook installed with
//! [`install_panic_hook`] performs the same restoration before the panic
//! message is printed, so an unwinding or aborting program never leaves the
//! shell without echo.
//!
//! Raw mode here means:
//!
//! | Flags  | Change                                        |
//! |--------|-----------------------------------------------|
//! | iflag  | clear BRKINT, ICRNL, INPCK, ISTRIP, IXON      |
//! | oflag  | clear OPOST                                   |
//! | cflag  | set CS8                                       |
//! | lflag  | clear ECHO, ICANON, IEXTEN, ISIG              |
//! | cc     | VMIN = 1, VTIME = 0                           |

use super::output::{ALT_SCREEN_EXIT, CURSOR_SHOW, MOUSE_DISABLE, MOUSE_ENABLE, RESET_ATTRS};
use crate::error::{Error, Result};
use crossterm::{cursor, execute, terminal as ct};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};
use std::io::{self, Read, Stdout, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

/// Attributes captured by the most recent [`Terminal::enter_raw_mode`], for
/// the panic hook.
static SAVED_TERMIOS: Mutex<Option<Termios>> = Mutex::new(None);

static PANIC_HOOK: Once = Once::new();

const ALT_SCREEN: u8 = 1;
const CURSOR_HIDDEN: u8 = 1 << 1;
const MOUSE: u8 = 1 << 2;

/// Screen changes made on stdout and not yet undone, as `ALT_SCREEN`,
/// `CURSOR_HIDDEN` and `MOUSE` bits. Read by the panic hook.
static ACTIVE: AtomicU8 = AtomicU8::new(0);

/// Apply the raw-mode flag changes to `attrs`.
pub fn make_raw(attrs: &mut Termios) {
    attrs.input_flags.remove(
        InputFlags::BRKINT
            | InputFlags::ICRNL
            | InputFlags::INPCK
            | InputFlags::ISTRIP
            | InputFlags::IXON,
    );
    attrs.output_flags.remove(OutputFlags::OPOST);
    attrs.control_flags.insert(ControlFlags::CS8);
    attrs.local_flags.remove(
        LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG,
    );
    attrs.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    attrs.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
}

/// Query the kernel for the window size of stdout, as `(columns, rows)`.
#[allow(unsafe_code)]
pub fn window_size() -> Result<(u16, u16)> {
    let fd = io::stdout().as_raw_fd();
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ writes one `winsize` through the pointer, which
    // points at a live local for the duration of the call.
    let rc = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };
    if rc == -1 {
        return Err(Error::WindowSize(io::Error::last_os_error()));
    }
    Ok((ws.ws_col, ws.ws_row))
}

/// Put the terminal back using only global state.
///
/// Used from the panic hook, where the owning [`Terminal`] is out of reach.
fn emergency_restore() {
    let saved = match SAVED_TERMIOS.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(attrs) = saved {
        let _ = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &attrs);
    }
    let undo = restore_sequence(ACTIVE.swap(0, Ordering::SeqCst));
    if undo.is_empty() {
        return;
    }
    let mut out = io::stdout();
    let _ = out.write_all(&undo);
    let _ = out.flush();
}

/// Bytes that undo the screen changes recorded in `active`. Empty when
/// nothing was changed.
fn restore_sequence(active: u8) -> Vec<u8> {
    let mut out = Vec::new();
    if active == 0 {
        return out;
    }
    out.extend_from_slice(RESET_ATTRS);
    if active & MOUSE != 0 {
        out.extend_from_slice(MOUSE_DISABLE);
    }
    if active & CURSOR_HIDDEN != 0 {
        out.extend_from_slice(CURSOR_SHOW);
    }
    if active & ALT_SCREEN != 0 {
        out.extend_from_slice(ALT_SCREEN_EXIT);
    }
    out
}

/// Chain a panic hook that restores the terminal before the previous hook
/// reports the panic. Installing more than once has no further effect.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

/// The controlling terminal.
///
/// Terminal modes are read and set on stdin; escape sequences go to `W`
/// (stdout unless built with [`Terminal::with_writer`]). Everything entered
/// is undone by [`Terminal::restore`], which also runs on drop.
pub struct Terminal<W: Write = Stdout> {
    out: W,
    original: Option<Termios>,
    alt_screen: bool,
    cursor_hidden: bool,
    mouse: bool,
    // Mirror screen changes into `ACTIVE` for the panic hook.
    tracked: bool,
}

impl Terminal<Stdout> {
    /// A terminal writing to stdout.
    pub fn new() -> Self {
        Self::tracked(io::stdout())
    }
}

impl Default for Terminal<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Terminal<W> {
    /// A terminal whose escape sequences go to `out`.
    pub const fn with_writer(out: W) -> Self {
        Self {
            out,
            original: None,
            alt_screen: false,
            cursor_hidden: false,
            mouse: false,
            tracked: false,
        }
    }

    fn tracked(out: W) -> Self {
        let mut term = Self::with_writer(out);
        term.tracked = true;
        term
    }

    fn mark(&self, bit: u8, on: bool) {
        if !self.tracked {
            return;
        }
        if on {
            ACTIVE.fetch_or(bit, Ordering::SeqCst);
        } else {
            ACTIVE.fetch_and(!bit, Ordering::SeqCst);
        }
    }

    /// Capture the current attributes and switch to raw mode.
    ///
    /// Entering twice keeps the attributes captured the first time.
    pub fn enter_raw_mode(&mut self) -> Result<()> {
        if self.original.is_some() {
            return Ok(());
        }
        let original = termios::tcgetattr(io::stdin()).map_err(Error::GetAttributes)?;
        let mut raw = original.clone();
        make_raw(&mut raw);
        termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &raw).map_err(Error::SetAttributes)?;

        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(original.clone());
        }
        self.original = Some(original);
        tracing::debug!("raw mode entered");
        Ok(())
    }

    /// Restore the attributes captured by [`Terminal::enter_raw_mode`].
    /// No-op if raw mode was never entered.
    pub fn exit_raw_mode(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &original)
            .map_err(Error::SetAttributes)?;
        tracing::debug!("raw mode restored");
        Ok(())
    }

    /// Whether raw mode is active.
    pub const fn is_raw(&self) -> bool {
        self.original.is_some()
    }

    /// Current window size as `(columns, rows)`.
    pub fn size(&self) -> Result<(u16, u16)> {
        window_size()
    }

    /// Switch to the alternate screen buffer.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.out, ct::EnterAlternateScreen)?;
        self.alt_screen = true;
        self.mark(ALT_SCREEN, true);
        Ok(())
    }

    /// Return to the main screen buffer.
    pub fn exit_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.out, ct::LeaveAlternateScreen)?;
        self.alt_screen = false;
        self.mark(ALT_SCREEN, false);
        Ok(())
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Hide)?;
        self.cursor_hidden = true;
        self.mark(CURSOR_HIDDEN, true);
        Ok(())
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Show)?;
        self.cursor_hidden = false;
        self.mark(CURSOR_HIDDEN, false);
        Ok(())
    }

    /// Turn on button tracking with SGR-encoded reports.
    pub fn enable_mouse(&mut self) -> io::Result<()> {
        self.out.write_all(MOUSE_ENABLE)?;
        self.out.flush()?;
        self.mouse = true;
        self.mark(MOUSE, true);
        Ok(())
    }

    /// Turn mouse reporting off.
    pub fn disable_mouse(&mut self) -> io::Result<()> {
        self.out.write_all(MOUSE_DISABLE)?;
        self.out.flush()?;
        self.mouse = false;
        self.mark(MOUSE, false);
        Ok(())
    }

    /// Whether the alternate screen is active.
    pub const fn in_alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// The output sink.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Undo everything this terminal changed, in reverse order.
    ///
    /// Every step is attempted even if an earlier one fails; the first
    /// error is returned.
    pub fn restore(&mut self) -> Result<()> {
        let mut first_err: Option<Error> = None;
        let mut note = |r: Result<()>| {
            if let Err(e) = r {
                first_err.get_or_insert(e);
            }
        };

        let _ = self.out.write_all(RESET_ATTRS);
        if self.mouse {
            note(self.disable_mouse().map_err(Error::from));
        }
        if self.cursor_hidden {
            note(self.show_cursor().map_err(Error::from));
        }
        if self.alt_screen {
            note(self.exit_alt_screen().map_err(Error::from));
        }
        note(self.exit_raw_mode());

        first_err.map_or(Ok(()), Err)
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

impl<W: Write> std::fmt::Debug for Terminal<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("raw", &self.is_raw())
            .field("alt_screen", &self.alt_screen)
            .field("cursor_hidden", &self.cursor_hidden)
            .field("mouse", &self.mouse)
            .finish()
    }
}

/// Stdin as a [`Read`] source that gives up after a timeout.
///
/// Raw mode makes reads block until at least one byte arrives. Polling
/// first lets the [`InputReader`](crate::input::InputReader) thread notice
/// its stop flag: a read with nothing to deliver fails with
/// [`io::ErrorKind::WouldBlock`] instead of blocking forever.
pub struct TtySource {
    stdin: io::Stdin,
    timeout: PollTimeout,
}

impl TtySource {
    /// Read stdin, waking up at least every `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        Self {
            stdin: io::stdin(),
            timeout: PollTimeout::from(millis),
        }
    }
}

impl Read for TtySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut fds = [PollFd::new(self.stdin.as_fd(), PollFlags::POLLIN)];
        let ready = poll(&mut fds, self.timeout).map_err(io::Error::from)?;
        if ready == 0 {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        nix::unistd::read(self.stdin.as_raw_fd(), buf).map_err(io::Error::from)
    }
}

impl std::fmt::Debug for TtySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtySource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_toggles_write_xterm_sequences() {
        let mut term = Terminal::with_writer(Vec::new());
        term.enter_alt_screen().unwrap();
        term.hide_cursor().unwrap();
        assert!(term.in_alt_screen());
        assert_eq!(term.writer_mut().as_slice(), b"\x1b[?1049h\x1b[?25l");
    }

    #[test]
    fn test_restore_undoes_in_reverse_order() {
        let mut term = Terminal::with_writer(Vec::new());
        term.enter_alt_screen().unwrap();
        term.hide_cursor().unwrap();
        term.enable_mouse().unwrap();
        term.writer_mut().clear();

        term.restore().unwrap();
        assert_eq!(
            term.writer_mut().as_slice(),
            b"\x1b[0m\x1b[?1006l\x1b[?1000l\x1b[?25h\x1b[?1049l"
        );
        assert!(!term.in_alt_screen());
        assert!(!term.is_raw());
    }

    #[test]
    fn test_restore_without_changes_only_resets_attributes() {
        let mut term = Terminal::with_writer(Vec::new());
        term.restore().unwrap();
        assert_eq!(term.writer_mut().as_slice(), b"\x1b[0m");
    }

    #[test]
    fn test_emergency_sequence_only_undoes_what_was_entered() {
        assert!(restore_sequence(0).is_empty());
        assert_eq!(restore_sequence(CURSOR_HIDDEN), b"\x1b[0m\x1b[?25h");
        assert_eq!(
            restore_sequence(ALT_SCREEN | MOUSE),
            b"\x1b[0m\x1b[?1006l\x1b[?1000l\x1b[?1049l"
        );
    }

    #[test]
    fn test_tracked_terminal_clears_active_flags_on_restore() {
        let mut term = Terminal::tracked(Vec::new());
        term.enter_alt_screen().unwrap();
        term.enable_mouse().unwrap();
        assert_eq!(ACTIVE.load(Ordering::SeqCst) & (ALT_SCREEN | MOUSE), ALT_SCREEN | MOUSE);

        term.restore().unwrap();
        assert_eq!(ACTIVE.load(Ordering::SeqCst), 0);

        let mut plain = Terminal::with_writer(Vec::new());
        plain.hide_cursor().unwrap();
        assert_eq!(ACTIVE.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exit_raw_mode_without_enter_is_noop() {
        let mut term = Terminal::with_writer(Vec::new());
        assert!(term.exit_raw_mode().is_ok());
    }
}
