//! App: terminal setup, the event loop and teardown.
//!
//! [`App::run`] takes over the terminal, then multiplexes everything that
//! can wake the application in one `select!`:
//!
//! ```text
//!            ┌────────────── quit handle
//!            ├────────────── signals (SIGWINCH / SIGINT / SIGTERM)
//! select! ───┼────────────── input events (reader thread)
//!            ├────────────── render requests (coalesced)
//!            ├────────────── ticks
//!            └────────────── idle timeout (frame period)
//! ```
//!
//! Drawing and rendering happen only on the loop's thread. Other threads
//! talk to it through [`QuitHandle`] and [`RenderHandle`].

mod config;

pub use config::AppConfig;

use crate::error::Result;
use crate::input::{Event, InputReader};
use crate::layout::Rect;
use crate::renderer::Renderer;
use crate::terminal::{install_panic_hook, SignalEvent, SignalWatcher, Terminal, TtySource};
use crate::widget::Widget;
use crossbeam_channel::{never, select, tick, Receiver, Sender};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// A periodic tick passed to the tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Tick number, starting at 1.
    pub frame: u64,
    /// Time since the loop started.
    pub elapsed: Duration,
}

/// Asks a running [`App`] to stop. Cheap to clone and usable from any
/// thread.
#[derive(Debug, Clone)]
pub struct QuitHandle(Sender<()>);

impl QuitHandle {
    /// Request shutdown. Repeated requests are harmless.
    pub fn quit(&self) {
        let _ = self.0.try_send(());
    }
}

/// Asks a running [`App`] to redraw. Requests made while one is already
/// pending collapse into it.
#[derive(Debug, Clone)]
pub struct RenderHandle(Sender<()>);

impl RenderHandle {
    /// Request a redraw.
    pub fn request(&self) {
        let _ = self.0.try_send(());
    }
}

/// What woke the event loop.
enum Wake {
    Quit,
    Signal(Option<SignalEvent>),
    Input(Option<Event>),
    Render,
    Tick,
    Idle,
}

type InitFn<R> = Box<dyn FnMut(&mut R)>;
type TickFn<R> = Box<dyn FnMut(&mut R, Tick) -> bool>;
type ResizeFn<R> = Box<dyn FnMut(&mut R, u16, u16)>;

/// A full-screen application around a root widget.
pub struct App<R: Widget> {
    root: R,
    config: AppConfig,
    quit_tx: Sender<()>,
    quit_rx: Receiver<()>,
    render_tx: Sender<()>,
    render_rx: Receiver<()>,
    on_init: Option<InitFn<R>>,
    on_tick: Option<TickFn<R>>,
    on_resize: Option<ResizeFn<R>>,
    on_quit: Option<InitFn<R>>,
}

impl<R: Widget> App<R> {
    /// Create an application with the default configuration.
    pub fn new(root: R) -> Self {
        Self::with_config(root, AppConfig::default())
    }

    /// Create an application with custom configuration.
    pub fn with_config(root: R, config: AppConfig) -> Self {
        let (quit_tx, quit_rx) = crossbeam_channel::bounded(1);
        let (render_tx, render_rx) = crossbeam_channel::bounded(1);
        Self {
            root,
            config,
            quit_tx,
            quit_rx,
            render_tx,
            render_rx,
            on_init: None,
            on_tick: None,
            on_resize: None,
            on_quit: None,
        }
    }

    /// Called once after setup, before the first frame.
    #[must_use]
    pub fn on_init(mut self, f: impl FnMut(&mut R) + 'static) -> Self {
        self.on_init = Some(Box::new(f));
        self
    }

    /// Called on every tick; return `true` to redraw. Has no effect unless
    /// [`AppConfig::tick_interval`] is set.
    #[must_use]
    pub fn on_tick(mut self, f: impl FnMut(&mut R, Tick) -> bool + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Called with the new size after the terminal is resized.
    #[must_use]
    pub fn on_resize(mut self, f: impl FnMut(&mut R, u16, u16) + 'static) -> Self {
        self.on_resize = Some(Box::new(f));
        self
    }

    /// Called once when the loop ends, before the terminal is restored.
    #[must_use]
    pub fn on_quit(mut self, f: impl FnMut(&mut R) + 'static) -> Self {
        self.on_quit = Some(Box::new(f));
        self
    }

    /// The root widget.
    pub const fn root(&self) -> &R {
        &self.root
    }

    /// The root widget, mutably.
    pub fn root_mut(&mut self) -> &mut R {
        &mut self.root
    }

    /// The configuration.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A handle that stops the loop.
    pub fn quit_handle(&self) -> QuitHandle {
        QuitHandle(self.quit_tx.clone())
    }

    /// A handle that requests a redraw.
    pub fn render_handle(&self) -> RenderHandle {
        RenderHandle(self.render_tx.clone())
    }

    /// Take over the terminal and run until quit.
    ///
    /// Raw mode, the alternate screen, cursor visibility and mouse reporting
    /// are restored on every exit path: normal return, error and panic.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be configured or measured, a worker
    /// thread cannot start, or writing to the terminal fails.
    pub fn run(mut self) -> Result<R> {
        install_panic_hook();

        let mut terminal = Terminal::new();
        terminal.enter_raw_mode()?;
        if self.config.alternate_screen {
            terminal.enter_alt_screen()?;
        }
        if self.config.hide_cursor {
            terminal.hide_cursor()?;
        }
        if self.config.enable_mouse {
            terminal.enable_mouse()?;
        }
        let (width, height) = terminal.size()?;
        tracing::debug!(width, height, "terminal ready");

        let (signals, signal_rx) = SignalWatcher::spawn(self.config.signal_poll_interval)?;
        let source = TtySource::new(self.config.input_poll_timeout);
        let (reader, event_rx) = InputReader::spawn(source, self.config.event_capacity)?;

        let mut renderer = Renderer::new(width, height, self.config.depth, io::stdout());
        let outcome = self.run_with(&mut renderer, &event_rx, &signal_rx, || terminal.size());

        reader.join();
        signals.join();
        terminal.restore()?;
        outcome.map(|()| self.root)
    }

    /// Drive the loop over already-prepared parts, without touching the
    /// terminal modes.
    ///
    /// `size` is consulted after every resize signal. Returns when a quit is
    /// requested, a quit key or [`Event::Quit`] arrives, the event channel
    /// closes, or SIGINT/SIGTERM is delivered.
    ///
    /// # Errors
    ///
    /// Returns the first render or write failure.
    pub fn run_with<W, F>(
        &mut self,
        renderer: &mut Renderer<W>,
        events: &Receiver<Event>,
        signals: &Receiver<SignalEvent>,
        mut size: F,
    ) -> Result<()>
    where
        W: Write,
        F: FnMut() -> Result<(u16, u16)>,
    {
        let started = Instant::now();
        let idle = self.config.frame_duration();
        let ticks = match (self.config.tick_interval, self.on_tick.is_some()) {
            (Some(interval), true) => tick(interval),
            _ => never(),
        };
        let quit_rx = self.quit_rx.clone();
        let render_rx = self.render_rx.clone();
        let mut signals = signals.clone();
        let mut frame = 0u64;

        if let Some(f) = self.on_init.as_mut() {
            f(&mut self.root);
        }
        self.draw(renderer, true)?;

        loop {
            let wake = select! {
                recv(quit_rx) -> _ => Wake::Quit,
                recv(signals) -> signal => Wake::Signal(signal.ok()),
                recv(events) -> event => Wake::Input(event.ok()),
                recv(render_rx) -> _ => Wake::Render,
                recv(ticks) -> _ => Wake::Tick,
                default(idle) => Wake::Idle,
            };

            match wake {
                Wake::Quit => break,
                Wake::Signal(Some(SignalEvent::Resize)) => self.resize(renderer, &mut size)?,
                Wake::Signal(Some(signal)) => {
                    tracing::debug!(?signal, "terminating on signal");
                    break;
                }
                // Watcher gone; keep running on input alone.
                Wake::Signal(None) => signals = never(),
                Wake::Input(None | Some(Event::Quit)) => break,
                Wake::Input(Some(Event::Key(key))) if self.config.is_quit_key(&key) => break,
                Wake::Input(Some(event)) => {
                    if let Event::Error(message) = &event {
                        tracing::warn!(%message, "input error");
                    }
                    if self.root.handle_event(&event) {
                        self.draw(renderer, false)?;
                    }
                }
                Wake::Render => self.draw(renderer, false)?,
                Wake::Tick => {
                    frame += 1;
                    let tick = Tick {
                        frame,
                        elapsed: started.elapsed(),
                    };
                    let redraw = self
                        .on_tick
                        .as_mut()
                        .is_some_and(|f| f(&mut self.root, tick));
                    if redraw {
                        self.draw(renderer, false)?;
                    }
                }
                Wake::Idle => {}
            }
        }

        if let Some(f) = self.on_quit.as_mut() {
            f(&mut self.root);
        }
        tracing::debug!(stats = ?renderer.stats(), "event loop finished");
        Ok(())
    }

    /// Redraw the root into a cleared buffer and write the frame.
    fn draw<W: Write>(&mut self, renderer: &mut Renderer<W>, full: bool) -> Result<()> {
        renderer.clear();
        let (width, height) = renderer.size();
        self.root
            .render(renderer.buffer_mut(), Rect::from_size(width, height));
        if full {
            renderer.force_render()?;
        } else {
            renderer.render()?;
        }
        renderer.flush()?;
        Ok(())
    }

    fn resize<W, F>(&mut self, renderer: &mut Renderer<W>, size: &mut F) -> Result<()>
    where
        W: Write,
        F: FnMut() -> Result<(u16, u16)>,
    {
        let (width, height) = match size() {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(error = %e, "window size unavailable after resize");
                return Ok(());
            }
        };
        renderer.resize(width, height);
        if let Some(f) = self.on_resize.as_mut() {
            f(&mut self.root, width, height);
        }
        self.root.handle_event(&Event::Resize { width, height });
        self.draw(renderer, true)
    }
}

impl<R: Widget + std::fmt::Debug> std::fmt::Debug for App<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};
    use crate::widget::{Text, TextInput};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn renderer() -> Renderer<Vec<u8>> {
        Renderer::new(12, 2, 2, Vec::new())
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(c)))
    }

    fn focused_input() -> TextInput {
        let mut input = TextInput::new();
        input.set_focused(true);
        input
    }

    #[test]
    fn test_events_are_rendered_until_quit() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (_sig_tx, sig_rx) = crossbeam_channel::unbounded();
        for event in [key('h'), key('i'), Event::Key(KeyEvent::ctrl('q')), key('x')] {
            tx.send(event).unwrap();
        }

        let mut app = App::new(focused_input());
        let mut r = renderer();
        app.run_with(&mut r, &rx, &sig_rx, || Ok((12, 2))).unwrap();

        assert_eq!(app.root().content(), "hi");
        assert_eq!(r.front().row_text(0), "> hi        ");
        // The key after the quit key was never consumed.
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_closed_event_channel_ends_loop() {
        let (tx, rx) = crossbeam_channel::unbounded::<Event>();
        let (_sig_tx, sig_rx) = crossbeam_channel::unbounded();
        drop(tx);
        let quits = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&quits);
        let mut app = App::new(Text::new("bye")).on_quit(move |_| *seen.borrow_mut() += 1);
        app.run_with(&mut renderer(), &rx, &sig_rx, || Ok((12, 2))).unwrap();
        assert_eq!(*quits.borrow(), 1);
    }

    #[test]
    fn test_resize_signal_redraws_at_new_size() {
        let (_tx, rx) = crossbeam_channel::unbounded::<Event>();
        let (sig_tx, sig_rx) = crossbeam_channel::unbounded();
        sig_tx.send(SignalEvent::Resize).unwrap();
        sig_tx.send(SignalEvent::Terminate).unwrap();

        let sizes = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&sizes);
        let mut app = App::new(Text::new("hello"))
            .on_resize(move |_, w, h| seen.borrow_mut().push((w, h)));
        let mut r = renderer();
        app.run_with(&mut r, &rx, &sig_rx, || Ok((20, 3))).unwrap();

        assert_eq!(*sizes.borrow(), vec![(20, 3)]);
        assert_eq!(r.size(), (20, 3));
        assert_eq!(r.front().row_text(0), format!("{:<20}", "hello"));
        assert_eq!(r.stats().full_redraws, 2);
    }

    #[test]
    fn test_quit_and_render_handles() {
        let (_tx, rx) = crossbeam_channel::unbounded::<Event>();
        let (_sig_tx, sig_rx) = crossbeam_channel::unbounded();
        let mut app = App::new(Text::new("x"));
        let render = app.render_handle();
        render.request();
        render.request();
        let quit = app.quit_handle();
        quit.quit();
        quit.quit();
        app.run_with(&mut renderer(), &rx, &sig_rx, || Ok((12, 2))).unwrap();
    }

    #[test]
    fn test_ticks_drive_redraws() {
        let (_tx, rx) = crossbeam_channel::unbounded::<Event>();
        let (_sig_tx, sig_rx) = crossbeam_channel::unbounded();
        let config = AppConfig::default().with_tick_interval(Duration::from_millis(1));
        let mut app = App::with_config(Text::new(""), config);
        let quit = app.quit_handle();
        let mut app = app.on_tick(move |root, tick| {
            if tick.frame > 3 {
                return false;
            }
            root.set_text(format!("tick {}", tick.frame));
            if tick.frame == 3 {
                quit.quit();
            }
            true
        });
        let mut r = renderer();
        app.run_with(&mut r, &rx, &sig_rx, || Ok((12, 2))).unwrap();
        assert_eq!(app.root().text(), "tick 3");
        assert_eq!(r.front().row_text(0), "tick 3      ");
    }
}
