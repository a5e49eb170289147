//! Application configuration.

use crate::buffer::DEFAULT_DEPTH;
use crate::input::KeyEvent;
use std::time::Duration;

/// Configuration for [`App`](super::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Target frames per second; sets the idle wake-up period of the loop.
    pub target_fps: u32,
    /// Period of the tick callback. `None` disables ticks.
    pub tick_interval: Option<Duration>,
    /// Capacity of the input event channel.
    pub event_capacity: usize,
    /// Number of z-planes in the drawing buffer.
    pub depth: u16,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Whether to hide the cursor while running.
    pub hide_cursor: bool,
    /// Whether to request mouse reports.
    pub enable_mouse: bool,
    /// How long a single input read waits before re-checking for shutdown.
    pub input_poll_timeout: Duration,
    /// How often pending signals are forwarded to the loop.
    pub signal_poll_interval: Duration,
    /// Keys that quit the application before reaching any widget.
    pub quit_keys: Vec<KeyEvent>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            tick_interval: None,
            event_capacity: 100,
            depth: DEFAULT_DEPTH,
            alternate_screen: true,
            hide_cursor: true,
            enable_mouse: false,
            input_poll_timeout: Duration::from_millis(50),
            signal_poll_interval: Duration::from_millis(25),
            quit_keys: vec![KeyEvent::ctrl('c'), KeyEvent::ctrl('q')],
        }
    }
}

impl AppConfig {
    /// Set the target frame rate.
    #[must_use]
    pub const fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Enable the tick callback at `interval`.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    /// Set the input channel capacity.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set the number of z-planes.
    #[must_use]
    pub const fn with_depth(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }

    /// Use (or not) the alternate screen.
    #[must_use]
    pub const fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Hide (or not) the cursor while running.
    #[must_use]
    pub const fn with_hidden_cursor(mut self, hidden: bool) -> Self {
        self.hide_cursor = hidden;
        self
    }

    /// Request (or not) mouse reports.
    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.enable_mouse = enabled;
        self
    }

    /// Set the input read timeout.
    #[must_use]
    pub const fn with_input_poll_timeout(mut self, timeout: Duration) -> Self {
        self.input_poll_timeout = timeout;
        self
    }

    /// Replace the quit keys. An empty list leaves quitting to the
    /// application.
    #[must_use]
    pub fn with_quit_keys(mut self, keys: Vec<KeyEvent>) -> Self {
        self.quit_keys = keys;
        self
    }

    /// Idle wake-up period derived from the frame rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Whether `key` is one of the quit keys.
    pub fn is_quit_key(&self, key: &KeyEvent) -> bool {
        self.quit_keys.contains(key)
    }
}
