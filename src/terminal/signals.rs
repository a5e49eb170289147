//! Signal Watcher: resize and termination signals as channel messages.
//!
//! The async-signal-safe handler only sets an atomic flag. A small thread
//! polls the flags and forwards each one it finds set as a [`SignalEvent`],
//! so the app loop can `select!` on signals next to input and ticks.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

static RESIZED: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static TERMINATED: AtomicBool = AtomicBool::new(false);

const WATCHED: [Signal; 3] = [Signal::SIGWINCH, Signal::SIGINT, Signal::SIGTERM];

extern "C" fn on_signal(sig: libc::c_int) {
    let flag = match sig {
        libc::SIGWINCH => &RESIZED,
        libc::SIGINT => &INTERRUPTED,
        libc::SIGTERM => &TERMINATED,
        _ => return,
    };
    flag.store(true, Ordering::SeqCst);
}

/// A signal delivered to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// SIGWINCH: the window size changed.
    Resize,
    /// SIGINT.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

/// Owns the installed handlers and the forwarding thread.
///
/// Dropping the watcher stops the thread and reinstates whatever handlers
/// were in place before [`SignalWatcher::spawn`].
pub struct SignalWatcher {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    previous: Vec<(Signal, SigAction)>,
}

impl SignalWatcher {
    /// Install handlers for SIGWINCH, SIGINT and SIGTERM and start
    /// forwarding. Flags are checked every `poll_interval`.
    #[allow(unsafe_code)]
    pub fn spawn(poll_interval: Duration) -> Result<(Self, Receiver<SignalEvent>)> {
        let action = SigAction::new(
            SigHandler::Handler(on_signal),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        let mut previous = Vec::with_capacity(WATCHED.len());
        for sig in WATCHED {
            // SAFETY: `on_signal` only stores to atomics, which is
            // async-signal-safe.
            match unsafe { signal::sigaction(sig, &action) } {
                Ok(old) => previous.push((sig, old)),
                Err(e) => {
                    restore_handlers(&previous);
                    return Err(Error::Signal(e));
                }
            }
        }

        // Stale flags from an earlier watcher would fire immediately.
        for flag in [&RESIZED, &INTERRUPTED, &TERMINATED] {
            flag.store(false, Ordering::SeqCst);
        }

        let (tx, rx) = crossbeam_channel::bounded(16);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name("stratum-signals".to_string())
            .spawn(move || Self::run_loop(&tx, &stop_clone, poll_interval));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                restore_handlers(&previous);
                return Err(Error::Spawn {
                    name: "stratum-signals",
                    source,
                });
            }
        };

        tracing::debug!("signal handlers installed");
        Ok((
            Self {
                handle: Some(handle),
                stop,
                previous,
            },
            rx,
        ))
    }

    /// Ask the forwarding thread to stop.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the thread, wait for it and reinstate the previous handlers.
    pub fn join(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        restore_handlers(&self.previous);
        self.previous.clear();
    }

    fn run_loop(tx: &Sender<SignalEvent>, stop: &AtomicBool, interval: Duration) {
        let sources = [
            (&RESIZED, SignalEvent::Resize),
            (&INTERRUPTED, SignalEvent::Interrupt),
            (&TERMINATED, SignalEvent::Terminate),
        ];
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(interval);
            for (flag, event) in sources {
                if !flag.swap(false, Ordering::SeqCst) {
                    continue;
                }
                match tx.try_send(event) {
                    // A full channel already holds an undelivered signal.
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => return,
                }
            }
        }
    }
}

#[allow(unsafe_code)]
fn restore_handlers(previous: &[(Signal, SigAction)]) {
    for (sig, action) in previous {
        // SAFETY: reinstating a handler that was installed before ours.
        if let Err(e) = unsafe { signal::sigaction(*sig, action) } {
            tracing::warn!(signal = ?sig, error = %e, "failed to restore signal handler");
        }
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for SignalWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalWatcher")
            .field("signals", &self.previous.iter().map(|(s, _)| *s).collect::<Vec<_>>())
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .finish()
    }
}
