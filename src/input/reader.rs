//! Input Reader: dedicated thread turning raw bytes into events.
//!
//! The reader performs blocking reads on its own thread so that waiting for
//! a key press never stalls rendering or ticks. Each chunk is decoded in
//! byte order and every event is pushed onto a bounded channel; when the
//! channel is full the reader blocks until the consumer catches up.
//!
//! ```text
//! ┌──────────────┐  bytes   ┌─────────┐  Event   ┌──────────────┐
//! │ Read source  │ ───────▶ │ Decoder │ ───────▶ │ bounded chan │ ──▶ app loop
//! └──────────────┘          └─────────┘          └──────────────┘
//! ```
//!
//! The thread stops when the shared stop flag is set, when the source
//! reports end of stream (after sending [`Event::Quit`]), or when the
//! receiving side is dropped.

use super::decoder::Decoder;
use super::event::Event;
use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, Sender};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Size of a single read.
const READ_CHUNK: usize = 256;

/// Input reader that owns the blocking read loop.
pub struct InputReader {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    stop: Arc<AtomicBool>,
}

impl InputReader {
    /// Spawn the reader thread over `source`.
    ///
    /// Sources that can time out (such as
    /// [`TtySource`](crate::terminal::TtySource)) should return
    /// [`ErrorKind::WouldBlock`] or [`ErrorKind::TimedOut`] so the stop flag
    /// is re-checked regularly.
    ///
    /// # Returns
    ///
    /// The reader handle and the receiving end of a channel holding at most
    /// `capacity` undelivered events.
    pub fn spawn<R>(source: R, capacity: usize) -> Result<(Self, Receiver<Event>)>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stratum-input".to_string())
            .spawn(move || Self::run_loop(source, &tx, &stop_clone))
            .map_err(|source| Error::Spawn {
                name: "stratum-input",
                source,
            })?;

        tracing::debug!(capacity, "input reader started");
        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// A clone of the shared stop flag.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Signal the reader thread to stop.
    ///
    /// A read already in progress finishes first; a source without a
    /// timeout keeps the thread alive until its next byte arrives.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether the reader thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal shutdown and wait for the reader thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main read loop.
    fn run_loop<R: Read>(mut source: R, tx: &Sender<Event>, stop: &AtomicBool) {
        let mut decoder = Decoder::new();
        let mut buf = [0u8; READ_CHUNK];

        while !stop.load(Ordering::Relaxed) {
            match source.read(&mut buf) {
                Ok(0) => {
                    tracing::debug!("input stream closed");
                    let _ = tx.send(Event::Quit);
                    break;
                }
                Ok(n) => {
                    for event in decoder.feed(&buf[..n]) {
                        if tx.send(event).is_err() {
                            // Receiver dropped, exit
                            return;
                        }
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
                    ) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "input read failed");
                    if tx.send(Event::Error(e.to_string())).is_err() {
                        return;
                    }
                }
            }
        }
        tracing::debug!("input reader stopped");
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for InputReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputReader")
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .field("finished", &self.is_finished())
            .finish()
    }
}
