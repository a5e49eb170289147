//! Renderer: the double-buffered frame pipeline.
//!
//! The renderer owns the layered [`Buffer`] that widgets draw into, the
//! front [`Frame`] believed to be on screen, and the output sink. Each
//! [`Renderer::render`] flattens the buffer, diffs it against the front
//! frame, writes the result in a single `write_all`, and adopts the new
//! frame as the front.
//!
//! ```text
//! clear() ─▶ draw into buffer_mut() ─▶ render() / force_render() ─▶ flush()
//! ```
//!
//! Nothing here spawns threads or takes locks; exactly one frame is in
//! progress at a time because the owner drives every step.

use crate::buffer::diff::{render_diff, render_full, DiffResult};
use crate::buffer::{Buffer, Frame};
use crate::terminal::OutputBuffer;
use std::io::{self, Write};
use std::time::Instant;

/// Initial capacity of the escape-code accumulator.
const OUTPUT_CAPACITY: usize = 64 * 1024;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames rendered, including no-op frames.
    pub frames: u64,
    /// Frames drawn with a full redraw.
    pub full_redraws: u64,
    /// Total cells changed across all frames.
    pub cells_changed: u64,
    /// Total bytes written to the sink.
    pub bytes_written: u64,
    /// Smoothed render time in microseconds.
    pub avg_render_us: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
}

impl RenderStats {
    fn record(&mut self, result: &DiffResult, bytes: usize, started: Instant) {
        self.frames += 1;
        self.cells_changed += result.cells_changed as u64;
        self.bytes_written += bytes as u64;
        self.last_render_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        // Smoothed average
        if self.avg_render_us == 0 {
            self.avg_render_us = self.last_render_us;
        } else {
            self.avg_render_us = (self.avg_render_us * 15 + self.last_render_us) / 16;
        }
    }
}

/// Where the hardware cursor should end up after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Hidden,
    At(u16, u16),
}

/// Double-buffered renderer writing to `W`.
pub struct Renderer<W: Write> {
    buffer: Buffer,
    front: Frame,
    back: Frame,
    output: OutputBuffer,
    sink: W,
    stats: RenderStats,
    cursor: CursorState,
    cursor_dirty: bool,
    needs_full_redraw: bool,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer for a `width` x `height` screen with `depth`
    /// z-planes.
    ///
    /// The front frame starts empty, so the first [`Renderer::render`]
    /// behaves like a diff against a blank screen. Call
    /// [`Renderer::force_render`] first when the screen content is unknown.
    pub fn new(width: u16, height: u16, depth: u16, sink: W) -> Self {
        Self {
            buffer: Buffer::with_depth(width, height, depth),
            front: Frame::new(width, height),
            back: Frame::new(width, height),
            output: OutputBuffer::with_capacity(OUTPUT_CAPACITY),
            sink,
            stats: RenderStats::default(),
            cursor: CursorState::Hidden,
            cursor_dirty: false,
            needs_full_redraw: false,
        }
    }

    /// Reset every z-plane of the drawing buffer to empty cells.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// The drawing buffer.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The drawing buffer, for widgets to draw into.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// The frame last written to the sink.
    pub const fn front(&self) -> &Frame {
        &self.front
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The output sink.
    pub const fn sink(&self) -> &W {
        &self.sink
    }

    /// Screen size as `(width, height)`.
    pub const fn size(&self) -> (u16, u16) {
        (self.buffer.width(), self.buffer.height())
    }

    /// Diff the buffer against the front frame and write the changes.
    ///
    /// Writes nothing when nothing changed. After a [`Renderer::resize`]
    /// this performs a full redraw instead.
    ///
    /// # Errors
    ///
    /// Returns the sink's error; nothing is retried and the front frame is
    /// left unchanged.
    pub fn render(&mut self) -> io::Result<DiffResult> {
        if self.needs_full_redraw {
            return self.force_render();
        }
        let started = Instant::now();
        self.buffer.flatten_into(&mut self.back);
        self.output.clear();

        let result = render_diff(&self.front, &self.back, &mut self.output);
        self.finish_frame(&result, started)?;
        Ok(result)
    }

    /// Clear the screen and redraw every cell, ignoring the front frame.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    pub fn force_render(&mut self) -> io::Result<DiffResult> {
        let started = Instant::now();
        self.buffer.flatten_into(&mut self.back);
        self.output.clear();
        self.output.clear_screen();

        let result = render_full(&self.back, &mut self.output);
        self.cursor_dirty = true;
        self.finish_frame(&result, started)?;
        self.needs_full_redraw = false;
        self.stats.full_redraws += 1;
        Ok(result)
    }

    fn finish_frame(&mut self, result: &DiffResult, started: Instant) -> io::Result<()> {
        // Writing cells moves the hardware cursor.
        if !self.output.is_empty() || self.cursor_dirty {
            match self.cursor {
                CursorState::At(x, y) => {
                    self.output.cursor_move(x, y);
                    self.output.cursor_show();
                }
                CursorState::Hidden if self.cursor_dirty => self.output.cursor_hide(),
                CursorState::Hidden => {}
            }
        }

        if !self.output.is_empty() {
            self.sink.write_all(self.output.as_bytes())?;
        }
        self.cursor_dirty = false;
        std::mem::swap(&mut self.front, &mut self.back);

        self.stats.record(result, self.output.len(), started);
        tracing::trace!(
            cells = result.cells_changed,
            cursor_moves = result.cursor_moves,
            style_changes = result.style_changes,
            bytes = self.output.len(),
            "frame rendered"
        );
        Ok(())
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Replace the buffers with empty ones of the new size.
    ///
    /// Drawn content is discarded and the next [`Renderer::render`] is a
    /// full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        let depth = self.buffer.depth();
        self.buffer = Buffer::with_depth(width, height, depth);
        self.front = Frame::new(width, height);
        self.back = Frame::new(width, height);
        self.needs_full_redraw = true;
        tracing::debug!(width, height, "renderer resized");
    }

    /// Place a visible cursor at `(x, y)` after each frame.
    pub fn show_cursor_at(&mut self, x: u16, y: u16) {
        let next = CursorState::At(x, y);
        self.cursor_dirty |= self.cursor != next;
        self.cursor = next;
    }

    /// Keep the cursor hidden after each frame.
    pub fn hide_cursor(&mut self) {
        self.cursor_dirty |= self.cursor != CursorState::Hidden;
        self.cursor = CursorState::Hidden;
    }

    /// Consume the renderer and return the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: Write> std::fmt::Debug for Renderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("size", &self.size())
            .field("depth", &self.buffer.depth())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
