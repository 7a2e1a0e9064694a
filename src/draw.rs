//! Off-screen frame buffers and the terminal backend.
//!
//! Screens never talk to the terminal directly: they paint a `FrameBuffer`
//! through the `DrawManager`, and a `FrameSink` decides where a finished
//! frame goes (the terminal, or a shared slot another thread merges from).

use std::io::Write;
use std::sync::Arc;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use parking_lot::Mutex;

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: Color::Reset,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Blank the buffer, resizing it if needed.
    pub fn reset(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::default());
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Write `text` starting at column `x`; anything off the buffer is clipped.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let cx = x + i as i32;
            if cx < 0 || cx >= self.width as i32 {
                continue;
            }
            let idx = y as usize * self.width as usize + cx as usize;
            self.cells[idx] = Cell { ch, color };
        }
    }

    /// Write `text` centred on row `y`.
    pub fn put_centered(&mut self, y: i32, text: &str, color: Color) {
        let len = text.chars().count() as i32;
        self.put_str((self.width as i32 - len) / 2, y, text, color);
    }

    /// Copy `other` onto this buffer with its left edge at column `x_offset`.
    pub fn blit(&mut self, other: &FrameBuffer, x_offset: u16) {
        for y in 0..other.height.min(self.height) {
            for x in 0..other.width {
                let tx = x + x_offset;
                if tx >= self.width {
                    break;
                }
                let src = other.cells[y as usize * other.width as usize + x as usize];
                self.cells[y as usize * self.width as usize + tx as usize] = src;
            }
        }
    }

    /// The characters of row `y`, handy for assertions.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }
}

/// Destination of a completed frame.
pub trait FrameSink: Send {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()>;
}

// ── Drawing protocol ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Drawing,
}

/// Builds one frame at a time: `init_drawing`, then any number of paints or
/// `merge_drawing` calls, then `complete_drawing`.
pub struct DrawManager {
    canvas: FrameBuffer,
    phase: Phase,
}

impl Default for DrawManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawManager {
    pub fn new() -> Self {
        Self {
            canvas: FrameBuffer::new(0, 0),
            phase: Phase::Idle,
        }
    }

    pub fn init_drawing(&mut self, width: u16, height: u16) -> Result<()> {
        if self.phase == Phase::Drawing {
            return Err(GameError::DrawOrder("init_drawing before previous frame completed"));
        }
        self.canvas.reset(width, height);
        self.phase = Phase::Drawing;
        Ok(())
    }

    pub fn canvas(&mut self) -> &mut FrameBuffer {
        &mut self.canvas
    }

    /// Paste a sub-screen's frame at `x_offset`.
    pub fn merge_drawing(&mut self, frame: &FrameBuffer, x_offset: u16) -> Result<()> {
        if self.phase != Phase::Drawing {
            return Err(GameError::DrawOrder("merge_drawing without init_drawing"));
        }
        self.canvas.blit(frame, x_offset);
        Ok(())
    }

    pub fn complete_drawing(&mut self, sink: &mut dyn FrameSink) -> Result<()> {
        if self.phase != Phase::Drawing {
            return Err(GameError::DrawOrder("complete_drawing without init_drawing"));
        }
        self.phase = Phase::Idle;
        sink.present(&self.canvas)
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Renders frames to a terminal through crossterm.
pub struct TerminalSink<W: Write + Send> {
    out: W,
    last_size: Option<(u16, u16)>,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_size: None,
        }
    }
}

impl<W: Write + Send> FrameSink for TerminalSink<W> {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let size = (frame.width(), frame.height());
        if self.last_size != Some(size) {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some(size);
        }

        for y in 0..frame.height() {
            self.out.queue(cursor::MoveTo(0, y))?;
            let mut color = None;
            let mut run = String::new();
            for x in 0..frame.width() {
                let cell = frame.get(x, y).unwrap_or_default();
                if color != Some(cell.color) {
                    if !run.is_empty() {
                        self.out.queue(Print(&run))?;
                        run.clear();
                    }
                    self.out.queue(style::SetForegroundColor(cell.color))?;
                    color = Some(cell.color);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                self.out.queue(Print(&run))?;
            }
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out
            .queue(cursor::MoveTo(0, frame.height().saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Latest frame of a screen running on another thread.  The owning thread
/// presents into it; the polling thread takes snapshots to merge.
#[derive(Clone)]
pub struct SharedFrame {
    slot: Arc<Mutex<FrameBuffer>>,
}

impl SharedFrame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            slot: Arc::new(Mutex::new(FrameBuffer::new(width, height))),
        }
    }

    pub fn snapshot(&self) -> FrameBuffer {
        self.slot.lock().clone()
    }
}

impl FrameSink for SharedFrame {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.slot.lock().clone_from(frame);
        Ok(())
    }
}
