//! Backend that records calls instead of drawing.

use std::sync::{Arc, Mutex};

use crate::backend::{TerminalBackend, WindowSize};
use crate::color::ColorSpec;
use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Write(String),
    SetColor(Option<ColorSpec>, Option<ColorSpec>),
    ResetColor,
    SetCursor(u16, u16),
    ClearLines(usize),
    Title(String),
    Flush,
}

pub(crate) type Log = Arc<Mutex<Vec<Op>>>;

pub(crate) struct RecordingBackend {
    log: Log,
    size: Option<WindowSize>,
    terminator: &'static str,
    column: Option<u16>,
}

impl RecordingBackend {
    pub(crate) fn new(size: Option<WindowSize>) -> (Self, Log) {
        let log = Log::default();
        let backend = Self {
            log: Arc::clone(&log),
            size,
            terminator: "\n",
            column: None,
        };
        (backend, log)
    }

    /// Behaves like a console that reports its cursor column.
    pub(crate) fn with_cursor_column(mut self, column: u16) -> Self {
        self.terminator = "\r\n";
        self.column = Some(column);
        self
    }

    fn push(&self, op: Op) {
        self.log.lock().unwrap().push(op);
    }
}

impl TerminalBackend for RecordingBackend {
    fn window_size(&mut self) -> Option<WindowSize> {
        self.size
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.push(Op::Write(text.to_string()));
        Ok(())
    }

    fn set_color(&mut self, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        self.push(Op::SetColor(fg.cloned(), bg.cloned()));
        Ok(())
    }

    fn reset_color(&mut self) -> Result<()> {
        self.push(Op::ResetColor);
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.push(Op::SetCursor(x, y));
        Ok(())
    }

    fn clear_lines(&mut self, lines: usize) -> Result<()> {
        if lines < 1 {
            return Err(ConsoleError::InvalidLineCount(lines));
        }
        self.push(Op::ClearLines(lines));
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.push(Op::Title(title.to_string()));
        Ok(())
    }

    fn line_terminator(&self) -> &'static str {
        self.terminator
    }

    fn cursor_column(&mut self) -> Option<u16> {
        self.column
    }

    fn flush(&mut self) -> Result<()> {
        self.push(Op::Flush);
        Ok(())
    }
}

/// Drains the log.
pub(crate) fn take(log: &Log) -> Vec<Op> {
    std::mem::take(&mut *log.lock().unwrap())
}

/// Concatenated text of every write, ignoring colors and control calls.
pub(crate) fn written(ops: &[Op]) -> String {
    ops.iter()
        .filter_map(|op| match op {
            Op::Write(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
