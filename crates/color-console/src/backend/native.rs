//! Attribute-based console backend.
//!
//! Consoles without escape-sequence support are driven through calls that
//! set a packed color attribute, move the cursor and query the screen
//! buffer. The calls themselves sit behind [`ConsoleApi`] so the color and
//! line-clearing logic here is platform-independent.
//!
//! An attribute is one byte: the low nibble is the foreground and the high
//! nibble the background, each made of blue/green/red bits plus an
//! intensity bit.

use std::io;

use super::{TerminalBackend, WindowSize};
use crate::color::{ColorName, ColorSpec};
use crate::error::{ConsoleError, Result};

const BLUE: u16 = 0x1;
const GREEN: u16 = 0x2;
const RED: u16 = 0x4;
const INTENSITY: u16 = 0x8;

const FOREGROUND_MASK: u16 = 0x0F;
const BACKGROUND_MASK: u16 = 0xF0;

/// Attributes assumed when the console cannot report its own (gray on black).
pub const DEFAULT_ATTRIBUTES: u16 = BLUE | GREEN | RED;

/// Foreground attribute bits for a color name.
pub(crate) fn foreground_attr(name: ColorName) -> u16 {
    match name {
        ColorName::Black => 0,
        ColorName::Blue => BLUE | INTENSITY,
        ColorName::DarkBlue => BLUE,
        ColorName::LightBlue => BLUE | INTENSITY,
        ColorName::Cyan => BLUE | GREEN | INTENSITY,
        ColorName::Green => GREEN,
        ColorName::DarkGreen => GREEN,
        ColorName::LightGreen => GREEN | INTENSITY,
        ColorName::Red => RED | INTENSITY,
        ColorName::DarkRed => RED,
        ColorName::LightRed => RED | INTENSITY,
        ColorName::Magenta => RED | BLUE,
        ColorName::DarkMagenta => RED | BLUE,
        ColorName::LightMagenta => RED | BLUE | INTENSITY,
        ColorName::Yellow => GREEN | RED | INTENSITY,
        ColorName::Gray => BLUE | GREEN | RED,
        ColorName::DarkGray => INTENSITY,
        ColorName::LightGray => BLUE | GREEN | RED,
        ColorName::White => BLUE | GREEN | RED | INTENSITY,
    }
}

/// Background attribute bits for a color name.
pub(crate) fn background_attr(name: ColorName) -> u16 {
    foreground_attr(name) << 4
}

/// Parses a raw attribute code given as decimal or `0x` hex.
fn parse_code(code: &str) -> Option<u16> {
    let code = code.trim();
    match code
        .strip_prefix("0x")
        .or_else(|| code.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => code.parse().ok(),
    }
}

fn resolve(spec: &ColorSpec, table: fn(ColorName) -> u16, max: u16) -> Option<u16> {
    match spec {
        ColorSpec::Named(name) => Some(table(*name)),
        ColorSpec::Raw(code) => parse_code(code).filter(|&attr| attr <= max),
    }
}

/// Snapshot of the console screen buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferInfo {
    /// Buffer size in character cells.
    pub width: i16,
    pub height: i16,
    pub cursor_x: i16,
    pub cursor_y: i16,
    /// Attributes currently applied to written text.
    pub attributes: u16,
    /// Visible window rectangle within the buffer (inclusive).
    pub window_left: i16,
    pub window_top: i16,
    pub window_right: i16,
    pub window_bottom: i16,
}

impl BufferInfo {
    /// Visible window size, or `None` when the console reports no window.
    pub fn window_size(&self) -> Option<WindowSize> {
        if self.window_right <= 0 || self.window_bottom <= 0 {
            return None;
        }
        let columns = u16::try_from(self.window_right - self.window_left + 1).ok()?;
        let rows = u16::try_from(self.window_bottom - self.window_top + 1).ok()?;
        Some(WindowSize::new(columns, rows))
    }

    fn window_width(&self) -> usize {
        usize::try_from(self.window_right - self.window_left + 1).unwrap_or(0)
    }
}

/// Platform console calls used by [`NativeBackend`].
pub trait ConsoleApi: Send {
    /// Current screen buffer state, or `None` when there is no console.
    fn buffer_info(&mut self) -> Option<BufferInfo>;

    /// Sets the attribute applied to subsequently written text.
    fn set_attribute(&mut self, attributes: u16) -> io::Result<()>;

    /// Moves the cursor within the screen buffer.
    fn set_cursor_position(&mut self, x: i16, y: i16) -> io::Result<()>;

    /// Sets the console window title.
    fn set_title(&mut self, title: &str) -> io::Result<()>;

    /// Writes text at the cursor.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Pushes buffered text to the console.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Backend for consoles controlled through attribute and cursor calls.
///
/// The window size and the attributes to restore after colored output are
/// read once, when the backend is created. Raw color codes are attribute
/// numbers (`"10"`, `"0x1E"`); foreground codes above `0x0F` and background
/// codes above `0xF0` are rejected.
pub struct NativeBackend<A> {
    api: A,
    reset: Option<u16>,
    size: Option<WindowSize>,
}

impl<A: ConsoleApi> NativeBackend<A> {
    pub fn new(mut api: A) -> Self {
        let info = api.buffer_info();
        let reset = info.map(|info| info.attributes);
        let size = info.and_then(|info| info.window_size());
        tracing::debug!(?size, ?reset, "queried console buffer");
        Self { api, reset, size }
    }

    /// The underlying console calls.
    pub fn api(&self) -> &A {
        &self.api
    }

    fn base_attributes(&self) -> u16 {
        self.reset.unwrap_or(DEFAULT_ATTRIBUTES)
    }
}

impl<A: ConsoleApi> TerminalBackend for NativeBackend<A> {
    fn window_size(&mut self) -> Option<WindowSize> {
        self.size
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.api.write_text(text)?;
        Ok(())
    }

    fn set_color(&mut self, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        let base = self.base_attributes();
        let fg = match fg {
            Some(spec) => resolve(spec, foreground_attr, FOREGROUND_MASK)
                .ok_or_else(|| ConsoleError::InvalidForeground(spec.to_string()))?,
            None => base & FOREGROUND_MASK,
        };
        let bg = match bg {
            Some(spec) => resolve(spec, background_attr, BACKGROUND_MASK)
                .ok_or_else(|| ConsoleError::InvalidBackground(spec.to_string()))?,
            None => base & BACKGROUND_MASK,
        };
        self.api.set_attribute(fg | bg)?;
        Ok(())
    }

    fn reset_color(&mut self) -> Result<()> {
        let base = self.base_attributes();
        self.api.set_attribute(base)?;
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        let x = i16::try_from(x).unwrap_or(i16::MAX);
        let y = i16::try_from(y).unwrap_or(i16::MAX);
        self.api.set_cursor_position(x, y)?;
        Ok(())
    }

    fn clear_lines(&mut self, lines: usize) -> Result<()> {
        if lines < 1 {
            return Err(ConsoleError::InvalidLineCount(lines));
        }
        let Some(info) = self.api.buffer_info() else {
            return Ok(());
        };
        let blank = " ".repeat(info.window_width());
        let mut y = info.cursor_y;
        for _ in 0..lines {
            if y < 0 {
                break;
            }
            self.api.set_cursor_position(0, y)?;
            self.api.write_text(&blank)?;
            self.api.set_cursor_position(0, y)?;
            y -= 1;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.api.set_title(title)?;
        Ok(())
    }

    fn line_terminator(&self) -> &'static str {
        "\r\n"
    }

    fn cursor_column(&mut self) -> Option<u16> {
        self.api
            .buffer_info()
            .and_then(|info| u16::try_from(info.cursor_x).ok())
    }

    fn flush(&mut self) -> Result<()> {
        self.api.flush()?;
        Ok(())
    }
}
