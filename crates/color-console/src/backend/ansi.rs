//! Escape-sequence backend.

use std::io::Write;

use console::Term;

use super::{TerminalBackend, WindowSize};
use crate::color::{ColorName, ColorSpec};
use crate::error::{ConsoleError, Result};

/// SGR reset (CSI 0 m).
const RESET: &str = "\x1b[0m";

/// Erase entire line (CSI 2 K), after returning to column 0.
const ERASE_LINE: &str = "\r\x1b[2K";

/// Cursor up one line (CSI A).
const CURSOR_UP: &str = "\x1b[A";

/// SGR parameters for a foreground color name.
pub(crate) fn foreground_code(name: ColorName) -> &'static str {
    match name {
        ColorName::Black => "30",
        ColorName::Blue => "34",
        ColorName::DarkBlue => "2;34",
        ColorName::LightBlue => "1;34",
        ColorName::Cyan => "36",
        ColorName::Green => "32",
        ColorName::DarkGreen => "2;32",
        ColorName::LightGreen => "1;32",
        ColorName::Red => "31",
        ColorName::DarkRed => "2;31",
        ColorName::LightRed => "1;31",
        ColorName::Magenta => "35",
        ColorName::DarkMagenta => "2;35",
        ColorName::LightMagenta => "1;35",
        ColorName::Yellow => "33",
        ColorName::Gray => "37",
        ColorName::DarkGray => "2;37",
        ColorName::LightGray => "37",
        ColorName::White => "1;37",
    }
}

/// SGR parameters for a background color name.
pub(crate) fn background_code(name: ColorName) -> &'static str {
    match name {
        ColorName::Black => "40",
        ColorName::Blue => "44",
        ColorName::DarkBlue => "2;44",
        ColorName::LightBlue => "1;44",
        ColorName::Cyan => "46",
        ColorName::Green => "42",
        ColorName::DarkGreen => "2;42",
        ColorName::LightGreen => "1;42",
        ColorName::Red => "41",
        ColorName::DarkRed => "2;41",
        ColorName::LightRed => "1;41",
        ColorName::Magenta => "45",
        ColorName::DarkMagenta => "2;45",
        ColorName::LightMagenta => "1;45",
        ColorName::Yellow => "43",
        ColorName::Gray => "47",
        ColorName::DarkGray => "2;47",
        ColorName::LightGray => "47",
        ColorName::White => "1;47",
    }
}

fn sgr(spec: &ColorSpec, table: fn(ColorName) -> &'static str) -> String {
    match spec {
        ColorSpec::Named(name) => format!("\x1b[{}m", table(*name)),
        // Raw codes are opaque here: whatever the caller passed goes out as-is.
        ColorSpec::Raw(code) => format!("\x1b[{}m", code),
    }
}

/// Probes standard output for a terminal and its size.
fn probe_stdout() -> Option<WindowSize> {
    if !Term::stdout().is_term() {
        return None;
    }
    terminal_size::terminal_size()
        .map(|(w, h)| WindowSize::new(w.0, h.0))
        .filter(|size| size.columns > 0 && size.rows > 0)
}

/// Backend that drives the terminal with ANSI escape sequences.
///
/// The window size is probed lazily on first use and then cached for the
/// life of the backend.
///
/// # Example
///
/// ```rust
/// use color_console::backend::{AnsiBackend, TerminalBackend, WindowSize};
/// use color_console::ColorSpec;
///
/// let mut backend = AnsiBackend::with_size(Vec::new(), Some(WindowSize::new(80, 24)));
/// backend.write_colored("hi", Some(&ColorSpec::from("red")), None).unwrap();
/// assert_eq!(backend.get_ref().as_slice(), b"\x1b[31mhi\x1b[0m");
/// ```
pub struct AnsiBackend<W = Term> {
    out: W,
    size: Option<Option<WindowSize>>,
    probe: fn() -> Option<WindowSize>,
}

impl AnsiBackend<Term> {
    /// Backend writing to standard output, sized from the controlling terminal.
    pub fn stdout() -> Self {
        Self {
            out: Term::stdout(),
            size: None,
            probe: probe_stdout,
        }
    }
}

impl<W: Write + Send> AnsiBackend<W> {
    /// Backend writing to `out` with a fixed window size.
    ///
    /// Pass `None` to model redirected output.
    pub fn with_size(out: W, size: Option<WindowSize>) -> Self {
        Self {
            out,
            size: Some(size),
            probe: || None,
        }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the backend, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, s: &str) -> Result<()> {
        self.out.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl<W: Write + Send> TerminalBackend for AnsiBackend<W> {
    fn window_size(&mut self) -> Option<WindowSize> {
        if self.size.is_none() {
            let probed = (self.probe)();
            tracing::debug!(?probed, "probed terminal size");
            self.size = Some(probed);
        }
        self.size.flatten()
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.emit(text)
    }

    fn set_color(&mut self, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        if let Some(fg) = fg {
            self.emit(&sgr(fg, foreground_code))?;
        }
        if let Some(bg) = bg {
            self.emit(&sgr(bg, background_code))?;
        }
        Ok(())
    }

    fn reset_color(&mut self) -> Result<()> {
        self.emit(RESET)
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.emit(&format!("\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1))
    }

    fn clear_lines(&mut self, lines: usize) -> Result<()> {
        if lines < 1 {
            return Err(ConsoleError::InvalidLineCount(lines));
        }
        for remaining in (0..lines).rev() {
            self.emit(ERASE_LINE)?;
            if remaining > 0 {
                self.emit(CURSOR_UP)?;
            }
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.emit(&format!("\x1b]0;{}\x07", title))
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
