//! Terminal backends.
//!
//! A [`TerminalBackend`] is the raw terminal control surface the console
//! drives: size query, colors, cursor placement, line clearing and window
//! title. Two implementations exist:
//!
//! - [`AnsiBackend`]: escape sequences written to any [`std::io::Write`].
//! - [`NativeBackend`]: attribute-based console control through a
//!   [`ConsoleApi`] (the Win32 console on Windows).
//!
//! [`detect`] picks one at startup.
//!
//! Both backends treat "no window size" (output redirected to a file or
//! pipe) as a normal mode: [`TerminalBackend::window_size`] returns `None`
//! and everything that depends on the terminal geometry becomes a no-op,
//! while colored text is still written.

mod ansi;
mod native;
#[cfg(windows)]
mod win32;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::color::ColorSpec;
use crate::error::Result;

pub use ansi::AnsiBackend;
pub use native::{BufferInfo, ConsoleApi, NativeBackend};
#[cfg(windows)]
pub use win32::Win32Console;

/// Environment variable overriding the configured backend choice.
pub const BACKEND_ENV: &str = "COLOR_CONSOLE_BACKEND";

/// Visible terminal area in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub columns: u16,
    pub rows: u16,
}

impl WindowSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

/// Raw terminal control.
///
/// Implementations are driven from inside the console's output lock, so
/// they need not be thread-safe themselves, only [`Send`].
pub trait TerminalBackend: Send {
    /// Size of the visible window, or `None` when output is not a terminal.
    ///
    /// Queried once and cached; resizes are not observed.
    fn window_size(&mut self) -> Option<WindowSize>;

    /// Writes text with whatever colors are currently set.
    fn write_raw(&mut self, text: &str) -> Result<()>;

    /// Sets the colors used by subsequent writes.
    fn set_color(&mut self, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()>;

    /// Restores the colors in effect before [`set_color`](Self::set_color).
    fn reset_color(&mut self) -> Result<()>;

    /// Moves the cursor to column `x` of row `y` (both zero-based).
    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    /// Blanks the current line and the `lines - 1` lines above it, leaving
    /// the cursor at the start of the topmost cleared line.
    fn clear_lines(&mut self, lines: usize) -> Result<()>;

    /// Sets the terminal window title.
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Line terminator written after a full line.
    fn line_terminator(&self) -> &'static str {
        "\n"
    }

    /// Current cursor column, where the backend can report it.
    fn cursor_column(&mut self) -> Option<u16> {
        None
    }

    /// Pushes buffered output to the terminal.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Writes `text` in the given colors, restoring the previous colors
    /// afterwards. Without colors this is a plain [`write_raw`](Self::write_raw).
    fn write_colored(
        &mut self,
        text: &str,
        fg: Option<&ColorSpec>,
        bg: Option<&ColorSpec>,
    ) -> Result<()> {
        let colored = fg.is_some() || bg.is_some();
        if colored {
            self.set_color(fg, bg)?;
        }
        self.write_raw(text)?;
        if colored {
            self.reset_color()?;
        }
        Ok(())
    }
}

impl<T: TerminalBackend + ?Sized> TerminalBackend for Box<T> {
    fn window_size(&mut self) -> Option<WindowSize> {
        (**self).window_size()
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        (**self).write_raw(text)
    }

    fn set_color(&mut self, fg: Option<&ColorSpec>, bg: Option<&ColorSpec>) -> Result<()> {
        (**self).set_color(fg, bg)
    }

    fn reset_color(&mut self) -> Result<()> {
        (**self).reset_color()
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        (**self).set_cursor(x, y)
    }

    fn clear_lines(&mut self, lines: usize) -> Result<()> {
        (**self).clear_lines(lines)
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        (**self).set_title(title)
    }

    fn line_terminator(&self) -> &'static str {
        (**self).line_terminator()
    }

    fn cursor_column(&mut self) -> Option<u16> {
        (**self).cursor_column()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn write_colored(
        &mut self,
        text: &str,
        fg: Option<&ColorSpec>,
        bg: Option<&ColorSpec>,
    ) -> Result<()> {
        (**self).write_colored(text, fg, bg)
    }
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Native console on Windows, ANSI everywhere else.
    #[default]
    Auto,
    /// Always use escape sequences.
    Ansi,
    /// Use the native console API (Windows only).
    Native,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendKind::Auto),
            "ansi" => Ok(BackendKind::Ansi),
            "native" => Ok(BackendKind::Native),
            other => Err(format!("unknown backend `{}`", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Auto => "auto",
            BackendKind::Ansi => "ansi",
            BackendKind::Native => "native",
        })
    }
}

/// Resolves the backend choice, letting [`BACKEND_ENV`] override `configured`.
///
/// Unparseable environment values are ignored with a warning.
pub fn resolve_kind(configured: BackendKind) -> BackendKind {
    match std::env::var(BACKEND_ENV) {
        Ok(value) => match value.parse() {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(%err, "ignoring {}", BACKEND_ENV);
                configured
            }
        },
        Err(_) => configured,
    }
}

/// Builds the backend for standard output.
///
/// `Auto` selects the native console on Windows and ANSI elsewhere. Asking
/// for `Native` on a platform without one falls back to ANSI.
pub fn detect(kind: BackendKind) -> Box<dyn TerminalBackend> {
    let kind = resolve_kind(kind);
    let want_native = match kind {
        BackendKind::Ansi => false,
        BackendKind::Auto => cfg!(windows),
        BackendKind::Native => true,
    };
    if want_native {
        if let Some(backend) = native_backend() {
            tracing::debug!(%kind, "using native console backend");
            return backend;
        }
        tracing::warn!("native console backend unavailable on this platform, using ANSI");
    }
    tracing::debug!(%kind, "using ANSI backend");
    Box::new(AnsiBackend::stdout())
}

#[cfg(windows)]
fn native_backend() -> Option<Box<dyn TerminalBackend>> {
    Some(Box::new(NativeBackend::new(Win32Console::stdout())))
}

#[cfg(not(windows))]
fn native_backend() -> Option<Box<dyn TerminalBackend>> {
    None
}
