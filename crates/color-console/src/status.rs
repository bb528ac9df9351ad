//! The status line overlay and progress bar frames.
//!
//! A status is ephemeral text left as the last thing on the terminal. Every
//! other write must first blank it and then put it back, so the status
//! always appears below the regular output.
//!
//! [`StatusLine`] holds that state and knows how to blank and redraw
//! itself; [`ProgressFrame`] turns a progress count into the bar text shown
//! as a status:
//!
//! ```text
//! [==============    35%                   ]  Copying files
//! ```

use serde::Deserialize;

use crate::backend::TerminalBackend;
use crate::color::ColorSpec;
use crate::error::{ConsoleError, Result};

/// Per-call colors for [`Console::status`](crate::Console::status).
///
/// Unset fields fall back to the console's [`StatusConfig`](crate::StatusConfig).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusOptions {
    #[serde(alias = "color")]
    pub text_color: Option<ColorSpec>,
    pub background_color: Option<ColorSpec>,
}

impl StatusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

/// Per-call settings for [`Console::show_progress`](crate::Console::show_progress).
///
/// A bare number converts into options with just the total set:
///
/// ```rust
/// use color_console::ProgressOptions;
///
/// let opts = ProgressOptions::from(250u64);
/// assert_eq!(opts.total, Some(250));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressOptions {
    pub total: Option<u64>,
    pub bar_length: Option<usize>,
    #[serde(alias = "color")]
    pub text_color: Option<ColorSpec>,
    pub background_color: Option<ColorSpec>,
}

impl ProgressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn bar_length(mut self, bar_length: usize) -> Self {
        self.bar_length = Some(bar_length);
        self
    }

    pub fn text_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

impl From<u64> for ProgressOptions {
    fn from(total: u64) -> Self {
        ProgressOptions::new().total(total)
    }
}

/// One rendered state of a progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressFrame {
    /// Number of fill characters in the bar.
    pub filled: usize,
    /// Completion as whole percent, e.g. `"35%"`.
    pub percent: String,
    /// The bar contents with the percentage centred over it.
    pub bar: String,
    label: String,
}

impl ProgressFrame {
    /// Renders `complete` out of `total` steps into a bar of `bar_length`
    /// characters.
    ///
    /// `complete` is clamped to `total`. When the bar is too short to hold
    /// the percentage, the bar is just the percentage.
    pub fn new(label: &str, complete: u64, total: u64, bar_length: usize, fill: char) -> Result<Self> {
        if total == 0 {
            return Err(ConsoleError::ZeroProgressTotal);
        }
        let complete = complete.min(total);
        let filled = (u128::from(complete) * bar_length as u128 / u128::from(total)) as usize;
        let percent = format!("{}%", u128::from(complete) * 100 / u128::from(total));

        let mut bar: Vec<char> = std::iter::repeat(fill)
            .take(filled)
            .chain(std::iter::repeat(' ').take(bar_length - filled))
            .collect();
        let pct: Vec<char> = percent.chars().collect();
        if pct.len() >= bar_length {
            bar = pct;
        } else {
            let at = (bar_length - pct.len()) / 2;
            bar.splice(at..at + pct.len(), pct);
        }

        Ok(Self {
            filled,
            percent,
            bar: bar.into_iter().collect(),
            label: label.to_string(),
        })
    }

    /// The status text showing this frame.
    pub fn status_text(&self) -> String {
        format!("[{}]  {}", self.bar, self.label)
    }
}

/// Number of terminal lines `text` occupies once the terminal wraps it.
fn lines_occupied(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    text.chars().count() / width + 1
}

/// The current status and whether it is on screen.
///
/// All methods expect to be called with exclusive access to the backend;
/// the console calls them from inside its output lock.
#[derive(Debug, Default)]
pub struct StatusLine {
    text: Option<String>,
    fg: Option<ColorSpec>,
    bg: Option<ColorSpec>,
    displayed: bool,
    last_percent: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status text currently set, shown or not.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the status is the last thing written to the terminal.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Percentage of the last progress frame shown, if the status is one.
    pub fn last_percent(&self) -> Option<&str> {
        self.last_percent.as_deref()
    }

    /// Erases the status from the terminal, keeping it set.
    pub fn blank<B: TerminalBackend + ?Sized>(&mut self, backend: &mut B, width: usize) -> Result<()> {
        if !self.displayed {
            return Ok(());
        }
        if let Some(text) = &self.text {
            let lines = lines_occupied(text, width);
            tracing::trace!(lines, "blanking status");
            backend.clear_lines(lines)?;
        }
        self.displayed = false;
        Ok(())
    }

    /// Writes the status back if one is set and not already shown.
    pub fn redraw<B: TerminalBackend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        if self.displayed {
            return Ok(());
        }
        if let Some(text) = &self.text {
            tracing::trace!("redrawing status");
            backend.write_colored(text, self.fg.as_ref(), self.bg.as_ref())?;
            self.displayed = true;
        }
        Ok(())
    }

    /// Replaces the status. `None` clears it.
    pub fn set<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: usize,
        text: Option<String>,
        fg: Option<ColorSpec>,
        bg: Option<ColorSpec>,
    ) -> Result<()> {
        self.blank(backend, width)?;
        self.text = text;
        self.fg = fg;
        self.bg = bg;
        self.last_percent = None;
        self.redraw(backend)
    }

    /// Shows `frame` as the status unless the same percentage is already on
    /// screen. Returns whether anything was written.
    ///
    /// A frame for another label (or bar length) at the same percentage is
    /// still drawn.
    pub fn show_progress<B: TerminalBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: usize,
        frame: &ProgressFrame,
        fg: Option<ColorSpec>,
        bg: Option<ColorSpec>,
    ) -> Result<bool> {
        let text = frame.status_text();
        if self.displayed
            && self.last_percent.as_deref() == Some(frame.percent.as_str())
            && self.text.as_deref() == Some(text.as_str())
        {
            return Ok(false);
        }
        self.set(backend, width, Some(text), fg, bg)?;
        self.last_percent = Some(frame.percent.clone());
        Ok(true)
    }
}
